//! Construct creation.

use linewright_validity::{Checklist, ChecklistError};
use tracing::trace;

use crate::location::SourceLocation;
use crate::settings::ParserSettings;
use crate::token::{Token, TokenKind};

use super::{Construct, Node, Payload};

/// Creates constructs with the checklist their kind is configured for.
#[derive(Debug, Clone, Copy)]
pub struct ConstructFactory<'s> {
    settings: &'s ParserSettings,
}

impl<'s> ConstructFactory<'s> {
    /// Creates a factory over `settings`.
    #[must_use]
    pub fn new(settings: &'s ParserSettings) -> Self {
        Self { settings }
    }

    /// The settings checklist policies are taken from.
    #[must_use]
    pub fn settings(&self) -> &'s ParserSettings {
        self.settings
    }

    /// A checklist for `payload`'s kind with its constraints registered.
    ///
    /// # Errors
    ///
    /// Fails if the kind declares a constraint twice.
    pub fn checklist_for<P: Payload>(&self, payload: &P) -> Result<Checklist, ChecklistError> {
        self.settings
            .checklist_policy(payload.id())
            .new_checklist(payload.validity_constraints().iter().copied())
    }

    /// Creates a construct at `location`, which composite constructs
    /// usually receive later from the driver.
    ///
    /// # Errors
    ///
    /// Fails if the kind declares a constraint twice.
    pub fn create<P: Payload>(
        &self,
        payload: P,
        location: Option<SourceLocation>,
    ) -> Result<Node<P>, ChecklistError> {
        let checklist = self.checklist_for(&payload)?;
        trace!(construct = payload.id(), "create");
        Ok(Node::new(Construct::new(payload, location, checklist)))
    }

    /// Creates a construct represented by `token`: its location is the
    /// token's and its value the token's text.
    ///
    /// # Errors
    ///
    /// Fails if the kind declares a constraint twice.
    pub fn create_from_token<P: Payload, K: TokenKind>(
        &self,
        payload: P,
        token: &Token<K>,
    ) -> Result<Node<P>, ChecklistError> {
        let node = self.create(payload, Some(token.location.clone()))?;
        if let Some(text) = &token.text {
            node.borrow_mut().set_value(text.clone());
        }
        Ok(node)
    }
}
