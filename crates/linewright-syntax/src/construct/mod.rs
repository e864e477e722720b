//! Constructs: typed AST nodes with locations and correctness data.
//!
//! A language describes its nodes as one closed enum implementing
//! [`Payload`]. The framework wraps each payload in a [`Construct`], which
//! adds the kind-erased surface every construct shares (id, location,
//! optional scalar value, children) and the correctness data semantic
//! passes check against. Code that does not care about the concrete kind
//! uses that surface; code that does matches on [`Construct::payload`].
//!
//! Constructs live behind [`Node`] handles. Cloning a handle aliases the same
//! construct; [`Node::shallow_clone`] and [`Node::deep_clone`] copy it.

mod correctness;
mod factory;
mod node;

use std::fmt;
use std::sync::Arc;

use linewright_validity::Checklist;
use smol_str::SmolStr;

use crate::location::{Located, SourceLocation};
use crate::token::SourceCode;

pub use correctness::{ConstructError, CorrectnessData};
pub use factory::ConstructFactory;
pub use node::Node;

/// How a construct appears in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Exactly one token; the location is the token's and never changes.
    SingleToken,
    /// Several parts; the location is composed once parsing finishes.
    Composite,
}

/// The closed set of node kinds of one language.
pub trait Payload: Clone + fmt::Debug + Sized {
    /// The kind tag, used in diagnostics, settings overrides and reports.
    fn id(&self) -> &'static str;

    /// Single token or composite.
    fn representation(&self) -> Representation {
        Representation::Composite
    }

    /// Names of the semantic checks every construct of this kind needs.
    fn validity_constraints(&self) -> &'static [&'static str] {
        &[]
    }

    /// Calls `f` on each direct child, in source order.
    fn for_each_child(&self, f: &mut dyn FnMut(&Node<Self>));

    /// Copy whose children are deep clones of this payload's children.
    #[must_use]
    fn deep_clone(&self) -> Self;
}

/// A construct.
pub struct Construct<P> {
    payload: P,
    location: Option<SourceLocation>,
    value: Option<SmolStr>,
    correctness: Option<CorrectnessData>,
}

impl<P: Payload> Construct<P> {
    /// Creates a construct with fresh correctness data.
    #[must_use]
    pub fn new(payload: P, location: Option<SourceLocation>, checklist: Checklist) -> Self {
        Self {
            payload,
            location,
            value: None,
            correctness: Some(CorrectnessData::new(checklist)),
        }
    }

    /// The kind tag.
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.payload.id()
    }

    /// The kind-specific payload.
    #[must_use]
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// The kind-specific payload, mutably.
    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    /// The location, once known.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    /// Returns true unless the construct is a single token.
    #[must_use]
    pub fn is_relocatable(&self) -> bool {
        self.payload.representation() == Representation::Composite
    }

    /// Sets the location of a composite construct.
    ///
    /// # Errors
    ///
    /// Single-token constructs take their token's location and reject this.
    pub fn set_location(&mut self, location: SourceLocation) -> Result<(), ConstructError> {
        if !self.is_relocatable() {
            return Err(ConstructError::NotRelocatable(self.id()));
        }
        self.location = Some(location);
        Ok(())
    }

    /// The optional scalar value (a literal's text, a name).
    #[must_use]
    pub fn value(&self) -> Option<&SmolStr> {
        self.value.as_ref()
    }

    /// Sets the scalar value.
    pub fn set_value(&mut self, value: impl Into<SmolStr>) {
        self.value = Some(value.into());
    }

    /// The direct children, in source order.
    #[must_use]
    pub fn children(&self) -> Vec<Node<P>> {
        let mut children = Vec::new();
        self.payload
            .for_each_child(&mut |child| children.push(child.clone()));
        children
    }

    /// Returns true until the correctness data is removed.
    #[must_use]
    pub fn has_correctness_data(&self) -> bool {
        self.correctness.is_some()
    }

    fn correctness(&self) -> Result<&CorrectnessData, ConstructError> {
        self.correctness
            .as_ref()
            .ok_or(ConstructError::MissingCorrectnessData(self.payload.id()))
    }

    /// The validity checklist.
    ///
    /// # Errors
    ///
    /// Fails after [`Construct::remove_correctness_data`].
    pub fn validity_checklist(&self) -> Result<&Checklist, ConstructError> {
        Ok(self.correctness()?.checklist())
    }

    /// The source code this construct was parsed from, if already set.
    ///
    /// # Errors
    ///
    /// Fails after [`Construct::remove_correctness_data`].
    pub fn source_code(&self) -> Result<Option<&Arc<SourceCode>>, ConstructError> {
        Ok(self.correctness()?.source_code())
    }

    /// Sets the source code reference.
    ///
    /// # Errors
    ///
    /// Fails after [`Construct::remove_correctness_data`].
    pub fn set_source_code(&mut self, source: Arc<SourceCode>) -> Result<(), ConstructError> {
        let id = self.payload.id();
        self.correctness
            .as_mut()
            .ok_or(ConstructError::MissingCorrectnessData(id))?
            .set_source_code(source);
        Ok(())
    }

    /// Drops the correctness data for good.
    pub fn remove_correctness_data(&mut self) {
        if self.correctness.take().is_some() {
            tracing::trace!(construct = self.payload.id(), "correctness data removed");
        }
    }

    /// The construct's text, when the source and a single-line location are known.
    #[must_use]
    pub fn source_fragment(&self) -> Option<&str> {
        let source = self.correctness.as_ref()?.source_code()?;
        source.fragment(self.location.as_ref()?)
    }

    fn shallow_copy(&self) -> Self {
        Self {
            payload: self.payload.clone(),
            location: self.location.clone(),
            value: self.value.clone(),
            correctness: self.correctness.clone(),
        }
    }

    fn deep_copy(&self) -> Self {
        Self {
            payload: self.payload.deep_clone(),
            location: self.location.clone(),
            value: self.value.clone(),
            correctness: self.correctness.as_ref().map(CorrectnessData::deep_clone),
        }
    }
}

impl<P: Payload> Located for Construct<P> {
    fn located(&self) -> Option<SourceLocation> {
        self.location.clone()
    }
}

impl<P: fmt::Debug> fmt::Debug for Construct<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Construct")
            .field("payload", &self.payload)
            .field("location", &self.location)
            .field("value", &self.value)
            .field("correctness", &self.correctness)
            .finish()
    }
}
