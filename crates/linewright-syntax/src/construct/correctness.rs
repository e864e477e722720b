//! Correctness data: what a construct carries until it has been validated.

use std::sync::Arc;

use linewright_validity::Checklist;
use thiserror::Error;

use crate::token::SourceCode;

/// Contract violations on a construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConstructError {
    /// Correctness data was accessed after `remove_correctness_data`.
    #[error("correctness data of construct '{0}' was already removed")]
    MissingCorrectnessData(&'static str),

    /// A construct represented by a single token cannot be relocated.
    #[error("construct '{0}' is a single token and cannot be relocated")]
    NotRelocatable(&'static str),
}

/// The validity checklist and the source reference of one construct.
#[derive(Debug, Clone)]
pub struct CorrectnessData {
    checklist: Checklist,
    source_code: Option<Arc<SourceCode>>,
}

impl CorrectnessData {
    /// Creates correctness data around `checklist`; the source is set later.
    #[must_use]
    pub fn new(checklist: Checklist) -> Self {
        Self {
            checklist,
            source_code: None,
        }
    }

    /// The validity checklist.
    #[must_use]
    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    /// The source code the construct was parsed from, once set.
    #[must_use]
    pub fn source_code(&self) -> Option<&Arc<SourceCode>> {
        self.source_code.as_ref()
    }

    /// Sets the source code reference.
    pub fn set_source_code(&mut self, source: Arc<SourceCode>) {
        self.source_code = Some(source);
    }

    /// Copy with independent checklist state; the source stays shared.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        Self {
            checklist: self.checklist.deep_clone(),
            source_code: self.source_code.clone(),
        }
    }
}
