//! Checklist errors.
//!
//! Every variant here is a contract violation by the language processor
//! (a semantic pass checking the wrong thing, or checking it twice), never a
//! problem with the source being parsed.

use std::panic::Location;

use smol_str::SmolStr;
use thiserror::Error;

/// Errors raised by a validity-constraint checklist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChecklistError {
    /// A constraint with this name is already registered, checked or not.
    #[error("validity constraint '{0}' is already registered")]
    DuplicateConstraint(SmolStr),

    /// The constraint was never registered on this checklist.
    #[error("unknown validity constraint '{0}'")]
    UnknownConstraint(SmolStr),

    /// The constraint was marked checked a second time.
    #[error("validity constraint '{name}' checked twice (first at {first}, again at {second})")]
    AlreadyChecked {
        /// The constraint name.
        name: SmolStr,
        /// Call site of the first `mark_checked`.
        first: &'static Location<'static>,
        /// Call site of the repeated `mark_checked`.
        second: &'static Location<'static>,
    },
}

impl ChecklistError {
    /// Returns the name of the constraint involved.
    #[must_use]
    pub fn constraint_name(&self) -> &str {
        match self {
            Self::DuplicateConstraint(name) | Self::UnknownConstraint(name) => name,
            Self::AlreadyChecked { name, .. } => name,
        }
    }
}

/// A check scope was finished while obligations were still open.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unchecked validity constraints: {}", .unchecked.join(", "))]
pub struct IncompleteChecks {
    /// Names of the constraints that were never checked, in registration order.
    pub unchecked: Vec<SmolStr>,
}
