//! Check scopes: the capability form of a checklist.
//!
//! A semantic pass that validates one construct opens a scope, threads it
//! through every check it performs and closes it with [`CheckScope::finish`].
//! A scope that goes out of scope unfinished panics in debug builds, so a
//! pass that bails out early without saying so is caught in tests. In
//! release builds the guard is compiled out.

use std::panic::Location;

use drop_bomb::DebugDropBomb;

use crate::error::{ChecklistError, IncompleteChecks};
use crate::handle::Checklist;

/// An open sequence of checks against one checklist.
#[must_use = "a check scope must be finished or abandoned"]
pub struct CheckScope<'c> {
    checklist: &'c Checklist,
    bomb: DebugDropBomb,
}

impl<'c> CheckScope<'c> {
    pub(crate) fn new(checklist: &'c Checklist) -> Self {
        Self {
            checklist,
            bomb: DebugDropBomb::new("check scope dropped without finish() or abandon()"),
        }
    }

    /// Marks `name` checked and hands the scope back.
    ///
    /// # Errors
    ///
    /// On failure the scope is closed and the checklist error returned.
    #[track_caller]
    pub fn check(mut self, name: &str) -> Result<Self, ChecklistError> {
        let site = Location::caller();
        match self.checklist.mark_checked_at(name, site) {
            Ok(()) => Ok(self),
            Err(err) => {
                self.bomb.defuse();
                Err(err)
            }
        }
    }

    /// Closes the scope, requiring every obligation to be checked.
    ///
    /// # Errors
    ///
    /// Returns the obligations that are still open.
    pub fn finish(mut self) -> Result<(), IncompleteChecks> {
        self.bomb.defuse();
        let unchecked = self.checklist.unchecked_constraint_names();
        if unchecked.is_empty() {
            Ok(())
        } else {
            tracing::debug!(?unchecked, "check scope finished incomplete");
            Err(IncompleteChecks { unchecked })
        }
    }

    /// Closes the scope without requiring completeness.
    pub fn abandon(mut self) {
        self.bomb.defuse();
    }
}
