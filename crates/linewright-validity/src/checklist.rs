//! The checklist trait and its two implementations.
//!
//! A checklist belongs to exactly one construct instance. Obligations are
//! registered when the construct is created and each must be marked checked
//! exactly once by the semantic pass that validates it.

use std::panic::Location;

use indexmap::map::Entry;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smol_str::SmolStr;

use crate::error::ChecklistError;

/// Tracker of named semantic obligations for one construct.
pub trait ValidityConstraintChecklist {
    /// Registers a new, unchecked obligation.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistError::DuplicateConstraint`] if `name` is already
    /// registered, whether checked or not.
    fn add_constraint(&mut self, name: &str) -> Result<(), ChecklistError>;

    /// Marks `name` as checked, recording `site` as the call site.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistError::AlreadyChecked`] on a repeated check and
    /// [`ChecklistError::UnknownConstraint`] if `name` was never registered.
    fn mark_checked_at(
        &mut self,
        name: &str,
        site: &'static Location<'static>,
    ) -> Result<(), ChecklistError>;

    /// Marks `name` as checked, recording the caller as the call site.
    ///
    /// # Errors
    ///
    /// See [`ValidityConstraintChecklist::mark_checked_at`].
    #[track_caller]
    fn mark_checked(&mut self, name: &str) -> Result<(), ChecklistError> {
        self.mark_checked_at(name, Location::caller())
    }

    /// Returns `true` if no registered obligation remains unchecked.
    fn is_complete(&self) -> bool;

    /// Names of the obligations still unchecked, in registration order.
    fn unchecked_constraint_names(&self) -> Vec<SmolStr>;

    /// Names of every registered obligation, in registration order.
    fn constraint_names(&self) -> Vec<SmolStr>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstraintState {
    Unchecked,
    Checked(&'static Location<'static>),
}

/// Checklist that records every obligation and its state.
#[derive(Debug, Clone, Default)]
pub struct TrackingChecklist {
    constraints: IndexMap<SmolStr, ConstraintState, FxBuildHasher>,
}

impl TrackingChecklist {
    /// Creates an empty checklist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a checklist with the given obligations registered.
    ///
    /// # Errors
    ///
    /// Fails if `names` contains a duplicate.
    pub fn with_constraints<'n>(
        names: impl IntoIterator<Item = &'n str>,
    ) -> Result<Self, ChecklistError> {
        let mut checklist = Self::new();
        for name in names {
            checklist.add_constraint(name)?;
        }
        Ok(checklist)
    }

    /// Returns `true` if `name` is registered and already checked.
    #[must_use]
    pub fn is_checked(&self, name: &str) -> bool {
        matches!(
            self.constraints.get(name),
            Some(ConstraintState::Checked(_))
        )
    }

    /// Number of registered obligations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl ValidityConstraintChecklist for TrackingChecklist {
    fn add_constraint(&mut self, name: &str) -> Result<(), ChecklistError> {
        match self.constraints.entry(SmolStr::new(name)) {
            Entry::Occupied(entry) => Err(ChecklistError::DuplicateConstraint(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(ConstraintState::Unchecked);
                Ok(())
            }
        }
    }

    fn mark_checked_at(
        &mut self,
        name: &str,
        site: &'static Location<'static>,
    ) -> Result<(), ChecklistError> {
        let Some(state) = self.constraints.get_mut(name) else {
            return Err(ChecklistError::UnknownConstraint(SmolStr::new(name)));
        };
        match *state {
            ConstraintState::Unchecked => {
                *state = ConstraintState::Checked(site);
                Ok(())
            }
            ConstraintState::Checked(first) => Err(ChecklistError::AlreadyChecked {
                name: SmolStr::new(name),
                first,
                second: site,
            }),
        }
    }

    fn is_complete(&self) -> bool {
        self.constraints
            .values()
            .all(|state| matches!(state, ConstraintState::Checked(_)))
    }

    fn unchecked_constraint_names(&self) -> Vec<SmolStr> {
        self.constraints
            .iter()
            .filter(|(_, state)| **state == ConstraintState::Unchecked)
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn constraint_names(&self) -> Vec<SmolStr> {
        self.constraints.keys().cloned().collect()
    }
}

/// Checklist whose obligations are all satisfied up front.
///
/// Every operation is a no-op and [`is_complete`](ValidityConstraintChecklist::is_complete)
/// is always `true`. The type is zero-sized, so [`ALWAYS_COMPLETE`] is the
/// only value there ever is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlwaysCompleteChecklist;

/// The always-complete checklist singleton.
pub const ALWAYS_COMPLETE: AlwaysCompleteChecklist = AlwaysCompleteChecklist;

impl ValidityConstraintChecklist for AlwaysCompleteChecklist {
    fn add_constraint(&mut self, _name: &str) -> Result<(), ChecklistError> {
        Ok(())
    }

    fn mark_checked_at(
        &mut self,
        _name: &str,
        _site: &'static Location<'static>,
    ) -> Result<(), ChecklistError> {
        Ok(())
    }

    fn is_complete(&self) -> bool {
        true
    }

    fn unchecked_constraint_names(&self) -> Vec<SmolStr> {
        Vec::new()
    }

    fn constraint_names(&self) -> Vec<SmolStr> {
        Vec::new()
    }
}
