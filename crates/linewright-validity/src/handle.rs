//! Shared checklist handle and the policy that picks an implementation.

use std::cell::RefCell;
use std::fmt;
use std::panic::Location;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::checklist::{AlwaysCompleteChecklist, TrackingChecklist, ValidityConstraintChecklist};
use crate::error::ChecklistError;
use crate::scope::CheckScope;

/// Which checklist implementation a construct kind gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChecklistPolicy {
    /// Record every obligation and reject missing or repeated checks.
    Tracking,
    /// Treat every obligation as already satisfied.
    AlwaysComplete,
}

impl Default for ChecklistPolicy {
    /// Tracking in builds with debug assertions, always-complete otherwise.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Tracking
        } else {
            Self::AlwaysComplete
        }
    }
}

impl ChecklistPolicy {
    /// Creates a checklist with `constraints` registered.
    ///
    /// Under [`ChecklistPolicy::AlwaysComplete`] the names are ignored and
    /// nothing is allocated.
    ///
    /// # Errors
    ///
    /// Fails if a tracking checklist is requested and `constraints` repeats
    /// a name.
    pub fn new_checklist<'n>(
        self,
        constraints: impl IntoIterator<Item = &'n str>,
    ) -> Result<Checklist, ChecklistError> {
        match self {
            Self::AlwaysComplete => Ok(Checklist::AlwaysComplete),
            Self::Tracking => Ok(Checklist::tracking(TrackingChecklist::with_constraints(
                constraints,
            )?)),
        }
    }
}

/// The checklist a construct holds.
///
/// Cloning the handle shares the underlying tracking state; use
/// [`Checklist::deep_clone`] for an independent copy.
#[derive(Clone, Default)]
pub enum Checklist {
    /// The always-complete singleton.
    #[default]
    AlwaysComplete,
    /// A tracking checklist.
    Tracking(Rc<RefCell<TrackingChecklist>>),
}

impl Checklist {
    /// Wraps a tracking checklist.
    #[must_use]
    pub fn tracking(checklist: TrackingChecklist) -> Self {
        Self::Tracking(Rc::new(RefCell::new(checklist)))
    }

    /// Returns `true` if this handle tracks obligations.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        matches!(self, Self::Tracking(_))
    }

    /// Returns a handle with its own copy of the tracking state.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        match self {
            Self::AlwaysComplete => Self::AlwaysComplete,
            Self::Tracking(inner) => Self::tracking(inner.borrow().clone()),
        }
    }

    /// Returns `true` if both handles refer to the same tracking state.
    #[must_use]
    pub fn shares_state_with(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Tracking(a), Self::Tracking(b)) => Rc::ptr_eq(a, b),
            (Self::AlwaysComplete, Self::AlwaysComplete) => true,
            _ => false,
        }
    }

    /// Registers a new obligation.
    ///
    /// # Errors
    ///
    /// See [`ValidityConstraintChecklist::add_constraint`].
    pub fn add_constraint(&self, name: &str) -> Result<(), ChecklistError> {
        match self {
            Self::AlwaysComplete => AlwaysCompleteChecklist.add_constraint(name),
            Self::Tracking(inner) => inner.borrow_mut().add_constraint(name),
        }
    }

    /// Marks `name` as checked, recording the caller as the call site.
    ///
    /// # Errors
    ///
    /// See [`ValidityConstraintChecklist::mark_checked_at`].
    #[track_caller]
    pub fn mark_checked(&self, name: &str) -> Result<(), ChecklistError> {
        self.mark_checked_at(name, Location::caller())
    }

    /// Marks `name` as checked with an explicit call site.
    ///
    /// # Errors
    ///
    /// See [`ValidityConstraintChecklist::mark_checked_at`].
    pub fn mark_checked_at(
        &self,
        name: &str,
        site: &'static Location<'static>,
    ) -> Result<(), ChecklistError> {
        match self {
            Self::AlwaysComplete => AlwaysCompleteChecklist.mark_checked_at(name, site),
            Self::Tracking(inner) => inner.borrow_mut().mark_checked_at(name, site),
        }
    }

    /// Returns `true` if nothing remains unchecked.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self {
            Self::AlwaysComplete => true,
            Self::Tracking(inner) => inner.borrow().is_complete(),
        }
    }

    /// Names of the obligations still unchecked.
    #[must_use]
    pub fn unchecked_constraint_names(&self) -> Vec<SmolStr> {
        match self {
            Self::AlwaysComplete => Vec::new(),
            Self::Tracking(inner) => inner.borrow().unchecked_constraint_names(),
        }
    }

    /// Names of every registered obligation.
    #[must_use]
    pub fn constraint_names(&self) -> Vec<SmolStr> {
        match self {
            Self::AlwaysComplete => Vec::new(),
            Self::Tracking(inner) => inner.borrow().constraint_names(),
        }
    }

    /// Opens a [`CheckScope`] over this checklist.
    #[must_use]
    pub fn begin_checks(&self) -> CheckScope<'_> {
        CheckScope::new(self)
    }
}

impl ValidityConstraintChecklist for Checklist {
    fn add_constraint(&mut self, name: &str) -> Result<(), ChecklistError> {
        Checklist::add_constraint(self, name)
    }

    fn mark_checked_at(
        &mut self,
        name: &str,
        site: &'static Location<'static>,
    ) -> Result<(), ChecklistError> {
        Checklist::mark_checked_at(self, name, site)
    }

    fn is_complete(&self) -> bool {
        Checklist::is_complete(self)
    }

    fn unchecked_constraint_names(&self) -> Vec<SmolStr> {
        Checklist::unchecked_constraint_names(self)
    }

    fn constraint_names(&self) -> Vec<SmolStr> {
        Checklist::constraint_names(self)
    }
}

impl fmt::Debug for Checklist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlwaysComplete => f.write_str("AlwaysComplete"),
            Self::Tracking(inner) => f
                .debug_struct("Tracking")
                .field("unchecked", &inner.borrow().unchecked_constraint_names())
                .finish(),
        }
    }
}
