//! `linewright-validity` - validity-constraint checklists.
//!
//! Every construct a linewright parser produces carries a checklist of the
//! semantic checks it still needs. Downstream passes mark each one checked,
//! and a finished tree can be asked whether anything was forgotten.
//!
//! - **Tracking checklist**: records each obligation and rejects checks that
//!   are unknown or repeated
//! - **Always-complete checklist**: a zero-sized no-op for production builds
//! - **Policy**: picks one of the two when a construct is created
//! - **Check scope**: a must-finish guard over a checklist
//!
//! # Example
//!
//! ```
//! use linewright_validity::{ChecklistError, ChecklistPolicy};
//!
//! let checklist = ChecklistPolicy::Tracking
//!     .new_checklist(["names-resolved", "types-agree"])
//!     .unwrap();
//!
//! checklist.mark_checked("names-resolved").unwrap();
//! assert!(!checklist.is_complete());
//! assert!(matches!(
//!     checklist.mark_checked("names-resolved"),
//!     Err(ChecklistError::AlreadyChecked { .. })
//! ));
//!
//! checklist.mark_checked("types-agree").unwrap();
//! assert!(checklist.is_complete());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod checklist;
pub mod error;
pub mod handle;
pub mod scope;

pub use checklist::{
    AlwaysCompleteChecklist, TrackingChecklist, ValidityConstraintChecklist, ALWAYS_COMPLETE,
};
pub use error::{ChecklistError, IncompleteChecks};
pub use handle::{Checklist, ChecklistPolicy};
pub use scope::CheckScope;
