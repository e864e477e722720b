//! Shared construct handles.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::location::{Located, SourceLocation};

use super::{Construct, Payload};

/// A handle to a construct.
///
/// `clone()` aliases the same construct. A tree owns its children through
/// these handles, so a shallow clone of a parent shares the children with
/// the original while a deep clone gets its own.
pub struct Node<P>(Rc<RefCell<Construct<P>>>);

impl<P: Payload> Node<P> {
    /// Wraps a construct.
    #[must_use]
    pub fn new(construct: Construct<P>) -> Self {
        Self(Rc::new(RefCell::new(construct)))
    }

    /// Borrows the construct.
    ///
    /// # Panics
    ///
    /// Panics if the construct is mutably borrowed.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, Construct<P>> {
        self.0.borrow()
    }

    /// Borrows the construct mutably.
    ///
    /// # Panics
    ///
    /// Panics if the construct is already borrowed.
    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, Construct<P>> {
        self.0.borrow_mut()
    }

    /// Returns true if both handles refer to the same construct.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The kind tag.
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.borrow().id()
    }

    /// The location, once known.
    #[must_use]
    pub fn location(&self) -> Option<SourceLocation> {
        self.borrow().location().cloned()
    }

    /// A new construct sharing children, checklist and attributes with this one.
    #[must_use]
    pub fn shallow_clone(&self) -> Self {
        Self::new(self.borrow().shallow_copy())
    }

    /// A new construct with recursively cloned children and checklist.
    /// Location and source reference stay shared.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        Self::new(self.borrow().deep_copy())
    }
}

impl<P> Clone for Node<P> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<P: Payload> Located for Node<P> {
    fn located(&self) -> Option<SourceLocation> {
        self.location()
    }
}

impl<P: fmt::Debug> fmt::Debug for Node<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(construct) => construct.fmt(f),
            Err(_) => f.write_str("Node(<borrowed>)"),
        }
    }
}
