//! Whole-tree completion checking.
//!
//! After every semantic pass has run, each construct's checklist should be
//! complete. [`check_completion`] walks a finished tree and lists every
//! obligation still open, which is how a language under development finds
//! the construct kinds some pass forgot.

use std::fmt;

use smol_str::SmolStr;
use tracing::debug;

use crate::construct::{Node, Payload};
use crate::location::SourceLocation;

/// An obligation nobody checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncheckedConstraint {
    /// Id of the construct kind.
    pub construct: &'static str,
    /// Name of the constraint.
    pub constraint: SmolStr,
    /// Where the construct is.
    pub location: Option<SourceLocation>,
}

impl fmt::Display for UncheckedConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: '{}' not checked", self.construct, self.constraint)?;
        if let Some(location) = &self.location {
            write!(f, " (at {location})")?;
        }
        Ok(())
    }
}

/// Result of [`check_completion`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionReport {
    unchecked: Vec<UncheckedConstraint>,
    visited: usize,
}

impl CompletionReport {
    /// Returns true if every visited construct is fully checked.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unchecked.is_empty()
    }

    /// The open obligations, in tree order.
    #[must_use]
    pub fn unchecked(&self) -> &[UncheckedConstraint] {
        &self.unchecked
    }

    /// Number of constructs whose checklist was inspected.
    #[must_use]
    pub fn visited(&self) -> usize {
        self.visited
    }

    fn visit<P: Payload>(&mut self, root: &Node<P>) {
        let mut stack = vec![root.clone()];
        while let Some(node) = stack.pop() {
            let construct = node.borrow();
            if let Ok(checklist) = construct.validity_checklist() {
                self.visited += 1;
                let location = construct.location().cloned();
                self.unchecked.extend(checklist.unchecked_constraint_names().into_iter().map(
                    |constraint| UncheckedConstraint {
                        construct: construct.id(),
                        constraint,
                        location: location.clone(),
                    },
                ));
            }
            let mut children = construct.children();
            children.reverse();
            stack.extend(children);
        }
    }
}

impl fmt::Display for CompletionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.unchecked {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Lists the unchecked obligations of `root` and all its descendants.
///
/// A construct whose correctness data was removed is not inspected; its
/// children still are.
#[must_use]
pub fn check_completion<P: Payload>(root: &Node<P>) -> CompletionReport {
    check_completion_all(std::slice::from_ref(root))
}

/// [`check_completion`] over several trees, e.g. every top-level construct
/// of a parse.
#[must_use]
pub fn check_completion_all<P: Payload>(roots: &[Node<P>]) -> CompletionReport {
    let mut report = CompletionReport::default();
    for root in roots {
        report.visit(root);
    }
    debug!(
        visited = report.visited,
        unchecked = report.unchecked.len(),
        "completion check"
    );
    report
}
