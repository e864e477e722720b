//! Per-parse scratch state.

use crate::location::{Position, SourceLocation};

/// Scratch state of one (sub)construct parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubconstructParsingData {
    successful: bool,
    previous_part: SourceLocation,
}

impl Default for SubconstructParsingData {
    fn default() -> Self {
        Self::new()
    }
}

impl SubconstructParsingData {
    /// Fresh state: successful, anchored at the zero position.
    #[must_use]
    pub fn new() -> Self {
        Self {
            successful: true,
            previous_part: SourceLocation::point(Position::ZERO),
        }
    }

    /// Fresh state anchored after `previous_part`.
    #[must_use]
    pub fn after(previous_part: SourceLocation) -> Self {
        Self {
            successful: true,
            previous_part,
        }
    }

    /// Back to the fresh state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Returns true while no part of the construct has failed.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.successful
    }

    /// Records that some part failed.
    pub fn mark_unsuccessful(&mut self) {
        self.successful = false;
    }

    /// Location of the most recently finished part.
    #[must_use]
    pub fn previous_part(&self) -> &SourceLocation {
        &self.previous_part
    }

    /// Records the most recently finished part.
    pub fn set_previous_part(&mut self, location: SourceLocation) {
        self.previous_part = location;
    }

    /// Where "missing X after Y" diagnostics point when no better location is known.
    #[must_use]
    pub fn anchor(&self) -> SourceLocation {
        self.previous_part.end_point()
    }
}
