//! Source locations.
//!
//! A [`SourceLocation`] is an immutable span of source text, identified by a
//! start position and a past-the-end position. Composite locations are built
//! from ordered, non-overlapping parts and remember the basic spans they were
//! made of, so a construct like `if x then y` spanning two lines still knows
//! which pieces of text belong to it.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// A line/offset pair. Ordered by line, then offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Line number. Lexers conventionally start at 1; 0 is the sentinel.
    pub line: u32,
    /// Offset within the line.
    pub offset: u32,
}

impl Position {
    /// The sentinel position used before anything has been parsed.
    pub const ZERO: Self = Self { line: 0, offset: 0 };

    /// Creates a position.
    #[must_use]
    pub const fn new(line: u32, offset: u32) -> Self {
        Self { line, offset }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.offset)
    }
}

/// Errors raised while building locations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The past-end position lies before the start position.
    #[error("location ends at {past_end} before it starts at {start}")]
    Inverted {
        /// Requested start.
        start: Position,
        /// Requested past-end.
        past_end: Position,
    },

    /// Two parts of a composite location overlap or are out of order.
    #[error("location parts out of order or overlapping: {first} then {second}")]
    Unordered {
        /// The earlier part in the input list.
        first: SourceLocation,
        /// The part that does not start at or after `first` ends.
        second: SourceLocation,
    },
}

/// A (possibly composite) span of source text.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    start: Position,
    past_end: Position,
    /// Basic spans of a composite location; `None` for a basic location.
    components: Option<Arc<[SourceLocation]>>,
}

impl SourceLocation {
    /// Creates a basic location from a start and past-end position.
    ///
    /// # Errors
    ///
    /// Fails if `past_end` precedes `start`.
    pub fn new(start: Position, past_end: Position) -> Result<Self, LocationError> {
        if past_end < start {
            return Err(LocationError::Inverted { start, past_end });
        }
        Ok(Self {
            start,
            past_end,
            components: None,
        })
    }

    /// Creates a single-line location of `length` characters.
    #[must_use]
    pub fn from_line_offset(line: u32, offset: u32, length: u32) -> Self {
        Self {
            start: Position::new(line, offset),
            past_end: Position::new(line, offset.saturating_add(length)),
            components: None,
        }
    }

    /// Creates an empty location at `position`.
    #[must_use]
    pub fn point(position: Position) -> Self {
        Self {
            start: position,
            past_end: position,
            components: None,
        }
    }

    /// Composes the enclosing location of `parts`, skipping absent ones.
    ///
    /// Returns `Ok(None)` when every part is absent. A single surviving part
    /// is returned unchanged.
    ///
    /// # Errors
    ///
    /// Fails with [`LocationError::Unordered`] unless the surviving parts are
    /// ordered and mutually disjoint.
    pub fn compose<I>(parts: I) -> Result<Option<Self>, LocationError>
    where
        I: IntoIterator<Item = Option<SourceLocation>>,
    {
        let parts: Vec<SourceLocation> = parts.into_iter().flatten().collect();
        match parts.len() {
            0 => return Ok(None),
            1 => return Ok(parts.into_iter().next()),
            _ => {}
        }

        if !are_ordered_and_disjoint(&parts) {
            let second = (1..parts.len())
                .find(|&i| !are_ordered_and_disjoint(&parts[i - 1..=i]))
                .unwrap_or(1);
            return Err(LocationError::Unordered {
                first: parts[second - 1].clone(),
                second: parts[second].clone(),
            });
        }

        let start = parts[0].start;
        let past_end = parts[parts.len() - 1].past_end;
        let components: Vec<SourceLocation> = parts
            .iter()
            .flat_map(SourceLocation::basic_components)
            .collect();

        Ok(Some(Self {
            start,
            past_end,
            components: Some(components.into()),
        }))
    }

    /// Returns the start position.
    #[must_use]
    pub fn start_position(&self) -> Position {
        self.start
    }

    /// Returns the past-the-end position.
    #[must_use]
    pub fn past_end_position(&self) -> Position {
        self.past_end
    }

    /// Returns the line the location starts on.
    #[must_use]
    pub fn start_line_number(&self) -> u32 {
        self.start.line
    }

    /// Returns the line the location ends on.
    #[must_use]
    pub fn end_line_number(&self) -> u32 {
        self.past_end.line
    }

    /// Returns `true` if this location was composed from several parts.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.components.is_some()
    }

    /// Returns `true` if the location covers no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.past_end
    }

    /// The basic spans this location consists of: itself for a basic
    /// location, the flattened parts for a composite one.
    #[must_use]
    pub fn basic_components(&self) -> Vec<SourceLocation> {
        match &self.components {
            Some(components) => components.to_vec(),
            None => vec![self.clone()],
        }
    }

    /// An empty location at the past-end position.
    #[must_use]
    pub fn end_point(&self) -> Self {
        Self::point(self.past_end)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.past_end)
    }
}

impl fmt::Debug for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.components {
            Some(components) => {
                write!(f, "{self}[")?;
                for (i, component) in components.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{component}")?;
                }
                f.write_str("]")
            }
            None => write!(f, "{self}"),
        }
    }
}

/// Returns `true` if every location ends at or before the next one starts.
#[must_use]
pub fn are_ordered_and_disjoint(locations: &[SourceLocation]) -> bool {
    locations
        .windows(2)
        .all(|pair| pair[0].past_end <= pair[1].start)
}

/// Anything that may occupy a span of source text.
pub trait Located {
    /// The location, if known.
    fn located(&self) -> Option<SourceLocation>;
}

impl Located for SourceLocation {
    fn located(&self) -> Option<SourceLocation> {
        Some(self.clone())
    }
}

impl<T: Located + ?Sized> Located for &T {
    fn located(&self) -> Option<SourceLocation> {
        (**self).located()
    }
}

impl<T: Located> Located for Option<T> {
    fn located(&self) -> Option<SourceLocation> {
        self.as_ref().and_then(Located::located)
    }
}

impl<T: Located> Located for Box<T> {
    fn located(&self) -> Option<SourceLocation> {
        (**self).located()
    }
}

/// Composes the enclosing location of an ordered list of located parts.
///
/// # Errors
///
/// See [`SourceLocation::compose`].
pub fn compose_locations<T: Located>(parts: &[T]) -> Result<Option<SourceLocation>, LocationError> {
    SourceLocation::compose(parts.iter().map(Located::located))
}

/// Composes the enclosing location of heterogeneous located parts.
///
/// Each argument may be a token, a construct, a node, a location, or an
/// `Option` of any of those; absent parts are skipped. Expands to a
/// `Result<Option<SourceLocation>, LocationError>`.
///
/// ```
/// use linewright_syntax::compose_location;
/// use linewright_syntax::location::SourceLocation;
///
/// let keyword = SourceLocation::from_line_offset(1, 0, 3);
/// let name = SourceLocation::from_line_offset(1, 4, 5);
/// let missing: Option<SourceLocation> = None;
///
/// let whole = compose_location!(keyword, missing, name).unwrap().unwrap();
/// assert_eq!(whole.to_string(), "1:0-1:9");
/// ```
#[macro_export]
macro_rules! compose_location {
    ($($part:expr),+ $(,)?) => {
        $crate::location::SourceLocation::compose([
            $($crate::location::Located::located(&$part)),+
        ])
    };
}
