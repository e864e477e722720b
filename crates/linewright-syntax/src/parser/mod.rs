//! The generic parsing driver.
//!
//! Languages plug into the driver through a handful of traits:
//!
//! - [`Language`] ties a token kind to a payload type
//! - [`ConstructParser`] parses one construct kind starting on a line
//! - [`ExpressionGrammar`] supplies the primitive operands and node shapes
//!   the operator-precedence engine needs
//!
//! # Architecture
//!
//! Parsing is line-oriented and single-pass:
//!
//! 1. **Lines**: the driver cuts the token stream into [`Line`]s
//! 2. **Dispatch**: each non-blank line goes to the top-level construct parser
//! 3. **Recovery**: malformed input is reported to the diagnostic sink; a
//!    rule that cannot continue returns [`ParseInterrupt::PartInvalid`],
//!    which the nearest enclosing rule turns into an absent part
//!
//! Only [`ParseInterrupt::Fatal`] stops a whole parse.
//!
//! [`Line`]: crate::line::Line

mod blocks;
mod data;
mod driver;
mod expression;
mod report;
mod session;

use std::borrow::Cow;

use smol_str::SmolStr;
use thiserror::Error;

use linewright_validity::ChecklistError;

use crate::construct::{ConstructError, Node, Payload};
use crate::diagnostics::Diagnostic;
use crate::line::Line;
use crate::location::LocationError;
use crate::token::{Token, TokenKind};

pub use data::SubconstructParsingData;
pub use driver::{parse_construct, parse_construct_line, parse_source, recover_part};
pub use expression::{parse_expression, require_expression, ExpressionGrammar, OperatorConstruct};
pub use session::ParseSession;

/// Why a parse rule stopped early.
///
/// Source errors are diagnostics, not interrupts. `PartInvalid` and `Fatal`
/// are control flow; every other variant is a contract violation by the
/// language's grammar or the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseInterrupt {
    /// The current part cannot be completed; the enclosing rule treats it as absent.
    #[error("construct part invalid")]
    PartInvalid,

    /// A fatal diagnostic was reported; parsing stops.
    #[error("parsing stopped after a fatal diagnostic")]
    Fatal,

    /// Location parts were out of order or overlapping.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// A construct kind declared an invalid set of validity constraints.
    #[error(transparent)]
    Checklist(#[from] ChecklistError),

    /// Correctness data or location misuse.
    #[error(transparent)]
    Construct(#[from] ConstructError),

    /// An operator had fewer operands available than its arity.
    #[error("operator '{operator}' applied with too few operands")]
    OperandUnderflow {
        /// Text of the operator.
        operator: SmolStr,
    },
}

impl ParseInterrupt {
    /// Returns true for the recoverable part-invalid signal.
    #[must_use]
    pub fn is_part_invalid(&self) -> bool {
        matches!(self, Self::PartInvalid)
    }
}

/// Result type of parse rules.
pub type ParseResult<T> = Result<T, ParseInterrupt>;

/// A language built on the driver.
pub trait Language {
    /// The language's token kinds.
    type Kind: TokenKind;
    /// The language's closed set of construct payloads.
    type Payload: Payload;
}

/// Token kind of language `L`.
pub type KindOf<L> = <L as Language>::Kind;

/// Construct handle of language `L`.
pub type NodeOf<L> = Node<<L as Language>::Payload>;

/// Parser for one construct kind.
pub trait ConstructParser {
    /// The language this parser belongs to.
    type Language: Language;

    /// What the construct is, for diagnostics ("a statement").
    fn description(&self) -> &str;

    /// Returns true if the construct can start with `token`.
    fn can_start(&self, token: &Token<KindOf<Self::Language>>) -> bool;

    /// Parses the construct from `line`, which starts with a token
    /// [`ConstructParser::can_start`] accepted. May read following lines
    /// through the session (indented blocks).
    ///
    /// # Errors
    ///
    /// [`ParseInterrupt::PartInvalid`] when the construct cannot be built;
    /// the caller reports nothing further and treats it as absent.
    fn parse_line(
        &self,
        line: &mut Line<KindOf<Self::Language>>,
        session: &mut ParseSession<'_, Self::Language>,
        data: &mut SubconstructParsingData,
    ) -> ParseResult<Option<NodeOf<Self::Language>>>;

    /// Parses the construct from the next line of the session's tokens.
    ///
    /// # Errors
    ///
    /// See [`parse_construct`].
    fn parse_construct(
        &self,
        session: &mut ParseSession<'_, Self::Language>,
    ) -> ParseResult<Option<NodeOf<Self::Language>>> {
        driver::parse_construct(self, session)
    }

    /// The parser instance to use for one top-level parse.
    ///
    /// Parsers without per-parse state return themselves. A parser that
    /// keeps state must return a fresh copy.
    fn clone_construct_parser(&self) -> Cow<'_, Self>
    where
        Self: Clone,
    {
        Cow::Borrowed(self)
    }
}

/// Result of parsing a token source.
#[derive(Debug)]
pub struct Parse<P> {
    constructs: Vec<Node<P>>,
    diagnostics: Vec<Diagnostic>,
    aborted: bool,
}

impl<P> Parse<P> {
    /// The top-level constructs, in source order.
    #[must_use]
    pub fn constructs(&self) -> &[Node<P>] {
        &self.constructs
    }

    /// Consumes the result and returns the top-level constructs.
    #[must_use]
    pub fn into_constructs(self) -> Vec<Node<P>> {
        self.constructs
    }

    /// The diagnostics, in the order they were reported.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns true if parsing stopped at a fatal diagnostic.
    #[must_use]
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    /// Returns `true` if parsing produced no diagnostics.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.diagnostics.is_empty() && !self.aborted
    }
}
