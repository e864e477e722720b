//! Syntax diagnostics.
//!
//! Malformed input is reported, not raised. Every diagnostic the driver or
//! the expression engine can produce has a [`DiagnosticKind`] with a stable
//! code and a message template; the message subject (what was expected or
//! found) is supplied by the grammar rule reporting it.

use std::fmt;
use std::sync::Arc;

use crate::location::SourceLocation;
use crate::token::SourceCode;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Parsing continues past the problem.
    Error,
    /// Parsing stops immediately.
    Fatal,
}

/// Whether a missing part was required or optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// The grammar cannot do without it.
    Required,
    /// An optional part whose introducer was present.
    Optional,
}

/// Position of a missing part within a repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repetition {
    /// Not part of a repetition.
    Single,
    /// The first element of a repetition.
    First,
    /// An element after a separator.
    Subsequent,
}

/// The diagnostic catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    // Driver (P001-P099)
    /// The input does not start like any top-level construct.
    InvalidTopLevelStart,
    /// Tokens follow a complete top-level construct on its line.
    ExtraTokensAfterTopLevel,
    /// A line was expected but none (or a blank one) was found.
    MissingConstruct,
    /// A subconstruct is missing.
    MissingSubconstruct(Requirement, Repetition),
    /// A terminal (keyword, punctuation, name) is missing.
    MissingTerminal(Requirement),
    /// A flag keyword is missing.
    MissingFlag(Requirement),
    /// A terminal is present but not acceptable.
    InvalidTerminal,
    /// A flag keyword is present but not acceptable.
    InvalidFlag,
    /// An indented block follows a single-line construct.
    IndentedUnderSingleLine,
    /// An indented block is nested deeper than allowed.
    IndentedTooDeep,
    /// Tokens are left at the end of a line.
    ExtraTokensAtLineEnd,
    /// An indented block starts with a token no alternative accepts.
    InvalidIndentedBlockStart,
    /// A multi-way choice starts with a token no alternative accepts.
    InvalidChoiceStart,

    // Expressions (P100-P199)
    /// An infix or postfix operator has nothing to its left.
    MissingLeftOperand,
    /// An infix or prefix operator has nothing to its right.
    MissingRightOperand,
    /// Two operands follow each other without an operator.
    ExpressionsInARow,
    /// A prefix operator follows a complete expression.
    PrefixAfterExpression,
    /// An infix operator follows a postfix operator that binds more loosely.
    PostfixBindsLooser,
    /// A prefix operator follows an infix operator that binds more loosely.
    PrefixBindsTighter,
}

impl DiagnosticKind {
    /// Returns the string code (e.g., "P004").
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTopLevelStart => "P001",
            Self::ExtraTokensAfterTopLevel => "P002",
            Self::MissingConstruct => "P003",
            Self::MissingSubconstruct(..) => "P004",
            Self::MissingTerminal(_) => "P005",
            Self::MissingFlag(_) => "P006",
            Self::InvalidTerminal => "P007",
            Self::InvalidFlag => "P008",
            Self::IndentedUnderSingleLine => "P009",
            Self::IndentedTooDeep => "P010",
            Self::ExtraTokensAtLineEnd => "P011",
            Self::InvalidIndentedBlockStart => "P012",
            Self::InvalidChoiceStart => "P013",
            Self::MissingLeftOperand => "P101",
            Self::MissingRightOperand => "P102",
            Self::ExpressionsInARow => "P103",
            Self::PrefixAfterExpression => "P104",
            Self::PostfixBindsLooser => "P105",
            Self::PrefixBindsTighter => "P106",
        }
    }

    /// Returns the severity for this kind.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::InvalidTopLevelStart => Severity::Fatal,
            _ => Severity::Error,
        }
    }

    /// Renders the message for `subject`.
    #[must_use]
    pub fn message(&self, subject: &str) -> String {
        match self {
            Self::InvalidTopLevelStart => format!("{subject} cannot start here"),
            Self::ExtraTokensAfterTopLevel => format!("unexpected tokens after {subject}"),
            Self::MissingConstruct => format!("missing {subject}"),
            Self::MissingSubconstruct(requirement, repetition) => {
                let qualifier = match (requirement, repetition) {
                    (Requirement::Required, Repetition::Single) => "required ",
                    (Requirement::Optional, Repetition::Single) => "",
                    (Requirement::Required, Repetition::First) => "first ",
                    (Requirement::Optional, Repetition::First) => "optional first ",
                    (Requirement::Required, Repetition::Subsequent) => "next ",
                    (Requirement::Optional, Repetition::Subsequent) => "optional next ",
                };
                format!("missing {qualifier}{subject}")
            }
            Self::MissingTerminal(Requirement::Required) => format!("expected {subject}"),
            Self::MissingTerminal(Requirement::Optional) => {
                format!("expected {subject} or end of line")
            }
            Self::MissingFlag(Requirement::Required) => format!("missing flag {subject}"),
            Self::MissingFlag(Requirement::Optional) => {
                format!("missing optional flag {subject}")
            }
            Self::InvalidTerminal => format!("invalid {subject}"),
            Self::InvalidFlag => format!("invalid flag {subject}"),
            Self::IndentedUnderSingleLine => {
                format!("{subject} must be on a single line and cannot have indented parts")
            }
            Self::IndentedTooDeep => format!("indented deeper than allowed under {subject}"),
            Self::ExtraTokensAtLineEnd => format!("unexpected tokens at end of {subject}"),
            Self::InvalidIndentedBlockStart => {
                format!("indented block must start with {subject}")
            }
            Self::InvalidChoiceStart => format!("expected {subject}"),
            Self::MissingLeftOperand => {
                format!("operator '{subject}' must be preceded by an expression")
            }
            Self::MissingRightOperand => {
                format!("operator '{subject}' must be followed by an expression")
            }
            Self::ExpressionsInARow => {
                format!("two expressions in a row: expected an operator before '{subject}'")
            }
            Self::PrefixAfterExpression => {
                format!("prefix operator '{subject}' cannot follow an expression")
            }
            Self::PostfixBindsLooser => format!(
                "operator '{subject}' cannot follow a postfix operator of lower precedence"
            ),
            Self::PrefixBindsTighter => format!(
                "prefix operator '{subject}' cannot follow an operator of lower precedence"
            ),
        }
    }
}

/// A syntax diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The catalogue entry.
    pub kind: DiagnosticKind,
    /// The severity level.
    pub severity: Severity,
    /// The diagnostic message.
    pub message: String,
    /// Where the problem is, if known.
    pub location: Option<SourceLocation>,
    /// The source code being parsed, if known.
    pub source: Option<Arc<SourceCode>>,
}

impl Diagnostic {
    /// Creates a diagnostic with the kind's severity and message.
    #[must_use]
    pub fn new(kind: DiagnosticKind, subject: &str, location: Option<SourceLocation>) -> Self {
        Self {
            severity: kind.severity(),
            message: kind.message(subject),
            kind,
            location,
            source: None,
        }
    }

    /// Attaches the source code.
    #[must_use]
    pub fn with_source(mut self, source: Option<Arc<SourceCode>>) -> Self {
        self.source = source;
        self
    }

    /// Returns true if this diagnostic stops parsing.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        };
        write!(f, "{severity}[{}]: {}", self.kind.code(), self.message)?;
        match (&self.source, &self.location) {
            (Some(source), Some(location)) => write!(f, " (at {}:{location})", source.name),
            (None, Some(location)) => write!(f, " (at {location})"),
            _ => Ok(()),
        }
    }
}

/// Receiver of diagnostics.
pub trait DiagnosticSink {
    /// Accepts one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Collector for diagnostics.
#[derive(Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a fatal diagnostic has been recorded.
    #[must_use]
    pub fn has_fatal(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_fatal)
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The diagnostics recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the bag and returns the diagnostics.
    #[must_use]
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for DiagnosticBag {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
