//! `linewright-syntax` - Line-oriented parsing toolkit for custom languages.
//!
//! This crate provides what every hand-written parser for a line-oriented
//! language needs, leaving the lexer and the grammar rules to the language:
//!
//! - **Locations**: Composable, possibly discontiguous spans of source text
//! - **Driver**: Splits tokens into lines, dispatches to construct parsers,
//!   recovers from malformed parts and collects diagnostics
//! - **Expressions**: An operator-precedence engine driven by operator
//!   metadata on tokens
//! - **Constructs**: Typed AST nodes carrying a validity checklist until
//!   semantic analysis is done with them
//!
//! # Design Principles
//!
//! - **Error-tolerant**: Source errors are diagnostics; parsing continues
//!   with the next part
//! - **Single pass**: No backtracking; a failed part is absent, not retried
//! - **Closed node sets**: Each language's constructs are one enum, matched
//!   exhaustively
//!
//! # Example
//!
//! ```
//! use linewright_syntax::location::{Position, SourceLocation};
//!
//! let name = SourceLocation::from_line_offset(1, 4, 3);
//! let body = SourceLocation::from_line_offset(2, 2, 10);
//!
//! let whole = SourceLocation::compose([Some(name), None, Some(body)])
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(whole.start_position(), Position::new(1, 4));
//! assert_eq!(whole.basic_components().len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod completion;
pub mod construct;
pub mod diagnostics;
pub mod line;
pub mod location;
pub mod parser;
pub mod settings;
pub mod source;
pub mod token;

pub use completion::{check_completion, check_completion_all, CompletionReport, UncheckedConstraint};
pub use construct::{
    Construct, ConstructError, ConstructFactory, CorrectnessData, Node, Payload, Representation,
};
pub use diagnostics::{Diagnostic, DiagnosticBag, DiagnosticKind, DiagnosticSink, Severity};
pub use line::Line;
pub use location::{Located, LocationError, Position, SourceLocation};
pub use parser::{
    parse_construct, parse_expression, parse_source, recover_part, require_expression,
    ConstructParser, ExpressionGrammar, Language, OperatorConstruct, Parse, ParseInterrupt,
    ParseResult, ParseSession, SubconstructParsingData,
};
pub use settings::{ParserSettings, SettingsError};
pub use source::{TokenBuffer, TokenSource};
pub use token::{Associativity, Fixity, OperatorData, SourceCode, Token, TokenKind};

pub use linewright_validity as validity;
