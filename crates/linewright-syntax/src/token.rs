//! Tokens as the parsing driver sees them.
//!
//! Lexing is the language's business; this module fixes the shape of what
//! a lexer hands over: a kind, a location, the matched text, and, for
//! operator tokens, the operator's fixity, associativity and precedence.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::location::{Located, SourceLocation};

/// Token kinds of a language.
///
/// Implemented by the language's token enum. Only end-of-line and, for
/// indentation-sensitive languages, block markers matter to the driver.
pub trait TokenKind: Copy + Eq + fmt::Debug {
    /// Returns `true` for the token that terminates a line.
    fn is_end_of_line(self) -> bool;

    /// Returns `true` for the token that opens an indented block.
    fn is_indent(self) -> bool {
        false
    }

    /// Returns `true` for the token that closes an indented block.
    fn is_dedent(self) -> bool {
        false
    }
}

/// Where an operator sits relative to its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    /// Before its single operand: `-a`.
    Prefix,
    /// Between its two operands: `a + b`.
    Infix,
    /// After its single operand: `a!`.
    Postfix,
}

/// How operators of equal precedence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    /// `a - b - c` is `(a - b) - c`.
    Left,
    /// `a ^ b ^ c` is `a ^ (b ^ c)`.
    Right,
}

/// Operator metadata attached to an operator token by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperatorData {
    /// Prefix, infix or postfix.
    pub fixity: Fixity,
    /// Grouping of equal-precedence chains.
    pub associativity: Associativity,
    /// Binding strength; higher binds tighter.
    pub precedence: i32,
}

impl OperatorData {
    /// Creates operator metadata.
    #[must_use]
    pub const fn new(fixity: Fixity, associativity: Associativity, precedence: i32) -> Self {
        Self {
            fixity,
            associativity,
            precedence,
        }
    }

    /// A prefix operator.
    #[must_use]
    pub const fn prefix(precedence: i32) -> Self {
        Self::new(Fixity::Prefix, Associativity::Right, precedence)
    }

    /// An infix operator.
    #[must_use]
    pub const fn infix(precedence: i32, associativity: Associativity) -> Self {
        Self::new(Fixity::Infix, associativity, precedence)
    }

    /// A postfix operator.
    #[must_use]
    pub const fn postfix(precedence: i32) -> Self {
        Self::new(Fixity::Postfix, Associativity::Left, precedence)
    }

    /// Number of operands: 2 for infix, 1 otherwise.
    #[must_use]
    pub const fn arity(&self) -> usize {
        match self.fixity {
            Fixity::Infix => 2,
            Fixity::Prefix | Fixity::Postfix => 1,
        }
    }

    /// Returns `true` if an operator with this metadata, already on the
    /// stack, must be applied before `next` is pushed.
    #[must_use]
    pub fn apply_before(&self, next: &OperatorData) -> bool {
        self.precedence > next.precedence
            || (self.precedence == next.precedence && self.associativity == Associativity::Left)
    }
}

/// The text a token source was produced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCode {
    /// Display name, typically a path.
    pub name: SmolStr,
    /// The full text.
    pub text: Arc<str>,
}

impl SourceCode {
    /// Creates shared source code.
    pub fn new(name: impl Into<SmolStr>, text: impl Into<Arc<str>>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            text: text.into(),
        })
    }

    /// Returns the text of a 1-based line, without its terminator.
    #[must_use]
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let index = usize::try_from(line.checked_sub(1)?).ok()?;
        self.text.lines().nth(index)
    }

    /// Returns the text covered by a single-line location.
    #[must_use]
    pub fn fragment(&self, location: &SourceLocation) -> Option<&str> {
        let start = location.start_position();
        let end = location.past_end_position();
        if start.line != end.line {
            return None;
        }
        let line = self.line_text(start.line)?;
        line.get(start.offset as usize..end.offset as usize)
    }
}

/// A token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<K> {
    /// The kind of token.
    pub kind: K,
    /// Where the token is.
    pub location: SourceLocation,
    /// The matched text, when the lexer keeps it.
    pub text: Option<SmolStr>,
    /// Operator metadata for operator tokens.
    pub operator: Option<OperatorData>,
}

impl<K: TokenKind> Token<K> {
    /// Creates a token without text or operator metadata.
    #[must_use]
    pub fn new(kind: K, location: SourceLocation) -> Self {
        Self {
            kind,
            location,
            text: None,
            operator: None,
        }
    }

    /// Attaches the matched text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<SmolStr>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Attaches operator metadata.
    #[must_use]
    pub fn with_operator(mut self, operator: OperatorData) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Returns `true` for the end-of-line marker.
    #[must_use]
    pub fn is_end_of_line(&self) -> bool {
        self.kind.is_end_of_line()
    }

    /// The matched text, or the kind's debug name when none was kept.
    #[must_use]
    pub fn describe(&self) -> SmolStr {
        match &self.text {
            Some(text) => text.clone(),
            None => SmolStr::new(format!("{:?}", self.kind)),
        }
    }
}

impl<K> Located for Token<K> {
    fn located(&self) -> Option<SourceLocation> {
        Some(self.location.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLUS: OperatorData = OperatorData::infix(1, Associativity::Left);
    const TIMES: OperatorData = OperatorData::infix(2, Associativity::Left);
    const POWER: OperatorData = OperatorData::infix(5, Associativity::Right);

    #[test]
    fn test_apply_before() {
        assert!(TIMES.apply_before(&PLUS));
        assert!(!PLUS.apply_before(&TIMES));
        // equal precedence: left-associative applies first, right waits
        assert!(PLUS.apply_before(&PLUS));
        assert!(!POWER.apply_before(&POWER));
    }

    #[test]
    fn test_arity_follows_fixity() {
        assert_eq!(PLUS.arity(), 2);
        assert_eq!(OperatorData::prefix(3).arity(), 1);
        assert_eq!(OperatorData::postfix(4).arity(), 1);
    }

    #[test]
    fn test_source_fragment() {
        let source = SourceCode::new("demo", "let x = 1\nprint x + 2\n");
        assert_eq!(source.line_text(2), Some("print x + 2"));
        assert_eq!(source.line_text(0), None);
        let location = SourceLocation::from_line_offset(2, 6, 5);
        assert_eq!(source.fragment(&location), Some("x + 2"));
    }
}
