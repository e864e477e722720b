//! Lines: the driver's unit of parsing.
//!
//! A line is the run of tokens up to and including an end-of-line marker.
//! Construct parsers consume a line from the front; whatever is left before
//! the marker when they return is "extra tokens at end of line".

use crate::location::{Located, SourceLocation};
use crate::source::TokenSource;
use crate::token::{Token, TokenKind};

/// A run of tokens terminated by an end-of-line marker, with a cursor.
#[derive(Debug, Clone)]
pub struct Line<K> {
    tokens: Vec<Token<K>>,
    cursor: usize,
}

impl<K: TokenKind> Line<K> {
    /// Creates a line from its tokens, including the end marker if any.
    #[must_use]
    pub fn new(tokens: Vec<Token<K>>) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Consumes tokens from `source` up to and including the next
    /// end-of-line marker.
    pub fn next_from(source: &mut dyn TokenSource<K>) -> Self {
        let mut tokens = Vec::new();
        while let Some(token) = source.bump() {
            let end = token.is_end_of_line();
            tokens.push(token);
            if end {
                break;
            }
        }
        tracing::trace!(tokens = tokens.len(), "next line");
        Self::new(tokens)
    }

    /// Returns `true` if the line holds nothing but (at most) its end marker.
    #[must_use]
    pub fn is_empty_line(&self) -> bool {
        self.tokens.iter().all(Token::is_end_of_line)
    }

    /// All tokens of the line, consumed or not.
    #[must_use]
    pub fn tokens(&self) -> &[Token<K>] {
        &self.tokens
    }

    /// The end-of-line marker, if the line has one.
    #[must_use]
    pub fn end_marker(&self) -> Option<&Token<K>> {
        self.tokens.last().filter(|token| token.is_end_of_line())
    }

    /// Peeks at the next unconsumed token, which may be the end marker.
    #[must_use]
    pub fn peek(&self) -> Option<&Token<K>> {
        self.peek_nth(0)
    }

    /// Peeks `n` tokens ahead of the cursor.
    #[must_use]
    pub fn peek_nth(&self, n: usize) -> Option<&Token<K>> {
        self.tokens.get(self.cursor + n)
    }

    /// Returns the kind of the next unconsumed token.
    #[must_use]
    pub fn peek_kind(&self) -> Option<K> {
        self.peek().map(|token| token.kind)
    }

    /// Returns `true` if the next token is of `kind`.
    #[must_use]
    pub fn at(&self, kind: K) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Consumes the next token. The end marker is never consumed.
    pub fn bump(&mut self) -> Option<Token<K>> {
        if self.at_line_end() {
            return None;
        }
        let token = self.tokens.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(token)
    }

    /// Consumes the next token if it is of `kind`.
    pub fn eat(&mut self, kind: K) -> Option<Token<K>> {
        if self.at(kind) {
            self.bump()
        } else {
            None
        }
    }

    /// Returns `true` if only the end marker (or nothing) is left.
    #[must_use]
    pub fn at_line_end(&self) -> bool {
        self.peek().map_or(true, Token::is_end_of_line)
    }

    /// The unconsumed tokens before the end marker.
    #[must_use]
    pub fn remaining(&self) -> &[Token<K>] {
        let end = if self.end_marker().is_some() {
            self.tokens.len() - 1
        } else {
            self.tokens.len()
        };
        &self.tokens[self.cursor.min(end)..end]
    }

    /// Location of the unconsumed tokens before the end marker.
    #[must_use]
    pub fn remaining_location(&self) -> Option<SourceLocation> {
        let remaining = self.remaining();
        let first = remaining.first()?;
        let last = remaining.last()?;
        SourceLocation::new(
            first.location.start_position(),
            last.location.past_end_position(),
        )
        .ok()
    }

    /// Skips the unconsumed tokens before the end marker.
    pub fn skip_rest(&mut self) {
        let skipped = self.remaining().len();
        self.cursor += skipped;
    }
}

impl<K> Located for Line<K> {
    fn located(&self) -> Option<SourceLocation> {
        let first = self.tokens.first()?;
        let last = self.tokens.last()?;
        SourceLocation::new(
            first.location.start_position(),
            last.location.past_end_position(),
        )
        .ok()
    }
}
