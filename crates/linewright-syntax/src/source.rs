//! Token source for the parser.
//!
//! This module provides the [`TokenSource`] contract the driver pulls tokens
//! through, and [`TokenBuffer`], which wraps an already-lexed token vector
//! and provides lookahead and consumption operations.

use std::sync::Arc;

use crate::token::{SourceCode, Token, TokenKind};

/// A sequential pull interface over tokens with lookahead.
///
/// Only one parser advances a given source at a time.
pub trait TokenSource<K: TokenKind> {
    /// Peeks at the nth token ahead (0 = next).
    fn peek_nth(&self, n: usize) -> Option<&Token<K>>;

    /// Consumes and returns the next token.
    fn bump(&mut self) -> Option<Token<K>>;

    /// The source code the tokens were lexed from, if known.
    fn source_code(&self) -> Option<&Arc<SourceCode>>;

    /// Peeks at the next token.
    fn peek(&self) -> Option<&Token<K>> {
        self.peek_nth(0)
    }

    /// Returns `true` if another token is available.
    fn has_next(&self) -> bool {
        self.peek().is_some()
    }

    /// Returns the kind of the next token.
    fn peek_kind(&self) -> Option<K> {
        self.peek().map(|token| token.kind)
    }
}

/// A token source over an owned token vector.
#[derive(Debug, Clone)]
pub struct TokenBuffer<K> {
    tokens: Vec<Token<K>>,
    source: Option<Arc<SourceCode>>,
    cursor: usize,
}

impl<K: TokenKind> TokenBuffer<K> {
    /// Creates a buffer over lexed tokens.
    #[must_use]
    pub fn new(tokens: Vec<Token<K>>) -> Self {
        Self {
            tokens,
            source: None,
            cursor: 0,
        }
    }

    /// Attaches the source code the tokens came from.
    #[must_use]
    pub fn with_source(mut self, source: Arc<SourceCode>) -> Self {
        self.source = Some(source);
        self
    }

    /// Number of tokens not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.cursor
    }

    /// The tokens not yet consumed.
    #[must_use]
    pub fn rest(&self) -> &[Token<K>] {
        &self.tokens[self.cursor..]
    }
}

impl<K: TokenKind> FromIterator<Token<K>> for TokenBuffer<K> {
    fn from_iter<I: IntoIterator<Item = Token<K>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<K: TokenKind> TokenSource<K> for TokenBuffer<K> {
    fn peek_nth(&self, n: usize) -> Option<&Token<K>> {
        self.tokens.get(self.cursor + n)
    }

    fn bump(&mut self) -> Option<Token<K>> {
        let token = self.tokens.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(token)
    }

    fn source_code(&self) -> Option<&Arc<SourceCode>> {
        self.source.as_ref()
    }
}
