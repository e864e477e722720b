//! Indented blocks.
//!
//! A lexer for an indentation-sensitive language emits an indent token
//! before the first token of a more deeply indented line and one dedent
//! token per closed level before the first token of a less indented line
//! (or at the end of input). The driver never sees leading whitespace.

use tracing::trace;

use crate::location::{Located, SourceLocation};
use crate::token::TokenKind;

use super::{
    recover_part, ConstructParser, Language, NodeOf, ParseResult, ParseSession,
    SubconstructParsingData,
};

impl<L: Language> ParseSession<'_, L> {
    /// Returns true if the next token opens an indented block.
    #[must_use]
    pub fn at_indented_block(&self) -> bool {
        self.tokens
            .peek_kind()
            .is_some_and(|kind| kind.is_indent())
    }

    /// Parses the indented block following the current line, one `item`
    /// per line. Returns nothing if no block follows.
    ///
    /// Lines `item` cannot start are reported and skipped; an item that
    /// fails is dropped and its siblings still parse. A block nested deeper
    /// than the settings allow is reported and skipped as a whole.
    ///
    /// # Errors
    ///
    /// Contract violations from `item`.
    pub fn parse_indented_block<C>(
        &mut self,
        item: &C,
        data: &mut SubconstructParsingData,
        owner: &str,
    ) -> ParseResult<Vec<NodeOf<L>>>
    where
        C: ConstructParser<Language = L> + ?Sized,
    {
        let mut items = Vec::new();
        if !self.at_indented_block() {
            return Ok(items);
        }

        let depth = self.indent_depth + 1;
        if self.settings().exceeds_indent_limit(depth) {
            let location = self.skip_indented_block();
            self.report_indented_too_deep(data, owner, location);
            return Ok(items);
        }

        self.tokens.bump();
        self.indent_depth = depth;
        trace!(depth, owner, "enter block");
        let result = self.parse_block_items(item, data, &mut items);
        self.indent_depth = depth - 1;
        result?;
        Ok(items)
    }

    fn parse_block_items<C>(
        &mut self,
        item: &C,
        data: &mut SubconstructParsingData,
        items: &mut Vec<NodeOf<L>>,
    ) -> ParseResult<()>
    where
        C: ConstructParser<Language = L> + ?Sized,
    {
        let mut previous = data.previous_part().clone();
        while let Some(kind) = self.tokens.peek_kind() {
            if kind.is_dedent() {
                self.tokens.bump();
                break;
            }
            let mut item_data = SubconstructParsingData::after(previous.clone());
            if kind.is_indent() {
                self.reject_indented_block(&item_data, item.description());
                continue;
            }

            let mut line = self.next_line();
            let start = match line.peek() {
                Some(token) if !token.is_end_of_line() => token,
                _ => continue,
            };
            if !item.can_start(start) {
                let location = start.located();
                self.report_invalid_indented_block_start(&item_data, item.description(), location);
                continue;
            }

            let result = item.parse_line(&mut line, self, &mut item_data);
            if let Some(node) = recover_part(&mut item_data, result)?.flatten() {
                items.push(node);
            }
            if item_data.is_successful() {
                self.expect_line_end(&mut line, &item_data, item.description());
            }
            previous = item_data.previous_part().clone();
        }
        data.set_previous_part(previous);
        Ok(())
    }

    /// Reports and skips an indented block under a construct that must fit
    /// on one line. Returns true if there was one.
    pub fn reject_indented_block(&mut self, data: &SubconstructParsingData, owner: &str) -> bool {
        if !self.at_indented_block() {
            return false;
        }
        let location = self.skip_indented_block();
        self.report_indented_under_single_line(data, owner, location);
        true
    }

    /// Skips the indented block starting at the next token, nested blocks
    /// included. Returns the location of its first token.
    pub fn skip_indented_block(&mut self) -> Option<SourceLocation> {
        if !self.at_indented_block() {
            return None;
        }
        let mut depth = 0usize;
        let mut first = None;
        while let Some(token) = self.tokens.bump() {
            if token.kind.is_indent() {
                depth += 1;
            } else if token.kind.is_dedent() {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            } else if first.is_none() && !token.is_end_of_line() {
                first = Some(token.location);
            }
        }
        trace!(location = ?first, "skipped block");
        first
    }
}
