//! Top-level dispatch and the recovery helpers grammar rules share.

use tracing::{error, trace, warn};

use crate::diagnostics::DiagnosticBag;
use crate::line::Line;
use crate::location::Located;
use crate::settings::ParserSettings;
use crate::source::TokenSource;
use crate::token::{Token, TokenKind};

use super::{
    ConstructParser, KindOf, Language, NodeOf, Parse, ParseInterrupt, ParseResult, ParseSession,
    SubconstructParsingData,
};

/// Parses one top-level construct from the next line.
///
/// A blank line (or no input) is reported as a missing construct and
/// yields `Ok(None)`.
///
/// # Errors
///
/// [`ParseInterrupt::Fatal`] if the line cannot start the construct;
/// contract violations from the grammar.
pub fn parse_construct<C>(
    parser: &C,
    session: &mut ParseSession<'_, C::Language>,
) -> ParseResult<Option<NodeOf<C::Language>>>
where
    C: ConstructParser + ?Sized,
{
    let mut data = SubconstructParsingData::new();
    let mut line = session.next_line();
    if line.is_empty_line() {
        session.report_missing_construct(&data, parser.description(), line.located());
        return Ok(None);
    }
    parse_construct_line(parser, &mut line, session, &mut data)
}

/// Parses one top-level construct from an already fetched, non-blank line.
///
/// # Errors
///
/// See [`parse_construct`].
pub fn parse_construct_line<C>(
    parser: &C,
    line: &mut Line<KindOf<C::Language>>,
    session: &mut ParseSession<'_, C::Language>,
    data: &mut SubconstructParsingData,
) -> ParseResult<Option<NodeOf<C::Language>>>
where
    C: ConstructParser + ?Sized,
{
    data.reset();
    let start = match line.peek() {
        Some(token) if !token.is_end_of_line() => token,
        _ => return Ok(None),
    };
    if !parser.can_start(start) {
        let location = start.located();
        session.report_invalid_top_level_start(data, parser.description(), location);
        warn!("input does not start with {}, parsing stopped", parser.description());
        return Err(ParseInterrupt::Fatal);
    }

    trace!(construct = parser.description(), "parse line");
    let result = parser.parse_line(line, session, data);
    let construct = recover_part(data, result)?.flatten();

    if data.is_successful() && !line.at_line_end() {
        session.report_extra_tokens_after_top_level(
            data,
            parser.description(),
            line.remaining_location(),
        );
    }
    session.reject_indented_block(data, parser.description());
    Ok(construct)
}

/// Parses every top-level construct in `tokens`.
///
/// Blank lines are skipped. A fatal diagnostic stops the parse and marks
/// the result aborted.
///
/// # Errors
///
/// Only contract violations; source errors end up in the result's
/// diagnostics.
pub fn parse_source<C>(
    parser: &C,
    tokens: &mut dyn TokenSource<KindOf<C::Language>>,
    settings: &ParserSettings,
) -> ParseResult<Parse<<C::Language as Language>::Payload>>
where
    C: ConstructParser + Clone,
{
    let parser = parser.clone_construct_parser();
    let mut diagnostics = DiagnosticBag::new();
    let mut constructs = Vec::new();
    let mut aborted = false;

    {
        let mut session = ParseSession::<C::Language>::new(tokens, &mut diagnostics, settings);
        let mut data = SubconstructParsingData::new();
        while let Some(kind) = session.tokens().peek_kind() {
            if kind.is_dedent() {
                // a block ended after its owner gave up on it
                session.tokens().bump();
                continue;
            }
            if kind.is_indent() {
                session.reject_indented_block(&data, parser.description());
                continue;
            }

            let mut line = session.next_line();
            if line.is_empty_line() {
                continue;
            }
            match parse_construct_line(&*parser, &mut line, &mut session, &mut data) {
                Ok(Some(construct)) => constructs.push(construct),
                Ok(None) => {}
                Err(ParseInterrupt::Fatal) => {
                    aborted = true;
                    break;
                }
                Err(err) => {
                    error!("parse abandoned: {err}");
                    return Err(err);
                }
            }
        }
    }

    Ok(Parse {
        constructs,
        diagnostics: diagnostics.finish(),
        aborted,
    })
}

/// Turns [`ParseInterrupt::PartInvalid`] into an absent part and marks
/// `data` unsuccessful. Everything else passes through.
///
/// # Errors
///
/// Any interrupt other than `PartInvalid`.
pub fn recover_part<T>(
    data: &mut SubconstructParsingData,
    result: ParseResult<T>,
) -> ParseResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ParseInterrupt::PartInvalid) => {
            trace!("part invalid, substituting nothing");
            data.mark_unsuccessful();
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

impl<L: Language> ParseSession<'_, L> {
    /// Reports and skips anything left on `line` before its end marker.
    /// Returns `true` if the line was already at its end.
    pub fn expect_line_end(
        &mut self,
        line: &mut Line<KindOf<L>>,
        data: &SubconstructParsingData,
        what: &str,
    ) -> bool {
        if line.at_line_end() {
            return true;
        }
        let location = line.remaining_location();
        self.report_extra_tokens_at_line_end(data, what, location);
        line.skip_rest();
        false
    }

    /// Consumes a required terminal of `kind`, reporting it missing otherwise.
    pub fn expect_terminal(
        &mut self,
        line: &mut Line<KindOf<L>>,
        data: &mut SubconstructParsingData,
        kind: KindOf<L>,
        what: &str,
    ) -> Option<Token<KindOf<L>>> {
        if let Some(token) = line.eat(kind) {
            data.set_previous_part(token.location.clone());
            return Some(token);
        }
        let location = line
            .peek()
            .filter(|token| !token.is_end_of_line())
            .map(|token| token.location.clone());
        self.report_missing_required_terminal(data, what, location);
        None
    }
}
