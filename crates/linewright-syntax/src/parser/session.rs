//! Parse session: what every rule of one parse shares.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::construct::ConstructFactory;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::line::Line;
use crate::location::SourceLocation;
use crate::settings::ParserSettings;
use crate::source::TokenSource;
use crate::token::SourceCode;

use super::{KindOf, Language, NodeOf, ParseResult, SubconstructParsingData};

/// The token source, diagnostic sink, settings and factory of one parse.
pub struct ParseSession<'a, L: Language> {
    pub(super) tokens: &'a mut dyn TokenSource<L::Kind>,
    sink: &'a mut dyn DiagnosticSink,
    factory: ConstructFactory<'a>,
    pub(super) indent_depth: usize,
    _language: PhantomData<fn() -> L>,
}

impl<'a, L: Language> ParseSession<'a, L> {
    /// Creates a session.
    pub fn new(
        tokens: &'a mut dyn TokenSource<L::Kind>,
        sink: &'a mut dyn DiagnosticSink,
        settings: &'a ParserSettings,
    ) -> Self {
        Self {
            tokens,
            sink,
            factory: ConstructFactory::new(settings),
            indent_depth: 0,
            _language: PhantomData,
        }
    }

    /// The token source.
    pub fn tokens(&mut self) -> &mut (dyn TokenSource<L::Kind> + 'a) {
        &mut *self.tokens
    }

    /// The source code being parsed, if the token source knows it.
    #[must_use]
    pub fn source_code(&self) -> Option<Arc<SourceCode>> {
        self.tokens.source_code().cloned()
    }

    /// The construct factory.
    #[must_use]
    pub fn factory(&self) -> ConstructFactory<'a> {
        self.factory
    }

    /// The settings.
    #[must_use]
    pub fn settings(&self) -> &'a ParserSettings {
        self.factory.settings()
    }

    /// Nesting depth of the indented block being parsed; 0 at top level.
    #[must_use]
    pub fn indent_depth(&self) -> usize {
        self.indent_depth
    }

    /// Consumes the next line.
    pub fn next_line(&mut self) -> Line<KindOf<L>> {
        Line::next_from(&mut *self.tokens)
    }

    /// Reports a diagnostic; an absent location falls back to `data`'s anchor.
    pub fn report(
        &mut self,
        data: &SubconstructParsingData,
        kind: DiagnosticKind,
        subject: &str,
        location: Option<SourceLocation>,
    ) {
        let location = location.unwrap_or_else(|| data.anchor());
        let diagnostic =
            Diagnostic::new(kind, subject, Some(location)).with_source(self.source_code());
        debug!(code = kind.code(), "{}", diagnostic);
        self.sink.report(diagnostic);
    }

    /// Post-parse bookkeeping for a successfully parsed construct: attaches
    /// the source code, sets `location` if the construct may be relocated,
    /// and makes the construct the previous-part anchor.
    ///
    /// # Errors
    ///
    /// Fails if the construct's correctness data was already removed.
    pub fn finish_parsed_construct(
        &mut self,
        node: &NodeOf<L>,
        data: &mut SubconstructParsingData,
        location: Option<SourceLocation>,
    ) -> ParseResult<()> {
        {
            let mut construct = node.borrow_mut();
            if let Some(source) = self.source_code() {
                construct.set_source_code(source)?;
            }
            if let Some(location) = location {
                if construct.is_relocatable() {
                    construct.set_location(location)?;
                }
            }
            trace!(construct = construct.id(), location = ?construct.location(), "finished");
        }
        if let Some(location) = node.location() {
            data.set_previous_part(location);
        }
        Ok(())
    }
}
