//! One reporting method per diagnostic in the catalogue.
//!
//! `what` is the human-readable subject of the message ("expression",
//! "'='"). An absent location falls back to the end of the previous part.

use crate::diagnostics::{DiagnosticKind, Repetition, Requirement};
use crate::location::SourceLocation;

use super::{Language, ParseSession, SubconstructParsingData};

impl<L: Language> ParseSession<'_, L> {
    /// Input does not start like the expected top-level construct. Fatal.
    pub fn report_invalid_top_level_start(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report(data, DiagnosticKind::InvalidTopLevelStart, what, location);
    }

    /// Tokens after a complete top-level construct.
    pub fn report_extra_tokens_after_top_level(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report(data, DiagnosticKind::ExtraTokensAfterTopLevel, what, location);
    }

    /// No construct where one was expected.
    pub fn report_missing_construct(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report(data, DiagnosticKind::MissingConstruct, what, location);
    }

    /// A required subconstruct is missing.
    pub fn report_missing_required_subconstruct(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report_missing_subconstruct(
            data,
            Requirement::Required,
            Repetition::Single,
            what,
            location,
        );
    }

    /// An optional subconstruct is missing after its introducer.
    pub fn report_missing_optional_subconstruct(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report_missing_subconstruct(
            data,
            Requirement::Optional,
            Repetition::Single,
            what,
            location,
        );
    }

    /// The first element of a repetition is missing.
    pub fn report_missing_first_subconstruct(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report_missing_subconstruct(
            data,
            Requirement::Required,
            Repetition::First,
            what,
            location,
        );
    }

    /// An element after a repetition separator is missing.
    pub fn report_missing_next_subconstruct(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report_missing_subconstruct(
            data,
            Requirement::Required,
            Repetition::Subsequent,
            what,
            location,
        );
    }

    /// A subconstruct is missing.
    pub fn report_missing_subconstruct(
        &mut self,
        data: &SubconstructParsingData,
        requirement: Requirement,
        repetition: Repetition,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report(
            data,
            DiagnosticKind::MissingSubconstruct(requirement, repetition),
            what,
            location,
        );
    }

    /// A required terminal is missing.
    pub fn report_missing_required_terminal(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report(
            data,
            DiagnosticKind::MissingTerminal(Requirement::Required),
            what,
            location,
        );
    }

    /// An optional terminal is neither present nor replaced by the line end.
    pub fn report_missing_optional_terminal(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report(
            data,
            DiagnosticKind::MissingTerminal(Requirement::Optional),
            what,
            location,
        );
    }

    /// A required flag keyword is missing.
    pub fn report_missing_required_flag(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report(
            data,
            DiagnosticKind::MissingFlag(Requirement::Required),
            what,
            location,
        );
    }

    /// An optional flag keyword is missing where its construct expected it.
    pub fn report_missing_optional_flag(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report(
            data,
            DiagnosticKind::MissingFlag(Requirement::Optional),
            what,
            location,
        );
    }

    /// A terminal is present but invalid.
    pub fn report_invalid_terminal(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report(data, DiagnosticKind::InvalidTerminal, what, location);
    }

    /// A flag keyword is present but invalid.
    pub fn report_invalid_flag(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report(data, DiagnosticKind::InvalidFlag, what, location);
    }

    /// An indented block under a construct that must be one line.
    pub fn report_indented_under_single_line(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report(data, DiagnosticKind::IndentedUnderSingleLine, what, location);
    }

    /// An indented block nested deeper than the settings allow.
    pub fn report_indented_too_deep(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report(data, DiagnosticKind::IndentedTooDeep, what, location);
    }

    /// Tokens left at the end of a line.
    pub fn report_extra_tokens_at_line_end(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report(data, DiagnosticKind::ExtraTokensAtLineEnd, what, location);
    }

    /// An indented block starts with a token nothing accepts.
    pub fn report_invalid_indented_block_start(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report(data, DiagnosticKind::InvalidIndentedBlockStart, what, location);
    }

    /// A multi-way choice starts with a token no alternative accepts.
    pub fn report_invalid_choice_start(
        &mut self,
        data: &SubconstructParsingData,
        what: &str,
        location: Option<SourceLocation>,
    ) {
        self.report(data, DiagnosticKind::InvalidChoiceStart, what, location);
    }
}
