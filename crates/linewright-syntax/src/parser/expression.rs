//! Operator-precedence expressions.
//!
//! Two stacks, one for operands and one for operators. Operands come from
//! the language's [`ExpressionGrammar`]; operators are any token the lexer
//! attached [`OperatorData`] to. Nothing here knows concrete symbols: the
//! shape of the tree follows from fixity, associativity and precedence
//! alone.
//!
//! Fixity is checked as each token is seen:
//!
//! - infix and postfix operators need an expression on their left
//! - an infix operator cannot follow a postfix operator that binds more
//!   loosely than itself
//! - a prefix operator cannot follow a complete expression, nor an infix
//!   operator of lower precedence than itself
//! - two operands cannot follow each other
//! - the expression cannot end in an infix or prefix operator
//!
//! The prefix rule is applied as stated, with no exception for prefix
//! operators that bind tighter than the infix operator before them. With the
//! usual table (`+` at 1, `*` at 2, prefix `-` at 3) this rejects `a + -b`
//! and `a * -b`. A language that wants to accept them gives its prefix
//! operators a precedence no higher than its loosest infix operator, or
//! parses a signed operand in [`ExpressionGrammar::parse_operand`].
//!
//! A postfix operator always applies to everything its left operand
//! covers, so a postfix operator already on the stack is applied before
//! the next postfix or infix operator is pushed.
//!
//! Every violation is reported and abandons the whole expression with
//! [`ParseInterrupt::PartInvalid`].

use smol_str::SmolStr;
use tracing::{error, trace};

use crate::diagnostics::DiagnosticKind;
use crate::line::Line;
use crate::location::{Located, SourceLocation};
use crate::token::{Associativity, Fixity, OperatorData, Token, TokenKind};

use super::{
    KindOf, Language, NodeOf, ParseInterrupt, ParseResult, ParseSession, SubconstructParsingData,
};

/// What a language supplies to the expression engine.
pub trait ExpressionGrammar {
    /// The language.
    type Language: Language;

    /// Returns true if `token` starts a primitive expression (a literal, a
    /// name, a parenthesized expression).
    fn starts_operand(&self, token: &Token<KindOf<Self::Language>>) -> bool;

    /// Parses the primitive expression starting at the line's next token,
    /// which [`ExpressionGrammar::starts_operand`] accepted.
    ///
    /// # Errors
    ///
    /// [`ParseInterrupt::PartInvalid`] after reporting a malformed operand.
    fn parse_operand(
        &self,
        line: &mut Line<KindOf<Self::Language>>,
        session: &mut ParseSession<'_, Self::Language>,
        data: &mut SubconstructParsingData,
    ) -> ParseResult<Option<NodeOf<Self::Language>>>;

    /// The payload of `operator` applied to `operands`, which are in source
    /// order.
    fn operation(
        &self,
        operator: OperatorConstruct,
        operands: Vec<NodeOf<Self::Language>>,
    ) -> <Self::Language as Language>::Payload;
}

/// An operator, represented by exactly one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorConstruct {
    location: SourceLocation,
    text: SmolStr,
    data: OperatorData,
}

impl OperatorConstruct {
    /// Creates an operator.
    #[must_use]
    pub fn new(location: SourceLocation, text: impl Into<SmolStr>, data: OperatorData) -> Self {
        Self {
            location,
            text: text.into(),
            data,
        }
    }

    /// The operator represented by `token`, if the lexer marked it as one.
    #[must_use]
    pub fn from_token<K: TokenKind>(token: &Token<K>) -> Option<Self> {
        let data = token.operator?;
        Some(Self::new(token.location.clone(), token.describe(), data))
    }

    /// The token's location.
    #[must_use]
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// The token's text.
    #[must_use]
    pub fn text(&self) -> &SmolStr {
        &self.text
    }

    /// The operator metadata.
    #[must_use]
    pub fn data(&self) -> &OperatorData {
        &self.data
    }

    /// Number of operands.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.data.arity()
    }

    /// Prefix, infix or postfix.
    #[must_use]
    pub fn fixity(&self) -> Fixity {
        self.data.fixity
    }

    /// Left or right.
    #[must_use]
    pub fn associativity(&self) -> Associativity {
        self.data.associativity
    }

    /// Binding strength.
    #[must_use]
    pub fn precedence(&self) -> i32 {
        self.data.precedence
    }

    /// Returns true if this operator, already stacked, applies before `next`
    /// is pushed.
    #[must_use]
    pub fn apply_before(&self, next: &OperatorConstruct) -> bool {
        self.data.apply_before(&next.data)
    }
}

impl Located for OperatorConstruct {
    fn located(&self) -> Option<SourceLocation> {
        Some(self.location.clone())
    }
}

/// The last thing the scan saw.
#[derive(Debug, Clone, Copy)]
enum Previous {
    Nothing,
    Operand,
    Operator(OperatorData),
}

/// Parses one expression from the front of `line`.
///
/// Stops at the first token that is neither an operator nor starts an
/// operand. Returns `Ok(None)` if no token belonged to an expression;
/// whether one was required is the caller's call.
///
/// # Errors
///
/// [`ParseInterrupt::PartInvalid`] after reporting a malformed expression;
/// contract violations from the grammar or from inconsistent operator
/// metadata.
pub fn parse_expression<G>(
    grammar: &G,
    line: &mut Line<KindOf<G::Language>>,
    session: &mut ParseSession<'_, G::Language>,
    data: &mut SubconstructParsingData,
) -> ParseResult<Option<NodeOf<G::Language>>>
where
    G: ExpressionGrammar + ?Sized,
{
    let mut operands: Vec<NodeOf<G::Language>> = Vec::new();
    let mut operators: Vec<OperatorConstruct> = Vec::new();
    let mut previous = Previous::Nothing;

    while let Some(token) = line.peek() {
        if token.is_end_of_line() {
            break;
        }

        if let Some(operator) = OperatorConstruct::from_token(token) {
            check_operator(&operator, previous, session, data)?;
            line.bump();
            if operator.fixity() != Fixity::Prefix {
                // a stacked postfix operator already has its whole operand
                while operators.last().is_some_and(|top| {
                    top.fixity() == Fixity::Postfix || top.apply_before(&operator)
                }) {
                    apply_top(grammar, &mut operands, &mut operators, session, data)?;
                }
            }
            previous = Previous::Operator(*operator.data());
            data.set_previous_part(operator.location().clone());
            operators.push(operator);
        } else if grammar.starts_operand(token) {
            if completes_expression(previous) {
                let location = token.location.clone();
                let text = token.describe();
                session.report(data, DiagnosticKind::ExpressionsInARow, &text, Some(location));
                return Err(ParseInterrupt::PartInvalid);
            }
            let Some(operand) = grammar.parse_operand(line, session, data)? else {
                return Err(ParseInterrupt::PartInvalid);
            };
            operands.push(operand);
            previous = Previous::Operand;
        } else {
            break;
        }
    }

    if let Previous::Operator(last) = previous {
        if last.fixity != Fixity::Postfix {
            if let Some(operator) = operators.last() {
                let location = operator.location().clone();
                let text = operator.text().clone();
                session.report(data, DiagnosticKind::MissingRightOperand, &text, Some(location));
            }
            return Err(ParseInterrupt::PartInvalid);
        }
    }

    while !operators.is_empty() {
        apply_top(grammar, &mut operands, &mut operators, session, data)?;
    }
    Ok(operands.pop())
}

/// Like [`parse_expression`], but a missing expression is reported as a
/// missing required `what` and abandons the enclosing part.
///
/// # Errors
///
/// See [`parse_expression`].
pub fn require_expression<G>(
    grammar: &G,
    line: &mut Line<KindOf<G::Language>>,
    session: &mut ParseSession<'_, G::Language>,
    data: &mut SubconstructParsingData,
    what: &str,
) -> ParseResult<NodeOf<G::Language>>
where
    G: ExpressionGrammar + ?Sized,
{
    if let Some(expression) = parse_expression(grammar, line, session, data)? {
        return Ok(expression);
    }
    let location = line
        .peek()
        .filter(|token| !token.is_end_of_line())
        .map(|token| token.location.clone());
    session.report_missing_required_subconstruct(data, what, location);
    Err(ParseInterrupt::PartInvalid)
}

fn completes_expression(previous: Previous) -> bool {
    match previous {
        Previous::Operand => true,
        Previous::Operator(data) => data.fixity == Fixity::Postfix,
        Previous::Nothing => false,
    }
}

fn check_operator<L: Language>(
    operator: &OperatorConstruct,
    previous: Previous,
    session: &mut ParseSession<'_, L>,
    data: &SubconstructParsingData,
) -> ParseResult<()> {
    let after_expression = completes_expression(previous);
    let violation = match (operator.fixity(), previous) {
        (Fixity::Infix | Fixity::Postfix, _) if !after_expression => {
            Some(DiagnosticKind::MissingLeftOperand)
        }
        (Fixity::Infix, Previous::Operator(postfix))
            if postfix.precedence < operator.precedence() =>
        {
            Some(DiagnosticKind::PostfixBindsLooser)
        }
        (Fixity::Prefix, _) if after_expression => Some(DiagnosticKind::PrefixAfterExpression),
        (Fixity::Prefix, Previous::Operator(infix))
            if infix.fixity == Fixity::Infix && infix.precedence < operator.precedence() =>
        {
            Some(DiagnosticKind::PrefixBindsTighter)
        }
        _ => None,
    };

    match violation {
        Some(kind) => {
            session.report(data, kind, operator.text(), Some(operator.location().clone()));
            Err(ParseInterrupt::PartInvalid)
        }
        None => Ok(()),
    }
}

fn apply_top<G>(
    grammar: &G,
    operands: &mut Vec<NodeOf<G::Language>>,
    operators: &mut Vec<OperatorConstruct>,
    session: &mut ParseSession<'_, G::Language>,
    data: &mut SubconstructParsingData,
) -> ParseResult<()>
where
    G: ExpressionGrammar + ?Sized,
{
    let Some(operator) = operators.pop() else {
        return Ok(());
    };
    let arity = operator.arity();
    if operands.len() < arity {
        error!(
            operator = %operator.text(),
            arity,
            available = operands.len(),
            "operand stack underflow"
        );
        return Err(ParseInterrupt::OperandUnderflow {
            operator: operator.text().clone(),
        });
    }

    let applied = operands.split_off(operands.len() - arity);
    let mut locations: Vec<SourceLocation> = applied.iter().filter_map(|node| node.location()).collect();
    locations.push(operator.location().clone());
    locations.sort_by_key(SourceLocation::start_position);
    let location = SourceLocation::compose(locations.into_iter().map(Some))?;

    trace!(operator = %operator.text(), arity, "apply");
    let payload = grammar.operation(operator, applied);
    let node = session.factory().create(payload, None)?;
    session.finish_parsed_construct(&node, data, location)?;
    operands.push(node);
    Ok(())
}
