//! Shared helpers: a small calculator language built on the driver.
//!
//! ```text
//! let x = 1 + 2 * y
//! print x!
//! group totals
//!   print x ^ 2
//! ```
//!
//! Operators: `+` `-` (1, left), `*` `/` (2, left), `^` (5, right),
//! prefix `-` (3), postfix `!` (4), postfix `?` (0).
#![allow(dead_code)]

use linewright_syntax::compose_location;
use linewright_syntax::validity::ChecklistPolicy;
use linewright_syntax::{
    parse_expression, parse_source, recover_part, require_expression, Associativity,
    ConstructParser, Diagnostic, ExpressionGrammar, Fixity, Language, Located, Node,
    OperatorConstruct, OperatorData, Parse, ParseInterrupt, ParseResult, ParseSession,
    ParserSettings, Payload, Position, Representation, SourceCode, SourceLocation,
    SubconstructParsingData, Token, TokenBuffer, TokenKind,
};
use linewright_syntax::line::Line;
use logos::Logos;

pub const SOURCE_NAME: &str = "test.calc";

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalcKind {
    #[regex(r"[ \t]+")]
    Whitespace,
    #[token("let")]
    KwLet,
    #[token("print")]
    KwPrint,
    #[token("group")]
    KwGroup,
    #[token("=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    #[regex(r"[0-9]+")]
    Number,
    Indent,
    Dedent,
    Eol,
    Error,
}

impl TokenKind for CalcKind {
    fn is_end_of_line(self) -> bool {
        self == CalcKind::Eol
    }

    fn is_indent(self) -> bool {
        self == CalcKind::Indent
    }

    fn is_dedent(self) -> bool {
        self == CalcKind::Dedent
    }
}

fn after_operand(previous: Option<CalcKind>) -> bool {
    matches!(
        previous,
        Some(
            CalcKind::Ident
                | CalcKind::Number
                | CalcKind::RParen
                | CalcKind::Bang
                | CalcKind::Question
        )
    )
}

fn operator_data(kind: CalcKind, after_operand: bool) -> Option<OperatorData> {
    match kind {
        CalcKind::Plus => Some(OperatorData::infix(1, Associativity::Left)),
        CalcKind::Minus if after_operand => Some(OperatorData::infix(1, Associativity::Left)),
        CalcKind::Minus => Some(OperatorData::prefix(3)),
        CalcKind::Star | CalcKind::Slash => Some(OperatorData::infix(2, Associativity::Left)),
        CalcKind::Caret => Some(OperatorData::infix(5, Associativity::Right)),
        CalcKind::Bang => Some(OperatorData::postfix(4)),
        CalcKind::Question => Some(OperatorData::postfix(0)),
        _ => None,
    }
}

fn lex_line(content: &str, line: u32, base: u32, tokens: &mut Vec<Token<CalcKind>>) {
    let mut lexer = CalcKind::lexer(content);
    while let Some(kind) = lexer.next() {
        let kind = kind.unwrap_or(CalcKind::Error);
        if kind == CalcKind::Whitespace {
            continue;
        }
        let span = lexer.span();
        let location = SourceLocation::from_line_offset(
            line,
            base + span.start as u32,
            (span.end - span.start) as u32,
        );
        let previous = tokens.last().map(|token| token.kind);
        let mut token = Token::new(kind, location).with_text(lexer.slice());
        if let Some(data) = operator_data(kind, after_operand(previous)) {
            token = token.with_operator(data);
        }
        tokens.push(token);
    }
}

/// Lexes `source` line by line, with indent/dedent tokens from leading spaces.
pub fn lex(source: &str) -> TokenBuffer<CalcKind> {
    let mut tokens = Vec::new();
    let mut indents = vec![0u32];
    let mut last_line = 0;

    for (index, text) in source.lines().enumerate() {
        let line = index as u32 + 1;
        last_line = line;
        let line_end = SourceLocation::from_line_offset(line, text.len() as u32, 0);
        let content = text.trim_start_matches(' ');
        if content.trim().is_empty() {
            tokens.push(Token::new(CalcKind::Eol, line_end));
            continue;
        }

        let width = (text.len() - content.len()) as u32;
        let start = SourceLocation::point(Position::new(line, width));
        while indents.last().is_some_and(|top| *top > width) {
            indents.pop();
            tokens.push(Token::new(CalcKind::Dedent, start.clone()));
        }
        if indents.last().is_some_and(|top| *top < width) {
            indents.push(width);
            tokens.push(Token::new(CalcKind::Indent, start.clone()));
        }

        lex_line(content, line, width, &mut tokens);
        tokens.push(Token::new(CalcKind::Eol, line_end));
    }

    let end = SourceLocation::point(Position::new(last_line + 1, 0));
    for _ in 1..indents.len() {
        tokens.push(Token::new(CalcKind::Dedent, end.clone()));
    }

    TokenBuffer::new(tokens).with_source(SourceCode::new(SOURCE_NAME, source))
}

/// Builds a token by hand, for inputs the lexer would never produce.
pub fn token(kind: CalcKind, offset: u32, text: &str) -> Token<CalcKind> {
    Token::new(
        kind,
        SourceLocation::from_line_offset(1, offset, text.len() as u32),
    )
    .with_text(text)
}

pub enum Calc {}

impl Language for Calc {
    type Kind = CalcKind;
    type Payload = CalcNode;
}

#[derive(Debug, Clone)]
pub enum CalcNode {
    Number,
    Name,
    Paren(Node<CalcNode>),
    Unary {
        operator: OperatorConstruct,
        operand: Node<CalcNode>,
    },
    Binary {
        operator: OperatorConstruct,
        left: Node<CalcNode>,
        right: Node<CalcNode>,
    },
    Let {
        name: Node<CalcNode>,
        value: Option<Node<CalcNode>>,
    },
    Print {
        value: Option<Node<CalcNode>>,
    },
    Group {
        name: Node<CalcNode>,
        body: Vec<Node<CalcNode>>,
    },
}

impl Payload for CalcNode {
    fn id(&self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::Name => "Name",
            Self::Paren(_) => "Paren",
            Self::Unary { .. } => "Unary",
            Self::Binary { .. } => "Binary",
            Self::Let { .. } => "Let",
            Self::Print { .. } => "Print",
            Self::Group { .. } => "Group",
        }
    }

    fn representation(&self) -> Representation {
        match self {
            Self::Number | Self::Name => Representation::SingleToken,
            _ => Representation::Composite,
        }
    }

    fn validity_constraints(&self) -> &'static [&'static str] {
        match self {
            Self::Name => &["resolved"],
            Self::Binary { .. } => &["operand-types"],
            Self::Let { .. } => &["unique-name"],
            _ => &[],
        }
    }

    fn for_each_child(&self, f: &mut dyn FnMut(&Node<Self>)) {
        match self {
            Self::Number | Self::Name => {}
            Self::Paren(inner) => f(inner),
            Self::Unary { operand, .. } => f(operand),
            Self::Binary { left, right, .. } => {
                f(left);
                f(right);
            }
            Self::Let { name, value } => {
                f(name);
                if let Some(value) = value {
                    f(value);
                }
            }
            Self::Print { value } => {
                if let Some(value) = value {
                    f(value);
                }
            }
            Self::Group { name, body } => {
                f(name);
                body.iter().for_each(|item| f(item));
            }
        }
    }

    fn deep_clone(&self) -> Self {
        match self {
            Self::Number | Self::Name => self.clone(),
            Self::Paren(inner) => Self::Paren(inner.deep_clone()),
            Self::Unary { operator, operand } => Self::Unary {
                operator: operator.clone(),
                operand: operand.deep_clone(),
            },
            Self::Binary {
                operator,
                left,
                right,
            } => Self::Binary {
                operator: operator.clone(),
                left: left.deep_clone(),
                right: right.deep_clone(),
            },
            Self::Let { name, value } => Self::Let {
                name: name.deep_clone(),
                value: value.as_ref().map(Node::deep_clone),
            },
            Self::Print { value } => Self::Print {
                value: value.as_ref().map(Node::deep_clone),
            },
            Self::Group { name, body } => Self::Group {
                name: name.deep_clone(),
                body: body.iter().map(Node::deep_clone).collect(),
            },
        }
    }
}

/// Operands: numbers, names and parenthesized expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprGrammar;

impl ExpressionGrammar for ExprGrammar {
    type Language = Calc;

    fn starts_operand(&self, token: &Token<CalcKind>) -> bool {
        matches!(
            token.kind,
            CalcKind::Ident | CalcKind::Number | CalcKind::LParen
        )
    }

    fn parse_operand(
        &self,
        line: &mut Line<CalcKind>,
        session: &mut ParseSession<'_, Calc>,
        data: &mut SubconstructParsingData,
    ) -> ParseResult<Option<Node<CalcNode>>> {
        let Some(token) = line.bump() else {
            return Ok(None);
        };
        let payload = match token.kind {
            CalcKind::Number => CalcNode::Number,
            CalcKind::Ident => CalcNode::Name,
            CalcKind::LParen => return parse_paren(self, &token, line, session, data).map(Some),
            _ => return Ok(None),
        };
        let node = session.factory().create_from_token(payload, &token)?;
        session.finish_parsed_construct(&node, data, None)?;
        Ok(Some(node))
    }

    fn operation(&self, operator: OperatorConstruct, operands: Vec<Node<CalcNode>>) -> CalcNode {
        let mut operands = operands.into_iter();
        let first = operands.next().expect("operator applied without operands");
        match operands.next() {
            Some(second) => CalcNode::Binary {
                operator,
                left: first,
                right: second,
            },
            None => CalcNode::Unary {
                operator,
                operand: first,
            },
        }
    }
}

fn parse_paren(
    grammar: &ExprGrammar,
    open: &Token<CalcKind>,
    line: &mut Line<CalcKind>,
    session: &mut ParseSession<'_, Calc>,
    data: &mut SubconstructParsingData,
) -> ParseResult<Node<CalcNode>> {
    data.set_previous_part(open.location.clone());
    let inner = require_expression(grammar, line, session, data, "expression")?;
    let Some(close) = session.expect_terminal(line, data, CalcKind::RParen, "')'") else {
        return Err(ParseInterrupt::PartInvalid);
    };
    let location = compose_location!(open, inner, close)?;
    let node = session.factory().create(CalcNode::Paren(inner), None)?;
    session.finish_parsed_construct(&node, data, location)?;
    Ok(node)
}

/// `let`, `print` and `group` statements.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementParser;

impl ConstructParser for StatementParser {
    type Language = Calc;

    fn description(&self) -> &str {
        "statement"
    }

    fn can_start(&self, token: &Token<CalcKind>) -> bool {
        matches!(
            token.kind,
            CalcKind::KwLet | CalcKind::KwPrint | CalcKind::KwGroup
        )
    }

    fn parse_line(
        &self,
        line: &mut Line<CalcKind>,
        session: &mut ParseSession<'_, Calc>,
        data: &mut SubconstructParsingData,
    ) -> ParseResult<Option<Node<CalcNode>>> {
        let Some(keyword) = line.bump() else {
            return Ok(None);
        };
        data.set_previous_part(keyword.location.clone());
        match keyword.kind {
            CalcKind::KwLet => parse_let(&keyword, line, session, data).map(Some),
            CalcKind::KwPrint => parse_print(&keyword, line, session, data).map(Some),
            CalcKind::KwGroup => parse_group(self, &keyword, line, session, data).map(Some),
            _ => Ok(None),
        }
    }
}

fn parse_name(
    line: &mut Line<CalcKind>,
    session: &mut ParseSession<'_, Calc>,
    data: &mut SubconstructParsingData,
) -> ParseResult<Node<CalcNode>> {
    let Some(token) = session.expect_terminal(line, data, CalcKind::Ident, "name") else {
        return Err(ParseInterrupt::PartInvalid);
    };
    let node = session.factory().create_from_token(CalcNode::Name, &token)?;
    session.finish_parsed_construct(&node, data, None)?;
    Ok(node)
}

fn parse_let(
    keyword: &Token<CalcKind>,
    line: &mut Line<CalcKind>,
    session: &mut ParseSession<'_, Calc>,
    data: &mut SubconstructParsingData,
) -> ParseResult<Node<CalcNode>> {
    let name = parse_name(line, session, data)?;
    let Some(assign) = session.expect_terminal(line, data, CalcKind::Assign, "'='") else {
        return Err(ParseInterrupt::PartInvalid);
    };
    let result = require_expression(&ExprGrammar, line, session, data, "expression");
    let value = recover_part(data, result)?;
    let location = compose_location!(keyword, name, assign, value)?;
    let node = session
        .factory()
        .create(CalcNode::Let { name, value }, None)?;
    session.finish_parsed_construct(&node, data, location)?;
    Ok(node)
}

fn parse_print(
    keyword: &Token<CalcKind>,
    line: &mut Line<CalcKind>,
    session: &mut ParseSession<'_, Calc>,
    data: &mut SubconstructParsingData,
) -> ParseResult<Node<CalcNode>> {
    let result = require_expression(&ExprGrammar, line, session, data, "expression");
    let value = recover_part(data, result)?;
    let location = compose_location!(keyword, value)?;
    let node = session.factory().create(CalcNode::Print { value }, None)?;
    session.finish_parsed_construct(&node, data, location)?;
    Ok(node)
}

fn parse_group(
    parser: &StatementParser,
    keyword: &Token<CalcKind>,
    line: &mut Line<CalcKind>,
    session: &mut ParseSession<'_, Calc>,
    data: &mut SubconstructParsingData,
) -> ParseResult<Node<CalcNode>> {
    let name = parse_name(line, session, data)?;
    session.expect_line_end(line, data, "group header");
    if !session.at_indented_block() {
        session.report_missing_first_subconstruct(data, "indented statement", None);
        return Err(ParseInterrupt::PartInvalid);
    }
    let body = session.parse_indented_block(parser, data, "group")?;

    let mut parts = vec![keyword.located(), name.location()];
    parts.extend(body.iter().map(Node::location));
    let location = SourceLocation::compose(parts)?;
    let node = session
        .factory()
        .create(CalcNode::Group { name, body }, None)?;
    session.finish_parsed_construct(&node, data, location)?;
    Ok(node)
}

/// Renders a tree as `op(operand, ...)`.
pub fn render(node: &Node<CalcNode>) -> String {
    let construct = node.borrow();
    match construct.payload() {
        CalcNode::Number | CalcNode::Name => construct
            .value()
            .map(ToString::to_string)
            .unwrap_or_default(),
        CalcNode::Paren(inner) => render(inner),
        CalcNode::Unary { operator, operand } => {
            let fixity = match operator.fixity() {
                Fixity::Prefix => "prefix",
                _ => "postfix",
            };
            format!("{fixity}{}({})", operator.text(), render(operand))
        }
        CalcNode::Binary {
            operator,
            left,
            right,
        } => format!("{}({}, {})", operator.text(), render(left), render(right)),
        CalcNode::Let { name, value } => format!("let({}, {})", render(name), render_opt(value)),
        CalcNode::Print { value } => format!("print({})", render_opt(value)),
        CalcNode::Group { name, body } if body.is_empty() => format!("group({})", render(name)),
        CalcNode::Group { name, body } => {
            let body: Vec<String> = body.iter().map(render).collect();
            format!("group({}: {})", render(name), body.join(", "))
        }
    }
}

fn render_opt(node: &Option<Node<CalcNode>>) -> String {
    node.as_ref()
        .map_or_else(|| "<missing>".to_string(), render)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Settings with tracking checklists regardless of build profile.
pub fn tracking_settings() -> ParserSettings {
    ParserSettings {
        checklist: ChecklistPolicy::Tracking,
        ..ParserSettings::default()
    }
}

pub fn parse_with(source: &str, settings: &ParserSettings) -> Parse<CalcNode> {
    init_tracing();
    let mut tokens = lex(source);
    parse_source(&StatementParser, &mut tokens, settings).expect("contract violation")
}

pub fn parse(source: &str) -> Parse<CalcNode> {
    parse_with(source, &tracking_settings())
}

/// Constructs one per line, then diagnostics.
pub fn render_parse(parse: &Parse<CalcNode>) -> String {
    let mut lines: Vec<String> = parse.constructs().iter().map(render).collect();
    lines.extend(parse.diagnostics().iter().map(Diagnostic::to_string));
    lines.join("\n")
}

/// Parses a single expression line and renders the tree or the interrupt,
/// followed by the diagnostics.
pub fn expr(source: &str) -> String {
    init_tracing();
    let mut tokens = lex(source);
    expr_from(&mut tokens)
}

pub fn expr_from(tokens: &mut TokenBuffer<CalcKind>) -> String {
    let settings = tracking_settings();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut session = ParseSession::<Calc>::new(tokens, &mut diagnostics, &settings);
    let mut line = session.next_line();
    let mut data = SubconstructParsingData::new();
    let result = parse_expression(&ExprGrammar, &mut line, &mut session, &mut data);

    let mut out = match result {
        Ok(Some(node)) => render(&node),
        Ok(None) => "<none>".to_string(),
        Err(err) => format!("<{err}>"),
    };
    for diagnostic in &diagnostics {
        out.push('\n');
        out.push_str(&diagnostic.to_string());
    }
    out
}

/// Every node of `root`, in pre-order.
pub fn walk(root: &Node<CalcNode>) -> Vec<Node<CalcNode>> {
    let mut nodes = vec![root.clone()];
    for child in root.borrow().children() {
        nodes.extend(walk(&child));
    }
    nodes
}
