mod common;
use common::*;

use expect_test::expect;
use linewright_syntax::{Associativity, OperatorData, Token, TokenBuffer};

// Precedence and associativity
#[test]
fn test_multiplication_binds_tighter() {
    insta::assert_snapshot!(expr("a + b * c"), @"+(a, *(b, c))");
    insta::assert_snapshot!(expr("a * b + c"), @"+(*(a, b), c)");
}

#[test]
fn test_left_associative_chain() {
    insta::assert_snapshot!(expr("a - b - c"), @"-(-(a, b), c)");
    insta::assert_snapshot!(expr("a / b * c"), @"*(/(a, b), c)");
}

#[test]
fn test_right_associative_chain() {
    insta::assert_snapshot!(expr("a ^ b ^ c"), @"^(a, ^(b, c))");
    insta::assert_snapshot!(expr("a * b ^ c ^ d"), @"*(a, ^(b, ^(c, d)))");
}

#[test]
fn test_parentheses_override_precedence() {
    insta::assert_snapshot!(expr("(a + b) * c"), @"*(+(a, b), c)");
    insta::assert_snapshot!(expr("a * (b + (c - 1))"), @"*(a, +(b, -(c, 1)))");
}

// Unary operators
#[test]
fn test_postfix() {
    insta::assert_snapshot!(expr("a!"), @"postfix!(a)");
    insta::assert_snapshot!(expr("a! + b"), @"+(postfix!(a), b)");
    insta::assert_snapshot!(expr("a * b!"), @"*(a, postfix!(b))");
    insta::assert_snapshot!(expr("a!!"), @"postfix!(postfix!(a))");
}

#[test]
fn test_postfix_chain_of_mixed_precedence() {
    insta::assert_snapshot!(expr("a?!"), @"postfix!(postfix?(a))");
    insta::assert_snapshot!(expr("a!?"), @"postfix?(postfix!(a))");
    insta::assert_snapshot!(expr("a?! + b"), @"+(postfix!(postfix?(a)), b)");
    insta::assert_snapshot!(expr("a * b?!"), @"postfix!(postfix?(*(a, b)))");
}

#[test]
fn test_prefix() {
    insta::assert_snapshot!(expr("-a + b"), @"+(prefix-(a), b)");
    insta::assert_snapshot!(expr("- - a"), @"prefix-(prefix-(a))");
    insta::assert_snapshot!(expr("a ^ -b"), @"^(a, prefix-(b))");
}

#[test]
fn test_prefix_and_postfix_on_one_operand() {
    // `!` binds tighter than prefix `-`, `?` looser
    insta::assert_snapshot!(expr("-a!"), @"prefix-(postfix!(a))");
    insta::assert_snapshot!(expr("-a?"), @"postfix?(prefix-(a))");
}

#[test]
fn test_minus_after_postfix_is_infix() {
    insta::assert_snapshot!(expr("a! - b"), @"-(postfix!(a), b)");
}

// Where an expression ends
#[test]
fn test_empty_line_is_absent_expression() {
    assert_eq!(expr(""), "<none>");
}

#[test]
fn test_stops_at_foreign_token() {
    insta::assert_snapshot!(expr("a + b )"), @"+(a, b)");
}

// Fixity errors
#[test]
fn test_infix_without_left_operand() {
    expect![["<construct part invalid>\nerror[P101]: operator '+' must be preceded by an expression (at test.calc:1:0-1:1)"]]
        .assert_eq(&expr("+ a"));
}

#[test]
fn test_infix_without_right_operand() {
    expect![["<construct part invalid>\nerror[P102]: operator '+' must be followed by an expression (at test.calc:1:2-1:3)"]]
        .assert_eq(&expr("a +"));
}

#[test]
fn test_trailing_operator_before_foreign_token() {
    expect![["<construct part invalid>\nerror[P102]: operator '*' must be followed by an expression (at test.calc:1:2-1:3)"]]
        .assert_eq(&expr("a * )"));
}

#[test]
fn test_trailing_prefix() {
    expect![["<construct part invalid>\nerror[P102]: operator '-' must be followed by an expression (at test.calc:1:0-1:1)"]]
        .assert_eq(&expr("-"));
}

#[test]
fn test_two_expressions_in_a_row() {
    expect![["<construct part invalid>\nerror[P103]: two expressions in a row: expected an operator before 'b' (at test.calc:1:2-1:3)"]]
        .assert_eq(&expr("a b"));
    expect![["<construct part invalid>\nerror[P103]: two expressions in a row: expected an operator before '(' (at test.calc:1:3-1:4)"]]
        .assert_eq(&expr("a! (b)"));
}

#[test]
fn test_postfix_without_operand() {
    expect![["<construct part invalid>\nerror[P101]: operator '!' must be preceded by an expression (at test.calc:1:0-1:1)"]]
        .assert_eq(&expr("!"));
    expect![["<construct part invalid>\nerror[P101]: operator '!' must be preceded by an expression (at test.calc:1:4-1:5)"]]
        .assert_eq(&expr("a + !"));
}

#[test]
fn test_infix_after_looser_postfix() {
    expect![["<construct part invalid>\nerror[P105]: operator '+' cannot follow a postfix operator of lower precedence (at test.calc:1:3-1:4)"]]
        .assert_eq(&expr("a? + b"));
}

#[test]
fn test_prefix_after_looser_infix() {
    expect![["<construct part invalid>\nerror[P106]: prefix operator '-' cannot follow an operator of lower precedence (at test.calc:1:4-1:5)"]]
        .assert_eq(&expr("a * -b"));
}

#[test]
fn test_prefix_after_expression() {
    // the calculator lexer always reads `-` after an operand as infix
    let mut tokens = TokenBuffer::new(vec![
        token(CalcKind::Ident, 0, "a"),
        token(CalcKind::Minus, 2, "-").with_operator(OperatorData::prefix(3)),
        token(CalcKind::Ident, 3, "b"),
        Token::new(
            CalcKind::Eol,
            linewright_syntax::SourceLocation::from_line_offset(1, 4, 0),
        ),
    ]);
    expect![["<construct part invalid>\nerror[P104]: prefix operator '-' cannot follow an expression (at 1:2-1:3)"]]
        .assert_eq(&expr_from(&mut tokens));
}

#[test]
fn test_equal_precedence_across_fixities() {
    // a postfix operator at the infix operator's precedence may precede it
    let mut tokens = TokenBuffer::new(vec![
        token(CalcKind::Ident, 0, "a"),
        token(CalcKind::Bang, 1, "!").with_operator(OperatorData::postfix(1)),
        token(CalcKind::Plus, 3, "+").with_operator(OperatorData::infix(1, Associativity::Left)),
        token(CalcKind::Ident, 5, "b"),
    ]);
    assert_eq!(expr_from(&mut tokens), "+(postfix!(a), b)");
}

#[test]
fn test_unclosed_parenthesis() {
    expect![["<construct part invalid>\nerror[P005]: expected ')' (at test.calc:1:6-1:6)"]]
        .assert_eq(&expr("(a + b"));
}

#[test]
fn test_empty_parentheses() {
    expect![["<construct part invalid>\nerror[P004]: missing required expression (at test.calc:1:1-1:2)"]]
        .assert_eq(&expr("()"));
}

// Locations
#[test]
fn test_operation_spans_operator_and_operands() {
    let parse = parse("print a + b * c");
    let print = &parse.constructs()[0];
    let value = print.borrow().children()[0].clone();
    let location = value.location().expect("located");
    assert_eq!(location.to_string(), "1:6-1:15");
    assert_eq!(
        format!("{location:?}"),
        "1:6-1:15[1:6-1:7, 1:8-1:9, 1:10-1:11, 1:12-1:13, 1:14-1:15]"
    );
}

#[test]
fn test_postfix_location_follows_operand() {
    let parse = parse("print ab!");
    let value = parse.constructs()[0].borrow().children()[0].clone();
    assert_eq!(value.id(), "Unary");
    assert_eq!(
        value.location().map(|location| location.to_string()),
        Some("1:6-1:9".to_string())
    );
    assert_eq!(value.borrow().source_fragment(), Some("ab!"));
}

#[test]
fn test_postfix_chain_location() {
    let parse = parse("print a?!");
    assert!(parse.ok(), "{}", render_parse(&parse));
    let value = parse.constructs()[0].borrow().children()[0].clone();
    assert_eq!(
        format!("{:?}", value.location().expect("located")),
        "1:6-1:9[1:6-1:7, 1:7-1:8, 1:8-1:9]"
    );
}
