// tests/parser_tests.rs

use odata_sql::ast::{BinOp, Expr, ExprKind, LiteralValue, UnaryOp};
use odata_sql::lexer::Span;
use odata_sql::parser::{MAX_DEPTH, ParseError, parse};
use rust_decimal::Decimal;

fn binary(expr: &Expr) -> (BinOp, &Expr, &Expr) {
    match &expr.kind {
        ExprKind::Binary { op, left, right } => (*op, left, right),
        other => panic!("Expected binary expression, got {:?}", other),
    }
}

// ============================================================================
// Simple tests
// ============================================================================

#[test]
fn test_comparison() {
    let expr = parse("age gt 100").unwrap();
    let (op, left, right) = binary(&expr);

    assert_eq!(op, BinOp::GreaterThan);
    assert_eq!(left.kind, ExprKind::Member("age".to_string()));
    assert!(matches!(
        &right.kind,
        ExprKind::Literal(lit) if lit.value == LiteralValue::Number(Decimal::from(100))
    ));
}

#[test]
fn test_literal_raw_text() {
    let expr = parse("name eq 'O''Brien'").unwrap();
    let (_, _, right) = binary(&expr);

    match &right.kind {
        ExprKind::Literal(lit) => {
            assert_eq!(lit.raw, "'O''Brien'");
            assert_eq!(lit.value, LiteralValue::String("O'Brien".to_string()));
        }
        other => panic!("Expected literal, got {:?}", other),
    }
}

#[test]
fn test_and_binds_tighter_than_or() {
    // Should be: Or(And(a, b), c)
    let expr = parse("a eq 1 and b eq 2 or c eq 3").unwrap();
    let (op, left, right) = binary(&expr);

    assert_eq!(op, BinOp::Or);
    assert_eq!(binary(left).0, BinOp::And);
    assert_eq!(binary(right).0, BinOp::Equal);
}

#[test]
fn test_parentheses_regroup() {
    // Should be: And(a, Paren(Or(b, c)))
    let expr = parse("a eq 1 and (b eq 2 or c eq 3)").unwrap();
    let (op, _, right) = binary(&expr);

    assert_eq!(op, BinOp::And);
    match &right.kind {
        ExprKind::Paren(inner) => assert_eq!(binary(inner).0, BinOp::Or),
        other => panic!("Expected paren, got {:?}", other),
    }
}

#[test]
fn test_left_associative_and() {
    // Should be: And(And(a, b), c)
    let expr = parse("a and b and c").unwrap();
    let (op, left, right) = binary(&expr);

    assert_eq!(op, BinOp::And);
    assert_eq!(binary(left).0, BinOp::And);
    assert_eq!(right.kind, ExprKind::Member("c".to_string()));
}

#[test]
fn test_not_wraps_comparison() {
    let expr = parse("not age eq 5").unwrap();

    match &expr.kind {
        ExprKind::Unary { op: UnaryOp::Not, operand } => {
            assert_eq!(binary(operand).0, BinOp::Equal);
        }
        other => panic!("Expected not, got {:?}", other),
    }
}

#[test]
fn test_not_binds_tighter_than_and() {
    let expr = parse("not a and b").unwrap();
    let (op, left, _) = binary(&expr);

    assert_eq!(op, BinOp::And);
    assert!(matches!(left.kind, ExprKind::Unary { op: UnaryOp::Not, .. }));
}

#[test]
fn test_arithmetic_precedence() {
    // Should be: Add(1, Mul(2, 3))
    let expr = parse("1 add 2 mul 3").unwrap();
    let (op, _, right) = binary(&expr);

    assert_eq!(op, BinOp::Add);
    assert_eq!(binary(right).0, BinOp::Multiply);
}

#[test]
fn test_negation() {
    let expr = parse("-age").unwrap();
    assert!(matches!(expr.kind, ExprKind::Unary { op: UnaryOp::Negate, .. }));
}

// ============================================================================
// Function calls
// ============================================================================

#[test]
fn test_function_call() {
    let expr = parse("year(__system/submissionDate) eq 2024").unwrap();
    let (_, left, _) = binary(&expr);

    match &left.kind {
        ExprKind::Call { name, args } => {
            assert_eq!(name, "year");
            assert_eq!(args.len(), 1);
            assert_eq!(
                args[0].kind,
                ExprKind::Member("__system/submissionDate".to_string())
            );
        }
        other => panic!("Expected call, got {:?}", other),
    }
    assert_eq!(left.span, Span::new(0, 29));
}

#[test]
fn test_zero_and_many_arguments() {
    let expr = parse("now()").unwrap();
    assert!(matches!(&expr.kind, ExprKind::Call { args, .. } if args.is_empty()));

    let expr = parse("concat(a, 'b', 3)").unwrap();
    assert!(matches!(&expr.kind, ExprKind::Call { args, .. } if args.len() == 3));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_chained_comparison_is_error() {
    let err = parse("a eq b eq c").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    assert_eq!(err.position(), 7);
}

#[test]
fn test_unclosed_paren() {
    let err = parse("(a eq 1").unwrap_err();
    match err {
        ParseError::UnexpectedToken { expected, found, .. } => {
            assert_eq!(expected, "')'");
            assert_eq!(found, "end of input");
        }
        other => panic!("Expected unexpected token, got {:?}", other),
    }
}

#[test]
fn test_dangling_operator() {
    assert!(parse("a eq").is_err());
    assert!(parse("and").is_err());
    assert!(parse("a eq 1 and").is_err());
}

#[test]
fn test_lex_errors_surface() {
    let err = parse("a eq 'open").unwrap_err();
    assert!(matches!(err, ParseError::Lex(_)));
    assert_eq!(err.position(), 5);
}

#[test]
fn test_nesting_depth_is_bounded() {
    let test_cases = vec![
        format!("{}a eq 1{}", "(".repeat(2000), ")".repeat(2000)),
        format!("{}a eq 1", "not ".repeat(2000)),
        format!("a eq {}1", "-".repeat(2000)),
        format!("{}a{}", "year(".repeat(2000), ")".repeat(2000)),
        format!("a eq 1{}", " and a eq 1".repeat(2000)),
        format!("a{}", " add 1".repeat(2000)),
    ];

    for input in test_cases {
        let err = parse(&input).unwrap_err();
        assert!(
            matches!(err, ParseError::TooDeep { limit: MAX_DEPTH, .. }),
            "Expected depth error, got {:?}",
            err
        );
    }
}

#[test]
fn test_moderate_nesting_still_parses() {
    let input = format!("{}a eq 1{}", "(".repeat(50), ")".repeat(50));
    assert!(parse(&input).unwrap().height() <= MAX_DEPTH);

    let input = format!("a eq 1{}", " or a eq 1".repeat(50));
    assert!(parse(&input).is_ok());
}

#[test]
fn test_trailing_input() {
    assert!(parse("a eq 1 b").is_err());
    assert!(parse("a eq 1; DROP TABLE x").is_err());
}

// ============================================================================
// Canonical formatting
// ============================================================================

#[test]
fn test_display_reparses_identically() {
    let inputs = vec![
        "a eq 1 and (b eq 2 or c eq 3)",
        "not (a gt 5) or year(b) eq 2020",
        "name eq 'O''Brien' and d lt 2024-01-01T00:00:00Z",
        "x eq -3.5",
    ];

    for input in inputs {
        let first = parse(input).unwrap();
        let printed = first.to_string();
        let second = parse(&printed).unwrap();
        assert_eq!(printed, second.to_string(), "Failed for input: {}", input);
        assert_eq!(printed, input);
    }
}
