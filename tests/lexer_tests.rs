// tests/lexer_tests.rs

use odata_sql::ast::Token;
use odata_sql::lexer::{LexError, Lexer};
use rust_decimal::Decimal;
use std::str::FromStr;

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut out = vec![];
    loop {
        let token = lexer.next_token().unwrap().token;
        if token == Token::Eof {
            return out;
        }
        out.push(token);
    }
}

fn single(input: &str) -> Token {
    let mut lexer = Lexer::new(input);
    let token = lexer.next_token().unwrap().token;
    assert_eq!(lexer.next_token().unwrap().token, Token::Eof, "Trailing tokens for: {}", input);
    token
}

// ============================================================================
// Delimiters and Operators
// ============================================================================

#[test]
fn test_delimiters() {
    let test_cases = vec![
        ("(", Token::LParen),
        (")", Token::RParen),
        (",", Token::Comma),
        ("-", Token::Minus),
    ];

    for (input, expected) in test_cases {
        assert_eq!(single(input), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_operator_keywords() {
    let test_cases = vec![
        ("eq", Token::Eq),
        ("ne", Token::Ne),
        ("lt", Token::Lt),
        ("le", Token::Le),
        ("gt", Token::Gt),
        ("ge", Token::Ge),
        ("and", Token::And),
        ("or", Token::Or),
        ("not", Token::Not),
        ("add", Token::Add),
        ("sub", Token::Sub),
        ("mul", Token::Mul),
        ("div", Token::Div),
        ("mod", Token::Mod),
    ];

    for (input, expected) in test_cases {
        assert_eq!(single(input), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_keywords_vs_identifiers() {
    // keywords only match as whole words
    let test_cases = vec![
        "android", "equals", "order", "nothing", "truth", "nullable", "ge_flag", "ltv",
    ];

    for input in test_cases {
        match single(input) {
            Token::Identifier(ident) => assert_eq!(ident, input),
            other => panic!("Expected Identifier, got {:?} for input: {}", other, input),
        }
    }
}

// ============================================================================
// Member Paths
// ============================================================================

#[test]
fn test_slash_paths() {
    assert_eq!(
        single("__system/deletedAt"),
        Token::Identifier("__system/deletedAt".to_string())
    );
    assert_eq!(
        single("$root/Submissions/__system/deletedAt"),
        Token::Identifier("$root/Submissions/__system/deletedAt".to_string())
    );
}

#[test]
fn test_keyword_as_path_segment() {
    assert_eq!(single("not/here"), Token::Identifier("not/here".to_string()));
}

#[test]
fn test_unicode_field_names() {
    assert_eq!(single("größe"), Token::Identifier("größe".to_string()));
    assert_eq!(
        single("région/名前_1"),
        Token::Identifier("région/名前_1".to_string())
    );
    assert_eq!(
        tokens("größe gt 5"),
        vec![
            Token::Identifier("größe".to_string()),
            Token::Gt,
            Token::Number(Decimal::from(5)),
        ]
    );
}

#[test]
fn test_bare_dollar_is_invalid() {
    let mut lexer = Lexer::new("$ eq 1");
    assert!(matches!(
        lexer.next_token(),
        Err(LexError::UnexpectedCharacter { ch: '$', position: 0 })
    ));
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_literals() {
    assert_eq!(single("null"), Token::Null);
    assert_eq!(single("true"), Token::Boolean(true));
    assert_eq!(single("false"), Token::Boolean(false));
    assert_eq!(single("42"), Token::Number(Decimal::from(42)));
    assert_eq!(single("-7"), Token::Number(Decimal::from(-7)));
    assert_eq!(single("3.25"), Token::Number(Decimal::from_str("3.25").unwrap()));
    assert_eq!(single("1e3"), Token::Number(Decimal::from(1000)));
}

#[test]
fn test_strings() {
    assert_eq!(single("'hello'"), Token::String("hello".to_string()));
    assert_eq!(single("''"), Token::String(String::new()));
    assert_eq!(single("'O''Brien'"), Token::String("O'Brien".to_string()));
    assert_eq!(
        single("'a; DROP TABLE x; --'"),
        Token::String("a; DROP TABLE x; --".to_string())
    );
}

#[test]
fn test_unterminated_string() {
    let mut lexer = Lexer::new("name eq 'abc");
    lexer.next_token().unwrap();
    lexer.next_token().unwrap();
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnterminatedString { position: 8 })
    );
}

#[test]
fn test_dates() {
    assert_eq!(single("2024-01-31"), Token::DateTime("2024-01-31".to_string()));
    assert_eq!(
        single("2024-01-31T12:30:00.000Z"),
        Token::DateTime("2024-01-31T12:30:00.000Z".to_string())
    );
    assert_eq!(
        single("2024-01-31T12:30+02:00"),
        Token::DateTime("2024-01-31T12:30+02:00".to_string())
    );
}

#[test]
fn test_numbers_next_to_dates() {
    assert_eq!(
        tokens("2024-01-31 eq 2024"),
        vec![
            Token::DateTime("2024-01-31".to_string()),
            Token::Eq,
            Token::Number(Decimal::from(2024)),
        ]
    );

    let input = vec!["1"; 5000].join(" ");
    assert_eq!(tokens(&input).len(), 5000);
}

#[test]
fn test_invalid_number() {
    let mut lexer = Lexer::new("12abc");
    assert!(matches!(
        lexer.next_token(),
        Err(LexError::InvalidNumber { position: 0, .. })
    ));
}

#[test]
fn test_unexpected_character() {
    let mut lexer = Lexer::new("age; drop");
    lexer.next_token().unwrap();
    let err = lexer.next_token().unwrap_err();
    assert_eq!(err, LexError::UnexpectedCharacter { ch: ';', position: 3 });
    assert!(err.to_string().contains("unexpected character ';'"));
}

// ============================================================================
// Whole Expressions
// ============================================================================

#[test]
fn test_filter_expression() {
    assert_eq!(
        tokens("year(__system/submissionDate) ge 2020 and not(age lt -1)"),
        vec![
            Token::Identifier("year".to_string()),
            Token::LParen,
            Token::Identifier("__system/submissionDate".to_string()),
            Token::RParen,
            Token::Ge,
            Token::Number(Decimal::from(2020)),
            Token::And,
            Token::Not,
            Token::LParen,
            Token::Identifier("age".to_string()),
            Token::Lt,
            Token::Number(Decimal::from(-1)),
            Token::RParen,
        ]
    );
}

#[test]
fn test_spans_cover_source() {
    let source = "label eq 'x y'";
    let mut lexer = Lexer::new(source);
    let mut pieces = vec![];
    loop {
        let spanned = lexer.next_token().unwrap();
        if spanned.token == Token::Eof {
            break;
        }
        pieces.push(lexer.slice(spanned.span));
    }
    assert_eq!(pieces, vec!["label", "eq", "'x y'"]);
}
