use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::ast::Token;

/// Longest text a date-time literal can span.
const DATE_TIME_WINDOW: usize = 48;

static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(T\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:\d{2})?)?")
        .expect("date-time pattern is valid")
});

/// Half-open range of character offsets into the source expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A token and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("unterminated string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("invalid number '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Source text covered by `span`.
    pub fn slice(&self, span: Span) -> String {
        let end = span.end.min(self.input.len());
        let start = span.start.min(end);
        self.input[start..end].iter().collect()
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads `segment ( '/' segment )*`, starting from the already-read `head`.
    fn read_path(&mut self, head: String) -> String {
        let mut path = head;
        while self.current_char() == Some('/')
            && self
                .peek_char(1)
                .is_some_and(|c| c.is_alphabetic() || c == '_')
        {
            self.advance();
            path.push('/');
            path.push_str(&self.read_word());
        }
        path
    }

    fn read_string(&mut self) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            if ch == '\'' {
                if self.peek_char(1) == Some('\'') {
                    result.push('\'');
                    self.advance();
                    self.advance();
                    continue;
                }
                self.advance();
                return Ok(result);
            }
            result.push(ch);
            self.advance();
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_date_time(&mut self) -> Option<String> {
        let rest: String = self.input[self.position..]
            .iter()
            .take(DATE_TIME_WINDOW)
            .take_while(|&&c| {
                c.is_ascii_digit() || matches!(c, '-' | '+' | ':' | '.' | 'T' | 'Z')
            })
            .collect();
        let matched = DATE_TIME.find(&rest)?.as_str().to_string();
        self.position += matched.chars().count();
        Some(matched)
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut number = String::new();

        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }

        let mut is_decimal = false;
        let mut has_exponent = false;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_decimal
                && !has_exponent
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_decimal = true;
                number.push(ch);
                self.advance();
            } else if (ch == 'e' || ch == 'E') && !has_exponent {
                has_exponent = true;
                number.push(ch);
                self.advance();
                if let Some(sign @ ('+' | '-')) = self.current_char() {
                    number.push(sign);
                    self.advance();
                }
            } else {
                break;
            }
        }

        // a number running straight into letters, e.g. `12abc`
        if self
            .current_char()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
        {
            number.push_str(&self.read_word());
        }

        let parsed = if has_exponent {
            Decimal::from_scientific(&number)
        } else {
            Decimal::from_str(&number)
        };

        parsed
            .map(Token::Number)
            .map_err(|_| LexError::InvalidNumber {
                text: number,
                position: start,
            })
    }

    pub fn next_token(&mut self) -> Result<Spanned, LexError> {
        self.skip_whitespace();
        let start = self.position;
        let token = self.scan()?;
        Ok(Spanned {
            token,
            span: Span::new(start, self.position),
        })
    }

    fn scan(&mut self) -> Result<Token, LexError> {
        match self.current_char() {
            None => Ok(Token::Eof),
            Some('(') => {
                self.advance();
                Ok(Token::LParen)
            }
            Some(')') => {
                self.advance();
                Ok(Token::RParen)
            }
            Some(',') => {
                self.advance();
                Ok(Token::Comma)
            }
            Some('\'') => self.read_string().map(Token::String),
            Some('-') => {
                if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.read_number()
                } else {
                    self.advance();
                    Ok(Token::Minus)
                }
            }
            Some('$') => {
                // `$root/...` and `$it/...`
                self.advance();
                let word = self.read_word();
                if word.is_empty() {
                    return Err(LexError::UnexpectedCharacter {
                        ch: '$',
                        position: self.position - 1,
                    });
                }
                Ok(Token::Identifier(self.read_path(format!("${word}"))))
            }
            Some(ch) if ch.is_ascii_digit() => match self.read_date_time() {
                Some(text) => Ok(Token::DateTime(text)),
                None => self.read_number(),
            },
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let word = self.read_word();

                let keyword = match word.as_str() {
                    "eq" => Some(Token::Eq),
                    "ne" => Some(Token::Ne),
                    "lt" => Some(Token::Lt),
                    "le" => Some(Token::Le),
                    "gt" => Some(Token::Gt),
                    "ge" => Some(Token::Ge),
                    "and" => Some(Token::And),
                    "or" => Some(Token::Or),
                    "not" => Some(Token::Not),
                    "add" => Some(Token::Add),
                    "sub" => Some(Token::Sub),
                    "mul" => Some(Token::Mul),
                    "div" => Some(Token::Div),
                    "mod" => Some(Token::Mod),
                    "true" => Some(Token::Boolean(true)),
                    "false" => Some(Token::Boolean(false)),
                    "null" => Some(Token::Null),
                    _ => None,
                };

                match keyword {
                    // a keyword followed by `/` is the first segment of a path
                    Some(token) if self.current_char() != Some('/') => Ok(token),
                    _ => Ok(Token::Identifier(self.read_path(word))),
                }
            }
            Some(ch) => Err(LexError::UnexpectedCharacter {
                ch,
                position: self.position,
            }),
        }
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and or not true false null");
    assert_eq!(lexer.next_token().unwrap().token, Token::And);
    assert_eq!(lexer.next_token().unwrap().token, Token::Or);
    assert_eq!(lexer.next_token().unwrap().token, Token::Not);
    assert_eq!(lexer.next_token().unwrap().token, Token::Boolean(true));
    assert_eq!(lexer.next_token().unwrap().token, Token::Boolean(false));
    assert_eq!(lexer.next_token().unwrap().token, Token::Null);
    assert_eq!(lexer.next_token().unwrap().token, Token::Eof);
}

#[test]
fn test_comparison_spans() {
    let mut lexer = Lexer::new("age gt 5");
    let age = lexer.next_token().unwrap();
    assert_eq!(age.token, Token::Identifier("age".to_string()));
    assert_eq!(age.span, Span::new(0, 3));
    let gt = lexer.next_token().unwrap();
    assert_eq!(gt.token, Token::Gt);
    assert_eq!(gt.span, Span::new(4, 6));
    let five = lexer.next_token().unwrap();
    assert_eq!(five.token, Token::Number(Decimal::from(5)));
    assert_eq!(lexer.slice(five.span), "5");
}
