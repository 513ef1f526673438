use std::mem;

use thiserror::Error;

use crate::{
    ast::{BinOp, Expr, ExprKind, Literal, LiteralValue, Token, UnaryOp},
    lexer::{LexError, Lexer, Span, Spanned},
};

/// Deepest expression tree the parser builds.
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, got {found} at position {}", .span.start)]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("expression nests deeper than {limit} levels at position {}", .span.start)]
    TooDeep { limit: usize, span: Span },
}

impl ParseError {
    /// Character offset the diagnostic points at.
    pub fn position(&self) -> usize {
        match self {
            ParseError::Lex(LexError::UnexpectedCharacter { position, .. })
            | ParseError::Lex(LexError::UnterminatedString { position })
            | ParseError::Lex(LexError::InvalidNumber { position, .. }) => *position,
            ParseError::UnexpectedToken { span, .. } | ParseError::TooDeep { span, .. } => {
                span.start
            }
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Number(n) => format!("number {n}"),
        Token::String(_) => "string literal".to_string(),
        Token::Boolean(b) => format!("'{b}'"),
        Token::Null => "'null'".to_string(),
        Token::DateTime(text) => format!("date-time {text}"),
        Token::Identifier(name) => format!("identifier '{name}'"),
        Token::Eq => "'eq'".to_string(),
        Token::Ne => "'ne'".to_string(),
        Token::Lt => "'lt'".to_string(),
        Token::Le => "'le'".to_string(),
        Token::Gt => "'gt'".to_string(),
        Token::Ge => "'ge'".to_string(),
        Token::And => "'and'".to_string(),
        Token::Or => "'or'".to_string(),
        Token::Not => "'not'".to_string(),
        Token::Add => "'add'".to_string(),
        Token::Sub => "'sub'".to_string(),
        Token::Mul => "'mul'".to_string(),
        Token::Div => "'div'".to_string(),
        Token::Mod => "'mod'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Eof => "end of input".to_string(),
    }
}

/// Parses a whole `$filter` expression.
pub fn parse(text: &str) -> Result<Expr, ParseError> {
    Parser::new(Lexer::new(text))?.parse()
}

pub struct Parser {
    lexer: Lexer,
    current: Spanned,
    depth: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            depth: 0,
        })
    }

    fn advance(&mut self) -> Result<Spanned, ParseError> {
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.current, next))
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current.token) == mem::discriminant(token)
    }

    fn expect(&mut self, expected: Token) -> Result<Span, ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(&describe(&expected)));
        }
        Ok(self.advance()?.span)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: describe(&self.current.token),
            span: self.current.span,
        }
    }

    /// Runs `parse` one nesting level down, refusing to recurse past [`MAX_DEPTH`].
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.too_deep(self.current.span));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn too_deep(&self, span: Span) -> ParseError {
        ParseError::TooDeep {
            limit: MAX_DEPTH,
            span,
        }
    }

    /// Builds a non-leaf node, rejecting trees taller than [`MAX_DEPTH`].
    fn node(&self, kind: ExprKind, span: Span) -> Result<Expr, ParseError> {
        let expr = Expr::new(kind, span);
        if expr.height() > MAX_DEPTH {
            return Err(self.too_deep(span));
        }
        Ok(expr)
    }

    fn literal(&self, value: LiteralValue, span: Span) -> Expr {
        Expr::new(
            ExprKind::Literal(Literal {
                raw: self.lexer.slice(span),
                value,
            }),
            span,
        )
    }

    /// Parse primary expressions: literals, members, calls and parenthesized groups
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let value = match &self.current.token {
            Token::Number(n) => Some(LiteralValue::Number(*n)),
            Token::String(s) => Some(LiteralValue::String(s.clone())),
            Token::Boolean(b) => Some(LiteralValue::Boolean(*b)),
            Token::Null => Some(LiteralValue::Null),
            Token::DateTime(text) => Some(LiteralValue::DateTime(text.clone())),
            _ => None,
        };
        if let Some(value) = value {
            let span = self.advance()?.span;
            return Ok(self.literal(value, span));
        }

        if let Token::Identifier(name) = &self.current.token {
            let name = name.clone();
            let span = self.advance()?.span;

            return if self.check(&Token::LParen) {
                self.parse_call(name, span)
            } else {
                Ok(Expr::new(ExprKind::Member(name), span))
            };
        }

        if self.check(&Token::LParen) {
            let open = self.advance()?.span;
            let inner = self.nested(Self::parse_expression)?;
            let close = self.expect(Token::RParen)?;
            return self.node(ExprKind::Paren(Box::new(inner)), open.to(close));
        }

        Err(self.unexpected("an expression"))
    }

    fn parse_call(&mut self, name: String, name_span: Span) -> Result<Expr, ParseError> {
        self.expect(Token::LParen)?;
        let mut args = vec![];

        if !self.check(&Token::RParen) {
            loop {
                args.push(self.nested(Self::parse_expression)?);
                if self.check(&Token::Comma) {
                    self.advance()?;
                } else {
                    break;
                }
            }
        }

        let close = self.expect(Token::RParen)?;
        self.node(ExprKind::Call { name, args }, name_span.to(close))
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.check(&Token::Minus) {
            let start = self.advance()?.span;
            let operand = self.nested(Self::parse_unary)?;
            let span = start.to(operand.span);
            return self.node(
                ExprKind::Unary {
                    op: UnaryOp::Negate,
                    operand: Box::new(operand),
                },
                span,
            );
        }
        self.parse_primary()
    }

    fn binary(&self, op: BinOp, left: Expr, right: Expr) -> Result<Expr, ParseError> {
        let span = left.span.to(right.span);
        self.node(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match &self.current.token {
                Token::Mul => BinOp::Multiply,
                Token::Div => BinOp::Divide,
                Token::Mod => BinOp::Modulo,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_unary()?;
            left = self.binary(op, left, right)?;
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match &self.current.token {
                Token::Add => BinOp::Add,
                Token::Sub => BinOp::Subtract,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right)?;
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_additive()?;

        let op = match &self.current.token {
            Token::Eq => BinOp::Equal,
            Token::Ne => BinOp::NotEqual,
            Token::Lt => BinOp::LessThan,
            Token::Le => BinOp::LessEqual,
            Token::Gt => BinOp::GreaterThan,
            Token::Ge => BinOp::GreaterEqual,
            _ => return Ok(left),
        };

        self.advance()?;
        let right = self.parse_additive()?;
        self.binary(op, left, right)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.check(&Token::Not) {
            let start = self.advance()?.span;
            let operand = self.nested(Self::parse_not)?;
            let span = start.to(operand.span);
            return self.node(
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                span,
            );
        }
        self.parse_comparison()
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;

        while self.check(&Token::And) {
            self.advance()?;
            let right = self.parse_not()?;
            left = self.binary(BinOp::And, left, right)?;
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while self.check(&Token::Or) {
            self.advance()?;
            let right = self.parse_and()?;
            left = self.binary(BinOp::Or, left, right)?;
        }
        Ok(left)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    /// Parse an expression that must span the whole input.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if !self.check(&Token::Eof) {
            return Err(self.unexpected("an operator or end of input"));
        }
        tracing::trace!(node = expr.kind.node_type(), "parsed filter expression");
        Ok(expr)
    }
}
