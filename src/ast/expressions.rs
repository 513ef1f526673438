use rust_decimal::Decimal;

use crate::ast::{BinOp, UnaryOp};
use crate::lexer::Span;

/// A node of the expression tree together with the source span it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    height: usize,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        let below = match &kind {
            ExprKind::Member(_) | ExprKind::Literal(_) => 0,
            ExprKind::Unary { operand, .. } => operand.height,
            ExprKind::Binary { left, right, .. } => left.height.max(right.height),
            ExprKind::Call { args, .. } => args.iter().map(|arg| arg.height).max().unwrap_or(0),
            ExprKind::Paren(inner) => inner.height,
        };
        Expr {
            kind,
            span,
            height: below + 1,
        }
    }

    /// Number of nodes on the longest path from this node down to a leaf.
    pub fn height(&self) -> usize {
        self.height
    }
}

/// The closed set of expression shapes a `$filter` can contain.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Field reference
    ///
    /// # Examples
    /// ```text
    /// age
    /// __system/submitterId
    /// $root/Submissions/__system/deletedAt
    /// ```
    Member(String),

    /// Literal value
    Literal(Literal),

    /// Unary operation
    ///
    /// # Examples
    /// ```text
    /// not (age gt 5)
    /// -age
    /// ```
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Binary operation (comparison, logical, arithmetic)
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Function call
    ///
    /// # Examples
    /// ```text
    /// year(__system/submissionDate)
    /// now()
    /// ```
    Call { name: String, args: Vec<Expr> },

    /// Explicit parentheses written by the user
    Paren(Box<Expr>),
}

impl ExprKind {
    /// Short name of the node shape, used in diagnostics.
    pub fn node_type(&self) -> &'static str {
        match self {
            ExprKind::Member(_) => "member",
            ExprKind::Literal(_) => "literal",
            ExprKind::Unary { op, .. } => match op {
                UnaryOp::Not => "not",
                UnaryOp::Negate => "negate",
            },
            ExprKind::Binary { op, .. } => op.keyword(),
            ExprKind::Call { .. } => "call",
            ExprKind::Paren(_) => "paren",
        }
    }
}

/// A literal as written, plus its parsed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// Source text, including quotes for strings
    pub raw: String,
    pub value: LiteralValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Number(Decimal),
    /// Unescaped string contents
    String(String),
    /// Date or date-time text, passed through unchanged
    DateTime(String),
}
