//! Canonical text for parsed expressions.
//!
//! Output reparses to the same tree: precedence lives in the tree shape and the
//! only parentheses printed are the ones the user wrote.
//!
//! # Examples
//!
//! ```
//! use odata_sql::parser::parse;
//!
//! let expr = parse("age   gt 5 and(name eq 'O''Brien')").unwrap();
//! assert_eq!(expr.to_string(), "age gt 5 and (name eq 'O''Brien')");
//! ```

use std::fmt;

use crate::ast::{Expr, ExprKind, UnaryOp};

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Member(path) => f.write_str(path),
            ExprKind::Literal(literal) => f.write_str(&literal.raw),
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand,
            } => write!(f, "not {operand}"),
            ExprKind::Unary {
                op: UnaryOp::Negate,
                operand,
            } => write!(f, "-{operand}"),
            ExprKind::Binary { op, left, right } => {
                write!(f, "{left} {} {right}", op.keyword())
            }
            ExprKind::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            ExprKind::Paren(inner) => write!(f, "({inner})"),
        }
    }
}
