//! # OData Expression Syntax Tree
//!
//! This module defines the syntax tree produced by the [`Parser`](crate::parser::Parser)
//! for OData `$filter` expressions, the subset of the OData v4 grammar this crate
//! understands.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (members, literals, operators, calls, groups)
//! - **[operators]** - Binary and unary operators
//!
//! ## Quick Start
//!
//! ```text
//! __system/deletedAt eq null and (age gt 18 or year(__system/createdAt) eq 2024)
//! ```
//!
//! ## Operator Precedence
//!
//! From loosest to tightest:
//!
//! | Level | Operators |
//! |---|---|
//! | disjunction | `or` |
//! | conjunction | `and` |
//! | negation | `not` |
//! | comparison | `eq ne lt le gt ge` (non-chaining) |
//! | additive | `add sub` |
//! | multiplicative | `mul div mod` |
//! | unary | `-` |
//!
//! Precedence is fully resolved by the shape of the tree; a [`ExprKind::Paren`] node
//! only records that the user wrote explicit parentheses.
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{Expr, ExprKind, Literal, LiteralValue};
pub use operators::{BinOp, UnaryOp};
pub use tokens::Token;
