pub mod ast;
pub mod error;
pub mod field_map;
pub mod filter;
pub mod format;
pub mod fragment;
pub mod lexer;
pub mod order_by;
pub mod parser;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{BinOp, Expr, ExprKind, Literal, LiteralValue, Token, UnaryOp};
pub use error::{CompileError, ConfigError, ErrorCategory};
pub use field_map::{Column, FieldMap};
pub use filter::{FilterCompiler, FilterConfig, compile_filter};
pub use fragment::{Fragment, RenderedSql, SqlValue};
pub use lexer::{LexError, Lexer, Span};
pub use order_by::{SortDirection, compile_order_by};
pub use parser::{ParseError, Parser, parse};
