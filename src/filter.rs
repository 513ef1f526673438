//! `$filter` to SQL `WHERE` predicate compilation.
//!
//! The compiler walks the parsed tree and emits one [`Fragment`]. Every binary and
//! unary node is wrapped in parentheses so the tree's grouping survives when the
//! fragment is spliced into a larger statement.
//!
//! Soft-deleted rows are excluded by appending `<deletedAt> IS NULL`, unless the
//! expression itself mentions the field that column was resolved from. In that
//! case the caller's own condition is the only one applied, which is how deleted
//! rows are queried on purpose.
//!
//! # Examples
//!
//! ```
//! use odata_sql::{FieldMap, compile_filter};
//!
//! let map = FieldMap::new()
//!     .with("age", "entity_defs.age").unwrap()
//!     .with("__system/deletedAt", "entities.deletedAt").unwrap();
//!
//! let sql = compile_filter(Some("age gt 18"), &map).unwrap().render();
//! assert_eq!(
//!     sql.sql,
//!     r#"("entity_defs"."age" > $1) AND "entities"."deletedAt" IS NULL"#
//! );
//! ```

use tracing::{debug, warn};

use crate::{
    ast::{BinOp, Expr, ExprKind, LiteralValue, UnaryOp},
    error::{CompileError, ConfigError},
    field_map::{Column, FieldMap},
    fragment::{Fragment, SqlValue},
    parser,
};

const EXTRACT_UNITS: [(&str, &str); 6] = [
    ("year", "YEAR"),
    ("month", "MONTH"),
    ("day", "DAY"),
    ("hour", "HOUR"),
    ("minute", "MINUTE"),
    ("second", "SECOND"),
];

/// Where the soft-delete column is found in a field map.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Logical field holding the deletion timestamp
    pub deleted_at_field: String,
    /// Prefixes under which a related root entity's fields appear, tried in order
    /// after the unprefixed field
    pub root_prefixes: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            deleted_at_field: "__system/deletedAt".to_string(),
            root_prefixes: vec!["$root/Submissions/".to_string()],
        }
    }
}

impl FilterConfig {
    fn deleted_at_keys(&self) -> Vec<String> {
        std::iter::once(self.deleted_at_field.clone())
            .chain(
                self.root_prefixes
                    .iter()
                    .map(|prefix| format!("{prefix}{}", self.deleted_at_field)),
            )
            .collect()
    }
}

/// Per-call state of one tree walk.
#[derive(Debug, Default)]
struct Walk {
    references_deleted_at: bool,
}

/// Compiles `$filter` expressions against one field map.
#[derive(Debug, Clone)]
pub struct FilterCompiler<'a> {
    field_map: &'a FieldMap,
    deleted_at: &'a Column,
    /// Field map key `deleted_at` was resolved from
    deleted_at_key: String,
}

impl<'a> FilterCompiler<'a> {
    pub fn new(field_map: &'a FieldMap) -> Result<Self, ConfigError> {
        Self::with_config(field_map, &FilterConfig::default())
    }

    pub fn with_config(field_map: &'a FieldMap, config: &FilterConfig) -> Result<Self, ConfigError> {
        let keys = config.deleted_at_keys();
        let (deleted_at_key, deleted_at) = keys
            .iter()
            .find_map(|key| field_map.get(key).map(|column| (key.clone(), column)))
            .ok_or_else(|| ConfigError::MissingDeletedAtColumn { keys: keys.clone() })?;

        Ok(FilterCompiler {
            field_map,
            deleted_at,
            deleted_at_key,
        })
    }

    /// The predicate that hides soft-deleted rows.
    pub fn exclude_deleted(&self) -> Fragment {
        Fragment::identifier(self.deleted_at).append(Fragment::keyword(" IS NULL"))
    }

    /// Compiles raw `$filter` text. Absent or blank text only excludes deleted rows.
    pub fn compile(&self, expr: Option<&str>) -> Result<Fragment, CompileError> {
        let text = match expr.map(str::trim) {
            None | Some("") => return Ok(self.exclude_deleted()),
            Some(text) => text,
        };

        let ast = parser::parse(text).map_err(|e| {
            debug!(error = %e, "rejected unparseable $filter");
            CompileError::from(e)
        })?;
        self.compile_expr(&ast)
    }

    /// Compiles an already parsed expression, adding the soft-delete exclusion.
    pub fn compile_expr(&self, ast: &Expr) -> Result<Fragment, CompileError> {
        let mut walk = Walk::default();
        let compiled = self.compile_node(ast, &mut walk).inspect_err(|e| {
            warn!(error = %e, "rejected $filter");
        })?;

        let result = if walk.references_deleted_at {
            compiled
        } else {
            compiled
                .append(Fragment::keyword(" AND "))
                .append(self.exclude_deleted())
        };

        debug!(sql = %result, "compiled $filter");
        Ok(result)
    }

    fn compile_node(&self, expr: &Expr, walk: &mut Walk) -> Result<Fragment, CompileError> {
        match &expr.kind {
            ExprKind::Member(path) => {
                let column =
                    self.field_map
                        .get(path)
                        .ok_or_else(|| CompileError::UnsupportedField {
                            path: path.clone(),
                            position: Some(expr.span),
                        })?;

                if *path == self.deleted_at_key {
                    walk.references_deleted_at = true;
                }
                Ok(Fragment::identifier(column))
            }
            ExprKind::Literal(literal) => Ok(match &literal.value {
                LiteralValue::Null => Fragment::keyword("NULL"),
                LiteralValue::String(s) => Fragment::value(SqlValue::Text(s.clone())),
                LiteralValue::Number(n) => Fragment::value(SqlValue::Number(*n)),
                LiteralValue::Boolean(b) => Fragment::value(SqlValue::Boolean(*b)),
                LiteralValue::DateTime(text) => Fragment::value(SqlValue::Timestamp(text.clone())),
            }),
            ExprKind::Call { name, args } => self.compile_call(expr, name, args, walk),
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand,
            } => Ok(Fragment::keyword("(NOT ")
                .append(self.compile_node(operand, walk)?)
                .append(Fragment::keyword(")"))),
            ExprKind::Unary {
                op: UnaryOp::Negate,
                ..
            } => Err(unsupported(expr, "-")),
            ExprKind::Binary { op, left, right } => {
                let sql_op = match op {
                    BinOp::Equal => " IS NOT DISTINCT FROM ",
                    BinOp::NotEqual => " IS DISTINCT FROM ",
                    BinOp::LessThan => " < ",
                    BinOp::LessEqual => " <= ",
                    BinOp::GreaterThan => " > ",
                    BinOp::GreaterEqual => " >= ",
                    BinOp::And => " AND ",
                    BinOp::Or => " OR ",
                    BinOp::Add
                    | BinOp::Subtract
                    | BinOp::Multiply
                    | BinOp::Divide
                    | BinOp::Modulo => return Err(unsupported(expr, op.keyword())),
                };

                let left = self.compile_node(left, walk)?;
                let right = self.compile_node(right, walk)?;
                Ok(left
                    .append(Fragment::keyword(sql_op))
                    .append(right)
                    .parenthesized())
            }
            // grouping is already structural; binary nodes bring their own parentheses
            ExprKind::Paren(inner) => self.compile_node(inner, walk),
        }
    }

    fn compile_call(
        &self,
        expr: &Expr,
        name: &str,
        args: &[Expr],
        walk: &mut Walk,
    ) -> Result<Fragment, CompileError> {
        let lower = name.to_ascii_lowercase();

        let unit = EXTRACT_UNITS
            .iter()
            .find(|(function, _)| *function == lower)
            .map(|&(_, unit)| unit);

        if let Some(unit) = unit {
            let [arg] = args else {
                return Err(unsupported(expr, name));
            };
            return Ok(Fragment::keyword("EXTRACT(")
                .append(Fragment::keyword(unit))
                .append(Fragment::keyword(" FROM "))
                .append(self.compile_node(arg, walk)?)
                .append(Fragment::keyword(")")));
        }

        if lower == "now" && args.is_empty() {
            return Ok(Fragment::keyword("now()"));
        }

        Err(unsupported(expr, name))
    }
}

fn unsupported(expr: &Expr, text: &str) -> CompileError {
    CompileError::UnsupportedExpression {
        node_type: expr.kind.node_type().to_string(),
        text: text.to_string(),
        position: expr.span,
    }
}

/// Compiles `$filter` text against `field_map` with the default soft-delete keys.
///
/// # Panics
///
/// Panics if `field_map` has no soft-delete column. That is a defect in the code
/// building the map, not something a request can cause; use
/// [`FilterCompiler::new`] to handle it as an error instead.
pub fn compile_filter(expr: Option<&str>, field_map: &FieldMap) -> Result<Fragment, CompileError> {
    let compiler = match FilterCompiler::new(field_map) {
        Ok(compiler) => compiler,
        Err(e) => panic!("{e}"),
    };
    compiler.compile(expr)
}
