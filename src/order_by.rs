//! `$orderby` to SQL `ORDER BY` compilation.
//!
//! The grammar here is small enough that no tree is built: clauses are split on
//! commas, and each clause is a field path optionally followed by `asc` or `desc`.

use tracing::{debug, warn};

use crate::{
    error::CompileError,
    field_map::{Column, FieldMap},
    fragment::Fragment,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `asc` / `desc`, ignoring ASCII case only.
    pub fn parse(text: &str) -> Option<SortDirection> {
        if text.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if text.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }

    /// Nulls sort before everything ascending and after everything descending.
    pub fn sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => " ASC NULLS FIRST",
            SortDirection::Desc => " DESC NULLS LAST",
        }
    }
}

fn unsupported_field(text: &str) -> CompileError {
    CompileError::UnsupportedField {
        path: text.to_string(),
        position: None,
    }
}

/// Compiles `$orderby` text into an `ORDER BY` clause.
///
/// When `stable_column` is given it is appended as a final tie-breaker sorted in
/// the first clause's direction, so paging through equal keys stays deterministic.
///
/// A malformed direction is reported as [`CompileError::UnsupportedField`].
///
/// # Examples
///
/// ```
/// use odata_sql::{Column, FieldMap, compile_order_by};
///
/// let map = FieldMap::new().with("age", "entity_defs.age").unwrap();
/// let id = Column::parse("entities.id").unwrap();
///
/// let sql = compile_order_by("age desc", &map, Some(&id)).unwrap().render().sql;
/// assert_eq!(
///     sql,
///     r#"ORDER BY "entity_defs"."age" DESC NULLS LAST, "entities"."id" DESC NULLS LAST"#
/// );
/// ```
pub fn compile_order_by(
    expr: &str,
    field_map: &FieldMap,
    stable_column: Option<&Column>,
) -> Result<Fragment, CompileError> {
    let mut initial = None;
    let mut clauses = vec![];

    for clause in expr.split(',') {
        let mut words = clause.split_whitespace();
        let field = words.next().unwrap_or("");

        let column = field_map.get(field).ok_or_else(|| {
            warn!(field, "rejected $orderby field");
            unsupported_field(field)
        })?;

        let direction = match words.next() {
            None => SortDirection::default(),
            Some(word) => SortDirection::parse(word).ok_or_else(|| {
                warn!(direction = word, "rejected $orderby direction");
                unsupported_field(word)
            })?,
        };

        if let Some(extra) = words.next() {
            warn!(extra, "rejected trailing $orderby text");
            return Err(unsupported_field(extra));
        }

        initial.get_or_insert(direction);
        clauses.push(Fragment::identifier(column).append(Fragment::keyword(direction.sql())));
    }

    if let Some(stable) = stable_column {
        let direction = initial.unwrap_or_default();
        clauses.push(Fragment::identifier(stable).append(Fragment::keyword(direction.sql())));
    }

    let result = Fragment::keyword("ORDER BY ").append(Fragment::join(clauses, ", "));
    debug!(sql = %result, "compiled $orderby");
    Ok(result)
}
