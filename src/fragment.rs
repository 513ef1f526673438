//! Composable SQL fragments.
//!
//! A [`Fragment`] is a list of segments rather than a string. Only three kinds of
//! segment exist:
//!
//! - **keywords**, which must be `&'static str` and so can only come from this crate's
//!   own source text,
//! - **identifiers**, which can only be built from a [`Column`],
//! - **values**, which render as `$n` placeholders and travel separately as parameters.
//!
//! User input therefore has no path into the SQL text itself.
//!
//! # Examples
//!
//! ```
//! use odata_sql::{Column, Fragment, SqlValue};
//!
//! let column = Column::parse("entities.label").unwrap();
//! let fragment = Fragment::identifier(&column)
//!     .append(Fragment::keyword(" = "))
//!     .append(Fragment::value(SqlValue::Text("x'; DROP TABLE entities; --".into())));
//!
//! let rendered = fragment.render();
//! assert_eq!(rendered.sql, r#""entities"."label" = $1"#);
//! assert_eq!(rendered.params.len(), 1);
//! ```

use std::fmt;

use rust_decimal::Decimal;

use crate::field_map::Column;

/// A scalar bound as a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Number(Decimal),
    Boolean(bool),
    /// Date or date-time text; the database casts it on comparison
    Timestamp(String),
}

impl SqlValue {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SqlValue::Null => serde_json::Value::Null,
            SqlValue::Text(s) | SqlValue::Timestamp(s) => serde_json::Value::String(s.clone()),
            SqlValue::Boolean(b) => serde_json::Value::Bool(*b),
            // serde_json without arbitrary_precision cannot hold every decimal
            SqlValue::Number(n) => serde_json::from_str::<serde_json::Number>(&n.to_string())
                .map(serde_json::Value::Number)
                .unwrap_or_else(|_| serde_json::Value::String(n.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Keyword(&'static str),
    Identifier(Column),
    Value(SqlValue),
}

/// SQL text plus the parameters its placeholders refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSql {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    segments: Vec<Segment>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyword(text: &'static str) -> Self {
        Fragment {
            segments: vec![Segment::Keyword(text)],
        }
    }

    pub fn identifier(column: &Column) -> Self {
        Fragment {
            segments: vec![Segment::Identifier(column.clone())],
        }
    }

    pub fn value(value: SqlValue) -> Self {
        Fragment {
            segments: vec![Segment::Value(value)],
        }
    }

    pub fn append(mut self, other: Fragment) -> Self {
        self.segments.extend(other.segments);
        self
    }

    /// Wraps the fragment in `(` and `)`.
    pub fn parenthesized(self) -> Self {
        Fragment::keyword("(")
            .append(self)
            .append(Fragment::keyword(")"))
    }

    pub fn join<I>(fragments: I, separator: &'static str) -> Self
    where
        I: IntoIterator<Item = Fragment>,
    {
        let mut joined = Fragment::new();
        for (i, fragment) in fragments.into_iter().enumerate() {
            if i > 0 {
                joined.segments.push(Segment::Keyword(separator));
            }
            joined.segments.extend(fragment.segments);
        }
        joined
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Bound values in placeholder order.
    pub fn params(&self) -> impl Iterator<Item = &SqlValue> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Value(value) => Some(value),
            _ => None,
        })
    }

    pub fn render(&self) -> RenderedSql {
        self.render_from(1)
    }

    /// Renders with placeholders numbered from `first`, for splicing into a
    /// statement that already has `first - 1` parameters.
    pub fn render_from(&self, first: usize) -> RenderedSql {
        let mut sql = String::new();
        let mut params = vec![];

        for segment in &self.segments {
            match segment {
                Segment::Keyword(text) => sql.push_str(text),
                Segment::Identifier(column) => push_identifier(&mut sql, column),
                Segment::Value(value) => {
                    params.push(value.clone());
                    sql.push('$');
                    sql.push_str(&(first + params.len() - 1).to_string());
                }
            }
        }

        RenderedSql { sql, params }
    }
}

fn push_identifier(sql: &mut String, column: &Column) {
    for (i, part) in column.parts().iter().enumerate() {
        if i > 0 {
            sql.push('.');
        }
        sql.push('"');
        sql.push_str(&part.replace('"', "\"\""));
        sql.push('"');
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render().sql)
    }
}
