//! Compile `$filter` and `$orderby` expressions against a field map

use super::{CliError, check_length};
use crate::{Column, FieldMap, FilterCompiler, RenderedSql, compile_order_by};

/// Which clause to produce
#[derive(Debug, Clone)]
pub enum Target {
    /// `WHERE` predicate from a `$filter`
    Filter,
    /// `ORDER BY` clause from an `$orderby`, with an optional tie-breaker column
    OrderBy { stable: Option<String> },
}

/// Options for the filter and orderby commands
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub expr: String,
    pub field_map: FieldMap,
    pub target: Target,
    /// Longest accepted expression, in characters
    pub max_length: usize,
}

pub fn execute_compile(options: &CompileOptions) -> Result<RenderedSql, CliError> {
    check_length(&options.expr, options.max_length)?;

    let fragment = match &options.target {
        Target::Filter => {
            FilterCompiler::new(&options.field_map)?.compile(Some(&options.expr))?
        }
        Target::OrderBy { stable } => {
            let stable = stable.as_deref().map(Column::parse).transpose()?;
            compile_order_by(&options.expr, &options.field_map, stable.as_ref())?
        }
    };

    Ok(fragment.render())
}
