//! Syntax-check `$filter` expressions

use super::{CliError, check_length};
use crate::parse;

/// Options for the check command
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// The `$filter` expression to validate
    pub expr: String,
    /// Longest accepted expression, in characters
    pub max_length: usize,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed; holds the canonical form of the expression
    SyntaxValid(String),
}

/// Parse the expression without compiling it
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    check_length(&options.expr, options.max_length)?;
    let expr = parse(&options.expr)?;
    Ok(CheckResult::SyntaxValid(expr.to_string()))
}
