//! CLI support for odata-sql
//!
//! Provides programmatic access to the `odata-sql` commands so other tools can
//! embed them.

mod check;
mod compile;
mod convert;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use compile::{CompileOptions, Target, execute_compile};
pub use convert::{load_field_map, rendered_to_json};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("{0}")]
    Compile(#[from] crate::CompileError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No field map provided. Use --fields or pipe JSON to stdin.")]
    NoFieldMap,

    #[error("Expression is {length} characters long, the limit is {max}")]
    TooLong { length: usize, max: usize },
}

impl CliError {
    /// `2` for problems with the expression itself, `1` for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Parse(_) | CliError::TooLong { .. } => 2,
            CliError::Compile(e) if e.category() == crate::ErrorCategory::User => 2,
            _ => 1,
        }
    }
}

pub(crate) fn check_length(expr: &str, max: usize) -> Result<(), CliError> {
    let length = expr.chars().count();
    if length > max {
        return Err(CliError::TooLong { length, max });
    }
    Ok(())
}
