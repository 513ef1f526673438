use thiserror::Error;

use crate::lexer::Span;
use crate::parser::ParseError;

fn at(position: &Option<Span>) -> String {
    match position {
        Some(span) => format!(" at position {}", span.start),
        None => String::new(),
    }
}

/// Why an expression could not be turned into SQL.
///
/// Classification guidance:
/// - [`CompileError::Syntax`]: the expression text is malformed; the user's fault
/// - [`CompileError::UnsupportedField`]: a field outside the field map, or a malformed
///   `$orderby` direction
/// - [`CompileError::UnsupportedExpression`]: an operator, function or arity the
///   compiler does not translate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("the given OData field '{path}' is not supported{}", at(.position))]
    UnsupportedField {
        path: String,
        position: Option<Span>,
    },

    #[error("the given OData {node_type} expression '{text}' is not supported at position {}", .position.start)]
    UnsupportedExpression {
        node_type: String,
        text: String,
        position: Span,
    },

    #[error("the OData expression could not be parsed: {reason}")]
    Syntax { reason: String },
}

/// Which side of the API boundary caused an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed input from the API consumer
    User,
    /// The query surface exposed something it cannot serve
    Internal,
}

impl CompileError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CompileError::Syntax { .. } => ErrorCategory::User,
            CompileError::UnsupportedField { .. } | CompileError::UnsupportedExpression { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    /// HTTP status a surrounding API layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::User => 400,
            ErrorCategory::Internal => 500,
        }
    }
}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Syntax {
            reason: e.to_string(),
        }
    }
}

/// Defects in what the calling layer handed over, as opposed to what the user typed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid column reference '{0}': expected dot-separated, non-empty names")]
    InvalidColumn(String),

    #[error("field map has no soft-delete column (looked for {})", .keys.join(", "))]
    MissingDeletedAtColumn { keys: Vec<String> },

    #[error("invalid field map: {0}")]
    InvalidFieldMap(String),

    #[error("field map is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
