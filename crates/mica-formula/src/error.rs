//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
///
/// These are distinct from in-cell error values: a parse failure raised while
/// evaluating a formula cell is converted by the evaluator into a `#VALUE!`
/// value carrying the message below.
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Formula parse error with the character offset of the failure
    #[error("parse error at offset {offset}: {message}")]
    Parse { message: String, offset: usize },

    /// Invalid reference text handed to an evaluator entry point
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

impl From<mica_core::Error> for FormulaError {
    fn from(err: mica_core::Error) -> Self {
        FormulaError::InvalidReference(err.to_string())
    }
}
