//! Error types for mica-core
//!
//! These are API-level failures: structural problems in a caller's invocation
//! such as malformed address text or a bad matrix shape. They are distinct
//! from in-cell error values ([`crate::ErrorValue`]), which flow through
//! evaluation like any other cell content.

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mica-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Matrix shape does not match the target range
    #[error(
        "Matrix shape {actual_rows}x{actual_cols} does not match range shape {expected_rows}x{expected_cols}"
    )]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },
}
