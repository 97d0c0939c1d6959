//! Error types for lorekeeper-core

use thiserror::Error;

/// Validation error raised before any store mutation is attempted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("{field} must be at most {max} characters (got {len})")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid type for field {field}: expected {expected}, got {got}")]
    TypeError {
        field: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
