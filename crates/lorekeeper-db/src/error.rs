//! Error types for database operations.

use lorekeeper_core::RecordKind;
use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Native DB error.
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An operation was issued before `Store::initialize`.
    #[error("Store has not been initialized")]
    NotInitialized,

    /// `Store::initialize` was called on a store that is already open.
    #[error("Store is already initialized")]
    AlreadyInitialized,

    /// No record with the given identifier or name.
    #[error("{kind} with ID {key} does not exist")]
    NotFound { kind: RecordKind, key: String },

    /// Name uniqueness violation.
    #[error("A {kind} with the name '{name}' already exists")]
    DuplicateName { kind: RecordKind, name: String },

    /// Input rejected before any write.
    #[error("Validation error: {0}")]
    Validation(#[from] lorekeeper_core::Error),

    /// A stored document could not be converted back into a record.
    #[error("Corrupt {kind} document {id}: {reason}")]
    DataIntegrity {
        kind: RecordKind,
        id: String,
        reason: String,
    },

    /// Invalid or unreadable configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn not_found(kind: RecordKind, key: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub(crate) fn duplicate_name(kind: RecordKind, name: impl Into<String>) -> Self {
        Error::DuplicateName {
            kind,
            name: name.into(),
        }
    }

    /// True for `NotFound` of any record kind
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_duplicate_name(&self) -> bool {
        matches!(self, Error::DuplicateName { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;
