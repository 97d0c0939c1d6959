//! Database models for persistent storage.
//!
//! One native_db collection per record kind. Each stored document knows how
//! to build itself from creation input and how to convert back into the
//! public record; conversion failures are data-integrity errors.

mod campaign;
mod character;
mod setting;
mod timestamp;

pub use campaign::*;
pub use character::*;
pub use setting::*;
pub use timestamp::StoredTimestamp;

pub(crate) use character::take_legacy_scores;

use crate::error::{Error, Result};
use lorekeeper_core::{RecordKind, ValueMap};

/// Serialize an auxiliary data bag for storage.
pub(crate) fn encode_data(data: &ValueMap) -> Result<Vec<u8>> {
    bincode::serialize(data).map_err(|e| Error::Serialization(e.to_string()))
}

/// Decode a stored data bag; an empty blob is an empty bag.
pub(crate) fn decode_data(kind: RecordKind, id: &str, bytes: &[u8]) -> Result<ValueMap> {
    if bytes.is_empty() {
        return Ok(ValueMap::new());
    }
    bincode::deserialize(bytes).map_err(|e| integrity(kind, id, format!("unreadable data: {}", e)))
}

pub(crate) fn integrity(kind: RecordKind, id: &str, reason: impl Into<String>) -> Error {
    Error::DataIntegrity {
        kind,
        id: id.to_string(),
        reason: reason.into(),
    }
}

/// Fail if a required text field of a stored document is empty.
pub(crate) fn require(kind: RecordKind, id: &str, field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(integrity(
            kind,
            id,
            format!("missing required field {}", field),
        ));
    }
    Ok(())
}
