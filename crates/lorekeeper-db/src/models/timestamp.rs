//! Creation and update timestamps as stored in documents.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A stored timestamp.
///
/// Current writes always store ISO-8601 text. Older documents may carry a
/// native datetime; both render the same way on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredTimestamp {
    /// ISO-8601 UTC text.
    Iso(String),
    /// Native UTC datetime.
    Native(DateTime<Utc>),
}

impl StoredTimestamp {
    /// The current UTC time as ISO text.
    pub fn now() -> Self {
        StoredTimestamp::Native(Utc::now()).normalized()
    }

    /// Render as an ISO-8601 string.
    pub fn to_iso(&self) -> String {
        match self {
            StoredTimestamp::Iso(text) => text.clone(),
            StoredTimestamp::Native(at) => at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }

    /// Same instant, as ISO text.
    pub fn normalized(&self) -> Self {
        StoredTimestamp::Iso(self.to_iso())
    }
}
