//! Campaign documents.

use super::{decode_data, encode_data, require, StoredTimestamp};
use crate::error::Result;
use lorekeeper_core::{Campaign, NewCampaign, RecordId, RecordKind};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredCampaign {
    /// Primary key - record ID.
    #[primary_key]
    pub id: String,
    /// Campaign name, unique.
    #[secondary_key(unique)]
    pub name: String,
    /// Description.
    pub description: String,
    /// Serialized auxiliary data bag.
    pub data: Vec<u8>,
    /// Creation time.
    pub created_at: StoredTimestamp,
    /// Last update time.
    pub updated_at: StoredTimestamp,
}

impl StoredCampaign {
    /// Build a new document from creation input.
    pub fn create(id: RecordId, input: NewCampaign, now: StoredTimestamp) -> Result<Self> {
        Ok(Self {
            id: id.into_string(),
            name: input.name,
            description: input.description,
            data: encode_data(&input.data)?,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Convert to a Campaign.
    pub fn to_campaign(&self) -> Result<Campaign> {
        let kind = RecordKind::Campaign;
        require(kind, &self.id, "id", &self.id)?;
        require(kind, &self.id, "name", &self.name)?;
        Ok(Campaign {
            id: RecordId::new(self.id.clone()),
            name: self.name.clone(),
            description: self.description.clone(),
            data: decode_data(kind, &self.id, &self.data)?,
            created_at: self.created_at.to_iso(),
            updated_at: self.updated_at.to_iso(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::{TimeZone, Utc};
    use lorekeeper_core::Value;

    #[test]
    fn test_create_and_convert() {
        let mut input = NewCampaign::new("Lost Mines", "Goblins");
        input.data.insert("session".into(), Value::Int(1));
        let now = StoredTimestamp::now();
        let stored = StoredCampaign::create(RecordId::new("c1"), input, now.clone()).unwrap();
        let campaign = stored.to_campaign().unwrap();

        assert_eq!(campaign.id.as_str(), "c1");
        assert_eq!(campaign.name, "Lost Mines");
        assert_eq!(campaign.data["session"], Value::Int(1));
        assert_eq!(campaign.created_at, now.to_iso());
        assert_eq!(campaign.created_at, campaign.updated_at);
    }

    #[test]
    fn test_native_timestamps_are_normalized() {
        let at = Utc.with_ymd_and_hms(2023, 6, 1, 8, 0, 0).unwrap();
        let stored = StoredCampaign {
            id: "c1".into(),
            name: "Old".into(),
            description: "Imported".into(),
            data: Vec::new(),
            created_at: StoredTimestamp::Native(at),
            updated_at: StoredTimestamp::Iso("2023-06-02T08:00:00.000000Z".into()),
        };
        let campaign = stored.to_campaign().unwrap();
        assert_eq!(campaign.created_at, "2023-06-01T08:00:00.000000Z");
        assert!(campaign.data.is_empty());
    }

    #[test]
    fn test_missing_name_is_integrity_error() {
        let stored = StoredCampaign {
            id: "c1".into(),
            name: String::new(),
            description: String::new(),
            data: Vec::new(),
            created_at: StoredTimestamp::now(),
            updated_at: StoredTimestamp::now(),
        };
        assert!(matches!(
            stored.to_campaign(),
            Err(Error::DataIntegrity { .. })
        ));
    }
}
