//! Setting documents.

use super::{require, StoredTimestamp};
use crate::error::Result;
use lorekeeper_core::{NewSetting, RecordId, RecordKind, Setting, SettingDetails};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored setting.
///
/// `parent_id` lives inside `details` and is deliberately not indexed;
/// children are found by scanning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 3, version = 1)]
#[native_db]
pub struct StoredSetting {
    /// Primary key - record ID.
    #[primary_key]
    pub id: String,
    #[secondary_key]
    pub setting_type: String,
    /// Setting name, unique.
    #[secondary_key(unique)]
    pub name: String,
    #[secondary_key]
    pub region: String,
    pub scale: String,
    pub population: String,
    /// Optional descriptive fields.
    pub details: SettingDetails,
    pub created_at: StoredTimestamp,
    pub updated_at: StoredTimestamp,
}

impl StoredSetting {
    /// Build a new document from creation input.
    pub fn create(id: RecordId, input: NewSetting, now: StoredTimestamp) -> Self {
        Self {
            id: id.into_string(),
            setting_type: input.setting_type,
            name: input.name,
            region: input.region,
            scale: input.scale,
            population: input.population,
            details: input.details,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub(crate) fn parent_id(&self) -> Option<&str> {
        self.details.parent_id.as_ref().map(RecordId::as_str)
    }

    /// Convert to a Setting.
    pub fn to_setting(&self) -> Result<Setting> {
        let kind = RecordKind::Setting;
        require(kind, &self.id, "id", &self.id)?;
        require(kind, &self.id, "name", &self.name)?;
        require(kind, &self.id, "setting_type", &self.setting_type)?;
        Ok(Setting {
            id: RecordId::new(self.id.clone()),
            setting_type: self.setting_type.clone(),
            name: self.name.clone(),
            region: self.region.clone(),
            scale: self.scale.clone(),
            population: self.population.clone(),
            details: self.details.clone(),
            created_at: self.created_at.to_iso(),
            updated_at: self.updated_at.to_iso(),
        })
    }
}
