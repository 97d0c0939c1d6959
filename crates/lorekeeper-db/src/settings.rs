//! Setting operations, including the parent/child hierarchy.

use crate::error::{Error, Result};
use crate::merge::merge_setting;
use crate::models::*;
use crate::search::SettingQuery;
use crate::store::{checked, convert_all, Store};
use lorekeeper_core::{NewSetting, RecordId, RecordKind, Setting, SettingUpdate, ValueMap};
use tracing::{debug, info, warn};

/// An updated record plus a non-fatal notice for the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome<T> {
    pub record: T,
    /// Set when part of the input was dropped
    pub warning: Option<String>,
}

impl Store {
    /// Create a setting.
    ///
    /// `parent_id` is stored as given; it is not checked against existing
    /// settings.
    pub fn create_setting(&self, input: NewSetting) -> Result<Setting> {
        input.validate()?;
        let rw = self.db()?.rw_transaction()?;
        let existing: Option<StoredSetting> = rw
            .get()
            .secondary(StoredSettingKey::name, input.name.as_str())?;
        if existing.is_some() {
            return Err(Error::duplicate_name(RecordKind::Setting, input.name));
        }

        let stored = StoredSetting::create(RecordId::generate(), input, StoredTimestamp::now());
        rw.insert(stored.clone())?;
        rw.commit()?;

        debug!(
            target: "lorekeeper::setting",
            id = %stored.id,
            name = %stored.name,
            setting_type = %stored.setting_type,
            "created setting"
        );
        checked(stored.to_setting())
    }

    /// Load a setting by ID.
    pub fn get_setting(&self, id: &RecordId) -> Result<Option<Setting>> {
        let r = self.db()?.r_transaction()?;
        let stored: Option<StoredSetting> = r.get().primary(id.as_str())?;
        stored.map(|s| checked(s.to_setting())).transpose()
    }

    /// Load a setting by its exact name.
    pub fn get_setting_by_name(&self, name: &str) -> Result<Option<Setting>> {
        let r = self.db()?.r_transaction()?;
        let stored: Option<StoredSetting> = r.get().secondary(StoredSettingKey::name, name)?;
        stored.map(|s| checked(s.to_setting())).transpose()
    }

    /// Load all settings.
    pub fn list_settings(&self) -> Result<Vec<Setting>> {
        convert_all(self.all_settings()?, StoredSetting::to_setting)
    }

    /// Settings matching a text query and optional exact filters.
    ///
    /// Text matches name, region or description, ignoring case.
    pub fn search_settings(&self, query: impl Into<SettingQuery>) -> Result<Vec<Setting>> {
        let query = query.into();
        let filter = query.filter()?;
        let candidates = match &query.setting_type {
            Some(setting_type) => self.settings_of_type(setting_type)?,
            None => self.all_settings()?,
        };
        let matching = candidates.into_iter().filter(|s| filter.accepts(s));
        convert_all(matching, StoredSetting::to_setting)
    }

    /// Settings of exactly `setting_type`.
    pub fn filter_settings_by_type(&self, setting_type: &str) -> Result<Vec<Setting>> {
        self.search_settings(SettingQuery::default().setting_type(setting_type))
    }

    /// Settings whose `parent_id` is exactly `parent_id`.
    ///
    /// `parent_id` is not indexed, so this scans every setting.
    pub fn filter_settings_by_parent(&self, parent_id: &RecordId) -> Result<Vec<Setting>> {
        self.search_settings(SettingQuery::default().parent(parent_id.clone()))
    }

    /// Direct children of a setting.
    pub fn setting_children(&self, id: &RecordId) -> Result<Vec<Setting>> {
        self.filter_settings_by_parent(id)
    }

    /// Apply a typed partial update.
    ///
    /// A setting cannot be made its own parent. Clearing `parent_id` makes
    /// it a root again.
    pub fn update_setting(&self, id: &RecordId, update: SettingUpdate) -> Result<Setting> {
        update.validate()?;
        if let Some(Some(parent_id)) = &update.details.parent_id {
            if parent_id == id {
                return Err(lorekeeper_core::Error::InvalidValue {
                    field: "parent_id".into(),
                    reason: "a setting cannot be its own parent".into(),
                }
                .into());
            }
        }

        let rw = self.db()?.rw_transaction()?;
        let stored: StoredSetting = rw
            .get()
            .primary(id.as_str())?
            .ok_or_else(|| Error::not_found(RecordKind::Setting, id.as_str()))?;

        if let Some(name) = update.name.as_deref().filter(|n| *n != stored.name) {
            let clash: Option<StoredSetting> = rw.get().secondary(StoredSettingKey::name, name)?;
            if clash.is_some() {
                return Err(Error::duplicate_name(RecordKind::Setting, name));
            }
        }

        let merged = merge_setting(&stored, update, StoredTimestamp::now());
        rw.update(stored, merged.clone())?;
        rw.commit()?;

        debug!(target: "lorekeeper::setting", id = %merged.id, "updated setting");
        checked(merged.to_setting())
    }

    /// Apply an update given as an open field map.
    ///
    /// Unknown names, and the immutable `id`, `created_at` and `updated_at`,
    /// are dropped and listed in the returned warning; every recognized
    /// field is still applied.
    pub fn update_setting_fields(
        &self,
        id: &RecordId,
        fields: &ValueMap,
    ) -> Result<UpdateOutcome<Setting>> {
        let report = SettingUpdate::from_fields(fields)?;
        let warning = report.warning();
        let record = self.update_setting(id, report.update)?;
        if let Some(warning) = &warning {
            warn!(target: "lorekeeper::setting", id = %id, ignored = ?report.ignored, "{}", warning);
        }
        Ok(UpdateOutcome { record, warning })
    }

    /// Delete a setting. Returns `false` if it did not exist.
    ///
    /// Children keep their `parent_id`.
    pub fn delete_setting(&self, id: &RecordId) -> Result<bool> {
        let rw = self.db()?.rw_transaction()?;
        let stored: Option<StoredSetting> = rw.get().primary(id.as_str())?;
        let Some(stored) = stored else {
            return Ok(false);
        };
        rw.remove(stored)?;
        rw.commit()?;

        debug!(target: "lorekeeper::setting", id = %id, "deleted setting");
        Ok(true)
    }

    /// Delete every setting and return how many were removed.
    pub fn delete_all_settings(&self) -> Result<usize> {
        let rw = self.db()?.rw_transaction()?;
        let all: Vec<StoredSetting> = {
            let scan = rw.scan().primary::<StoredSetting>()?;
            let iter = scan.all()?;
            iter.collect::<std::result::Result<_, _>>()?
        };
        let removed = all.len();
        for setting in all {
            rw.remove(setting)?;
        }
        rw.commit()?;

        info!(target: "lorekeeper::setting", removed, "deleted all settings");
        Ok(removed)
    }

    fn all_settings(&self) -> Result<Vec<StoredSetting>> {
        let r = self.db()?.r_transaction()?;
        let scan = r.scan().primary::<StoredSetting>()?;
        let iter = scan.all()?;
        let settings: std::result::Result<Vec<StoredSetting>, _> = iter.collect();
        settings.map_err(|e| Error::Database(e.to_string()))
    }

    fn settings_of_type(&self, setting_type: &str) -> Result<Vec<StoredSetting>> {
        let r = self.db()?.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredSetting>(StoredSettingKey::setting_type)?;
        let iter = scan.start_with(setting_type)?;
        let settings: std::result::Result<Vec<StoredSetting>, _> = iter.collect();
        settings.map_err(|e| Error::Database(e.to_string()))
    }
}
