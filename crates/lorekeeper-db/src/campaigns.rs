//! Campaign operations.

use crate::error::{Error, Result};
use crate::merge::merge_campaign;
use crate::models::*;
use crate::search::TextMatcher;
use crate::store::{checked, convert_all, Store};
use lorekeeper_core::{Campaign, CampaignUpdate, NewCampaign, RecordId, RecordKind};
use tracing::{debug, info};

impl Store {
    /// Create a campaign.
    ///
    /// Fails with `DuplicateName` if another campaign already has the name.
    pub fn create_campaign(&self, input: NewCampaign) -> Result<Campaign> {
        input.validate()?;
        let rw = self.db()?.rw_transaction()?;
        let existing: Option<StoredCampaign> = rw
            .get()
            .secondary(StoredCampaignKey::name, input.name.as_str())?;
        if existing.is_some() {
            return Err(Error::duplicate_name(RecordKind::Campaign, input.name));
        }

        let stored = StoredCampaign::create(RecordId::generate(), input, StoredTimestamp::now())?;
        rw.insert(stored.clone())?;
        rw.commit()?;

        debug!(target: "lorekeeper::campaign", id = %stored.id, name = %stored.name, "created campaign");
        checked(stored.to_campaign())
    }

    /// Load a campaign by ID.
    pub fn get_campaign(&self, id: &RecordId) -> Result<Option<Campaign>> {
        let r = self.db()?.r_transaction()?;
        let stored: Option<StoredCampaign> = r.get().primary(id.as_str())?;
        stored.map(|s| checked(s.to_campaign())).transpose()
    }

    /// Load a campaign by its exact name.
    pub fn get_campaign_by_name(&self, name: &str) -> Result<Option<Campaign>> {
        let r = self.db()?.r_transaction()?;
        let stored: Option<StoredCampaign> =
            r.get().secondary(StoredCampaignKey::name, name)?;
        stored.map(|s| checked(s.to_campaign())).transpose()
    }

    /// Load all campaigns.
    pub fn list_campaigns(&self) -> Result<Vec<Campaign>> {
        convert_all(self.all_campaigns()?, StoredCampaign::to_campaign)
    }

    /// Campaigns whose name or description contains `query`, ignoring case.
    pub fn search_campaigns(&self, query: &str) -> Result<Vec<Campaign>> {
        let matcher = TextMatcher::new(query)?;
        let matching = self.all_campaigns()?.into_iter().filter(|c| {
            matcher.matches_any([Some(c.name.as_str()), Some(c.description.as_str())])
        });
        convert_all(matching, StoredCampaign::to_campaign)
    }

    /// Apply a partial update and return the updated campaign.
    pub fn update_campaign(&self, id: &RecordId, update: CampaignUpdate) -> Result<Campaign> {
        update.validate()?;
        let rw = self.db()?.rw_transaction()?;
        let stored: StoredCampaign = rw
            .get()
            .primary(id.as_str())?
            .ok_or_else(|| Error::not_found(RecordKind::Campaign, id.as_str()))?;

        if let Some(name) = update.name.as_deref().filter(|n| *n != stored.name) {
            let clash: Option<StoredCampaign> =
                rw.get().secondary(StoredCampaignKey::name, name)?;
            if clash.is_some() {
                return Err(Error::duplicate_name(RecordKind::Campaign, name));
            }
        }

        let merged = merge_campaign(&stored, update, StoredTimestamp::now());
        rw.update(stored, merged.clone())?;
        rw.commit()?;

        debug!(target: "lorekeeper::campaign", id = %merged.id, "updated campaign");
        checked(merged.to_campaign())
    }

    /// Delete a campaign. Returns `false` if it did not exist.
    ///
    /// Characters of the campaign are left in place.
    pub fn delete_campaign(&self, id: &RecordId) -> Result<bool> {
        let rw = self.db()?.rw_transaction()?;
        let stored: Option<StoredCampaign> = rw.get().primary(id.as_str())?;
        let Some(stored) = stored else {
            return Ok(false);
        };
        rw.remove(stored)?;
        rw.commit()?;

        debug!(target: "lorekeeper::campaign", id = %id, "deleted campaign");
        Ok(true)
    }

    /// Delete every campaign and return how many were removed.
    pub fn delete_all_campaigns(&self) -> Result<usize> {
        let rw = self.db()?.rw_transaction()?;
        let all: Vec<StoredCampaign> = {
            let scan = rw.scan().primary::<StoredCampaign>()?;
            let iter = scan.all()?;
            iter.collect::<std::result::Result<_, _>>()?
        };
        let removed = all.len();
        for campaign in all {
            rw.remove(campaign)?;
        }
        rw.commit()?;

        info!(target: "lorekeeper::campaign", removed, "deleted all campaigns");
        Ok(removed)
    }

    pub(crate) fn campaign_exists(&self, id: &str) -> Result<bool> {
        let r = self.db()?.r_transaction()?;
        let stored: Option<StoredCampaign> = r.get().primary(id)?;
        Ok(stored.is_some())
    }

    fn all_campaigns(&self) -> Result<Vec<StoredCampaign>> {
        let r = self.db()?.r_transaction()?;
        let scan = r.scan().primary::<StoredCampaign>()?;
        let iter = scan.all()?;
        let campaigns: std::result::Result<Vec<StoredCampaign>, _> = iter.collect();
        campaigns.map_err(|e| Error::Database(e.to_string()))
    }
}
