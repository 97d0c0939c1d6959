//! Character operations.

use crate::error::{Error, Result};
use crate::merge::merge_character;
use crate::models::*;
use crate::search::CharacterQuery;
use crate::store::{checked, convert_all, Store};
use lorekeeper_core::{
    CampaignProgressPatch, Character, CharacterUpdate, NewCharacter, RecordId, RecordKind,
    ValueMap,
};
use tracing::{debug, info};

impl Store {
    /// Create a character in an existing campaign.
    ///
    /// Fails with `NotFound` for the campaign if it does not exist, and with
    /// `DuplicateName` if another character already has the name.
    pub fn create_character(&self, input: NewCharacter) -> Result<Character> {
        input.validate()?;
        let campaign_id = input.campaign_id.as_str();
        if !self.campaign_exists(campaign_id)? {
            return Err(Error::not_found(RecordKind::Campaign, campaign_id));
        }

        let rw = self.db()?.rw_transaction()?;
        let existing: Option<StoredCharacter> = rw
            .get()
            .secondary(StoredCharacterKey::name, input.name.as_str())?;
        if existing.is_some() {
            return Err(Error::duplicate_name(RecordKind::Character, input.name));
        }

        let stored = StoredCharacter::create(RecordId::generate(), input, StoredTimestamp::now())?;
        rw.insert(stored.clone())?;
        rw.commit()?;

        debug!(
            target: "lorekeeper::character",
            id = %stored.id,
            name = %stored.name,
            campaign_id = %stored.campaign_id,
            "created character"
        );
        checked(stored.to_character())
    }

    /// Load a character by ID.
    pub fn get_character(&self, id: &RecordId) -> Result<Option<Character>> {
        let r = self.db()?.r_transaction()?;
        let stored: Option<StoredCharacter> = r.get().primary(id.as_str())?;
        stored.map(|s| checked(s.to_character())).transpose()
    }

    /// Load a character by its exact name.
    pub fn get_character_by_name(&self, name: &str) -> Result<Option<Character>> {
        let r = self.db()?.r_transaction()?;
        let stored: Option<StoredCharacter> =
            r.get().secondary(StoredCharacterKey::name, name)?;
        stored.map(|s| checked(s.to_character())).transpose()
    }

    /// Load all characters.
    pub fn list_characters(&self) -> Result<Vec<Character>> {
        let r = self.db()?.r_transaction()?;
        let scan = r.scan().primary::<StoredCharacter>()?;
        let iter = scan.all()?;
        let characters: std::result::Result<Vec<StoredCharacter>, _> = iter.collect();
        let characters = characters.map_err(|e| Error::Database(e.to_string()))?;
        convert_all(characters, StoredCharacter::to_character)
    }

    /// Characters belonging to a campaign.
    pub fn list_campaign_characters(&self, campaign_id: &RecordId) -> Result<Vec<Character>> {
        self.search_characters(CharacterQuery::default().campaign(campaign_id.clone()))
    }

    /// Characters matching a text query and optional exact filters.
    ///
    /// Text matches name or player name, ignoring case; campaign, class and
    /// race must match exactly.
    pub fn search_characters(&self, query: impl Into<CharacterQuery>) -> Result<Vec<Character>> {
        let query = query.into();
        let filter = query.filter()?;
        let candidates = self.character_candidates(&query)?;
        let matching = candidates.into_iter().filter(|c| filter.accepts(c));
        convert_all(matching, StoredCharacter::to_character)
    }

    /// Apply a typed partial update.
    pub fn update_character(&self, id: &RecordId, update: CharacterUpdate) -> Result<Character> {
        update.validate()?;
        if let Some(campaign_id) = &update.campaign_id {
            if !self.campaign_exists(campaign_id.as_str())? {
                return Err(Error::not_found(RecordKind::Campaign, campaign_id.as_str()));
            }
        }

        let rw = self.db()?.rw_transaction()?;
        let stored: StoredCharacter = rw
            .get()
            .primary(id.as_str())?
            .ok_or_else(|| Error::not_found(RecordKind::Character, id.as_str()))?;

        if let Some(name) = update.name.as_deref().filter(|n| *n != stored.name) {
            let clash: Option<StoredCharacter> =
                rw.get().secondary(StoredCharacterKey::name, name)?;
            if clash.is_some() {
                return Err(Error::duplicate_name(RecordKind::Character, name));
            }
        }

        let merged = merge_character(&stored, update, StoredTimestamp::now())?;
        rw.update(stored, merged.clone())?;
        rw.commit()?;

        debug!(target: "lorekeeper::character", id = %merged.id, "updated character");
        checked(merged.to_character())
    }

    /// Apply an update given as an open field map.
    ///
    /// `class` and `character_class` both address the class. Unknown names
    /// and mistyped values are rejected before anything is written.
    pub fn update_character_fields(&self, id: &RecordId, fields: &ValueMap) -> Result<Character> {
        let update = CharacterUpdate::from_fields(fields)?;
        self.update_character(id, update)
    }

    /// Record where a character is and what they have discovered.
    ///
    /// Only the provided parts of the progress entry change.
    pub fn update_character_progress(
        &self,
        id: &RecordId,
        current_location: Option<String>,
        key_discoveries: Option<Vec<String>>,
    ) -> Result<Character> {
        let update = CharacterUpdate {
            campaign_progress: Some(CampaignProgressPatch {
                current_location,
                key_discoveries,
            }),
            ..Default::default()
        };
        self.update_character(id, update)
    }

    /// Delete a character. Returns `false` if it did not exist.
    pub fn delete_character(&self, id: &RecordId) -> Result<bool> {
        let rw = self.db()?.rw_transaction()?;
        let stored: Option<StoredCharacter> = rw.get().primary(id.as_str())?;
        let Some(stored) = stored else {
            return Ok(false);
        };
        rw.remove(stored)?;
        rw.commit()?;

        debug!(target: "lorekeeper::character", id = %id, "deleted character");
        Ok(true)
    }

    /// Delete every character and return how many were removed.
    pub fn delete_all_characters(&self) -> Result<usize> {
        let rw = self.db()?.rw_transaction()?;
        let all: Vec<StoredCharacter> = {
            let scan = rw.scan().primary::<StoredCharacter>()?;
            let iter = scan.all()?;
            iter.collect::<std::result::Result<_, _>>()?
        };
        let removed = all.len();
        for character in all {
            rw.remove(character)?;
        }
        rw.commit()?;

        info!(target: "lorekeeper::character", removed, "deleted all characters");
        Ok(removed)
    }

    /// Narrow the scan to the campaign index when the query names one.
    ///
    /// Class and race are optional keys, so those filters run over a full
    /// scan and are checked by the query filter.
    fn character_candidates(&self, query: &CharacterQuery) -> Result<Vec<StoredCharacter>> {
        let r = self.db()?.r_transaction()?;
        let candidates: std::result::Result<Vec<StoredCharacter>, _> =
            if let Some(campaign_id) = &query.campaign_id {
                let scan = r
                    .scan()
                    .secondary::<StoredCharacter>(StoredCharacterKey::campaign_id)?;
                let iter = scan.start_with(campaign_id.as_str())?;
                iter.collect()
            } else {
                let scan = r.scan().primary::<StoredCharacter>()?;
                let iter = scan.all()?;
                iter.collect()
            };
        candidates.map_err(|e| Error::Database(e.to_string()))
    }
}
