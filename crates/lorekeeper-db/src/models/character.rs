//! Character documents.

use super::{decode_data, encode_data, integrity, require, StoredTimestamp};
use crate::error::Result;
use lorekeeper_core::{
    AbilityScores, Character, Familiar, NewCharacter, Personality, Proficiencies, RecordId,
    RecordKind, Spells, Value, ValueMap, LEGACY_ABILITY_SCORES_KEY,
};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored character.
///
/// The character class is kept under `class`; records expose it as
/// `character_class`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredCharacter {
    /// Primary key - record ID.
    #[primary_key]
    pub id: String,
    /// Owning campaign ID.
    #[secondary_key]
    pub campaign_id: String,
    /// Character name, unique.
    #[secondary_key(unique)]
    pub name: String,
    pub player_name: Option<String>,
    #[secondary_key(optional)]
    pub race: Option<String>,
    #[secondary_key(optional)]
    pub class: Option<String>,
    pub subclass: Option<String>,
    pub background: Option<String>,
    pub level: u32,
    pub ability_scores: Option<AbilityScores>,
    pub modifiers: Option<AbilityScores>,
    pub proficiencies: Option<Proficiencies>,
    pub personality: Option<Personality>,
    pub backstory: Option<String>,
    pub equipment: Vec<String>,
    pub spells: Option<Spells>,
    pub familiar: Option<Familiar>,
    pub motivations: Vec<String>,
    /// Serialized auxiliary data bag (campaign progress lives here).
    pub data: Vec<u8>,
    pub created_at: StoredTimestamp,
    pub updated_at: StoredTimestamp,
}

impl StoredCharacter {
    /// Build a new document from creation input.
    pub fn create(id: RecordId, input: NewCharacter, now: StoredTimestamp) -> Result<Self> {
        Ok(Self {
            id: id.into_string(),
            campaign_id: input.campaign_id.into_string(),
            name: input.name,
            player_name: input.player_name,
            race: input.race,
            class: input.character_class,
            subclass: input.subclass,
            background: input.background,
            level: input.level,
            ability_scores: input.ability_scores,
            modifiers: input.modifiers,
            proficiencies: input.proficiencies,
            personality: input.personality,
            backstory: input.backstory,
            equipment: input.equipment,
            spells: input.spells,
            familiar: input.familiar,
            motivations: input.motivations,
            data: encode_data(&input.data)?,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Decode the data bag.
    pub(crate) fn data_map(&self) -> Result<ValueMap> {
        decode_data(RecordKind::Character, &self.id, &self.data)
    }

    /// Convert to a Character.
    ///
    /// Ability scores left in the data bag by early documents are promoted
    /// to the typed field when the typed field is empty.
    pub fn to_character(&self) -> Result<Character> {
        let kind = RecordKind::Character;
        require(kind, &self.id, "id", &self.id)?;
        require(kind, &self.id, "name", &self.name)?;
        require(kind, &self.id, "campaign_id", &self.campaign_id)?;
        if self.level == 0 {
            return Err(integrity(kind, &self.id, "level must be at least 1"));
        }

        let mut data = self.data_map()?;
        let legacy_scores = take_legacy_scores(&self.id, &mut data)?;

        Ok(Character {
            id: RecordId::new(self.id.clone()),
            campaign_id: RecordId::new(self.campaign_id.clone()),
            name: self.name.clone(),
            player_name: self.player_name.clone(),
            race: self.race.clone(),
            character_class: self.class.clone(),
            subclass: self.subclass.clone(),
            background: self.background.clone(),
            level: self.level,
            ability_scores: self.ability_scores.or(legacy_scores),
            modifiers: self.modifiers,
            proficiencies: self.proficiencies.clone(),
            personality: self.personality.clone(),
            backstory: self.backstory.clone(),
            equipment: self.equipment.clone(),
            spells: self.spells.clone(),
            familiar: self.familiar.clone(),
            motivations: self.motivations.clone(),
            data,
            created_at: self.created_at.to_iso(),
            updated_at: self.updated_at.to_iso(),
        })
    }
}

/// Remove ability scores kept in the data bag by early documents.
pub(crate) fn take_legacy_scores(id: &str, data: &mut ValueMap) -> Result<Option<AbilityScores>> {
    let Some(value) = data.shift_remove(LEGACY_ABILITY_SCORES_KEY) else {
        return Ok(None);
    };
    let scores = match &value {
        Value::Null => None,
        Value::Map(map) => Some(
            AbilityScores::from_value_map(map, AbilityScores::BASE_SCORE).ok_or_else(|| {
                integrity(
                    RecordKind::Character,
                    id,
                    "legacy ability_scores hold a non-integer stat",
                )
            })?,
        ),
        other => {
            return Err(integrity(
                RecordKind::Character,
                id,
                format!("legacy ability_scores is a {}", other.type_name()),
            ))
        }
    };
    Ok(scores)
}
