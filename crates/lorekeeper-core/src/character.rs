//! Character records and their structured sub-objects

use crate::error::{Error, Result};
use crate::fields::{
    self, expect_i32, expect_map, expect_string, expect_string_list,
};
use crate::validate;
use crate::{RecordId, Value, ValueMap};
use serde::{Deserialize, Serialize};

/// Key of the campaign-progress entry inside a character's data bag
pub const CAMPAIGN_PROGRESS_KEY: &str = "campaign_progress";

/// Key under which early documents kept ability scores inside the data bag
pub const LEGACY_ABILITY_SCORES_KEY: &str = "ability_scores";

/// Six named integer stats
///
/// Used both for base ability scores and for the modifier overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    /// Baseline for an unset ability score
    pub const BASE_SCORE: i32 = 10;

    /// All six stats set to the same value
    pub fn uniform(value: i32) -> Self {
        Self {
            strength: value,
            dexterity: value,
            constitution: value,
            intelligence: value,
            wisdom: value,
            charisma: value,
        }
    }

    /// Build scores from a loosely-typed map, filling gaps with `fill`
    ///
    /// Returns `None` if any present stat is not an integer.
    pub fn from_value_map(map: &ValueMap, fill: i32) -> Option<Self> {
        let mut scores = Self::uniform(fill);
        for (key, value) in map {
            let v = i32::try_from(value.as_int()?).ok()?;
            let slot = match key.as_str() {
                "strength" => &mut scores.strength,
                "dexterity" => &mut scores.dexterity,
                "constitution" => &mut scores.constitution,
                "intelligence" => &mut scores.intelligence,
                "wisdom" => &mut scores.wisdom,
                "charisma" => &mut scores.charisma,
                _ => continue,
            };
            *slot = v;
        }
        Some(scores)
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::uniform(Self::BASE_SCORE)
    }
}

/// Sparse change to a set of ability scores; `None` stats are left alone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScoresPatch {
    #[serde(default)]
    pub strength: Option<i32>,
    #[serde(default)]
    pub dexterity: Option<i32>,
    #[serde(default)]
    pub constitution: Option<i32>,
    #[serde(default)]
    pub intelligence: Option<i32>,
    #[serde(default)]
    pub wisdom: Option<i32>,
    #[serde(default)]
    pub charisma: Option<i32>,
}

impl AbilityScoresPatch {
    /// Parse from an open map such as `{"intelligence": 18}`
    pub fn from_map(field: &str, map: &ValueMap) -> Result<Self> {
        let mut patch = Self::default();
        for (key, value) in map {
            let path = format!("{}.{}", field, key);
            let score = Some(expect_i32(&path, value)?);
            match key.as_str() {
                "strength" => patch.strength = score,
                "dexterity" => patch.dexterity = score,
                "constitution" => patch.constitution = score,
                "intelligence" => patch.intelligence = score,
                "wisdom" => patch.wisdom = score,
                "charisma" => patch.charisma = score,
                _ => return Err(Error::UnknownField(path)),
            }
        }
        Ok(patch)
    }

    /// Apply onto `base`, stat by stat
    pub fn apply(&self, base: AbilityScores) -> AbilityScores {
        AbilityScores {
            strength: self.strength.unwrap_or(base.strength),
            dexterity: self.dexterity.unwrap_or(base.dexterity),
            constitution: self.constitution.unwrap_or(base.constitution),
            intelligence: self.intelligence.unwrap_or(base.intelligence),
            wisdom: self.wisdom.unwrap_or(base.wisdom),
            charisma: self.charisma.unwrap_or(base.charisma),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Proficiencies, grouped by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proficiencies {
    #[serde(default)]
    pub armor: Vec<String>,
    #[serde(default)]
    pub weapons: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub saving_throws: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

impl Proficiencies {
    pub fn from_map(field: &str, map: &ValueMap) -> Result<Self> {
        let mut out = Self::default();
        for (key, value) in map {
            let path = format!("{}.{}", field, key);
            let list = expect_string_list(&path, value)?;
            match key.as_str() {
                "armor" => out.armor = list,
                "weapons" => out.weapons = list,
                "tools" => out.tools = list,
                "saving_throws" => out.saving_throws = list,
                "skills" => out.skills = list,
                "languages" => out.languages = list,
                _ => return Err(Error::UnknownField(path)),
            }
        }
        Ok(out)
    }
}

/// Narrative personality notes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    #[serde(default)]
    pub traits: String,
    #[serde(default)]
    pub ideals: String,
    #[serde(default)]
    pub bonds: String,
    #[serde(default)]
    pub flaws: String,
}

impl Personality {
    pub fn from_map(field: &str, map: &ValueMap) -> Result<Self> {
        let mut out = Self::default();
        for (key, value) in map {
            let path = format!("{}.{}", field, key);
            let text = expect_string(&path, value)?;
            match key.as_str() {
                "traits" => out.traits = text,
                "ideals" => out.ideals = text,
                "bonds" => out.bonds = text,
                "flaws" => out.flaws = text,
                _ => return Err(Error::UnknownField(path)),
            }
        }
        Ok(out)
    }
}

/// Known spells, one list per tier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spells {
    #[serde(default)]
    pub cantrips: Vec<String>,
    #[serde(default)]
    pub level_1: Vec<String>,
    #[serde(default)]
    pub level_2: Vec<String>,
    #[serde(default)]
    pub level_3: Vec<String>,
    #[serde(default)]
    pub level_4: Vec<String>,
    #[serde(default)]
    pub level_5: Vec<String>,
    #[serde(default)]
    pub level_6: Vec<String>,
    #[serde(default)]
    pub level_7: Vec<String>,
    #[serde(default)]
    pub level_8: Vec<String>,
}

impl Spells {
    pub fn from_map(field: &str, map: &ValueMap) -> Result<Self> {
        let mut out = Self::default();
        for (key, value) in map {
            let path = format!("{}.{}", field, key);
            let list = expect_string_list(&path, value)?;
            let slot = match key.as_str() {
                "cantrips" => &mut out.cantrips,
                "level_1" => &mut out.level_1,
                "level_2" => &mut out.level_2,
                "level_3" => &mut out.level_3,
                "level_4" => &mut out.level_4,
                "level_5" => &mut out.level_5,
                "level_6" => &mut out.level_6,
                "level_7" => &mut out.level_7,
                "level_8" => &mut out.level_8,
                _ => return Err(Error::UnknownField(path)),
            };
            *slot = list;
        }
        Ok(out)
    }
}

/// A character's familiar or companion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Familiar {
    #[serde(rename = "type", default)]
    pub familiar_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub abilities: Vec<String>,
}

impl Familiar {
    pub fn from_map(field: &str, map: &ValueMap) -> Result<Self> {
        let mut out = Self::default();
        for (key, value) in map {
            let path = format!("{}.{}", field, key);
            match key.as_str() {
                "type" | "familiar_type" => out.familiar_type = expect_string(&path, value)?,
                "name" => out.name = expect_string(&path, value)?,
                "abilities" => out.abilities = expect_string_list(&path, value)?,
                _ => return Err(Error::UnknownField(path)),
            }
        }
        Ok(out)
    }
}

/// Where a character is in the campaign and what they have found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignProgress {
    pub current_location: Option<String>,
    #[serde(default)]
    pub key_discoveries: Vec<String>,
}

impl CampaignProgress {
    /// Read the progress entry out of a data bag
    pub fn from_data(data: &ValueMap) -> Option<Self> {
        let map = data.get(CAMPAIGN_PROGRESS_KEY)?.as_map()?;
        Some(Self {
            current_location: map
                .get("current_location")
                .and_then(Value::as_str)
                .map(str::to_string),
            key_discoveries: map
                .get("key_discoveries")
                .and_then(Value::as_string_list)
                .unwrap_or_default(),
        })
    }
}

/// Sparse change to campaign progress, merged key by key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignProgressPatch {
    #[serde(default)]
    pub current_location: Option<String>,
    #[serde(default)]
    pub key_discoveries: Option<Vec<String>>,
}

impl CampaignProgressPatch {
    pub fn from_map(field: &str, map: &ValueMap) -> Result<Self> {
        let mut patch = Self::default();
        for (key, value) in map {
            let path = format!("{}.{}", field, key);
            match key.as_str() {
                "current_location" => patch.current_location = Some(expect_string(&path, value)?),
                "key_discoveries" => {
                    patch.key_discoveries = Some(expect_string_list(&path, value)?)
                }
                _ => return Err(Error::UnknownField(path)),
            }
        }
        Ok(patch)
    }

    /// Only the provided keys, ready to merge into the stored progress map
    pub fn to_value_map(&self) -> ValueMap {
        let mut map = ValueMap::new();
        if let Some(location) = &self.current_location {
            map.insert("current_location".into(), location.as_str().into());
        }
        if let Some(discoveries) = &self.key_discoveries {
            map.insert("key_discoveries".into(), discoveries.clone().into());
        }
        map
    }

    pub fn is_empty(&self) -> bool {
        self.current_location.is_none() && self.key_discoveries.is_none()
    }
}

/// A player or non-player character belonging to a campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: RecordId,
    /// Owning campaign; checked at creation only
    pub campaign_id: RecordId,
    /// Unique across all characters
    pub name: String,
    pub player_name: Option<String>,
    pub race: Option<String>,
    /// Stored as `class`
    #[serde(alias = "class")]
    pub character_class: Option<String>,
    pub subclass: Option<String>,
    pub background: Option<String>,
    pub level: u32,
    pub ability_scores: Option<AbilityScores>,
    pub modifiers: Option<AbilityScores>,
    pub proficiencies: Option<Proficiencies>,
    pub personality: Option<Personality>,
    pub backstory: Option<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    pub spells: Option<Spells>,
    pub familiar: Option<Familiar>,
    #[serde(default)]
    pub motivations: Vec<String>,
    /// Free-form auxiliary data; holds campaign progress
    #[serde(default)]
    pub data: ValueMap,
    pub created_at: String,
    pub updated_at: String,
}

impl Character {
    pub fn campaign_progress(&self) -> Option<CampaignProgress> {
        CampaignProgress::from_data(&self.data)
    }
}

/// Input for creating a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCharacter {
    pub campaign_id: RecordId,
    pub name: String,
    pub player_name: Option<String>,
    pub race: Option<String>,
    #[serde(alias = "class")]
    pub character_class: Option<String>,
    pub subclass: Option<String>,
    pub background: Option<String>,
    #[serde(default = "default_level")]
    pub level: u32,
    pub ability_scores: Option<AbilityScores>,
    pub modifiers: Option<AbilityScores>,
    pub proficiencies: Option<Proficiencies>,
    pub personality: Option<Personality>,
    pub backstory: Option<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    pub spells: Option<Spells>,
    pub familiar: Option<Familiar>,
    #[serde(default)]
    pub motivations: Vec<String>,
    #[serde(default)]
    pub data: ValueMap,
}

fn default_level() -> u32 {
    1
}

impl NewCharacter {
    pub fn new(campaign_id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            name: name.into(),
            player_name: None,
            race: None,
            character_class: None,
            subclass: None,
            background: None,
            level: default_level(),
            ability_scores: None,
            modifiers: None,
            proficiencies: None,
            personality: None,
            backstory: None,
            equipment: Vec::new(),
            spells: None,
            familiar: None,
            motivations: Vec::new(),
            data: ValueMap::new(),
        }
    }

    pub fn player_name(mut self, player_name: impl Into<String>) -> Self {
        self.player_name = Some(player_name.into());
        self
    }

    pub fn race(mut self, race: impl Into<String>) -> Self {
        self.race = Some(race.into());
        self
    }

    pub fn character_class(mut self, class: impl Into<String>) -> Self {
        self.character_class = Some(class.into());
        self
    }

    pub fn level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn ability_scores(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = Some(scores);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate::name("name", &self.name)?;
        validate::non_empty("campaign_id", self.campaign_id.as_str())?;
        if let Some(player_name) = &self.player_name {
            validate::max_len("player_name", player_name, validate::MAX_NAME_LEN)?;
        }
        validate_level(self.level)
    }
}

fn validate_level(level: u32) -> Result<()> {
    if level == 0 {
        return Err(Error::InvalidValue {
            field: "level".into(),
            reason: "must be at least 1".into(),
        });
    }
    Ok(())
}

/// Partial update of a character; only `Some` fields change
///
/// Optional attributes use `Option<Option<T>>`: `Some(None)` clears the
/// field. Ability scores, modifiers, campaign progress and `data` are merged
/// into the existing values. Every other provided field replaces the old
/// value wholesale, including the structured ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterUpdate {
    #[serde(default)]
    pub campaign_id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub player_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub race: Option<Option<String>>,
    #[serde(default, alias = "class", deserialize_with = "fields::clearable")]
    pub character_class: Option<Option<String>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub subclass: Option<Option<String>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub background: Option<Option<String>>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub ability_scores: Option<Option<AbilityScoresPatch>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub modifiers: Option<Option<AbilityScoresPatch>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub proficiencies: Option<Option<Proficiencies>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub personality: Option<Option<Personality>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub backstory: Option<Option<String>>,
    #[serde(default)]
    pub equipment: Option<Vec<String>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub spells: Option<Option<Spells>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub familiar: Option<Option<Familiar>>,
    #[serde(default)]
    pub motivations: Option<Vec<String>>,
    #[serde(default)]
    pub campaign_progress: Option<CampaignProgressPatch>,
    #[serde(default)]
    pub data: Option<ValueMap>,
}

impl CharacterUpdate {
    /// Parse an open field map, routing aliased names to their slot
    ///
    /// `null` clears an optional attribute and empties a list. It is
    /// rejected for the name, campaign, level, progress and data slots.
    /// Unknown field names and values of the wrong type are rejected.
    pub fn from_fields(fields: &ValueMap) -> Result<Self> {
        let mut update = Self::default();
        for (key, value) in fields {
            let text = |v: &Value| fields::nullable(v, |v| expect_string(key, v));
            let list = |v: &Value| {
                fields::nullable(v, |v| expect_string_list(key, v)).map(Option::unwrap_or_default)
            };
            match fields::storage_name(key) {
                "campaign_id" => {
                    update.campaign_id =
                        Some(expect_string(key, fields::required(key, value)?)?.into())
                }
                "name" => update.name = Some(expect_string(key, fields::required(key, value)?)?),
                "player_name" => update.player_name = Some(text(value)?),
                "race" => update.race = Some(text(value)?),
                "class" => update.character_class = Some(text(value)?),
                "subclass" => update.subclass = Some(text(value)?),
                "background" => update.background = Some(text(value)?),
                "level" => {
                    let level = expect_i32(key, fields::required(key, value)?)?;
                    let level = u32::try_from(level).map_err(|_| Error::InvalidValue {
                        field: key.clone(),
                        reason: "must be at least 1".into(),
                    })?;
                    update.level = Some(level);
                }
                "ability_scores" => {
                    update.ability_scores = Some(fields::nullable(value, |v| {
                        AbilityScoresPatch::from_map(key, expect_map(key, v)?)
                    })?)
                }
                "modifiers" => {
                    update.modifiers = Some(fields::nullable(value, |v| {
                        AbilityScoresPatch::from_map(key, expect_map(key, v)?)
                    })?)
                }
                "proficiencies" => {
                    update.proficiencies = Some(fields::nullable(value, |v| {
                        Proficiencies::from_map(key, expect_map(key, v)?)
                    })?)
                }
                "personality" => {
                    update.personality = Some(fields::nullable(value, |v| {
                        Personality::from_map(key, expect_map(key, v)?)
                    })?)
                }
                "backstory" => update.backstory = Some(text(value)?),
                "equipment" => update.equipment = Some(list(value)?),
                "spells" => {
                    update.spells = Some(fields::nullable(value, |v| {
                        Spells::from_map(key, expect_map(key, v)?)
                    })?)
                }
                "familiar" => {
                    update.familiar = Some(fields::nullable(value, |v| {
                        Familiar::from_map(key, expect_map(key, v)?)
                    })?)
                }
                "motivations" => update.motivations = Some(list(value)?),
                "campaign_progress" => {
                    let map = expect_map(key, fields::required(key, value)?)?;
                    update.campaign_progress = Some(CampaignProgressPatch::from_map(key, map)?)
                }
                "data" => {
                    update.data = Some(expect_map(key, fields::required(key, value)?)?.clone())
                }
                _ => return Err(Error::UnknownField(key.clone())),
            }
        }
        Ok(update)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate::name("name", name)?;
        }
        if let Some(campaign_id) = &self.campaign_id {
            validate::non_empty("campaign_id", campaign_id.as_str())?;
        }
        if let Some(level) = self.level {
            validate_level(level)?;
        }
        Ok(())
    }
}
