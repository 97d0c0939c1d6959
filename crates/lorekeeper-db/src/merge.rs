//! Partial update merging.
//!
//! Each function takes the stored document and a typed update and returns
//! the document to write back. Fields left `None` in the update are kept,
//! `Some(None)` clears an optional field, and `updated_at` is refreshed
//! unconditionally.
//!
//! Ability scores, modifiers, campaign progress and the `data` bag are sparse
//! and merge key by key. Every other structured field is replaced whole.

use crate::error::Result;
use crate::models::{take_legacy_scores, StoredCampaign, StoredCharacter, StoredSetting};
use crate::models::{encode_data, StoredTimestamp};
use lorekeeper_core::{
    merge_maps, AbilityScores, AbilityScoresPatch, CampaignUpdate, CharacterUpdate,
    SettingUpdate, Value, ValueMap, CAMPAIGN_PROGRESS_KEY,
};

/// Baseline for modifiers that were never set
const BASE_MODIFIER: i32 = 0;

pub(crate) fn merge_campaign(
    stored: &StoredCampaign,
    update: CampaignUpdate,
    now: StoredTimestamp,
) -> StoredCampaign {
    let mut merged = stored.clone();
    if let Some(name) = update.name {
        merged.name = name;
    }
    if let Some(description) = update.description {
        merged.description = description;
    }
    merged.updated_at = now;
    merged
}

pub(crate) fn merge_character(
    stored: &StoredCharacter,
    update: CharacterUpdate,
    now: StoredTimestamp,
) -> Result<StoredCharacter> {
    let mut merged = stored.clone();
    let mut data = stored.data_map()?;

    // Early documents kept scores in the data bag; they become the typed
    // field as soon as the character is written again.
    let legacy_scores = take_legacy_scores(&stored.id, &mut data)?;
    merged.ability_scores = stored.ability_scores.or(legacy_scores);

    macro_rules! replace {
        ($($field:ident => $target:ident),+ $(,)?) => {
            $(
                if let Some(value) = update.$field {
                    merged.$target = value.into();
                }
            )+
        };
    }

    if let Some(campaign_id) = update.campaign_id {
        merged.campaign_id = campaign_id.into_string();
    }
    replace!(
        name => name,
        player_name => player_name,
        race => race,
        character_class => class,
        subclass => subclass,
        background => background,
        level => level,
        proficiencies => proficiencies,
        personality => personality,
        backstory => backstory,
        equipment => equipment,
        spells => spells,
        familiar => familiar,
        motivations => motivations,
    );

    if let Some(change) = update.ability_scores {
        merged.ability_scores =
            apply_scores(merged.ability_scores, change, AbilityScores::BASE_SCORE);
    }
    if let Some(change) = update.modifiers {
        merged.modifiers = apply_scores(merged.modifiers, change, BASE_MODIFIER);
    }

    if let Some(patch) = update.data {
        merge_maps(&mut data, patch);
    }
    if let Some(progress) = update.campaign_progress.filter(|p| !p.is_empty()) {
        let mut current = match data.get(CAMPAIGN_PROGRESS_KEY) {
            Some(Value::Map(map)) => map.clone(),
            _ => ValueMap::new(),
        };
        merge_maps(&mut current, progress.to_value_map());
        data.insert(CAMPAIGN_PROGRESS_KEY.to_string(), Value::Map(current));
    }

    merged.data = encode_data(&data)?;
    merged.updated_at = now;
    Ok(merged)
}

/// Clear, or merge a sparse patch over `current` (unset stats start at `baseline`).
fn apply_scores(
    current: Option<AbilityScores>,
    change: Option<AbilityScoresPatch>,
    baseline: i32,
) -> Option<AbilityScores> {
    let patch = change?;
    if patch.is_empty() {
        return current;
    }
    Some(patch.apply(current.unwrap_or(AbilityScores::uniform(baseline))))
}

pub(crate) fn merge_setting(
    stored: &StoredSetting,
    update: SettingUpdate,
    now: StoredTimestamp,
) -> StoredSetting {
    let mut merged = stored.clone();
    if let Some(setting_type) = update.setting_type {
        merged.setting_type = setting_type;
    }
    if let Some(name) = update.name {
        merged.name = name;
    }
    if let Some(region) = update.region {
        merged.region = region;
    }
    if let Some(scale) = update.scale {
        merged.scale = scale;
    }
    if let Some(population) = update.population {
        merged.population = population;
    }
    merged.details.apply(update.details);
    merged.updated_at = now;
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use lorekeeper_core::{
        CampaignProgressPatch, NewCampaign, NewCharacter, NewSetting,
        Proficiencies, RecordId, SettingDetails, LEGACY_ABILITY_SCORES_KEY,
    };

    fn earlier() -> StoredTimestamp {
        StoredTimestamp::Iso("2024-01-01T00:00:00.000000Z".into())
    }

    fn later() -> StoredTimestamp {
        StoredTimestamp::Iso("2024-02-01T00:00:00.000000Z".into())
    }

    fn character(input: NewCharacter) -> StoredCharacter {
        StoredCharacter::create(RecordId::new("ch-1"), input, earlier()).unwrap()
    }

    #[test]
    fn test_campaign_update_keeps_unset_fields() {
        let stored = StoredCampaign::create(
            RecordId::new("c1"),
            NewCampaign::new("Lost Mines", "Goblins"),
            earlier(),
        )
        .unwrap();
        let merged = merge_campaign(
            &stored,
            CampaignUpdate::default().description("Dragons"),
            later(),
        );
        assert_eq!(merged.name, "Lost Mines");
        assert_eq!(merged.description, "Dragons");
        assert_eq!(merged.created_at, earlier());
        assert_eq!(merged.updated_at, later());
    }

    #[test]
    fn test_empty_update_still_refreshes_timestamp() {
        let stored = StoredCampaign::create(
            RecordId::new("c1"),
            NewCampaign::new("Lost Mines", "Goblins"),
            earlier(),
        )
        .unwrap();
        let merged = merge_campaign(&stored, CampaignUpdate::default(), later());
        assert_eq!(merged.updated_at, later());
    }

    #[test]
    fn test_single_ability_score_merges() {
        let scores = AbilityScores {
            strength: 8,
            dexterity: 14,
            constitution: 12,
            intelligence: 10,
            wisdom: 13,
            charisma: 15,
        };
        let stored = character(NewCharacter::new("c1", "Elara").ability_scores(scores));
        let update = CharacterUpdate {
            ability_scores: Some(Some(AbilityScoresPatch {
                intelligence: Some(18),
                ..Default::default()
            })),
            ..Default::default()
        };
        let merged = merge_character(&stored, update, later()).unwrap();
        let merged_scores = merged.ability_scores.unwrap();
        assert_eq!(merged_scores.intelligence, 18);
        assert_eq!(merged_scores.strength, 8);
        assert_eq!(merged_scores.charisma, 15);
    }

    #[test]
    fn test_modifiers_start_from_zero() {
        let stored = character(NewCharacter::new("c1", "Elara"));
        let update = CharacterUpdate {
            modifiers: Some(Some(AbilityScoresPatch {
                dexterity: Some(2),
                ..Default::default()
            })),
            ..Default::default()
        };
        let merged = merge_character(&stored, update, later()).unwrap();
        let modifiers = merged.modifiers.unwrap();
        assert_eq!(modifiers.dexterity, 2);
        assert_eq!(modifiers.wisdom, 0);
    }

    #[test]
    fn test_structured_fields_are_replaced_whole() {
        let mut input = NewCharacter::new("c1", "Elara");
        input.proficiencies = Some(Proficiencies {
            armor: vec!["Light".into()],
            skills: vec!["Arcana".into(), "History".into()],
            ..Default::default()
        });
        let stored = character(input);
        let update = CharacterUpdate {
            proficiencies: Some(Some(Proficiencies {
                skills: vec!["Stealth".into()],
                ..Default::default()
            })),
            ..Default::default()
        };
        let merged = merge_character(&stored, update, later()).unwrap();
        let proficiencies = merged.proficiencies.unwrap();
        assert_eq!(proficiencies.skills, vec!["Stealth".to_string()]);
        assert!(proficiencies.armor.is_empty());
    }

    #[test]
    fn test_progress_merges_key_by_key() {
        let stored = character(NewCharacter::new("c1", "Elara"));
        let first = CharacterUpdate {
            campaign_progress: Some(CampaignProgressPatch {
                current_location: Some("Phandalin".into()),
                key_discoveries: Some(vec!["Map to Wave Echo Cave".into()]),
            }),
            ..Default::default()
        };
        let stored = merge_character(&stored, first, later()).unwrap();
        let second = CharacterUpdate {
            campaign_progress: Some(CampaignProgressPatch {
                current_location: Some("Cragmaw Castle".into()),
                key_discoveries: None,
            }),
            ..Default::default()
        };
        let merged = merge_character(&stored, second, later()).unwrap();
        let progress = merged.to_character().unwrap().campaign_progress().unwrap();
        assert_eq!(progress.current_location.as_deref(), Some("Cragmaw Castle"));
        assert_eq!(progress.key_discoveries, vec!["Map to Wave Echo Cave".to_string()]);
    }

    #[test]
    fn test_data_bag_merges_and_class_is_renamed() {
        let mut input = NewCharacter::new("c1", "Elara");
        input.data.insert("mood".into(), "grim".into());
        input.data.insert("gold".into(), Value::Int(10));
        let stored = character(input);

        let mut patch = ValueMap::new();
        patch.insert("gold".into(), Value::Int(25));
        let update = CharacterUpdate {
            data: Some(patch),
            character_class: Some(Some("Wizard".into())),
            ..Default::default()
        };
        let merged = merge_character(&stored, update, later()).unwrap();
        assert_eq!(merged.class.as_deref(), Some("Wizard"));
        let data = merged.data_map().unwrap();
        assert_eq!(data["gold"], Value::Int(25));
        assert_eq!(data["mood"], Value::from("grim"));
    }

    #[test]
    fn test_legacy_scores_are_the_merge_base() {
        let mut legacy = ValueMap::new();
        legacy.insert("strength".into(), Value::Int(16));
        legacy.insert("wisdom".into(), Value::Int(12));
        let mut input = NewCharacter::new("c1", "Old Timer");
        input
            .data
            .insert(LEGACY_ABILITY_SCORES_KEY.into(), Value::Map(legacy));
        let stored = character(input);

        let update = CharacterUpdate {
            ability_scores: Some(Some(AbilityScoresPatch {
                wisdom: Some(14),
                ..Default::default()
            })),
            ..Default::default()
        };
        let merged = merge_character(&stored, update, later()).unwrap();
        let scores = merged.ability_scores.unwrap();
        assert_eq!(scores.strength, 16);
        assert_eq!(scores.wisdom, 14);
        assert!(!merged
            .data_map()
            .unwrap()
            .contains_key(LEGACY_ABILITY_SCORES_KEY));
    }

    #[test]
    fn test_clearing_optional_fields() {
        let mut input = NewCharacter::new("c1", "Elara")
            .player_name("Sam")
            .ability_scores(AbilityScores::uniform(12));
        input.backstory = Some("Raised by owls".into());
        let stored = character(input);

        let update = CharacterUpdate {
            player_name: Some(None),
            ability_scores: Some(None),
            ..Default::default()
        };
        let merged = merge_character(&stored, update, later()).unwrap();
        assert_eq!(merged.player_name, None);
        assert_eq!(merged.ability_scores, None);
        assert_eq!(merged.backstory.as_deref(), Some("Raised by owls"));
    }

    #[test]
    fn test_empty_patches_do_not_materialize_fields() {
        let stored = character(NewCharacter::new("c1", "Elara"));
        let update = CharacterUpdate {
            modifiers: Some(Some(AbilityScoresPatch::default())),
            campaign_progress: Some(CampaignProgressPatch::default()),
            ..Default::default()
        };
        let merged = merge_character(&stored, update, later()).unwrap();
        assert_eq!(merged.modifiers, None);
        assert!(!merged.data_map().unwrap().contains_key(CAMPAIGN_PROGRESS_KEY));
    }

    #[test]
    fn test_setting_detach() {
        let input = town_input().with_parent("region-1");
        let stored = StoredSetting::create(RecordId::new("s1"), input, earlier());
        let merged = merge_setting(&stored, SettingUpdate::default().detach(), later());
        assert_eq!(merged.parent_id(), None);
        assert_eq!(merged.name, "Phandalin");
    }

    fn town_input() -> NewSetting {
        NewSetting::new("Town", "Phandalin", "Sword Coast", "Small", "~500")
    }

    #[test]
    fn test_setting_patch_keeps_unset_details() {
        let input = town_input().with_details(SettingDetails {
            atmosphere: Some("Tense".into()),
            notes: Some("Redbrands".into()),
            ..Default::default()
        });
        let stored = StoredSetting::create(RecordId::new("s1"), input, earlier());
        let update = SettingUpdate {
            population: Some("~600".into()),
            ..Default::default()
        }
        .parent("region-1");
        let merged = merge_setting(&stored, update, later());
        assert_eq!(merged.population, "~600");
        assert_eq!(merged.name, "Phandalin");
        assert_eq!(merged.details.atmosphere.as_deref(), Some("Tense"));
        assert_eq!(merged.parent_id(), Some("region-1"));
        assert_eq!(merged.updated_at, later());
    }
}
