//! End-to-end behaviour of the store across all three record kinds.

use lorekeeper_core::{
    AbilityScores, AbilityScoresPatch, CampaignUpdate, CharacterUpdate, NewCampaign,
    NewCharacter, NewSetting, RecordId, RecordKind, SettingUpdate, ValueMap,
};
use lorekeeper_db::{CharacterQuery, Error, SettingQuery, Store, StoreConfig};
use proptest::prelude::*;

fn store() -> Store {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    Store::in_memory().unwrap()
}

fn town(name: &str) -> NewSetting {
    NewSetting::new("Town", name, "Sword Coast", "Small", "~500")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn campaign_round_trips(
        name in "[A-Za-z][A-Za-z0-9 ]{0,60}",
        description in "[A-Za-z][A-Za-z0-9 .,]{0,300}",
    ) {
        let store = store();
        let created = store
            .create_campaign(NewCampaign::new(name.clone(), description.clone()))
            .unwrap();
        let loaded = store.get_campaign(&created.id).unwrap().unwrap();
        prop_assert_eq!(&loaded.name, &name);
        prop_assert_eq!(&loaded.description, &description);
        prop_assert_eq!(&loaded.created_at, &loaded.updated_at);

        let updated = store
            .update_campaign(&created.id, CampaignUpdate::default().description("Revised"))
            .unwrap();
        prop_assert_eq!(&updated.created_at, &created.created_at);
        prop_assert!(updated.updated_at >= created.updated_at);
    }
}

#[test]
fn duplicate_campaign_leaves_original_untouched() {
    let store = store();
    let original = store
        .create_campaign(NewCampaign::new("Lost Mines", "Goblins"))
        .unwrap();
    let err = store
        .create_campaign(NewCampaign::new("Lost Mines", "Something else"))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::DuplicateName {
            kind: RecordKind::Campaign,
            ..
        }
    ));

    let all = store.list_campaigns().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], original);
}

#[test]
fn character_needs_existing_campaign() {
    let store = store();
    let err = store
        .create_character(NewCharacter::new(RecordId::generate(), "Elara"))
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("does not exist"));
    assert!(store.list_characters().unwrap().is_empty());
}

#[test]
fn single_ability_score_update_keeps_siblings() {
    let store = store();
    let campaign = store
        .create_campaign(NewCampaign::new("Lost Mines", "Goblins"))
        .unwrap();
    let scores = AbilityScores {
        strength: 8,
        dexterity: 14,
        constitution: 12,
        intelligence: 10,
        wisdom: 13,
        charisma: 15,
    };
    let created = store
        .create_character(NewCharacter::new(campaign.id, "Elara").ability_scores(scores))
        .unwrap();

    let update = CharacterUpdate {
        ability_scores: Some(Some(AbilityScoresPatch {
            intelligence: Some(18),
            ..Default::default()
        })),
        ..Default::default()
    };
    let updated = store.update_character(&created.id, update).unwrap();
    assert_eq!(
        updated.ability_scores,
        Some(AbilityScores {
            intelligence: 18,
            ..scores
        })
    );
}

#[test]
fn setting_update_reports_unknown_field() {
    let store = store();
    let created = store.create_setting(town("Phandalin")).unwrap();

    let mut fields = ValueMap::new();
    fields.insert("atmosphere".into(), "Wary".into());
    fields.insert("bogus_field".into(), "x".into());
    let outcome = store.update_setting_fields(&created.id, &fields).unwrap();

    assert!(outcome.warning.unwrap().contains("bogus_field"));
    let stored = store.get_setting(&created.id).unwrap().unwrap();
    assert_eq!(stored.details.atmosphere.as_deref(), Some("Wary"));
}

#[test]
fn delete_all_then_list_is_empty() {
    let store = store();
    for name in ["One", "Two", "Three"] {
        store
            .create_campaign(NewCampaign::new(name, "desc"))
            .unwrap();
    }
    assert_eq!(store.delete_all_campaigns().unwrap(), 3);
    assert!(store.list_campaigns().unwrap().is_empty());
    assert!(!store.delete_campaign(&RecordId::new("missing")).unwrap());
}

#[test]
fn setting_hierarchy() {
    let store = store();
    let a = store.create_setting(town("Phandalin")).unwrap();
    let b = store.create_setting(town("Tresendar Manor")).unwrap();

    store
        .update_setting(&b.id, SettingUpdate::default().parent(a.id.clone()))
        .unwrap();

    let children_of_a = store.setting_children(&a.id).unwrap();
    assert_eq!(children_of_a.len(), 1);
    assert_eq!(children_of_a[0].id, b.id);
    assert!(store.filter_settings_by_parent(&b.id).unwrap().is_empty());

    let scoped = store
        .search_settings(SettingQuery::text("manor").parent(a.id.clone()))
        .unwrap();
    assert_eq!(scoped.len(), 1);

    let detached = store
        .update_setting(&b.id, SettingUpdate::default().detach())
        .unwrap();
    assert!(detached.parent_id().is_none());
    assert!(store.setting_children(&a.id).unwrap().is_empty());
}

#[test]
fn character_search_by_class_and_race() {
    let store = store();
    let campaign = store
        .create_campaign(NewCampaign::new("Lost Mines", "Goblins"))
        .unwrap();
    for (name, class, race) in [
        ("Elara", "Wizard", "Elf"),
        ("Thorin", "Fighter", "Dwarf"),
        ("Nim", "Wizard", "Gnome"),
    ] {
        store
            .create_character(
                NewCharacter::new(campaign.id.clone(), name)
                    .character_class(class)
                    .race(race),
            )
            .unwrap();
    }
    store
        .create_character(NewCharacter::new(campaign.id.clone(), "Nobody"))
        .unwrap();

    let wizards = store
        .search_characters(CharacterQuery::default().class("Wizard"))
        .unwrap();
    assert_eq!(wizards.len(), 2);
    let dwarves = store
        .search_characters(CharacterQuery::default().race("Dwarf"))
        .unwrap();
    assert_eq!(dwarves.len(), 1);
    assert_eq!(dwarves[0].name, "Thorin");
    assert!(store
        .search_characters(CharacterQuery::default().race("Orc"))
        .unwrap()
        .is_empty());
}

#[test]
fn cleared_player_name_survives_reload() {
    let store = store();
    let campaign = store
        .create_campaign(NewCampaign::new("Lost Mines", "Goblins"))
        .unwrap();
    let created = store
        .create_character(NewCharacter::new(campaign.id, "Elara").player_name("Sam"))
        .unwrap();
    let update = CharacterUpdate {
        player_name: Some(None),
        ..Default::default()
    };
    store.update_character(&created.id, update).unwrap();
    let loaded = store.get_character(&created.id).unwrap().unwrap();
    assert_eq!(loaded.player_name, None);
    assert_eq!(loaded.name, "Elara");
}

#[test]
fn search_ignores_case_and_misses_are_empty() {
    let store = store();
    store
        .create_campaign(NewCampaign::new("The Lost Mines", "Goblins"))
        .unwrap();
    let found = store.search_campaigns("the").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "The Lost Mines");
    assert!(store.search_campaigns("dragon").unwrap().is_empty());
    assert!(store.search_settings("dragon").unwrap().is_empty());
}

#[test]
fn deleting_campaign_orphans_characters() {
    let store = store();
    let campaign = store
        .create_campaign(NewCampaign::new("Lost Mines", "Goblins"))
        .unwrap();
    let character = store
        .create_character(NewCharacter::new(campaign.id.clone(), "Elara"))
        .unwrap();
    assert!(store.delete_campaign(&campaign.id).unwrap());

    let orphan = store.get_character(&character.id).unwrap().unwrap();
    assert_eq!(orphan.campaign_id, campaign.id);
}

#[test]
fn clear_removes_everything() {
    let store = store();
    let campaign = store
        .create_campaign(NewCampaign::new("Lost Mines", "Goblins"))
        .unwrap();
    store
        .create_character(NewCharacter::new(campaign.id, "Elara"))
        .unwrap();
    store.create_setting(town("Phandalin")).unwrap();

    assert_eq!(store.clear().unwrap(), 3);
    assert!(store.list_campaigns().unwrap().is_empty());
    assert!(store.list_characters().unwrap().is_empty());
    assert!(store.list_settings().unwrap().is_empty());
}

#[test]
fn on_disk_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = StoreConfig::at(dir.path());
    config.database_name = "campaigns".into();

    let id = {
        let store = Store::new(config.clone());
        store.initialize().unwrap();
        let campaign = store
            .create_campaign(NewCampaign::new("Lost Mines", "Goblins"))
            .unwrap();
        let character = store
            .create_character(
                NewCharacter::new(campaign.id, "Elara").character_class("Wizard"),
            )
            .unwrap();
        character.id
    };
    assert!(dir.path().join("campaigns.db").exists());

    let store = Store::new(config);
    store.initialize().unwrap();
    let character = store.get_character(&id).unwrap().unwrap();
    assert_eq!(character.character_class.as_deref(), Some("Wizard"));
    assert_eq!(store.list_campaigns().unwrap().len(), 1);
}
