//! Lorekeeper Core - Records for tabletop campaign bookkeeping
//!
//! This crate provides the storage-agnostic types used by the lorekeeper
//! document store:
//! - Record identifiers (`RecordId`, `RecordKind`)
//! - Dynamic value types for auxiliary data bags (`Value`, `ValueMap`)
//! - Domain records (`Campaign`, `Character`, `Setting`)
//! - Typed partial updates, one optional slot per updatable attribute
//! - Field validation and the external/storage field-name alias table
//!
//! ## Partial updates
//!
//! Every record has an update struct (`CampaignUpdate`, `CharacterUpdate`,
//! `SettingUpdate`) where `None` means "leave unchanged". The character and
//! setting updates can also be parsed from an open field map with
//! `from_fields`, which is how loosely-typed callers reach the store.

mod campaign;
mod character;
mod error;
pub mod fields;
mod identity;
mod setting;
pub mod validate;
mod value;

pub use campaign::{Campaign, CampaignUpdate, NewCampaign};
pub use character::{
    AbilityScores, AbilityScoresPatch, CampaignProgress, CampaignProgressPatch, Character,
    CharacterUpdate, Familiar, NewCharacter, Personality, Proficiencies, Spells,
    CAMPAIGN_PROGRESS_KEY, LEGACY_ABILITY_SCORES_KEY,
};
pub use error::{Error, Result};
pub use identity::{RecordId, RecordKind};
pub use setting::{
    NewSetting, Setting, SettingDetails, SettingDetailsPatch, SettingFieldReport, SettingUpdate,
};
pub use value::{merge_maps, Value, ValueMap};
