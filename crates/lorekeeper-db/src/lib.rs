//! Lorekeeper DB - Document store using native_db
//!
//! Provides persistent storage for:
//! - Campaigns
//! - Characters, which belong to a campaign
//! - Settings, which nest through `parent_id`
//!
//! A [`Store`] is created from a [`StoreConfig`] and must be initialized
//! once before use:
//!
//! ```no_run
//! use lorekeeper_db::{Store, StoreConfig};
//! use lorekeeper_core::NewCampaign;
//!
//! let store = Store::new(StoreConfig::in_memory().with_env_overrides());
//! store.initialize()?;
//! let campaign = store.create_campaign(NewCampaign::new("Lost Mines", "Goblins"))?;
//! assert!(store.get_campaign(&campaign.id)?.is_some());
//! # Ok::<(), lorekeeper_db::Error>(())
//! ```
//!
//! Log events are emitted through `tracing` under the `lorekeeper::*`
//! targets; installing a subscriber is up to the application.

mod campaigns;
mod characters;
pub mod config;
mod error;
mod merge;
mod models;
mod search;
mod settings;
mod store;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use search::{CharacterQuery, SettingQuery, TextMatcher};
pub use settings::UpdateOutcome;
pub use store::Store;
