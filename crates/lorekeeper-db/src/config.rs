//! RON configuration for the document store
//!
//! ```text
//! (
//!     path: Some("data/"),
//!     database_name: "lorekeeper",
//! )
//! ```
//!
//! Omitting `path` keeps everything in memory. `LOREKEEPER_DB_PATH` and
//! `LOREKEEPER_DB_NAME` override the file values when
//! [`StoreConfig::with_env_overrides`] is applied.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding [`StoreConfig::path`]
pub const ENV_DB_PATH: &str = "LOREKEEPER_DB_PATH";

/// Environment variable overriding [`StoreConfig::database_name`]
pub const ENV_DB_NAME: &str = "LOREKEEPER_DB_NAME";

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Database file, or a directory to place `<database_name>.db` in.
    /// `None` opens an in-memory store.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Logical database name, used as the file stem inside a directory
    #[serde(default = "default_database_name")]
    pub database_name: String,
}

fn default_database_name() -> String {
    "lorekeeper".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl StoreConfig {
    /// Configuration for an in-memory store
    pub fn in_memory() -> Self {
        Self {
            path: None,
            database_name: default_database_name(),
        }
    }

    /// Configuration for a store backed by `path`
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            database_name: default_database_name(),
        }
    }

    /// Parse configuration from a RON string
    pub fn from_ron_str(content: &str) -> Result<Self> {
        let config: StoreConfig =
            ron::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&content)
    }

    /// Apply `LOREKEEPER_DB_PATH` / `LOREKEEPER_DB_NAME` from the environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(ENV_DB_PATH).ok(),
            std::env::var(ENV_DB_NAME).ok(),
        )
    }

    fn with_overrides(mut self, path: Option<String>, name: Option<String>) -> Self {
        if let Some(path) = path.filter(|p| !p.is_empty()) {
            self.path = Some(PathBuf::from(path));
        }
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.database_name = name;
        }
        self
    }

    /// The file the store will open, or `None` for an in-memory store
    pub fn resolved_path(&self) -> Option<PathBuf> {
        let path = self.path.as_ref()?;
        if path.is_dir() {
            Some(path.join(format!("{}.db", self.database_name)))
        } else {
            Some(path.clone())
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.is_none()
    }

    fn validate(&self) -> Result<()> {
        if self.database_name.trim().is_empty() {
            return Err(Error::Config("database_name cannot be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_in_memory() {
        let config = StoreConfig::default();
        assert!(config.is_in_memory());
        assert_eq!(config.resolved_path(), None);
        assert_eq!(config.database_name, "lorekeeper");
    }

    #[test]
    fn test_parse_ron() {
        let config = StoreConfig::from_ron_str(r#"(path: Some("campaigns.db"))"#).unwrap();
        assert_eq!(config.path, Some(PathBuf::from("campaigns.db")));
        assert_eq!(config.database_name, "lorekeeper");

        let config = StoreConfig::from_ron_str("()").unwrap();
        assert!(config.is_in_memory());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            StoreConfig::from_ron_str("(path: 3)"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            StoreConfig::from_ron_str(r#"(database_name: "  ")"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_directory_path_gets_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StoreConfig::at(dir.path());
        config.database_name = "dnd_gm".into();
        assert_eq!(config.resolved_path(), Some(dir.path().join("dnd_gm.db")));
    }

    #[test]
    fn test_overrides() {
        let config = StoreConfig::in_memory()
            .with_overrides(Some("/tmp/lore.db".into()), Some("test".into()));
        assert_eq!(config.path, Some(PathBuf::from("/tmp/lore.db")));
        assert_eq!(config.database_name, "test");

        let unchanged = StoreConfig::in_memory().with_overrides(Some(String::new()), None);
        assert!(unchanged.is_in_memory());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("store.ron");
        fs::write(&file, r#"(database_name: "tavern")"#).unwrap();
        let config = StoreConfig::load(&file).unwrap();
        assert_eq!(config.database_name, "tavern");
    }
}
