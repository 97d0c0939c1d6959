//! Database store wrapper.

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::models::*;
use native_db::*;
use std::fs;
use std::sync::{LazyLock, Mutex, OnceLock};
use tracing::{error, info};

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models
        .define::<StoredCampaign>()
        .expect("campaign model definition");
    models
        .define::<StoredCharacter>()
        .expect("character model definition");
    models
        .define::<StoredSetting>()
        .expect("setting model definition");
    models
});

/// Handle to the campaign document store.
///
/// A store starts uninitialized; [`Store::initialize`] opens the backing
/// database exactly once. Every operation on an uninitialized store fails
/// with [`Error::NotInitialized`].
pub struct Store {
    config: StoreConfig,
    db: OnceLock<Database<'static>>,
    init: Mutex<()>,
}

impl Store {
    /// Create an uninitialized store for `config`.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            db: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// Open the backing database and declare the collections.
    ///
    /// Fails with [`Error::AlreadyInitialized`] on a second call.
    pub fn initialize(&self) -> Result<()> {
        let _guard = self
            .init
            .lock()
            .map_err(|_| Error::Database("initialization lock poisoned".into()))?;
        if self.db.get().is_some() {
            return Err(Error::AlreadyInitialized);
        }

        let db = match self.config.resolved_path() {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                info!(target: "lorekeeper::db", path = %path.display(), "opening store");
                Builder::new().create(&MODELS, &path)?
            }
            None => {
                info!(target: "lorekeeper::db", "opening in-memory store");
                Builder::new().create_in_memory(&MODELS)?
            }
        };

        self.db
            .set(db)
            .map_err(|_| Error::AlreadyInitialized)
    }

    /// Open or create a database at the given path.
    pub fn open(path: impl Into<std::path::PathBuf>) -> Result<Self> {
        let store = Self::new(StoreConfig::at(path));
        store.initialize()?;
        Ok(store)
    }

    /// Create an initialized in-memory database.
    pub fn in_memory() -> Result<Self> {
        let store = Self::new(StoreConfig::in_memory());
        store.initialize()?;
        Ok(store)
    }

    pub fn is_initialized(&self) -> bool {
        self.db.get().is_some()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub(crate) fn db(&self) -> Result<&Database<'static>> {
        self.db.get().ok_or(Error::NotInitialized)
    }

    /// Delete every record in all three collections.
    ///
    /// Returns the number of records removed.
    pub fn clear(&self) -> Result<usize> {
        let rw = self.db()?.rw_transaction()?;
        let campaigns: Vec<StoredCampaign> = {
            let scan = rw.scan().primary::<StoredCampaign>()?;
            let iter = scan.all()?;
            iter.collect::<std::result::Result<_, _>>()?
        };
        let characters: Vec<StoredCharacter> = {
            let scan = rw.scan().primary::<StoredCharacter>()?;
            let iter = scan.all()?;
            iter.collect::<std::result::Result<_, _>>()?
        };
        let settings: Vec<StoredSetting> = {
            let scan = rw.scan().primary::<StoredSetting>()?;
            let iter = scan.all()?;
            iter.collect::<std::result::Result<_, _>>()?
        };

        let removed = campaigns.len() + characters.len() + settings.len();
        for campaign in campaigns {
            rw.remove(campaign)?;
        }
        for character in characters {
            rw.remove(character)?;
        }
        for setting in settings {
            rw.remove(setting)?;
        }
        rw.commit()?;

        info!(target: "lorekeeper::db", removed, "cleared store");
        Ok(removed)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Pass a conversion result through, logging data-integrity failures.
pub(crate) fn checked<T>(result: Result<T>) -> Result<T> {
    if let Err(err @ Error::DataIntegrity { .. }) = &result {
        error!(target: "lorekeeper::db", %err, "stored document failed conversion");
    }
    result
}

/// Convert every stored document, failing on the first corrupt one.
pub(crate) fn convert_all<S, T>(
    stored: impl IntoIterator<Item = S>,
    convert: impl Fn(&S) -> Result<T>,
) -> Result<Vec<T>> {
    stored.into_iter().map(|s| checked(convert(&s))).collect()
}

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}
