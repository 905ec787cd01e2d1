//! Persistence for the team list and the settings.
//!
//! The [`Store`] trait is the only thing the rest of the crate sees. Which
//! backend sits behind it is decided by [`crate::config::StoreConfig`]:
//!
//! - [`memory::MemoryStore`] keeps everything in the process;
//! - [`sqlite::SqliteStore`] is a key/value table in an SQLite database;
//! - [`remote::RemoteStore`] fetches and overwrites one JSON document over
//!   HTTP.
//!
//! The remote backend does a read-modify-write on every save, so two
//! processes writing at the same time can overwrite each other's changes.
//! Within one process writes are serialized by [`crate::state::AppState`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{config::StoreConfig, registry::Team, settings::Settings};

pub mod memory;
pub mod remote;
pub mod sqlite;

pub const TEAMS_KEY: &str = "teams";
pub const SETTINGS_KEY: &str = "settings";

/// Default size limit for a single stored value. This is roughly what
/// browsers allow per origin for local storage.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("value of {size} bytes exceeds the storage quota of {quota} bytes")]
    QuotaExceeded { size: usize, quota: usize },
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage backend responded with status {0}")]
    Status(u16),
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StoreError::QuotaExceeded { .. })
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// A short name for log output.
    fn backend_tag(&self) -> &'static str;

    /// Loads the team list. Malformed stored data is logged and treated as
    /// an empty list.
    async fn load_teams(&self) -> Result<Vec<Team>, StoreError>;

    async fn save_teams(&self, teams: &[Team]) -> Result<(), StoreError>;

    /// Loads the settings, starting from `defaults` for any key that is not
    /// stored. Malformed stored data is logged and `defaults` returned.
    async fn load_settings(
        &self,
        defaults: &Settings,
    ) -> Result<Settings, StoreError>;

    async fn save_settings(&self, settings: &Settings) -> Result<(), StoreError>;
}

pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn Store>, StoreError> {
    let store: Arc<dyn Store> = match config {
        StoreConfig::Memory { quota_bytes } => {
            Arc::new(memory::MemoryStore::new(*quota_bytes))
        }
        StoreConfig::Sqlite {
            database_url,
            quota_bytes,
        } => Arc::new(
            sqlite::SqliteStore::open(database_url.clone(), *quota_bytes)
                .await?,
        ),
        StoreConfig::Remote {
            document_url,
            bearer_token,
            timeout_secs,
        } => Arc::new(remote::RemoteStore::new(
            document_url.clone(),
            bearer_token.clone(),
            std::time::Duration::from_secs(*timeout_secs),
        )?),
    };

    tracing::info!(backend = store.backend_tag(), "connected to store");

    Ok(store)
}

/// Parses a stored JSON value, falling back to `default` when nothing is
/// stored or the stored value cannot be read.
pub(crate) fn decode_or<T: DeserializeOwned>(
    key: &str,
    raw: Option<&str>,
    default: T,
) -> T {
    match raw {
        None => default,
        Some(raw) => match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, %err, "ignoring malformed stored value");
                default
            }
        },
    }
}

/// Applies a stored settings document on top of `defaults`, key by key.
pub(crate) fn merge_settings(
    defaults: &Settings,
    raw: Option<&str>,
) -> Settings {
    let Some(raw) = raw else {
        return defaults.clone();
    };

    let stored = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(stored)) => stored,
        Ok(_) | Err(_) => {
            tracing::warn!(
                key = SETTINGS_KEY,
                "ignoring malformed stored settings"
            );
            return defaults.clone();
        }
    };

    let mut merged = match serde_json::to_value(defaults) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => return defaults.clone(),
    };
    merged.extend(stored);

    decode_or(
        SETTINGS_KEY,
        Some(&serde_json::Value::Object(merged).to_string()),
        defaults.clone(),
    )
}

pub(crate) fn check_quota(value: &str, quota: usize) -> Result<(), StoreError> {
    if value.len() > quota {
        return Err(StoreError::QuotaExceeded {
            size: value.len(),
            quota,
        });
    }
    Ok(())
}
