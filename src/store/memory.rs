use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;

use crate::{
    registry::Team,
    settings::Settings,
    store::{
        SETTINGS_KEY, Store, StoreError, TEAMS_KEY, check_quota, decode_or,
        merge_settings,
    },
};

/// Keeps serialized values in a map, so that the quota and the
/// malformed-data fallback behave exactly as in the persistent backends.
/// Everything is lost when the process exits.
pub struct MemoryStore {
    entries: Mutex<HashMap<&'static str, String>>,
    quota: usize,
}

impl MemoryStore {
    pub fn new(quota: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota,
        }
    }

    fn get(&self, key: &'static str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("poisoned lock".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &'static str, value: String) -> Result<(), StoreError> {
        check_quota(&value, self.quota)?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("poisoned lock".to_string()))?;
        entries.insert(key, value);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn put_raw(&self, key: &'static str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key, value.to_string());
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn load_teams(&self) -> Result<Vec<Team>, StoreError> {
        let raw = self.get(TEAMS_KEY)?;
        Ok(decode_or(TEAMS_KEY, raw.as_deref(), Vec::new()))
    }

    async fn save_teams(&self, teams: &[Team]) -> Result<(), StoreError> {
        self.put(TEAMS_KEY, serde_json::to_string(teams)?)
    }

    async fn load_settings(
        &self,
        defaults: &Settings,
    ) -> Result<Settings, StoreError> {
        let raw = self.get(SETTINGS_KEY)?;
        Ok(merge_settings(defaults, raw.as_deref()))
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.put(SETTINGS_KEY, serde_json::to_string(settings)?)
    }
}
