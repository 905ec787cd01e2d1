use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

use crate::{
    registry::Team,
    settings::Settings,
    store::{SETTINGS_KEY, Store, StoreError, TEAMS_KEY},
};

/// A single JSON document of the form `{"teams": [...], "settings": {...}}`,
/// read with `GET` and overwritten with `PUT` at `document_url`.
///
/// Every save fetches the current document, replaces one key and writes the
/// whole document back. Concurrent writers from other processes can
/// therefore overwrite each other.
pub struct RemoteStore {
    client: reqwest::Client,
    document_url: Url,
    bearer_token: Option<String>,
}

impl RemoteStore {
    pub fn new(
        document_url: String,
        bearer_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let document_url = Url::parse(&document_url).map_err(|e| {
            StoreError::Unavailable(format!("invalid document url: {e}"))
        })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            document_url,
            bearer_token,
        })
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, self.document_url.clone());
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    #[tracing::instrument(skip(self), fields(url = %self.document_url))]
    async fn fetch_document(&self) -> Result<Map<String, Value>, StoreError> {
        let response = self
            .request(reqwest::Method::GET)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        // A document which was never written reads as empty.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Map::new());
        }
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(document)) => Ok(document),
            Ok(_) | Err(_) => {
                tracing::warn!("ignoring malformed remote document");
                Ok(Map::new())
            }
        }
    }

    #[tracing::instrument(skip(self, value), fields(url = %self.document_url))]
    async fn replace_key(
        &self,
        key: &'static str,
        value: Value,
    ) -> Result<(), StoreError> {
        let mut document = self.fetch_document().await?;
        document.insert(key.to_string(), value);

        let response = self
            .request(reqwest::Method::PUT)
            .json(&Value::Object(document))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

fn from_value_or<T: DeserializeOwned>(
    key: &str,
    value: Option<Value>,
    default: T,
) -> T {
    match value {
        None | Some(Value::Null) => default,
        Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
            tracing::warn!(key, %err, "ignoring malformed stored value");
            default
        }),
    }
}

#[async_trait]
impl Store for RemoteStore {
    fn backend_tag(&self) -> &'static str {
        "remote"
    }

    async fn load_teams(&self) -> Result<Vec<Team>, StoreError> {
        let mut document = self.fetch_document().await?;
        Ok(from_value_or(TEAMS_KEY, document.remove(TEAMS_KEY), Vec::new()))
    }

    async fn save_teams(&self, teams: &[Team]) -> Result<(), StoreError> {
        self.replace_key(TEAMS_KEY, serde_json::to_value(teams)?)
            .await
    }

    async fn load_settings(
        &self,
        defaults: &Settings,
    ) -> Result<Settings, StoreError> {
        let mut document = self.fetch_document().await?;

        let stored = match document.remove(SETTINGS_KEY) {
            None | Some(Value::Null) => return Ok(defaults.clone()),
            Some(Value::Object(stored)) => stored,
            Some(_) => {
                tracing::warn!(key = SETTINGS_KEY, "ignoring malformed settings");
                return Ok(defaults.clone());
            }
        };

        let mut merged = match serde_json::to_value(defaults)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        merged.extend(stored);

        Ok(from_value_or(
            SETTINGS_KEY,
            Some(Value::Object(merged)),
            defaults.clone(),
        ))
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.replace_key(SETTINGS_KEY, serde_json::to_value(settings)?)
            .await
    }
}
