use std::path::{Path, PathBuf};

use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    auth::login::{do_login, do_logout, login_page},
    contact::{contact_page, do_contact},
    registrations::{
        manage::{
            admin_dashboard,
            clear::{clear_all_page, do_clear_all},
            delete::{delete_team_page, do_delete_team},
            export::export_csv,
            settings::do_update_settings,
        },
        public::{do_register, home, register_page, status_fragment},
    },
    state::AppState,
    store::DEFAULT_QUOTA_BYTES,
};

fn default_quota() -> usize {
    DEFAULT_QUOTA_BYTES
}

fn default_timeout_secs() -> u64 {
    15
}

/// Where teams and settings are persisted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    Memory {
        #[serde(default = "default_quota")]
        quota_bytes: usize,
    },
    Sqlite {
        database_url: String,
        #[serde(default = "default_quota")]
        quota_bytes: usize,
    },
    Remote {
        document_url: String,
        #[serde(default)]
        bearer_token: Option<String>,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Sqlite {
            database_url: ":memory:".to_string(),
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub bind_address: String,
    pub event_name: String,
    /// The single shared password for the admin area. Compared as plain
    /// text.
    pub admin_password: String,
    /// Key for the encrypted admin cookie. Must be at least 64 bytes; a
    /// random key is generated otherwise (and sessions do not survive a
    /// restart).
    pub secret_key: Option<String>,
    pub default_logo_url: Option<String>,
    pub default_banner_url: Option<String>,
    pub store: StoreConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
            event_name: "Padel Doubles Tournament".to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            secret_key: None,
            default_logo_url: None,
            default_banner_url: None,
            store: StoreConfig::default(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl AppConfig {
    /// Reads the configuration file (if any) and applies the environment
    /// overrides on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| {
                    ConfigError::Io {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                toml::from_str::<AppConfig>(&text)?
            }
            None => AppConfig::default(),
        };

        let config = config.with_overrides(|var| std::env::var(var).ok());

        if config.admin_password == DEFAULT_ADMIN_PASSWORD {
            tracing::warn!(
                "using the default admin password; set `admin_password` or \
                 ADMIN_PASSWORD"
            );
        }

        Ok(config)
    }

    /// Applies `DATABASE_URL`, `ADMIN_PASSWORD`, `SECRET_KEY` and
    /// `BIND_ADDRESS`, as returned by `lookup`.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        if let Some(database_url) = lookup("DATABASE_URL") {
            let quota_bytes = match &self.store {
                StoreConfig::Sqlite { quota_bytes, .. }
                | StoreConfig::Memory { quota_bytes } => *quota_bytes,
                StoreConfig::Remote { .. } => DEFAULT_QUOTA_BYTES,
            };
            self.store = StoreConfig::Sqlite {
                database_url,
                quota_bytes,
            };
        }
        if let Some(password) = lookup("ADMIN_PASSWORD") {
            self.admin_password = password;
        }
        if let Some(secret) = lookup("SECRET_KEY") {
            self.secret_key = Some(secret);
        }
        if let Some(bind_address) = lookup("BIND_ADDRESS") {
            self.bind_address = bind_address;
        }
        self
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/status", get(status_fragment))
        .route("/register", get(register_page).post(do_register))
        .route("/contact", get(contact_page).post(do_contact))
        .route("/admin/login", get(login_page).post(do_login))
        .route("/admin/logout", post(do_logout))
        .route("/admin", get(admin_dashboard))
        .route("/admin/settings", post(do_update_settings))
        .route(
            "/admin/teams/:team_id/delete",
            get(delete_team_page).post(do_delete_team),
        )
        .route("/admin/clear", get(clear_all_page).post(do_clear_all))
        .route("/admin/export.csv", get(export_csv))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
