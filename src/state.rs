use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use hypertext::Renderable;
use tokio::sync::{Mutex, RwLock, broadcast::Sender};

use crate::{
    config::AppConfig,
    msg::{Msg, MsgContents},
    settings::Settings,
    store::{self, Store, StoreError},
    template::Page,
};

/// The parts of the configuration which request handlers need.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub event_name: String,
    pub admin_password: String,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Loaded once at startup, and only replaced after the store has
    /// accepted new settings.
    pub settings: Arc<RwLock<Settings>>,
    /// Held for the whole load-modify-save cycle of every change to the
    /// team list, so that requests handled by this process cannot interleave.
    pub write_lock: Arc<Mutex<()>>,
    pub tx: Sender<Msg>,
    pub site: Arc<SiteConfig>,
    key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

fn cookie_key(secret: Option<&str>) -> Key {
    match secret.map(|secret| Key::try_from(secret.as_bytes())) {
        Some(Ok(key)) => key,
        Some(Err(_)) => {
            tracing::warn!(
                "secret key is shorter than 64 bytes; generating a random one"
            );
            Key::generate()
        }
        None => {
            tracing::warn!(
                "no secret key configured; admin sessions will not survive a \
                 restart"
            );
            Key::generate()
        }
    }
}

impl AppState {
    /// Connects to the configured store and loads the settings.
    pub async fn connect(config: &AppConfig) -> Result<Self, StoreError> {
        let store = store::connect(&config.store).await?;
        Self::with_store(store, config).await
    }

    pub async fn with_store(
        store: Arc<dyn Store>,
        config: &AppConfig,
    ) -> Result<Self, StoreError> {
        let defaults = Settings::with_branding(
            config.default_logo_url.clone(),
            config.default_banner_url.clone(),
        );
        let settings = store.load_settings(&defaults).await?;

        let (tx, _rx) = tokio::sync::broadcast::channel::<Msg>(1000);

        Ok(Self {
            store,
            settings: Arc::new(RwLock::new(settings)),
            write_lock: Arc::new(Mutex::new(())),
            tx,
            site: Arc::new(SiteConfig {
                event_name: config.event_name.clone(),
                admin_password: config.admin_password.clone(),
            }),
            key: cookie_key(config.secret_key.as_deref()),
        })
    }

    pub async fn settings(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Broadcasts a change. Nobody listening is not an error.
    pub fn notify(&self, settings: &Settings, inner: MsgContents) {
        let _ = self.tx.send(Msg {
            settings: settings.clone(),
            inner,
        });
    }

    /// A page carrying the event name and branding.
    pub async fn page<R: Renderable>(&self) -> Page<R> {
        let settings = self.settings.read().await;
        Page::new()
            .event_name(&self.site.event_name)
            .branding(&settings)
    }
}
