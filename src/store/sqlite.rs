use async_trait::async_trait;
use chrono::Utc;
use diesel::{
    SqliteConnection,
    prelude::*,
    r2d2::{ConnectionManager, Pool},
};
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{
    MIGRATIONS,
    registry::Team,
    schema::kv_entries,
    settings::Settings,
    store::{
        SETTINGS_KEY, Store, StoreError, TEAMS_KEY, check_quota, decode_or,
        merge_settings,
    },
};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

fn unavailable(err: impl ToString) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

/// A key/value table in SQLite. Each key holds one JSON document.
pub struct SqliteStore {
    pool: DbPool,
    quota: usize,
}

impl SqliteStore {
    /// Connects to `database_url` (a file path, or `:memory:`) and runs any
    /// pending migrations.
    pub async fn open(
        database_url: String,
        quota: usize,
    ) -> Result<Self, StoreError> {
        let pool = spawn_blocking(move || {
            let in_memory = database_url == ":memory:";
            // An in-memory database lives exactly as long as its connection,
            // so that connection must never be recycled.
            let builder = if in_memory {
                Pool::builder()
                    .max_size(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
            } else {
                Pool::builder().max_size(10)
            };

            let pool = builder
                .build(ConnectionManager::<SqliteConnection>::new(database_url))
                .map_err(unavailable)?;

            let mut conn = pool.get().map_err(unavailable)?;
            conn.run_pending_migrations(MIGRATIONS).map_err(unavailable)?;

            Ok::<_, StoreError>(pool)
        })
        .await
        .map_err(unavailable)??;

        Ok(Self { pool, quota })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T, StoreError>
            + Send
            + 'static,
    {
        let pool = self.pool.clone();
        spawn_blocking(move || {
            let mut conn = pool.get().map_err(unavailable)?;
            f(&mut conn)
        })
        .await
        .map_err(unavailable)?
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, key: &'static str) -> Result<Option<String>, StoreError> {
        self.with_conn(move |conn| {
            kv_entries::table
                .filter(kv_entries::key.eq(key))
                .select(kv_entries::value)
                .first::<String>(conn)
                .optional()
                .map_err(unavailable)
        })
        .await
    }

    #[tracing::instrument(skip(self, value), fields(len = value.len()))]
    async fn put(&self, key: &'static str, value: String) -> Result<(), StoreError> {
        check_quota(&value, self.quota)?;

        self.with_conn(move |conn| {
            diesel::replace_into(kv_entries::table)
                .values((
                    kv_entries::key.eq(key),
                    kv_entries::value.eq(&value),
                    kv_entries::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)
                .map_err(unavailable)?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl Store for SqliteStore {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    async fn load_teams(&self) -> Result<Vec<Team>, StoreError> {
        let raw = self.get(TEAMS_KEY).await?;
        Ok(decode_or(TEAMS_KEY, raw.as_deref(), Vec::new()))
    }

    async fn save_teams(&self, teams: &[Team]) -> Result<(), StoreError> {
        self.put(TEAMS_KEY, serde_json::to_string(teams)?).await
    }

    async fn load_settings(
        &self,
        defaults: &Settings,
    ) -> Result<Settings, StoreError> {
        let raw = self.get(SETTINGS_KEY).await?;
        Ok(merge_settings(defaults, raw.as_deref()))
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.put(SETTINGS_KEY, serde_json::to_string(settings)?).await
    }
}
