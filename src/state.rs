use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::accounts::repo::{AccountStore, PgAccountStore};
use crate::auth::{jwt::JwtKeys, password::CredentialHasher};
use crate::config::AppConfig;

/// Per-request context. Everything a handler needs is reached through
/// here; there is no global session state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<dyn AccountStore>,
    pub hasher: CredentialHasher,
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let db = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;

        let accounts = Arc::new(PgAccountStore::new(db)) as Arc<dyn AccountStore>;
        Self::from_parts(config, accounts)
    }

    pub fn from_parts(config: AppConfig, accounts: Arc<dyn AccountStore>) -> anyhow::Result<Self> {
        let hasher = CredentialHasher::new(config.password_hash)?;
        let jwt = Arc::new(JwtKeys::new(&config.jwt));
        Ok(Self {
            config: Arc::new(config),
            accounts,
            hasher,
            jwt,
        })
    }
}
