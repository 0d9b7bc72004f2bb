use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: u32,
}

/// Argon2id work factor. Defaults follow the OWASP baseline.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt: JwtConfig,
    pub password_hash: HashConfig,
    pub store_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "jamlab".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "jamlab-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60)?,
        };
        anyhow::ensure!(jwt.ttl_minutes > 0, "JWT_TTL_MINUTES must be positive");

        let defaults = HashConfig::default();
        let password_hash = HashConfig {
            memory_kib: env_or("PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: env_or("PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: env_or("PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
        };

        Ok(Self {
            database_url,
            database_max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10)?,
            jwt,
            password_hash,
            store_timeout: Duration::from_millis(env_or("STORE_TIMEOUT_MS", 5_000)?),
        })
    }
}

/// Unset means `default`; set but unparseable is an error.
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T> {
    match std::env::var(key) {
        Err(std::env::VarError::NotPresent) => Ok(default),
        Ok(v) => v
            .trim()
            .parse::<T>()
            .ok()
            .with_context(|| format!("{key} must be a number")),
        Err(e) => Err(e).with_context(|| format!("{key} must be a number")),
    }
}
