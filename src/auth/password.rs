use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::config::HashConfig;

/// Argon2id hasher carrying the configured work factor.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
    // Hash of a random secret under the same params; checked against when
    // there is no real hash so the miss costs as much as a hit.
    decoy: Arc<str>,
    verifications: Arc<AtomicU64>,
}

impl CredentialHasher {
    pub fn new(cfg: HashConfig) -> anyhow::Result<Self> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| anyhow::anyhow!(e.to_string()))
            .context("invalid argon2 parameters")?;
        let mut hasher = Self {
            params,
            decoy: Arc::from(""),
            verifications: Arc::new(AtomicU64::new(0)),
        };
        let secret = SaltString::generate(&mut OsRng);
        hasher.decoy = Arc::from(hasher.hash(secret.as_str())?);
        Ok(hasher)
    }

    /// Number of verifications run so far, decoys included.
    pub fn verifications(&self) -> u64 {
        self.verifications.load(Ordering::Relaxed)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// Cost parameters are read back from the PHC string, so hashes made
    /// under an older work factor still verify.
    pub fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        self.verifications.fetch_add(1, Ordering::Relaxed);
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            anyhow::anyhow!(e.to_string())
        })?;
        Ok(self
            .argon2()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }

    /// Runs `hash` on the blocking pool.
    pub async fn hash_blocking(&self, plain: String) -> anyhow::Result<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plain))
            .await
            .context("hash task panicked")?
    }

    /// Runs `verify` on the blocking pool.
    pub async fn verify_blocking(&self, plain: String, hash: String) -> anyhow::Result<bool> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plain, &hash))
            .await
            .context("verify task panicked")?
    }

    /// Burns one verification against the decoy hash. Always `false`.
    pub async fn verify_decoy_blocking(&self, plain: String) -> anyhow::Result<bool> {
        let decoy = self.decoy.to_string();
        self.verify_blocking(plain, decoy).await?;
        Ok(false)
    }
}
