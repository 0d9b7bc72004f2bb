use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::accounts::dto::Registration;
use crate::accounts::repo::{StoreError, StoreResult};
use crate::accounts::repo_types::{Account, NewAccount};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Bounds a store call; an elapsed deadline is reported as `StoreError::Timeout`.
pub(crate) async fn with_deadline<T>(
    limit: Duration,
    op: impl Future<Output = StoreResult<T>>,
) -> StoreResult<T> {
    tokio::time::timeout(limit, op)
        .await
        .unwrap_or(Err(StoreError::Timeout))
}

/// Creates the account: one lookup, one hash, one insert.
///
/// The lookup is only a fast path. The store's own uniqueness constraint
/// decides when two requests race for the same email.
pub async fn register(state: &AppState, reg: Registration) -> AppResult<Account> {
    let limit = state.config.store_timeout;

    if with_deadline(limit, state.accounts.find_by_email(&reg.email))
        .await?
        .is_some()
    {
        warn!(email = %reg.email, "email already registered");
        return Err(AppError::DuplicateAccount);
    }

    let password_hash = state.hasher.hash_blocking(reg.password).await?;
    debug!("password hashed");

    let account = with_deadline(
        limit,
        state.accounts.create(NewAccount {
            first_name: reg.first_name,
            last_name: reg.last_name,
            email: reg.email,
            password_hash,
        }),
    )
    .await
    .map_err(|e| {
        if matches!(e, StoreError::DuplicateEmail) {
            warn!("email registered concurrently");
        }
        AppError::from(e)
    })?;

    info!(account_id = %account.id, email = %account.email, "account registered");
    Ok(account)
}

/// Checks an email/password pair. Unknown emails and wrong passwords are
/// indistinguishable to the caller.
pub async fn authenticate(state: &AppState, email: &str, password: String) -> AppResult<Account> {
    let limit = state.config.store_timeout;

    let Some(account) = with_deadline(limit, state.accounts.find_by_email(email)).await? else {
        state.hasher.verify_decoy_blocking(password).await?;
        warn!(email = %email, "sign-in unknown email");
        return Err(AppError::InvalidCredentials);
    };

    let ok = state
        .hasher
        .verify_blocking(password, account.password_hash.clone())
        .await?;
    if !ok {
        warn!(account_id = %account.id, "sign-in invalid password");
        return Err(AppError::InvalidCredentials);
    }

    Ok(account)
}
