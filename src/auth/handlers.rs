use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    accounts::{
        dto::normalize_email,
        handlers::reject_body,
        services::{self, with_deadline},
    },
    auth::{
        dto::{AdminResponse, SignInRequest, SignInResponse},
        extractors::AuthUser,
    },
    error::{AppError, AppResult, FieldErrors},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/sign-in", post(sign_in))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin", get(admin))
}

#[instrument(skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> AppResult<Json<SignInResponse>> {
    let Json(payload) = payload.map_err(reject_body)?;
    let email = normalize_email(&payload.email);

    let mut errors = FieldErrors::new();
    if email.is_empty() {
        errors.insert("email", "Email is required".into());
    }
    if payload.password.is_empty() {
        errors.insert("password", "Password is required".into());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let account = services::authenticate(&state, &email, payload.password).await?;
    let token = state.jwt.sign(account.id)?;

    info!(account_id = %account.id, "signed in");
    Ok(Json(SignInResponse {
        token,
        user: account.into(),
    }))
}

#[instrument(skip(state))]
pub async fn admin(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> AppResult<Json<AdminResponse>> {
    let account = with_deadline(state.config.store_timeout, state.accounts.find_by_id(account_id))
        .await?
        .ok_or_else(|| {
            warn!(%account_id, "session for unknown account");
            AppError::Unauthorized("Account not found")
        })?;

    Ok(Json(AdminResponse {
        user: account.into(),
        message: "You are now logged in to your dashboard.",
    }))
}
