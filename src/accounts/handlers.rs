use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    accounts::{
        dto::{RegisterRequest, RegisterResponse},
        services,
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub fn account_routes() -> Router<AppState> {
    Router::new().route("/user", post(register))
}

pub(crate) fn reject_body(e: JsonRejection) -> AppError {
    warn!(error = %e, "malformed request body");
    AppError::field("body", e.body_text())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(payload) = payload.map_err(reject_body)?;
    let registration = payload.validate().map_err(|e| {
        warn!("registration input rejected");
        e
    })?;

    let account = services::register(&state, registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: account.into(),
            message: "User created successfully",
        }),
    ))
}
