//! Authentication routes, proxied to the upstream.

use axum::{Json, Router, extract::State, routing::post};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use sharedesk_client::AuthRepository;
use sharedesk_shared::{LoginRequest, LoginResponse, ResetPasswordRequest};
use tracing::{info, warn};
use validator::Validate;

use crate::{
    AppState,
    error::{ApiError, JsonBody},
    middleware::Session,
};

/// Creates the public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Creates the auth routes that need a session.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/reset-password", post(reset_password))
}

/// Response to a password reset.
#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    /// Message from the upstream.
    pub message: String,
}

/// POST /auth/login - Exchange credentials for an upstream token.
async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload.validate()?;

    let response = AuthRepository::new(state.upstream.clone())
        .login(&payload)
        .await
        .inspect_err(|e| warn!(email = %payload.email, error = %e, "Login failed"))?;

    info!(email = %payload.email, "User logged in");
    Ok(Json(response))
}

/// POST /auth/reset-password - Change the caller's password.
async fn reset_password(
    State(state): State<AppState>,
    session: Session,
    WithRejection(Json(payload), _): JsonBody<ResetPasswordRequest>,
) -> Result<Json<ResetPasswordResponse>, ApiError> {
    payload.validate()?;

    let message = AuthRepository::new(state.upstream_for(session.token()))
        .reset_password(&payload)
        .await?;

    info!(email = %payload.email, "Password reset");
    Ok(Json(ResetPasswordResponse {
        message: message.unwrap_or_else(|| "Password updated".to_string()),
    }))
}
