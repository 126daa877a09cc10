//! Authentication middleware for protected routes.
//!
//! Tokens are issued and checked by the upstream. The middleware only makes
//! sure a bearer token is present and hands it to the handlers, which
//! forward it with every upstream call.

use axum::{
    Json,
    extract::{FromRequestParts, Request},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sharedesk_shared::AccessToken;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Rejects requests without a bearer token and stores the token in the
/// request extensions.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token)
        .and_then(AccessToken::new);

    let Some(token) = token else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "MISSING_TOKEN",
                "message": "Authorization header with Bearer token is required"
            })),
        )
            .into_response();
    };

    request.extensions_mut().insert(Session(token));
    next.run(request).await
}

/// The caller's upstream session.
///
/// ```ignore
/// async fn handler(State(state): State<AppState>, session: Session) -> impl IntoResponse {
///     let client = state.upstream_for(session.token());
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Session(pub AccessToken);

impl Session {
    /// Returns the bearer token.
    #[must_use]
    pub const fn token(&self) -> &AccessToken {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "UNAUTHORIZED",
                    "message": "Authentication required"
                })),
            )
        })
    }
}
