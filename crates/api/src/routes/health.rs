//! Health check endpoint.
//!
//! Reports the upstream this instance proxies to and how many ledgers
//! currently have a write lock registered. The upstream itself is not
//! called.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Base URL of the upstream persistence API.
    pub upstream: String,
    /// Ledgers with a registered write lock.
    pub tracked_ledgers: usize,
}

/// GET `/health`
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        upstream: state.upstream.base_url().to_string(),
        tracked_ledgers: state.ledger.locks().len(),
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, http::StatusCode};
    use mockito::Server;
    use tower::ServiceExt;

    use crate::routes::test_support::{app, json_body};

    #[tokio::test]
    async fn test_health_reports_upstream() {
        let server = Server::new_async().await;

        let response = app(&server)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["upstream"], server.url());
        assert_eq!(body["tracked_ledgers"], 0);
    }
}
