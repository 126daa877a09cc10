//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Bearer-token middleware forwarding the session to the upstream
//! - Error responses

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use sharedesk_client::ApiClient;
use sharedesk_core::ledger::{DisplayOptions, LedgerService};
use sharedesk_shared::AccessToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Anonymous upstream client; handlers authorize it per request.
    pub upstream: ApiClient,
    /// Ledger flows with their per-ledger locks.
    pub ledger: LedgerService,
    /// Date rendering for history previews.
    pub display: Arc<DisplayOptions>,
}

impl AppState {
    /// Creates the state with a fresh lock registry.
    #[must_use]
    pub fn new(upstream: ApiClient, display: DisplayOptions) -> Self {
        Self {
            upstream,
            ledger: LedgerService::new(),
            display: Arc::new(display),
        }
    }

    /// Upstream client acting with the caller's token.
    #[must_use]
    pub fn upstream_for(&self, token: &AccessToken) -> ApiClient {
        self.upstream.authorized(token.clone())
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
