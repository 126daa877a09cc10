//! Dashboard routes.

use axum::{Json, Router, extract::State, routing::get};
use sharedesk_client::{DashboardRepository, entities::DashboardCounters};

use crate::{AppState, error::ApiError, middleware::Session};

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/counters", get(counters))
}

/// GET `/dashboard/counters` - Users, scripts and share transaction counts.
async fn counters(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<DashboardCounters>, ApiError> {
    let counters = DashboardRepository::new(state.upstream_for(session.token()))
        .counters()
        .await?;
    Ok(Json(counters))
}
