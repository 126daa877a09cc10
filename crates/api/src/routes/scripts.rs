//! Script management and market data routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use sharedesk_client::{
    ScriptRepository,
    entities::{PricePoint, Script, ScriptInput},
};
use sharedesk_shared::{
    AppError,
    types::{PageRequest, PageResponse, ScriptId},
};
use tracing::info;
use validator::Validate;

use crate::{
    AppState,
    error::{ApiError, JsonBody},
    middleware::Session,
};

/// Creates the script routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/scripts", get(list_scripts).post(create_script))
        .route("/scripts/chart", get(chart))
        .route("/scripts/fetch-stock-details", post(fetch_stock_details))
        .route("/scripts/{id}", put(update_script).delete(delete_script))
}

/// Query parameters for the chart feed.
#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// Chart symbol such as `TCS.NS`.
    pub symbol: String,
}

fn repository(state: &AppState, session: &Session) -> ScriptRepository {
    ScriptRepository::new(state.upstream_for(session.token()))
}

/// GET `/scripts` - List scripts.
async fn list_scripts(
    State(state): State<AppState>,
    session: Session,
    Query(page): Query<PageRequest>,
) -> Result<Json<PageResponse<Script>>, ApiError> {
    let scripts = repository(&state, &session).list(&page.normalized()).await?;
    Ok(Json(scripts))
}

/// POST `/scripts` - Create a script.
async fn create_script(
    State(state): State<AppState>,
    session: Session,
    WithRejection(Json(payload), _): JsonBody<ScriptInput>,
) -> Result<(StatusCode, Json<Script>), ApiError> {
    payload.validate()?;
    let script = repository(&state, &session).create(&payload).await?;
    info!(script_id = %script.id, name = %script.name, "Script created");
    Ok((StatusCode::CREATED, Json(script)))
}

/// PUT `/scripts/{id}` - Update a script.
async fn update_script(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ScriptId>,
    WithRejection(Json(payload), _): JsonBody<ScriptInput>,
) -> Result<Json<Script>, ApiError> {
    payload.validate()?;
    let script = repository(&state, &session).update(id, &payload).await?;
    info!(script_id = %id, "Script updated");
    Ok(Json(script))
}

/// DELETE `/scripts/{id}` - Delete a script.
async fn delete_script(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ScriptId>,
) -> Result<StatusCode, ApiError> {
    repository(&state, &session).delete(id).await?;
    info!(script_id = %id, "Script deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/scripts/chart?symbol=` - Daily closing prices.
async fn chart(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ChartQuery>,
) -> Result<Json<Vec<PricePoint>>, ApiError> {
    let symbol = query.symbol.trim();
    if symbol.is_empty() {
        return Err(AppError::Validation("symbol is required".to_string()).into());
    }
    let points = repository(&state, &session).chart(symbol).await?;
    Ok(Json(points))
}

/// POST `/scripts/fetch-stock-details` - Refresh quotes upstream.
async fn fetch_stock_details(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<serde_json::Value>>, ApiError> {
    let details = repository(&state, &session).fetch_stock_details().await?;
    info!(count = details.len(), "Stock details refreshed");
    Ok(Json(details))
}
