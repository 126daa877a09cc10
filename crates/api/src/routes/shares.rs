//! Share transaction routes.
//!
//! Writes go through the ledger service so every stored row carries the
//! average price, profit/loss and position recomputed from its ledger.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sharedesk_client::{
    ShareRepository,
    entities::{ShareListFilter, ShareListItem},
};
use sharedesk_core::ledger::{
    HistoryPreview, LedgerError, LedgerKey, PlannedWrite, ShareInput, TradeCandidate, TradePlan,
    TradeType,
};
use sharedesk_shared::types::{PageRequest, PageResponse, ScriptId, ShareId, SortOrder, UserId};
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, JsonBody},
    middleware::Session,
};

/// Creates the share routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shares", get(list_shares).post(create_share))
        .route("/shares/ledger", get(ledger_preview))
        .route("/shares/plan", post(plan_share))
        .route("/shares/{id}", put(update_share).delete(delete_share))
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for listing shares.
#[derive(Debug, Deserialize)]
pub struct ShareListQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
    /// Free-text search.
    pub search: Option<String>,
    /// Field to sort by.
    pub sort_field: Option<String>,
    /// Sort direction.
    pub sort_order: Option<SortOrder>,
    /// Filter by user.
    pub user_id: Option<UserId>,
    /// Filter by script.
    pub script_id: Option<ScriptId>,
    /// First day included (YYYY-MM-DD).
    pub start_date: Option<NaiveDate>,
    /// Last day included (YYYY-MM-DD).
    pub end_date: Option<NaiveDate>,
}

impl ShareListQuery {
    fn split(self) -> (PageRequest, ShareListFilter) {
        let defaults = PageRequest::default();
        let page = PageRequest {
            page: self.page.unwrap_or(defaults.page),
            limit: self.limit.unwrap_or(defaults.limit),
            search: self.search,
            sort_field: self.sort_field,
            sort_order: self.sort_order,
        }
        .normalized();
        let filter = ShareListFilter {
            user_id: self.user_id,
            script_id: self.script_id,
            start_date: self.start_date,
            end_date: self.end_date,
        };
        (page, filter)
    }
}

/// Query parameters selecting one ledger.
#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    /// Owner of the holding.
    pub user_id: UserId,
    /// Script traded.
    pub script_id: ScriptId,
}

/// Request body for creating or rewriting a transaction.
///
/// The trade type stays a string until the handler parses it, so an
/// unknown type is reported as an invalid transaction.
#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    /// Owner of the holding.
    pub user_id: UserId,
    /// Script traded.
    pub script_id: ScriptId,
    /// `buy` or `sell`.
    #[serde(rename = "type")]
    pub trade_type: String,
    /// Units to transact.
    pub quantity: i64,
    /// Unit price.
    pub price: Decimal,
}

impl ShareRequest {
    fn into_input(self) -> Result<ShareInput, ApiError> {
        Ok(ShareInput {
            user_id: self.user_id,
            script_id: self.script_id,
            trade_type: parse_trade_type(&self.trade_type)?,
            quantity: self.quantity,
            price: self.price,
        })
    }
}

/// Request body for planning a trade without writing it.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    /// Owner of the holding.
    pub user_id: UserId,
    /// Script traded.
    pub script_id: ScriptId,
    /// `buy` or `sell`.
    #[serde(rename = "type")]
    pub trade_type: String,
    /// Units to transact.
    pub quantity: i64,
    /// Unit price.
    pub price: Decimal,
    /// Transaction being edited, left out of the history.
    #[serde(default)]
    pub exclude_id: Option<ShareId>,
}

impl PlanRequest {
    fn candidate(&self) -> Result<TradeCandidate, ApiError> {
        Ok(TradeCandidate {
            trade_type: parse_trade_type(&self.trade_type)?,
            quantity: self.quantity,
            price: self.price,
        })
    }
}

fn parse_trade_type(raw: &str) -> Result<TradeType, ApiError> {
    raw.parse::<TradeType>()
        .map_err(|e| LedgerError::from(e).into())
}

fn repository(state: &AppState, session: &Session) -> ShareRepository {
    ShareRepository::new(state.upstream_for(session.token()))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET `/shares` - List share transactions.
async fn list_shares(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ShareListQuery>,
) -> Result<Json<PageResponse<ShareListItem>>, ApiError> {
    let (page, filter) = query.split();
    let shares = repository(&state, &session).list(&page, &filter).await?;
    Ok(Json(shares))
}

/// POST `/shares` - Record a buy or sell.
async fn create_share(
    State(state): State<AppState>,
    session: Session,
    WithRejection(Json(request), _): JsonBody<ShareRequest>,
) -> Result<(StatusCode, Json<PlannedWrite>), ApiError> {
    let input = request.into_input()?;
    let store = repository(&state, &session);
    let written = state.ledger.create(&store, &input).await?;
    Ok((StatusCode::CREATED, Json(written)))
}

/// PUT `/shares/{id}` - Rewrite a transaction.
async fn update_share(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ShareId>,
    WithRejection(Json(request), _): JsonBody<ShareRequest>,
) -> Result<Json<PlannedWrite>, ApiError> {
    let input = request.into_input()?;
    let store = repository(&state, &session);
    let written = state.ledger.update(&store, id, &input).await?;
    Ok(Json(written))
}

/// DELETE `/shares/{id}` - Delete a transaction.
///
/// Later rows of the ledger keep their stored values; the ledger preview
/// flags them as drifted.
async fn delete_share(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ShareId>,
) -> Result<StatusCode, ApiError> {
    repository(&state, &session).delete(id).await?;
    info!(transaction_id = %id, "Share transaction deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/shares/ledger?user_id=&script_id=` - Recomputed history of one ledger.
async fn ledger_preview(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<HistoryPreview>, ApiError> {
    let store = repository(&state, &session);
    let key = LedgerKey::new(query.user_id, query.script_id);
    let snapshot = state.ledger.preview(&store, key).await?;
    Ok(Json(HistoryPreview::build(&snapshot, &state.display)))
}

/// POST `/shares/plan` - Evaluate a trade against the current ledger.
async fn plan_share(
    State(state): State<AppState>,
    session: Session,
    WithRejection(Json(request), _): JsonBody<PlanRequest>,
) -> Result<Json<TradePlan>, ApiError> {
    let candidate = request.candidate()?;
    let store = repository(&state, &session);
    let key = LedgerKey::new(request.user_id, request.script_id);
    let plan = state
        .ledger
        .plan(&store, key, &candidate, request.exclude_id)
        .await?;
    Ok(Json(plan))
}
