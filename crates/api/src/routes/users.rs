//! User management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use axum_extra::extract::WithRejection;
use sharedesk_client::{
    UserRepository,
    entities::{User, UserInput},
};
use sharedesk_shared::types::{PageRequest, PageResponse, UserId};
use tracing::info;
use validator::Validate;

use crate::{
    AppState,
    error::{ApiError, JsonBody},
    middleware::Session,
};

/// Creates the user routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", put(update_user).delete(delete_user))
}

fn repository(state: &AppState, session: &Session) -> UserRepository {
    UserRepository::new(state.upstream_for(session.token()))
}

/// GET `/users` - List users.
async fn list_users(
    State(state): State<AppState>,
    session: Session,
    Query(page): Query<PageRequest>,
) -> Result<Json<PageResponse<User>>, ApiError> {
    let users = repository(&state, &session).list(&page.normalized()).await?;
    Ok(Json(users))
}

/// POST `/users` - Create a user.
async fn create_user(
    State(state): State<AppState>,
    session: Session,
    WithRejection(Json(payload), _): JsonBody<UserInput>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    payload.validate()?;
    let user = repository(&state, &session).create(&payload).await?;
    info!(user_id = %user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT `/users/{id}` - Update a user.
async fn update_user(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<UserId>,
    WithRejection(Json(payload), _): JsonBody<UserInput>,
) -> Result<Json<User>, ApiError> {
    payload.validate()?;
    let user = repository(&state, &session).update(id, &payload).await?;
    info!(user_id = %id, "User updated");
    Ok(Json(user))
}

/// DELETE `/users/{id}` - Delete a user.
async fn delete_user(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<UserId>,
) -> Result<StatusCode, ApiError> {
    repository(&state, &session).delete(id).await?;
    info!(user_id = %id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
