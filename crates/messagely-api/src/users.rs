use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::debug;

use messagely_types::api::Claims;

use crate::auth::AppState;
use crate::error::ApiError;

// Any authenticated user may read any account; there is no per-user ACL.

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.directory.all().await?;
    Ok(Json(users))
}

/// GET /users/{username}
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.directory.get(&username).await?;
    Ok(Json(profile))
}

/// GET /users/{username}/from
pub async fn messages_from(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    debug!("{} listing messages from {}", claims.username, username);
    let messages = state.directory.messages_from(&username).await?;
    Ok(Json(messages))
}

/// GET /users/{username}/to
pub async fn messages_to(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    debug!("{} listing messages to {}", claims.username, username);
    let messages = state.directory.messages_to(&username).await?;
    Ok(Json(messages))
}
