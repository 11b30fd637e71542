use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::info;

use messagely_directory::AccountDirectory;
use messagely_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, TokenResponse};

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub directory: AccountDirectory,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
}

/// POST /auth/register: create the account, record the login, return a token.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;

    let account = state
        .directory
        .register(
            field(&req.username),
            field(&req.password),
            field(&req.first_name),
            field(&req.last_name),
            field(&req.phone),
        )
        .await?;

    let token = create_token(&state.jwt_secret, &account.username, state.token_ttl)
        .map_err(ApiError::internal)?;

    state.directory.update_login_timestamp(&account.username).await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// POST /auth/login: verify credentials, record the login, return a token.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;

    let account = state
        .directory
        .authenticate(field(&req.username), field(&req.password))
        .await?;

    let token = create_token(&state.jwt_secret, &account.username, state.token_ttl)
        .map_err(ApiError::internal)?;

    state.directory.update_login_timestamp(&account.username).await?;

    info!("{} logged in", account.username);
    Ok(Json(LoginResponse {
        message: format!("Welcome, {}", account.username),
        token,
    }))
}

/// Absent and null both read as empty, which validation rejects.
fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

pub fn create_token(secret: &str, username: &str, ttl: chrono::Duration) -> anyhow::Result<String> {
    let now = chrono::Utc::now();
    let claims = Claims {
        username: username.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + ttl).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
