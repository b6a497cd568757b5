use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Duration;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::token::SCOPE_AUTHENTICATION;
use crate::models::LoginCredentials;
use crate::repositories::{TokenRepository, UserRepository};

#[derive(Clone)]
pub struct TokensState {
    pub token_repo: TokenRepository,
    pub user_repo: UserRepository,
}

const TOKEN_TTL_HOURS: i64 = 24;

pub async fn create_authentication_token(
    State(state): State<TokensState>,
    payload: std::result::Result<Json<LoginCredentials>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(credentials) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    // Unknown user and wrong password get the same response, so the endpoint
    // cannot be used to enumerate accounts.
    let user = state
        .user_repo
        .find_by_username(&credentials.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid credentials".to_string()))?;

    if !user.password_hash.matches(&credentials.password)? {
        tracing::debug!("Failed login attempt for {}", credentials.username);
        return Err(AppError::Unauthorized("invalid credentials".to_string()));
    }

    let token = state
        .token_repo
        .create(
            user.id,
            Duration::hours(TOKEN_TTL_HOURS),
            SCOPE_AUTHENTICATION,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "auth_token": token.plaintext })),
    ))
}
