use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::RegisterUser;
use crate::repositories::UserRepository;

#[derive(Clone)]
pub struct UsersState {
    pub user_repo: UserRepository,
}

const MAX_USERNAME_LEN: usize = 50;
const MIN_PASSWORD_LEN: usize = 8;

fn validate(req: &RegisterUser) -> Result<()> {
    if req.username.trim().is_empty() {
        return Err(AppError::Validation("username is required".to_string()));
    }
    if req.username.len() > MAX_USERNAME_LEN {
        return Err(AppError::Validation(
            "username must be at most 50 characters".to_string(),
        ));
    }
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(AppError::Validation("a valid email is required".to_string()));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}

pub async fn register(
    State(state): State<UsersState>,
    payload: std::result::Result<Json<RegisterUser>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    validate(&req)?;

    let user = state
        .user_repo
        .create(&req.username, &req.email, &req.password, &req.bio)
        .await?;

    tracing::info!("Registered user {}", user.username);

    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}
