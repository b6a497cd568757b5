use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::middleware::CurrentIdentity;
use crate::models::{CreateWorkout, Identity, UpdateWorkout};
use crate::repositories::WorkoutRepository;

#[derive(Clone)]
pub struct WorkoutsState {
    pub workout_repo: WorkoutRepository,
}

fn workout_id(path: std::result::Result<Path<i64>, PathRejection>) -> Result<i64> {
    let Path(id) = path.map_err(|_| AppError::BadRequest("invalid workout id".to_string()))?;
    Ok(id)
}

/// Ownership gate for mutating operations. Anonymous callers are rejected
/// before the ownership comparison; a mismatch is a distinct forbidden
/// outcome, never disguised as not-found.
async fn authorize_owner(
    state: &WorkoutsState,
    identity: &Identity,
    workout_id: i64,
) -> Result<()> {
    let user = identity
        .user()
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))?;

    let owner = state
        .workout_repo
        .get_owner(workout_id)
        .await?
        .ok_or_else(|| AppError::NotFound("workout not found".to_string()))?;

    if owner != user.id {
        tracing::debug!(
            "User {} denied access to workout {} owned by {}",
            user.id,
            workout_id,
            owner
        );
        return Err(AppError::Forbidden(
            "you do not have permission to modify this workout".to_string(),
        ));
    }

    Ok(())
}

pub async fn get_by_id(
    State(state): State<WorkoutsState>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse> {
    let id = workout_id(path)?;

    let workout = state
        .workout_repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("workout not found".to_string()))?;

    Ok(Json(json!({ "workout": workout })))
}

pub async fn create(
    State(state): State<WorkoutsState>,
    CurrentIdentity(identity): CurrentIdentity,
    payload: std::result::Result<Json<CreateWorkout>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let user = identity
        .user()
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))?;

    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let workout = state.workout_repo.create(user.id, req).await?;

    Ok((StatusCode::CREATED, Json(json!({ "workout": workout }))))
}

pub async fn update(
    State(state): State<WorkoutsState>,
    CurrentIdentity(identity): CurrentIdentity,
    path: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<UpdateWorkout>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let id = workout_id(path)?;
    let Json(patch) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    authorize_owner(&state, &identity, id).await?;

    let mut workout = state
        .workout_repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("workout not found".to_string()))?;

    if let Some(title) = patch.title {
        workout.title = title;
    }
    if let Some(description) = patch.description {
        workout.description = description;
    }
    if let Some(duration_minutes) = patch.duration_minutes {
        workout.duration_minutes = duration_minutes;
    }
    if let Some(calories_burned) = patch.calories_burned {
        workout.calories_burned = calories_burned;
    }

    state.workout_repo.update(&workout, patch.entries).await?;

    // Re-read so replaced entries come back with their assigned ids.
    let workout = state
        .workout_repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::Internal("workout disappeared during update".to_string()))?;

    Ok(Json(json!({ "workout": workout })))
}

pub async fn delete(
    State(state): State<WorkoutsState>,
    CurrentIdentity(identity): CurrentIdentity,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<StatusCode> {
    let id = workout_id(path)?;

    authorize_owner(&state, &identity, id).await?;

    state.workout_repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
