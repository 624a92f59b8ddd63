//! Profile API handlers

use super::handlers::{AgroState, AppError};
use crate::auth::AuthUser;
use crate::farm::SuccessMessage;
use crate::neo4j::models::{LevelUpResult, UserNode};
use crate::profile::{BufferData, ExperienceRequest};
use axum::{extract::State, Json};

pub async fn get_profile(
    State(state): State<AgroState>,
    user: AuthUser,
) -> Result<Json<UserNode>, AppError> {
    Ok(Json(state.profiles.get_profile(&user.username).await?))
}

/// Replace the caller's profile picture with `{bufferData}`
pub async fn upload_profile_pic(
    State(state): State<AgroState>,
    user: AuthUser,
    Json(image): Json<BufferData>,
) -> Result<Json<SuccessMessage>, AppError> {
    state
        .profiles
        .upload_profile_pic(&user.username, &image)
        .await?;
    Ok(Json(SuccessMessage::new("Profile picture upload successful")))
}

pub async fn get_profile_pic(
    State(state): State<AgroState>,
    user: AuthUser,
) -> Result<Json<BufferData>, AppError> {
    Ok(Json(state.profiles.get_profile_pic(&user.username).await?))
}

/// Record one finished round and return the resulting level
pub async fn record_experience(
    State(state): State<AgroState>,
    user: AuthUser,
    Json(req): Json<ExperienceRequest>,
) -> Result<Json<LevelUpResult>, AppError> {
    Ok(Json(
        state
            .profiles
            .record_round(&user.username, req.accuracy)
            .await?,
    ))
}
