//! Soil reading API handlers

use super::handlers::{AgroState, AppError};
use crate::auth::AuthUser;
use crate::neo4j::models::{ReadingNode, SensorReadingRecord};
use crate::soil::ReadingSubmission;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn save_reading(
    State(state): State<AgroState>,
    user: AuthUser,
    Path(farm_id): Path<String>,
    Json(submission): Json<ReadingSubmission>,
) -> Result<(StatusCode, Json<ReadingNode>), AppError> {
    let reading = state
        .soil
        .save_reading(&user.username, &farm_id, submission)
        .await?;
    Ok((StatusCode::CREATED, Json(reading)))
}

pub async fn list_readings(
    State(state): State<AgroState>,
    user: AuthUser,
    Path(farm_id): Path<String>,
) -> Result<Json<Vec<SensorReadingRecord>>, AppError> {
    Ok(Json(
        state.soil.list_readings(&user.username, &farm_id).await?,
    ))
}
