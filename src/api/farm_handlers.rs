//! Farm API handlers

use super::handlers::{AgroState, AppError};
use crate::auth::AuthUser;
use crate::farm::{
    CreateFarmRequest, CreatedFarm, FarmDetails, FarmSummary, SuccessMessage, UpdateFarmRequest,
};
use axum::{
    extract::{Path, State},
    Json,
};

/// Create a farm owned by the caller
pub async fn create_farm(
    State(state): State<AgroState>,
    user: AuthUser,
    Json(req): Json<CreateFarmRequest>,
) -> Result<Json<CreatedFarm>, AppError> {
    let created = state.farms.create_farm(&user.username, req).await?;
    Ok(Json(created))
}

/// List the caller's farms
pub async fn list_farms(
    State(state): State<AgroState>,
    user: AuthUser,
) -> Result<Json<Vec<FarmSummary>>, AppError> {
    Ok(Json(state.farms.list_farms(&user.username).await?))
}

pub async fn get_farm(
    State(state): State<AgroState>,
    user: AuthUser,
    Path(farm_id): Path<String>,
) -> Result<Json<FarmDetails>, AppError> {
    Ok(Json(state.farms.get_farm(&user.username, &farm_id).await?))
}

pub async fn update_farm(
    State(state): State<AgroState>,
    user: AuthUser,
    Json(req): Json<UpdateFarmRequest>,
) -> Result<Json<SuccessMessage>, AppError> {
    Ok(Json(state.farms.update_farm(&user.username, req).await?))
}

pub async fn delete_farm(
    State(state): State<AgroState>,
    user: AuthUser,
    Path(farm_id): Path<String>,
) -> Result<Json<SuccessMessage>, AppError> {
    Ok(Json(state.farms.delete_farm(&user.username, &farm_id).await?))
}
