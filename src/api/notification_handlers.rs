//! Notification API handlers
//!
//! By-id access is scoped to the caller: a notification of another user
//! is reported exactly like a missing one. During a store outage the
//! by-id lookup degrades to 404 and mark-read degrades to `{"read": false}`.

use super::handlers::{AgroState, AppError};
use crate::auth::AuthUser;
use crate::neo4j::models::NotificationNode;
use crate::notifications::NotificationDraft;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub read: bool,
}

/// Unread notifications of the caller, newest first
pub async fn list_unread(
    State(state): State<AgroState>,
    user: AuthUser,
) -> Json<Vec<NotificationNode>> {
    Json(state.notifications.unread_for(&user.username).await)
}

pub async fn get_notification(
    State(state): State<AgroState>,
    user: AuthUser,
    Path(notification_id): Path<String>,
) -> Result<Json<NotificationNode>, AppError> {
    Ok(Json(owned_notification(&state, &user, &notification_id).await?))
}

/// Mark one of the caller's notifications as read
pub async fn mark_read(
    State(state): State<AgroState>,
    user: AuthUser,
    Path(notification_id): Path<String>,
) -> Result<Json<MarkReadResponse>, AppError> {
    let read = state
        .notifications
        .mark_as_read_for(&user.username, &notification_id)
        .await
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;
    Ok(Json(MarkReadResponse { read }))
}

/// Create a notification addressed to the caller
pub async fn create_notification(
    State(state): State<AgroState>,
    user: AuthUser,
    Json(draft): Json<NotificationDraft>,
) -> Result<(StatusCode, Json<NotificationNode>), AppError> {
    let notification = state.notifications.create(&user.username, draft).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

async fn owned_notification(
    state: &AgroState,
    user: &AuthUser,
    notification_id: &str,
) -> Result<NotificationNode, AppError> {
    state
        .notifications
        .get_by_id(notification_id)
        .await
        .filter(|n| n.user_id == user.username)
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))
}
