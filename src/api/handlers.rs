//! Shared server state, health check and HTTP error mapping

use crate::auth::TokenVerifier;
use crate::error::ServiceError;
use crate::farm::FarmManager;
use crate::neo4j::GraphStore;
use crate::notifications::NotificationService;
use crate::profile::ProfileManager;
use crate::soil::SoilAnalysisManager;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

/// Shared server state
pub struct ServerState {
    pub graph: Arc<dyn GraphStore>,
    pub farms: FarmManager,
    pub profiles: ProfileManager,
    pub notifications: Arc<NotificationService>,
    pub soil: SoilAnalysisManager,
    /// None means deny-by-default
    pub token_verifier: Option<Arc<dyn TokenVerifier>>,
}

pub type AgroState = Arc<ServerState>;

impl ServerState {
    /// Wire every service onto one graph store
    pub fn new(graph: Arc<dyn GraphStore>, token_verifier: Option<Arc<dyn TokenVerifier>>) -> Self {
        let notifications = Arc::new(NotificationService::new(graph.clone()));
        Self {
            farms: FarmManager::new(graph.clone(), notifications.clone()),
            profiles: ProfileManager::new(graph.clone()),
            soil: SoilAnalysisManager::new(graph.clone(), notifications.clone()),
            notifications,
            graph,
            token_verifier,
        }
    }
}

// ============================================================================
// Health check
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub neo4j: String,
}

/// 200 + `"ok"` when the graph store answers, 503 + `"unhealthy"` otherwise
pub async fn health(State(state): State<AgroState>) -> (StatusCode, Json<HealthResponse>) {
    let neo4j_ok = match state.graph.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!(error = %e, "Neo4j health check failed");
            false
        }
    };

    let (http_status, status) = if neo4j_ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            neo4j: if neo4j_ok { "connected" } else { "disconnected" }.to_string(),
        }),
    )
}

// ============================================================================
// Error handling
// ============================================================================

/// Application error type
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    ServiceUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized(msg) => AppError::Unauthorized(msg),
            ServiceError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
            ServiceError::ValidationFailed(msg) => AppError::BadRequest(msg),
            // the store error itself is already logged by the service layer
            ServiceError::StoreUnavailable(_) => {
                AppError::ServiceUnavailable("Graph store unavailable".to_string())
            }
        }
    }
}
