//! API route definitions

use super::handlers::{self, AgroState};
use super::{farm_handlers, notification_handlers, profile_handlers, soil_handlers};
use crate::auth::middleware::require_auth;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AgroState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        // ====================================================================
        // Farms
        // ====================================================================
        .route("/api/create/farm", post(farm_handlers::create_farm))
        .route("/api/list/farm", get(farm_handlers::list_farms))
        .route("/api/data/farm/{id}", get(farm_handlers::get_farm))
        .route("/api/update/farm", post(farm_handlers::update_farm))
        .route("/api/delete/farm/{id}", post(farm_handlers::delete_farm))
        // ====================================================================
        // Profile
        // ====================================================================
        .route("/api/profile", get(profile_handlers::get_profile))
        .route(
            "/api/profile/picture",
            get(profile_handlers::get_profile_pic).post(profile_handlers::upload_profile_pic),
        )
        .route(
            "/api/profile/experience",
            post(profile_handlers::record_experience),
        )
        // ====================================================================
        // Notifications
        // ====================================================================
        .route(
            "/api/notifications",
            post(notification_handlers::create_notification),
        )
        .route(
            "/api/notifications/unread",
            get(notification_handlers::list_unread),
        )
        .route(
            "/api/notifications/{id}",
            get(notification_handlers::get_notification),
        )
        .route(
            "/api/notifications/{id}/read",
            post(notification_handlers::mark_read),
        )
        // ====================================================================
        // Soil analysis
        // ====================================================================
        .route(
            "/api/soil/farm/{id}/readings",
            get(soil_handlers::list_readings).post(soil_handlers::save_reading),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
