//! HTTP API for farms, profiles, notifications and soil readings

pub mod farm_handlers;
pub mod handlers;
pub mod notification_handlers;
pub mod profile_handlers;
pub mod routes;
pub mod soil_handlers;

pub use routes::create_router;
