//! Farm records owned by growers

pub mod manager;
pub mod models;

pub use manager::FarmManager;
pub use models::*;
