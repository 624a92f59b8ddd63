//! Grower profiles: profile lookup, the profile picture and game leveling

pub mod leveling;
pub mod manager;
pub mod models;

pub use manager::ProfileManager;
pub use models::{BufferData, ExperienceRequest};
