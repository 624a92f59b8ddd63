//! Soil sensor readings recorded against farms
//!
//! `(:Farm)-[:HAS_SENSOR]->(:Sensor)-[:HAS_READING]->(:Reading)-[:INTERPRETED_AS]->(:Interpretation)`

pub mod manager;
pub mod models;

pub use manager::SoilAnalysisManager;
pub use models::ReadingSubmission;
