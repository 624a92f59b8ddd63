//! Neo4j graph models for growers, farms, sensors and notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// User Node
// ============================================================================

/// A grower account, keyed by username
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNode {
    pub username: String,
    pub level: u32,
    pub experience: u64,
    pub created_at: Option<DateTime<Utc>>,
}

impl UserNode {
    /// A freshly merged user: level 1, no experience
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            level: 1,
            experience: 0,
            created_at: Some(Utc::now()),
        }
    }
}

// ============================================================================
// Farm Node
// ============================================================================

/// Geographic position of a farm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A farm owned by exactly one user via `(:User)-[:OWNS]->(:Farm)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmNode {
    pub id: String,
    pub farm_name: String,
    pub crop_type: String,
    pub description: Option<String>,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub location: Option<GeoPoint>,
    pub image: Option<String>,
}

/// The mutable subset of a farm
#[derive(Debug, Clone, PartialEq)]
pub struct FarmChanges {
    pub farm_name: String,
    pub crop_type: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Profile Picture Node
// ============================================================================

/// The single profile picture of a user via `(:User)-[:HAS_PROFILE_PIC]->(:ProfilePic)`
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePicNode {
    pub id: String,
    pub image: Vec<u8>,
    pub uploaded_at: DateTime<Utc>,
    pub file_format: String,
    pub file_size: u64,
}

// ============================================================================
// Leveling
// ============================================================================

/// Outcome of applying one round of experience to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUpResult {
    pub new_level: u32,
    pub remaining_experience: u64,
    pub experience_gained: u64,
}

// ============================================================================
// Notification Node
// ============================================================================

/// Category of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    SoilAnalysisSaved,
    NftMinted,
    FarmUpdate,
    SystemAlert,
    Recommendation,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SoilAnalysisSaved => "SOIL_ANALYSIS_SAVED",
            Self::NftMinted => "NFT_MINTED",
            Self::FarmUpdate => "FARM_UPDATE",
            Self::SystemAlert => "SYSTEM_ALERT",
            Self::Recommendation => "RECOMMENDATION",
        }
    }
}

impl std::str::FromStr for NotificationType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SOIL_ANALYSIS_SAVED" => Ok(Self::SoilAnalysisSaved),
            "NFT_MINTED" => Ok(Self::NftMinted),
            "FARM_UPDATE" => Ok(Self::FarmUpdate),
            "SYSTEM_ALERT" => Ok(Self::SystemAlert),
            "RECOMMENDATION" => Ok(Self::Recommendation),
            other => Err(anyhow::anyhow!("Unknown notification type: {}", other)),
        }
    }
}

/// A notification addressed to a user (linked by `userId`, not by an edge)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationNode {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

// ============================================================================
// Soil analysis: Sensor, Reading, Interpretation
// ============================================================================

/// One immutable sensor reading, `(:Sensor)-[:HAS_READING]->(:Reading)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingNode {
    pub id: String,
    pub fertility: f64,
    pub moisture: f64,
    pub ph: f64,
    pub temperature: f64,
    pub sunlight: f64,
    pub humidity: f64,
    pub crop_type: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,
}

/// A reading as returned by a farm-scoped query, with its interpretation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReadingRecord {
    pub farm_name: String,
    pub sensor_id: String,
    pub reading: ReadingNode,
    pub interpretation: Option<String>,
}
