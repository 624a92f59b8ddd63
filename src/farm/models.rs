//! Request and response types for farm records

use crate::error::ServiceError;
use crate::neo4j::models::{FarmNode, GeoPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generic acknowledgement body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessMessage {
    pub success: String,
}

impl SuccessMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: message.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFarmRequest {
    pub farm_name: String,
    pub crop_type: String,
    pub description: Option<String>,
    pub location: Option<GeoPoint>,
    pub image: Option<String>,
}

impl CreateFarmRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        require_text("farmName", &self.farm_name)?;
        require_text("cropType", &self.crop_type)?;
        if let Some(location) = self.location {
            if !location.lat.is_finite() || !(-90.0..=90.0).contains(&location.lat) {
                return Err(ServiceError::invalid("location.lat must be within [-90, 90]"));
            }
            if !location.lng.is_finite() || !(-180.0..=180.0).contains(&location.lng) {
                return Err(ServiceError::invalid(
                    "location.lng must be within [-180, 180]",
                ));
            }
        }
        Ok(())
    }
}

/// Only the name, crop type and description of a farm can change
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFarmRequest {
    pub id: String,
    pub farm_name: String,
    pub crop_type: String,
    pub description: Option<String>,
}

impl UpdateFarmRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        require_text("id", &self.id)?;
        require_text("farmName", &self.farm_name)?;
        require_text("cropType", &self.crop_type)
    }
}

fn require_text(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::invalid(format!("{} must not be empty", field)));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedFarm {
    pub success: String,
    pub id: String,
}

/// One row of the farm list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmSummary {
    pub id: String,
    pub farm_name: String,
    pub crop_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub formatted_created_at: String,
    pub formatted_updated_at: String,
}

impl From<&FarmNode> for FarmSummary {
    fn from(farm: &FarmNode) -> Self {
        Self {
            id: farm.id.clone(),
            farm_name: farm.farm_name.clone(),
            crop_type: farm.crop_type.clone(),
            created_at: farm.created_at,
            updated_at: farm.updated_at,
            formatted_created_at: display_date(&farm.created_at),
            formatted_updated_at: display_date(&farm.updated_at),
        }
    }
}

/// A full farm record with display-ready dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmDetails {
    #[serde(flatten)]
    pub farm: FarmNode,
    pub formatted_created_at: String,
    pub formatted_updated_at: String,
}

impl From<FarmNode> for FarmDetails {
    fn from(farm: FarmNode) -> Self {
        Self {
            formatted_created_at: display_date(&farm.created_at),
            formatted_updated_at: display_date(&farm.updated_at),
            farm,
        }
    }
}

/// en-US long date, e.g. "October 14, 2026"
pub fn display_date(dt: &DateTime<Utc>) -> String {
    dt.format("%B %-d, %Y").to_string()
}
