//! Farm Manager - CRUD operations for farm records
//!
//! All operations take an already verified username and only ever touch
//! farms reachable through `(:User {username})-[:OWNS]->(:Farm)`.
//! Store failures are logged and propagated.

use super::models::*;
use crate::error::ServiceError;
use crate::neo4j::models::{FarmChanges, FarmNode, NotificationType};
use crate::neo4j::GraphStore;
use crate::notifications::{NotificationDraft, NotificationService};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Manager for farm records
pub struct FarmManager {
    neo4j: Arc<dyn GraphStore>,
    notifications: Arc<NotificationService>,
}

impl FarmManager {
    pub fn new(neo4j: Arc<dyn GraphStore>, notifications: Arc<NotificationService>) -> Self {
        Self {
            neo4j,
            notifications,
        }
    }

    /// Create a farm owned by `username`
    pub async fn create_farm(
        &self,
        username: &str,
        req: CreateFarmRequest,
    ) -> Result<CreatedFarm, ServiceError> {
        req.validate()?;

        let now = Utc::now();
        let farm = FarmNode {
            id: Uuid::new_v4().to_string(),
            farm_name: req.farm_name,
            crop_type: req.crop_type,
            description: req.description,
            owner: username.to_string(),
            created_at: now,
            updated_at: now,
            location: req.location,
            image: req.image,
        };

        self.neo4j.create_farm(&farm).await.map_err(|e| {
            tracing::error!(username, error = %e, "Error creating farm");
            ServiceError::StoreUnavailable(e)
        })?;

        tracing::debug!(username, farm_id = %farm.id, "Farm created");
        Ok(CreatedFarm {
            success: "Farm created successfully".to_string(),
            id: farm.id,
        })
    }

    /// List the caller's farms, most recently updated first
    pub async fn list_farms(&self, username: &str) -> Result<Vec<FarmSummary>, ServiceError> {
        let farms = self.neo4j.list_farms(username).await.map_err(|e| {
            tracing::error!(username, error = %e, "Error fetching farm list");
            ServiceError::StoreUnavailable(e)
        })?;

        Ok(farms.iter().map(FarmSummary::from).collect())
    }

    pub async fn get_farm(&self, username: &str, id: &str) -> Result<FarmDetails, ServiceError> {
        let farm = self.neo4j.get_farm(username, id).await.map_err(|e| {
            tracing::error!(username, farm_id = id, error = %e, "Error fetching farm data");
            ServiceError::StoreUnavailable(e)
        })?;

        farm.map(FarmDetails::from)
            .ok_or_else(|| ServiceError::not_found(format!("Farm {}", id)))
    }

    /// Update name, crop type and description; the owner never changes
    pub async fn update_farm(
        &self,
        username: &str,
        req: UpdateFarmRequest,
    ) -> Result<SuccessMessage, ServiceError> {
        req.validate()?;

        let changes = FarmChanges {
            farm_name: req.farm_name,
            crop_type: req.crop_type,
            description: req.description,
            updated_at: Utc::now(),
        };

        let updated = self
            .neo4j
            .update_farm(username, &req.id, &changes)
            .await
            .map_err(|e| {
                tracing::error!(username, farm_id = %req.id, error = %e, "Error updating farm");
                ServiceError::StoreUnavailable(e)
            })?
            .ok_or_else(|| ServiceError::not_found(format!("Farm {}", req.id)))?;

        self.notifications
            .send_realtime(
                username,
                NotificationDraft::new(
                    NotificationType::FarmUpdate,
                    "Farm updated",
                    format!("{} was updated", updated.farm_name),
                )
                .with_metadata(serde_json::json!({
                    "farmName": updated.farm_name,
                    "farmId": updated.id,
                })),
            )
            .await;

        Ok(SuccessMessage::new("Farm updated successfully"))
    }

    /// Delete a farm and everything recorded under it
    pub async fn delete_farm(
        &self,
        username: &str,
        id: &str,
    ) -> Result<SuccessMessage, ServiceError> {
        let deleted = self.neo4j.delete_farm(username, id).await.map_err(|e| {
            tracing::error!(username, farm_id = id, error = %e, "Error deleting farm");
            ServiceError::StoreUnavailable(e)
        })?;

        if !deleted {
            return Err(ServiceError::not_found(format!("Farm {}", id)));
        }
        Ok(SuccessMessage::new("Farm deleted successfully"))
    }
}
