//! Soil Analysis Manager - records and lists sensor readings per farm

use super::models::ReadingSubmission;
use crate::error::ServiceError;
use crate::neo4j::models::{NotificationType, ReadingNode, SensorReadingRecord};
use crate::neo4j::GraphStore;
use crate::notifications::{NotificationDraft, NotificationService};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct SoilAnalysisManager {
    neo4j: Arc<dyn GraphStore>,
    notifications: Arc<NotificationService>,
}

impl SoilAnalysisManager {
    pub fn new(neo4j: Arc<dyn GraphStore>, notifications: Arc<NotificationService>) -> Self {
        Self {
            neo4j,
            notifications,
        }
    }

    /// Store one reading under a sensor of an owned farm.
    ///
    /// The reading inherits the farm's crop type at the time of submission.
    pub async fn save_reading(
        &self,
        username: &str,
        farm_id: &str,
        submission: ReadingSubmission,
    ) -> Result<ReadingNode, ServiceError> {
        submission.validate()?;

        let farm = self
            .neo4j
            .get_farm(username, farm_id)
            .await
            .map_err(|e| {
                tracing::error!(username, farm_id, error = %e, "Error loading farm for reading");
                ServiceError::StoreUnavailable(e)
            })?
            .ok_or_else(|| ServiceError::not_found(format!("Farm {}", farm_id)))?;

        let now = Utc::now();
        let reading = ReadingNode {
            id: Uuid::new_v4().to_string(),
            fertility: submission.fertility,
            moisture: submission.moisture,
            ph: submission.ph,
            temperature: submission.temperature,
            sunlight: submission.sunlight,
            humidity: submission.humidity,
            crop_type: farm.crop_type.clone(),
            username: username.to_string(),
            created_at: submission.created_at.unwrap_or(now),
            submitted_at: now,
        };

        let saved = self
            .neo4j
            .save_sensor_reading(
                username,
                farm_id,
                &submission.sensor_id,
                &reading,
                &submission.interpretation,
            )
            .await
            .map_err(|e| {
                tracing::error!(username, farm_id, error = %e, "Error saving sensor reading");
                ServiceError::StoreUnavailable(e)
            })?;
        // farm vanished between the lookup and the write
        if !saved {
            return Err(ServiceError::not_found(format!("Farm {}", farm_id)));
        }

        self.notifications
            .send_realtime(
                username,
                NotificationDraft::new(
                    NotificationType::SoilAnalysisSaved,
                    "Soil analysis saved",
                    format!(
                        "New reading from sensor {} on {}",
                        submission.sensor_id, farm.farm_name
                    ),
                )
                .with_metadata(serde_json::json!({
                    "farmName": farm.farm_name,
                    "sensorId": submission.sensor_id,
                })),
            )
            .await;

        tracing::debug!(username, farm_id, reading_id = %reading.id, "Sensor reading saved");
        Ok(reading)
    }

    /// All readings of an owned farm, newest first
    pub async fn list_readings(
        &self,
        username: &str,
        farm_id: &str,
    ) -> Result<Vec<SensorReadingRecord>, ServiceError> {
        let farm = self.neo4j.get_farm(username, farm_id).await.map_err(|e| {
            tracing::error!(username, farm_id, error = %e, "Error loading farm for readings");
            ServiceError::StoreUnavailable(e)
        })?;
        if farm.is_none() {
            return Err(ServiceError::not_found(format!("Farm {}", farm_id)));
        }

        self.neo4j
            .list_sensor_readings(username, farm_id)
            .await
            .map_err(|e| {
                tracing::error!(username, farm_id, error = %e, "Error listing sensor readings");
                ServiceError::StoreUnavailable(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farm::FarmManager;
    use crate::neo4j::mock::MockGraphStore;
    use crate::soil::models::test_submission;
    use crate::test_helpers::test_farm_owned_by;
    use chrono::{Duration, TimeZone};

    async fn setup() -> (Arc<MockGraphStore>, SoilAnalysisManager, String) {
        let farm = test_farm_owned_by("alice", "Paddy");
        let farm_id = farm.id.clone();
        let store = Arc::new(MockGraphStore::new().with_farm(farm).await);
        let notifications = Arc::new(NotificationService::new(store.clone()));
        (
            store.clone(),
            SoilAnalysisManager::new(store, notifications),
            farm_id,
        )
    }

    #[tokio::test]
    async fn test_save_reading_copies_crop_type_and_notifies() {
        let (store, mgr, farm_id) = setup().await;

        let reading = mgr
            .save_reading("alice", &farm_id, test_submission("S-1"))
            .await
            .unwrap();
        assert_eq!(reading.crop_type, "rice");
        assert_eq!(reading.username, "alice");

        let stored = store.readings.read().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].sensor_id, "S-1");
        assert_eq!(stored[0].interpretation, "Slightly acidic, adequate moisture");
        drop(stored);

        let notes = store.list_unread_notifications("alice").await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].notification_type, NotificationType::SoilAnalysisSaved);
        assert_eq!(notes[0].metadata["farmName"], "Paddy");
        assert_eq!(notes[0].metadata["sensorId"], "S-1");
    }

    #[tokio::test]
    async fn test_sensor_is_merged_once() {
        let (store, mgr, farm_id) = setup().await;
        for _ in 0..3 {
            mgr.save_reading("alice", &farm_id, test_submission("S-1"))
                .await
                .unwrap();
        }
        assert_eq!(store.farm_sensors.read().await[&farm_id], vec!["S-1"]);
        assert_eq!(store.readings.read().await.len(), 3);
    }

    #[tokio::test]
    async fn test_foreign_farm_is_not_found() {
        let (store, mgr, farm_id) = setup().await;
        let result = mgr
            .save_reading("mallory", &farm_id, test_submission("S-1"))
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        assert!(store.readings.read().await.is_empty());

        assert!(matches!(
            mgr.list_readings("mallory", &farm_id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_submission_is_rejected() {
        let (_, mgr, farm_id) = setup().await;
        let mut sub = test_submission("S-1");
        sub.ph = 20.0;
        assert!(matches!(
            mgr.save_reading("alice", &farm_id, sub).await,
            Err(ServiceError::ValidationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_list_readings_newest_first() {
        let (_, mgr, farm_id) = setup().await;
        let base = Utc.with_ymd_and_hms(2026, 10, 1, 6, 0, 0).unwrap();
        for (sensor, offset) in [("S-old", 0), ("S-new", 2), ("S-mid", 1)] {
            let mut sub = test_submission(sensor);
            sub.created_at = Some(base + Duration::hours(offset));
            mgr.save_reading("alice", &farm_id, sub).await.unwrap();
        }

        let records = mgr.list_readings("alice", &farm_id).await.unwrap();
        let sensors: Vec<_> = records.iter().map(|r| r.sensor_id.as_str()).collect();
        assert_eq!(sensors, vec!["S-new", "S-mid", "S-old"]);
        assert!(records.iter().all(|r| r.farm_name == "Paddy"));
    }

    #[tokio::test]
    async fn test_deleting_farm_removes_sensors_and_readings() {
        let (store, mgr, farm_id) = setup().await;
        mgr.save_reading("alice", &farm_id, test_submission("S-1"))
            .await
            .unwrap();
        mgr.save_reading("alice", &farm_id, test_submission("S-2"))
            .await
            .unwrap();

        let farms = FarmManager::new(
            store.clone(),
            Arc::new(NotificationService::new(store.clone())),
        );
        farms.delete_farm("alice", &farm_id).await.unwrap();

        assert!(store.readings.read().await.is_empty());
        assert!(store.farm_sensors.read().await.is_empty());
        assert!(matches!(
            mgr.list_readings("alice", &farm_id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
