//! `GraphStore` implementation for `Neo4jClient`.
//!
//! Every method simply delegates to the corresponding inherent method on `Neo4jClient`.

use async_trait::async_trait;

use super::client::Neo4jClient;
use super::models::*;
use super::traits::GraphStore;

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn health_check(&self) -> anyhow::Result<bool> {
        self.health_check().await
    }

    // ========================================================================
    // User operations
    // ========================================================================

    async fn get_user(&self, username: &str) -> anyhow::Result<Option<UserNode>> {
        self.get_user(username).await
    }

    async fn record_round(
        &self,
        username: &str,
        accuracy: f64,
    ) -> anyhow::Result<Option<LevelUpResult>> {
        self.record_round(username, accuracy).await
    }

    // ========================================================================
    // Farm operations
    // ========================================================================

    async fn create_farm(&self, farm: &FarmNode) -> anyhow::Result<()> {
        self.create_farm(farm).await
    }

    async fn list_farms(&self, owner: &str) -> anyhow::Result<Vec<FarmNode>> {
        self.list_farms(owner).await
    }

    async fn get_farm(&self, owner: &str, id: &str) -> anyhow::Result<Option<FarmNode>> {
        self.get_farm(owner, id).await
    }

    async fn update_farm(
        &self,
        owner: &str,
        id: &str,
        changes: &FarmChanges,
    ) -> anyhow::Result<Option<FarmNode>> {
        self.update_farm(owner, id, changes).await
    }

    async fn delete_farm(&self, owner: &str, id: &str) -> anyhow::Result<bool> {
        self.delete_farm(owner, id).await
    }

    // ========================================================================
    // Profile picture operations
    // ========================================================================

    async fn replace_profile_pic(
        &self,
        username: &str,
        pic: &ProfilePicNode,
    ) -> anyhow::Result<()> {
        self.replace_profile_pic(username, pic).await
    }

    async fn get_profile_pic(&self, username: &str) -> anyhow::Result<Option<ProfilePicNode>> {
        self.get_profile_pic(username).await
    }

    // ========================================================================
    // Notification operations
    // ========================================================================

    async fn create_notification(&self, notification: &NotificationNode) -> anyhow::Result<()> {
        self.create_notification(notification).await
    }

    async fn list_unread_notifications(
        &self,
        user_id: &str,
    ) -> anyhow::Result<Vec<NotificationNode>> {
        self.list_unread_notifications(user_id).await
    }

    async fn get_notification(&self, id: &str) -> anyhow::Result<Option<NotificationNode>> {
        self.get_notification(id).await
    }

    async fn mark_notification_read(&self, id: &str) -> anyhow::Result<bool> {
        self.mark_notification_read(id).await
    }

    // ========================================================================
    // Soil analysis operations
    // ========================================================================

    async fn save_sensor_reading(
        &self,
        owner: &str,
        farm_id: &str,
        sensor_id: &str,
        reading: &ReadingNode,
        interpretation: &str,
    ) -> anyhow::Result<bool> {
        self.save_sensor_reading(owner, farm_id, sensor_id, reading, interpretation)
            .await
    }

    async fn list_sensor_readings(
        &self,
        owner: &str,
        farm_id: &str,
    ) -> anyhow::Result<Vec<SensorReadingRecord>> {
        self.list_sensor_readings(owner, farm_id).await
    }
}
