//! GraphStore trait definition
//!
//! Defines the abstract interface for all Neo4j graph operations.
//! This trait mirrors the public async methods of `Neo4jClient`,
//! enabling testing with the in-memory mock and future backend swaps.
//!
//! Every farm, picture and reading operation is scoped by the owning
//! username: implementations must only match through
//! `(:User {username})-[:OWNS]->(:Farm)` (or `HAS_PROFILE_PIC`).

use crate::neo4j::models::*;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Check that the store answers a trivial query
    async fn health_check(&self) -> Result<bool>;

    // ========================================================================
    // User operations
    // ========================================================================

    /// Get a user by username
    async fn get_user(&self, username: &str) -> Result<Option<UserNode>>;

    /// Atomically apply one leveling round to a user.
    ///
    /// Read, compute and write happen in one write transaction.
    /// Returns `None` if the user does not exist.
    async fn record_round(&self, username: &str, accuracy: f64) -> Result<Option<LevelUpResult>>;

    // ========================================================================
    // Farm operations
    // ========================================================================

    /// Create a farm, merging the owning user if absent
    async fn create_farm(&self, farm: &FarmNode) -> Result<()>;

    /// List farms owned by a user
    async fn list_farms(&self, owner: &str) -> Result<Vec<FarmNode>>;

    /// Get a farm by id, only if owned by `owner`
    async fn get_farm(&self, owner: &str, id: &str) -> Result<Option<FarmNode>>;

    /// Apply name / crop type / description / updatedAt changes.
    ///
    /// Returns the updated farm, or `None` if no owned farm matched.
    async fn update_farm(
        &self,
        owner: &str,
        id: &str,
        changes: &FarmChanges,
    ) -> Result<Option<FarmNode>>;

    /// Detach-delete a farm together with its sensors, readings and interpretations.
    ///
    /// Returns false if no owned farm matched.
    async fn delete_farm(&self, owner: &str, id: &str) -> Result<bool>;

    // ========================================================================
    // Profile picture operations
    // ========================================================================

    /// Delete any existing picture and attach `pic`, in one write transaction
    async fn replace_profile_pic(&self, username: &str, pic: &ProfilePicNode) -> Result<()>;

    /// Get the user's current profile picture
    async fn get_profile_pic(&self, username: &str) -> Result<Option<ProfilePicNode>>;

    // ========================================================================
    // Notification operations
    // ========================================================================

    /// Persist a new notification
    async fn create_notification(&self, notification: &NotificationNode) -> Result<()>;

    /// List unread notifications for a user, newest first
    async fn list_unread_notifications(&self, user_id: &str) -> Result<Vec<NotificationNode>>;

    /// Get a notification by id
    async fn get_notification(&self, id: &str) -> Result<Option<NotificationNode>>;

    /// Set `read = true`. Returns false if the notification does not exist.
    async fn mark_notification_read(&self, id: &str) -> Result<bool>;

    // ========================================================================
    // Soil analysis operations
    // ========================================================================

    /// Merge the sensor under the owned farm and attach a new reading and interpretation.
    ///
    /// Returns false if no owned farm matched.
    async fn save_sensor_reading(
        &self,
        owner: &str,
        farm_id: &str,
        sensor_id: &str,
        reading: &ReadingNode,
        interpretation: &str,
    ) -> Result<bool>;

    /// List readings of all sensors of an owned farm, newest first
    async fn list_sensor_readings(
        &self,
        owner: &str,
        farm_id: &str,
    ) -> Result<Vec<SensorReadingRecord>>;
}
