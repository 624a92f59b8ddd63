//! In-memory mock implementation of GraphStore for testing.
//!
//! Provides a complete mock of all graph operations using
//! `tokio::sync::RwLock` collections.
//! Conditionally compiled with `#[cfg(test)]`.

use crate::neo4j::models::*;
use crate::neo4j::traits::GraphStore;
use crate::profile::leveling;
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// A reading attached to a sensor of a farm
#[derive(Debug, Clone)]
pub struct StoredReading {
    pub farm_id: String,
    pub sensor_id: String,
    pub reading: ReadingNode,
    pub interpretation: String,
}

/// In-memory mock implementation of GraphStore for testing.
#[derive(Default)]
pub struct MockGraphStore {
    // Entity stores
    pub users: RwLock<HashMap<String, UserNode>>,
    pub farms: RwLock<HashMap<String, FarmNode>>,
    pub notifications: RwLock<HashMap<String, NotificationNode>>,

    // Relationships
    /// `(:User)-[:HAS_PROFILE_PIC]->(:ProfilePic)` edges, kept as a list so
    /// tests can assert that pictures never stack up
    pub profile_pics: RwLock<Vec<(String, ProfilePicNode)>>,
    /// farm id -> sensor ids (`HAS_SENSOR`)
    pub farm_sensors: RwLock<HashMap<String, Vec<String>>>,
    /// `HAS_READING` + `INTERPRETED_AS` chains
    pub readings: RwLock<Vec<StoredReading>>,

    /// When set, every operation fails as if the database were unreachable
    offline: AtomicBool,
}

impl MockGraphStore {
    /// Create a new empty MockGraphStore.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            bail!("mock graph store is offline");
        }
        Ok(())
    }

    // ========================================================================
    // Builder / seeding methods for tests
    // ========================================================================

    /// Seed a user into the store.
    pub async fn with_user(self, user: UserNode) -> Self {
        self.users
            .write()
            .await
            .insert(user.username.clone(), user);
        self
    }

    /// Seed a farm (and its owner) into the store.
    pub async fn with_farm(self, farm: FarmNode) -> Self {
        self.users
            .write()
            .await
            .entry(farm.owner.clone())
            .or_insert_with(|| UserNode::new(farm.owner.clone()));
        self.farms.write().await.insert(farm.id.clone(), farm);
        self
    }

    /// Count the profile pictures attached to a user.
    pub async fn profile_pic_count(&self, username: &str) -> usize {
        self.profile_pics
            .read()
            .await
            .iter()
            .filter(|(owner, _)| owner == username)
            .count()
    }

    async fn owned_farm(&self, owner: &str, id: &str) -> Option<FarmNode> {
        self.farms
            .read()
            .await
            .get(id)
            .filter(|f| f.owner == owner)
            .cloned()
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn health_check(&self) -> Result<bool> {
        Ok(!self.offline.load(Ordering::SeqCst))
    }

    // ========================================================================
    // User operations
    // ========================================================================

    async fn get_user(&self, username: &str) -> Result<Option<UserNode>> {
        self.check_online()?;
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn record_round(&self, username: &str, accuracy: f64) -> Result<Option<LevelUpResult>> {
        self.check_online()?;
        // Holding the write guard across read-compute-write mirrors the node lock
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(username) else {
            return Ok(None);
        };
        let result = leveling::apply_round(user.level, user.experience, accuracy);
        user.level = result.new_level;
        user.experience = result.remaining_experience;
        Ok(Some(result))
    }

    // ========================================================================
    // Farm operations
    // ========================================================================

    async fn create_farm(&self, farm: &FarmNode) -> Result<()> {
        self.check_online()?;
        self.users
            .write()
            .await
            .entry(farm.owner.clone())
            .or_insert_with(|| UserNode::new(farm.owner.clone()));
        self.farms
            .write()
            .await
            .insert(farm.id.clone(), farm.clone());
        Ok(())
    }

    async fn list_farms(&self, owner: &str) -> Result<Vec<FarmNode>> {
        self.check_online()?;
        let mut farms: Vec<FarmNode> = self
            .farms
            .read()
            .await
            .values()
            .filter(|f| f.owner == owner)
            .cloned()
            .collect();
        farms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(farms)
    }

    async fn get_farm(&self, owner: &str, id: &str) -> Result<Option<FarmNode>> {
        self.check_online()?;
        Ok(self.owned_farm(owner, id).await)
    }

    async fn update_farm(
        &self,
        owner: &str,
        id: &str,
        changes: &FarmChanges,
    ) -> Result<Option<FarmNode>> {
        self.check_online()?;
        let mut farms = self.farms.write().await;
        match farms.get_mut(id).filter(|f| f.owner == owner) {
            Some(farm) => {
                farm.farm_name = changes.farm_name.clone();
                farm.crop_type = changes.crop_type.clone();
                farm.description = changes.description.clone();
                farm.updated_at = changes.updated_at;
                Ok(Some(farm.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_farm(&self, owner: &str, id: &str) -> Result<bool> {
        self.check_online()?;
        let mut farms = self.farms.write().await;
        if !farms.get(id).map_or(false, |f| f.owner == owner) {
            return Ok(false);
        }
        farms.remove(id);
        self.farm_sensors.write().await.remove(id);
        self.readings.write().await.retain(|r| r.farm_id != id);
        Ok(true)
    }

    // ========================================================================
    // Profile picture operations
    // ========================================================================

    async fn replace_profile_pic(&self, username: &str, pic: &ProfilePicNode) -> Result<()> {
        self.check_online()?;
        self.users
            .write()
            .await
            .entry(username.to_string())
            .or_insert_with(|| UserNode::new(username));
        let mut pics = self.profile_pics.write().await;
        pics.retain(|(owner, _)| owner != username);
        pics.push((username.to_string(), pic.clone()));
        Ok(())
    }

    async fn get_profile_pic(&self, username: &str) -> Result<Option<ProfilePicNode>> {
        self.check_online()?;
        Ok(self
            .profile_pics
            .read()
            .await
            .iter()
            .find(|(owner, _)| owner == username)
            .map(|(_, pic)| pic.clone()))
    }

    // ========================================================================
    // Notification operations
    // ========================================================================

    async fn create_notification(&self, notification: &NotificationNode) -> Result<()> {
        self.check_online()?;
        self.notifications
            .write()
            .await
            .insert(notification.id.clone(), notification.clone());
        Ok(())
    }

    async fn list_unread_notifications(&self, user_id: &str) -> Result<Vec<NotificationNode>> {
        self.check_online()?;
        let mut unread: Vec<NotificationNode> = self
            .notifications
            .read()
            .await
            .values()
            .filter(|n| n.user_id == user_id && !n.read)
            .cloned()
            .collect();
        unread.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(unread)
    }

    async fn get_notification(&self, id: &str) -> Result<Option<NotificationNode>> {
        self.check_online()?;
        Ok(self.notifications.read().await.get(id).cloned())
    }

    async fn mark_notification_read(&self, id: &str) -> Result<bool> {
        self.check_online()?;
        match self.notifications.write().await.get_mut(id) {
            Some(n) => {
                n.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
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
    ) -> Result<bool> {
        self.check_online()?;
        if self.owned_farm(owner, farm_id).await.is_none() {
            return Ok(false);
        }
        let mut sensors = self.farm_sensors.write().await;
        let farm_sensors = sensors.entry(farm_id.to_string()).or_default();
        if !farm_sensors.iter().any(|s| s == sensor_id) {
            farm_sensors.push(sensor_id.to_string());
        }
        self.readings.write().await.push(StoredReading {
            farm_id: farm_id.to_string(),
            sensor_id: sensor_id.to_string(),
            reading: reading.clone(),
            interpretation: interpretation.to_string(),
        });
        Ok(true)
    }

    async fn list_sensor_readings(
        &self,
        owner: &str,
        farm_id: &str,
    ) -> Result<Vec<SensorReadingRecord>> {
        self.check_online()?;
        let Some(farm) = self.owned_farm(owner, farm_id).await else {
            return Ok(vec![]);
        };
        let mut records: Vec<SensorReadingRecord> = self
            .readings
            .read()
            .await
            .iter()
            .filter(|r| r.farm_id == farm_id)
            .map(|r| SensorReadingRecord {
                farm_name: farm.farm_name.clone(),
                sensor_id: r.sensor_id.clone(),
                reading: r.reading.clone(),
                interpretation: Some(r.interpretation.clone()),
            })
            .collect();
        records.sort_by(|a, b| b.reading.created_at.cmp(&a.reading.created_at));
        Ok(records)
    }
}
