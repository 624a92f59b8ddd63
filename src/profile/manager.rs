//! Profile Manager - profile lookup, profile pictures and leveling
//!
//! Store failures are logged and propagated. A missing profile picture
//! is not a failure: it reads back as an empty buffer.

use super::models::{sniff_format, BufferData};
use crate::error::ServiceError;
use crate::neo4j::models::{LevelUpResult, ProfilePicNode, UserNode};
use crate::neo4j::GraphStore;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Manager for grower profiles
pub struct ProfileManager {
    neo4j: Arc<dyn GraphStore>,
}

impl ProfileManager {
    pub fn new(neo4j: Arc<dyn GraphStore>) -> Self {
        Self { neo4j }
    }

    pub async fn get_profile(&self, username: &str) -> Result<UserNode, ServiceError> {
        self.neo4j
            .get_user(username)
            .await
            .map_err(|e| {
                tracing::error!(username, error = %e, "Error getting profile");
                ServiceError::StoreUnavailable(e)
            })?
            .ok_or_else(|| ServiceError::not_found(format!("User {}", username)))
    }

    /// Replace the user's profile picture; never leaves two pictures behind
    pub async fn upload_profile_pic(
        &self,
        username: &str,
        image: &BufferData,
    ) -> Result<ProfilePicNode, ServiceError> {
        let bytes = image.decode()?;
        let pic = ProfilePicNode {
            id: Uuid::new_v4().to_string(),
            file_format: sniff_format(&bytes).to_string(),
            file_size: bytes.len() as u64,
            image: bytes,
            uploaded_at: Utc::now(),
        };

        self.neo4j
            .replace_profile_pic(username, &pic)
            .await
            .map_err(|e| {
                tracing::error!(username, error = %e, "Error updating profile picture");
                ServiceError::StoreUnavailable(e)
            })?;

        tracing::debug!(
            username,
            format = %pic.file_format,
            size = pic.file_size,
            "Profile picture replaced"
        );
        Ok(pic)
    }

    /// Current picture as `{bufferData}`, empty when the user has none
    pub async fn get_profile_pic(&self, username: &str) -> Result<BufferData, ServiceError> {
        let pic = self.neo4j.get_profile_pic(username).await.map_err(|e| {
            tracing::error!(username, error = %e, "Error retrieving profile picture");
            ServiceError::StoreUnavailable(e)
        })?;

        Ok(pic
            .map(|p| BufferData::from_bytes(&p.image))
            .unwrap_or_else(BufferData::empty))
    }

    /// Apply one round's experience atomically and persist the new level.
    ///
    /// `accuracy` is a fraction in [0, 1].
    pub async fn record_round(
        &self,
        username: &str,
        accuracy: f64,
    ) -> Result<LevelUpResult, ServiceError> {
        if !accuracy.is_finite() || !(0.0..=1.0).contains(&accuracy) {
            return Err(ServiceError::invalid("accuracy must be within [0, 1]"));
        }

        let result = self
            .neo4j
            .record_round(username, accuracy)
            .await
            .map_err(|e| {
                tracing::error!(username, error = %e, "Error calculating experience gain");
                ServiceError::StoreUnavailable(e)
            })?
            .ok_or_else(|| ServiceError::not_found(format!("User {}", username)))?;

        tracing::info!(
            username,
            level = result.new_level,
            gained = result.experience_gained,
            "Experience recorded"
        );
        Ok(result)
    }
}
