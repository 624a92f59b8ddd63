//! Notification service
//!
//! Failure contract:
//!
//! | Operation | On store failure |
//! |---|---|
//! | `create` | propagate |
//! | `unread_for` | degrade to an empty list |
//! | `get_by_id` | degrade to `None` |
//! | `mark_as_read` | degrade to `false` |
//! | `mark_as_read_for` | degrade to `Some(false)` |
//! | `send_realtime` | swallow (logged) |

use super::models::NotificationDraft;
use crate::error::{degrade, ServiceError};
use crate::neo4j::models::NotificationNode;
use crate::neo4j::GraphStore;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Creates, lists and acknowledges user notifications
pub struct NotificationService {
    neo4j: Arc<dyn GraphStore>,
}

impl NotificationService {
    pub fn new(neo4j: Arc<dyn GraphStore>) -> Self {
        Self { neo4j }
    }

    /// Assign id and timestamp, persist as unread and return the stored notification
    pub async fn create(
        &self,
        user_id: &str,
        draft: NotificationDraft,
    ) -> Result<NotificationNode, ServiceError> {
        if draft.title.trim().is_empty() {
            return Err(ServiceError::invalid("Notification title must not be empty"));
        }
        let metadata = match draft.metadata {
            None | Some(serde_json::Value::Null) => serde_json::json!({}),
            Some(value @ serde_json::Value::Object(_)) => value,
            Some(_) => {
                return Err(ServiceError::invalid(
                    "Notification metadata must be a JSON object",
                ))
            }
        };

        let notification = NotificationNode {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            notification_type: draft.notification_type,
            title: draft.title,
            message: draft.message,
            read: false,
            timestamp: Utc::now(),
            metadata,
        };

        if let Err(e) = self.neo4j.create_notification(&notification).await {
            tracing::error!(user_id, error = %e, "Failed to save notification");
            return Err(ServiceError::StoreUnavailable(e));
        }

        Ok(notification)
    }

    /// Unread notifications for a user, newest first
    pub async fn unread_for(&self, user_id: &str) -> Vec<NotificationNode> {
        degrade(
            "notifications.unread",
            self.neo4j.list_unread_notifications(user_id).await,
            Vec::new(),
        )
    }

    pub async fn get_by_id(&self, notification_id: &str) -> Option<NotificationNode> {
        degrade(
            "notifications.get_by_id",
            self.neo4j.get_notification(notification_id).await,
            None,
        )
    }

    /// Idempotent: true whenever the notification exists
    pub async fn mark_as_read(&self, notification_id: &str) -> bool {
        degrade(
            "notifications.mark_as_read",
            self.neo4j.mark_notification_read(notification_id).await,
            false,
        )
    }

    /// Mark a notification read on behalf of `user_id`.
    ///
    /// `None` when the notification is missing or addressed to someone else.
    pub async fn mark_as_read_for(&self, user_id: &str, notification_id: &str) -> Option<bool> {
        match self.neo4j.get_notification(notification_id).await {
            Ok(Some(n)) if n.user_id == user_id => Some(self.mark_as_read(notification_id).await),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(
                    user_id,
                    notification_id,
                    error = %e,
                    "Store failure degraded to fallback value"
                );
                Some(false)
            }
        }
    }

    /// Persist and announce a notification without ever failing the caller.
    ///
    /// There is no push transport; delivery is the log line below.
    pub async fn send_realtime(&self, user_id: &str, draft: NotificationDraft) {
        match self.create(user_id, draft).await {
            Ok(notification) => {
                tracing::info!(
                    target: "agrograph::realtime",
                    user_id,
                    notification_id = %notification.id,
                    kind = notification.notification_type.as_str(),
                    "{} - {}",
                    notification.title,
                    notification.message
                );
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to send real-time notification");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neo4j::mock::MockGraphStore;
    use crate::neo4j::models::NotificationType;

    fn service() -> (Arc<MockGraphStore>, NotificationService) {
        let store = Arc::new(MockGraphStore::new());
        let service = NotificationService::new(store.clone());
        (store, service)
    }

    fn draft(title: &str) -> NotificationDraft {
        NotificationDraft::new(NotificationType::SystemAlert, title, "Check the field")
    }

    #[tokio::test]
    async fn test_create_defaults_unread_with_unique_ids() {
        let (_, svc) = service();
        let a = svc.create("alice", draft("one")).await.unwrap();
        let b = svc.create("alice", draft("two")).await.unwrap();
        assert!(!a.read);
        assert_ne!(a.id, b.id);
        assert_eq!(a.metadata, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title_and_non_object_metadata() {
        let (_, svc) = service();
        assert!(matches!(
            svc.create("alice", draft("  ")).await,
            Err(ServiceError::ValidationFailed(_))
        ));
        let bad = draft("ok").with_metadata(serde_json::json!([1, 2]));
        assert!(matches!(
            svc.create("alice", bad).await,
            Err(ServiceError::ValidationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_create_propagates_store_failure() {
        let (store, svc) = service();
        store.set_offline(true);
        assert!(matches!(
            svc.create("alice", draft("x")).await,
            Err(ServiceError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_unread_is_scoped_to_user_and_excludes_read() {
        let (_, svc) = service();
        let first = svc.create("alice", draft("first")).await.unwrap();
        svc.create("alice", draft("second")).await.unwrap();
        svc.create("bob", draft("bob's")).await.unwrap();

        assert!(svc.mark_as_read(&first.id).await);

        let unread = svc.unread_for("alice").await;
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].title, "second");
    }

    #[tokio::test]
    async fn test_mark_as_read_is_idempotent() {
        let (_, svc) = service();
        let n = svc.create("alice", draft("x")).await.unwrap();
        assert!(svc.mark_as_read(&n.id).await);
        assert!(svc.mark_as_read(&n.id).await);
        assert!(svc.get_by_id(&n.id).await.unwrap().read);
    }

    #[tokio::test]
    async fn test_mark_as_read_unknown_id_is_false() {
        let (_, svc) = service();
        assert!(!svc.mark_as_read("missing").await);
    }

    #[tokio::test]
    async fn test_read_paths_degrade_when_store_offline() {
        let (store, svc) = service();
        let n = svc.create("alice", draft("x")).await.unwrap();
        store.set_offline(true);

        assert!(svc.unread_for("alice").await.is_empty());
        assert!(svc.get_by_id(&n.id).await.is_none());
        assert!(!svc.mark_as_read(&n.id).await);
    }

    #[tokio::test]
    async fn test_send_realtime_persists_and_swallows_failures() {
        let (store, svc) = service();
        svc.send_realtime("alice", draft("hello")).await;
        assert_eq!(svc.unread_for("alice").await.len(), 1);

        store.set_offline(true);
        // must not panic or propagate
        svc.send_realtime("alice", draft("lost")).await;
        store.set_offline(false);
        assert_eq!(svc.unread_for("alice").await.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_as_read_for_is_scoped_and_degrades() {
        let (store, svc) = service();
        let n = svc.create("alice", draft("x")).await.unwrap();

        assert_eq!(svc.mark_as_read_for("bob", &n.id).await, None);
        assert_eq!(svc.mark_as_read_for("alice", "missing").await, None);
        assert!(!svc.get_by_id(&n.id).await.unwrap().read);

        store.set_offline(true);
        assert_eq!(svc.mark_as_read_for("alice", &n.id).await, Some(false));

        store.set_offline(false);
        assert_eq!(svc.mark_as_read_for("alice", &n.id).await, Some(true));
        assert_eq!(svc.mark_as_read_for("alice", &n.id).await, Some(true));
    }
}
