//! User notifications
//!
//! Notifications are stored as standalone `Notification` nodes keyed by
//! `userId`. Read state only ever moves from unread to read.

pub mod models;
pub mod service;

pub use models::NotificationDraft;
pub use service::NotificationService;
