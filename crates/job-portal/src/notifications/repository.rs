use chrono::{DateTime, Utc};

use super::domain::{NewNotification, Notification, UserType};
use crate::persistence::RepositoryError;

/// Storage abstraction for notification records.
pub trait NotificationRepository: Send + Sync {
    fn insert_notification(
        &self,
        notification: NewNotification,
        created_at: DateTime<Utc>,
    ) -> Result<Notification, RepositoryError>;

    /// Newest first.
    fn list_notifications(
        &self,
        user_id: i64,
        user_type: UserType,
    ) -> Result<Vec<Notification>, RepositoryError>;

    /// Marks exactly the given ids read and returns how many rows changed.
    fn mark_read(&self, ids: &[i64]) -> Result<usize, RepositoryError>;

    fn unread_count(&self, user_id: i64, user_type: UserType) -> Result<i64, RepositoryError>;
}
