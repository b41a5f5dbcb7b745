use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::domain::{NewNotification, Notification, UserType};
use super::repository::NotificationRepository;
use crate::error::ServiceError;

/// Builds notification records and persists them, independent of any delivery channel.
pub struct NotificationEmitter<N> {
    repository: Arc<N>,
}

impl<N> NotificationEmitter<N>
where
    N: NotificationRepository + 'static,
{
    pub fn new(repository: Arc<N>) -> Self {
        Self { repository }
    }

    pub fn emit(
        &self,
        user_id: i64,
        user_type: UserType,
        message: impl Into<String>,
    ) -> Result<Notification, ServiceError> {
        let notification = self.repository.insert_notification(
            NewNotification {
                user_id,
                user_type,
                message: message.into(),
            },
            Utc::now(),
        )?;
        debug!(
            notification_id = notification.id,
            user_id,
            user_type = user_type.as_str(),
            "notification stored"
        );
        Ok(notification)
    }

    /// Returns every notification for the user as it was before this call, then marks
    /// the unread ones among them read. Rows stored after the fetch stay unread.
    pub fn list_and_mark_read(
        &self,
        user_id: i64,
        user_type: UserType,
    ) -> Result<Vec<Notification>, ServiceError> {
        let notifications = self.repository.list_notifications(user_id, user_type)?;
        let unread: Vec<i64> = notifications
            .iter()
            .filter(|notification| !notification.is_read)
            .map(|notification| notification.id)
            .collect();

        if !unread.is_empty() {
            self.repository.mark_read(&unread)?;
        }

        Ok(notifications)
    }

    pub fn unread_count(&self, user_id: i64, user_type: UserType) -> Result<i64, ServiceError> {
        Ok(self.repository.unread_count(user_id, user_type)?)
    }
}
