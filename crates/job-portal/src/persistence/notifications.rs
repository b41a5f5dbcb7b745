use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Row};

use super::{RepositoryError, SqliteStore};
use crate::notifications::{NewNotification, Notification, NotificationRepository, UserType};

/// Ids bound per `UPDATE`, well under SQLite's host parameter limit.
const MARK_READ_CHUNK: usize = 500;

fn row_to_notification(row: &Row<'_>) -> rusqlite::Result<Notification> {
    let raw: String = row.get("user_type")?;
    let user_type = UserType::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown user type '{raw}'").into(),
        )
    })?;
    Ok(Notification {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        user_type,
        message: row.get("message")?,
        is_read: row.get("is_read")?,
        created_at: row.get("created_at")?,
    })
}

impl NotificationRepository for SqliteStore {
    fn insert_notification(
        &self,
        notification: NewNotification,
        created_at: DateTime<Utc>,
    ) -> Result<Notification, RepositoryError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO notifications (user_id, user_type, message, is_read, created_at)
             VALUES (?1, ?2, ?3, 0, ?4)",
            params![
                notification.user_id,
                notification.user_type.as_str(),
                notification.message,
                created_at
            ],
        )?;

        Ok(Notification {
            id: conn.last_insert_rowid(),
            user_id: notification.user_id,
            user_type: notification.user_type,
            message: notification.message,
            is_read: false,
            created_at,
        })
    }

    fn list_notifications(
        &self,
        user_id: i64,
        user_type: UserType,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, user_type, message, is_read, created_at
             FROM notifications
             WHERE user_id = ?1 AND user_type = ?2
             ORDER BY created_at DESC, id DESC",
        )?;
        let notifications = stmt
            .query_map(params![user_id, user_type.as_str()], row_to_notification)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notifications)
    }

    fn mark_read(&self, ids: &[i64]) -> Result<usize, RepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        let mut changed = 0;
        for chunk in ids.chunks(MARK_READ_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            changed += tx.execute(
                &format!("UPDATE notifications SET is_read = 1 WHERE id IN ({placeholders})"),
                params_from_iter(chunk.iter()),
            )?;
        }
        tx.commit()?;
        Ok(changed)
    }

    fn unread_count(&self, user_id: i64, user_type: UserType) -> Result<i64, RepositoryError> {
        let conn = self.connection()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND user_type = ?2 AND is_read = 0",
            params![user_id, user_type.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
