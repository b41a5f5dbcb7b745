//! In-app notifications: record construction, listing with mark-read, unread counters.

pub mod domain;
pub mod emitter;
pub mod repository;
pub mod router;

pub use domain::{NewNotification, Notification, UserType};
pub use emitter::NotificationEmitter;
pub use repository::NotificationRepository;
pub use router::notification_router;
