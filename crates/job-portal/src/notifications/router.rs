use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::UserType;
use super::emitter::NotificationEmitter;
use super::repository::NotificationRepository;
use crate::error::ServiceError;

#[derive(Debug, Default, Deserialize)]
pub struct AudienceQuery {
    pub user_type: Option<String>,
}

impl AudienceQuery {
    fn user_type(&self) -> Result<UserType, ServiceError> {
        match self.user_type.as_deref() {
            None => Ok(UserType::JobSeeker),
            Some(raw) => UserType::parse(raw).ok_or_else(|| {
                ServiceError::validation("Invalid user_type. Allowed values: 'job_seeker' or 'employer'")
            }),
        }
    }
}

pub fn notification_router<N>(emitter: Arc<NotificationEmitter<N>>) -> Router
where
    N: NotificationRepository + 'static,
{
    Router::new()
        .route(
            "/notification/get_notifications/:id",
            get(list_handler::<N>),
        )
        .route("/notification/unread_count/:id", get(unread_handler::<N>))
        .with_state(emitter)
}

pub(crate) async fn list_handler<N>(
    State(emitter): State<Arc<NotificationEmitter<N>>>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<AudienceQuery>, QueryRejection>,
) -> Result<Json<Value>, ServiceError>
where
    N: NotificationRepository + 'static,
{
    let Path(user_id) = path?;
    let Query(audience) = query?;
    let notifications = emitter.list_and_mark_read(user_id, audience.user_type()?)?;
    Ok(Json(json!({ "notifications": notifications })))
}

pub(crate) async fn unread_handler<N>(
    State(emitter): State<Arc<NotificationEmitter<N>>>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<AudienceQuery>, QueryRejection>,
) -> Result<Json<Value>, ServiceError>
where
    N: NotificationRepository + 'static,
{
    let Path(user_id) = path?;
    let Query(audience) = query?;
    let count = emitter.unread_count(user_id, audience.user_type()?)?;
    Ok(Json(json!({ "unread_count": count })))
}
