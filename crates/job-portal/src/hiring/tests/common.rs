use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::hiring::{
    ApplicantView, Application, ApplicationScope, ApplicationSubmission, ApplicationSummary,
    Decision, HiringRepository, HiringWorkflowService, Interview, InterviewRequest,
    InterviewUpdate, SeekerInterview,
};
use crate::mail::{MailMessage, MailQueue};
use crate::notifications::{
    NewNotification, Notification, NotificationEmitter, NotificationRepository, UserType,
};
use crate::persistence::fixtures::{self, Seed};
use crate::persistence::{RepositoryError, SqliteStore};

pub(super) struct Harness {
    pub(super) service: HiringWorkflowService<SqliteStore, SqliteStore>,
    pub(super) store: Arc<SqliteStore>,
    pub(super) seed: Seed,
    pub(super) mail: mpsc::Receiver<MailMessage>,
}

pub(super) fn harness() -> Harness {
    let store = Arc::new(SqliteStore::open_in_memory().expect("store opens"));
    let seed = fixtures::seed(&store);
    let (queue, mail) = MailQueue::channel(16);
    let service = HiringWorkflowService::new(
        store.clone(),
        Arc::new(NotificationEmitter::new(store.clone())),
        queue,
    );
    Harness {
        service,
        store,
        seed,
        mail,
    }
}

pub(super) fn submission(seed: &Seed) -> ApplicationSubmission {
    ApplicationSubmission {
        job_seeker_id: seed.seeker,
        job_listing_id: seed.listing,
        cover_letter: "Keen to help.".to_string(),
    }
}

pub(super) fn interview_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 15, 0, 0)
        .single()
        .expect("valid date")
}

pub(super) fn interview_request(application_id: i64) -> InterviewRequest {
    InterviewRequest {
        application_id,
        scheduled_date: interview_date(),
        interview_mode: "Online".to_string(),
        interviewer_name: "Grace Hopper".to_string(),
        interview_link: "https://meet.example.com/xyz".to_string(),
    }
}

pub(super) fn drain_mail(receiver: &mut mpsc::Receiver<MailMessage>) -> Vec<MailMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = receiver.try_recv() {
        messages.push(message);
    }
    messages
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Fails every call, for checking that storage errors become 500s.
pub(super) struct UnavailableRepository;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl HiringRepository for UnavailableRepository {
    fn insert_application(
        &self,
        _submission: &ApplicationSubmission,
        _applied_date: DateTime<Utc>,
    ) -> Result<Application, RepositoryError> {
        offline()
    }

    fn fetch_application(&self, _id: i64) -> Result<Option<Application>, RepositoryError> {
        offline()
    }

    fn record_decision(
        &self,
        _id: i64,
        _decision: Decision,
    ) -> Result<Application, RepositoryError> {
        offline()
    }

    fn seeker_applications(
        &self,
        _job_seeker_id: i64,
        _scope: ApplicationScope,
    ) -> Result<Vec<ApplicationSummary>, RepositoryError> {
        offline()
    }

    fn job_applications(
        &self,
        _job_listing_id: i64,
    ) -> Result<Vec<ApplicantView>, RepositoryError> {
        offline()
    }

    fn count_applications(
        &self,
        _job_seeker_id: i64,
        _scope: ApplicationScope,
    ) -> Result<i64, RepositoryError> {
        offline()
    }

    fn insert_interview(&self, _request: &InterviewRequest) -> Result<Interview, RepositoryError> {
        offline()
    }

    fn update_interview(&self, _update: &InterviewUpdate) -> Result<Interview, RepositoryError> {
        offline()
    }

    fn interviews_for_application(
        &self,
        _application_id: i64,
    ) -> Result<Vec<Interview>, RepositoryError> {
        offline()
    }

    fn seeker_interviews(
        &self,
        _job_seeker_id: i64,
    ) -> Result<Vec<SeekerInterview>, RepositoryError> {
        offline()
    }

    fn count_seeker_interviews(&self, _job_seeker_id: i64) -> Result<i64, RepositoryError> {
        offline()
    }

    fn seeker_email(&self, _job_seeker_id: i64) -> Result<Option<String>, RepositoryError> {
        offline()
    }
}

/// Notification store that refuses writes, for the secondary-effect policy.
pub(super) struct BrokenNotifications;

impl NotificationRepository for BrokenNotifications {
    fn insert_notification(
        &self,
        _notification: NewNotification,
        _created_at: DateTime<Utc>,
    ) -> Result<Notification, RepositoryError> {
        offline()
    }

    fn list_notifications(
        &self,
        _user_id: i64,
        _user_type: UserType,
    ) -> Result<Vec<Notification>, RepositoryError> {
        offline()
    }

    fn mark_read(&self, _ids: &[i64]) -> Result<usize, RepositoryError> {
        offline()
    }

    fn unread_count(&self, _user_id: i64, _user_type: UserType) -> Result<i64, RepositoryError> {
        offline()
    }
}
