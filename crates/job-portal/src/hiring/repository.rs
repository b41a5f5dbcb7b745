use chrono::{DateTime, Utc};

use super::domain::{
    ApplicantView, Application, ApplicationScope, ApplicationSubmission, ApplicationSummary,
    Decision, Interview, InterviewRequest, InterviewUpdate, SeekerInterview,
};
use crate::persistence::RepositoryError;

/// Storage abstraction so the workflow service can be exercised in isolation.
pub trait HiringRepository: Send + Sync {
    /// Inserts an `Applied` row and bumps the listing's applicant counter atomically.
    /// `NotFound` when the listing is missing, `Conflict` when the pair already applied.
    fn insert_application(
        &self,
        submission: &ApplicationSubmission,
        applied_date: DateTime<Utc>,
    ) -> Result<Application, RepositoryError>;

    fn fetch_application(&self, id: i64) -> Result<Option<Application>, RepositoryError>;

    /// Sets the decided status and removes the application's interviews atomically.
    /// `NotFound` for unknown ids, `Conflict` when the application was already decided.
    fn record_decision(&self, id: i64, decision: Decision)
        -> Result<Application, RepositoryError>;

    fn seeker_applications(
        &self,
        job_seeker_id: i64,
        scope: ApplicationScope,
    ) -> Result<Vec<ApplicationSummary>, RepositoryError>;

    fn job_applications(&self, job_listing_id: i64)
        -> Result<Vec<ApplicantView>, RepositoryError>;

    fn count_applications(
        &self,
        job_seeker_id: i64,
        scope: ApplicationScope,
    ) -> Result<i64, RepositoryError>;

    fn insert_interview(&self, request: &InterviewRequest) -> Result<Interview, RepositoryError>;

    fn update_interview(&self, update: &InterviewUpdate) -> Result<Interview, RepositoryError>;

    fn interviews_for_application(
        &self,
        application_id: i64,
    ) -> Result<Vec<Interview>, RepositoryError>;

    fn seeker_interviews(&self, job_seeker_id: i64)
        -> Result<Vec<SeekerInterview>, RepositoryError>;

    fn count_seeker_interviews(&self, job_seeker_id: i64) -> Result<i64, RepositoryError>;

    fn seeker_email(&self, job_seeker_id: i64) -> Result<Option<String>, RepositoryError>;
}
