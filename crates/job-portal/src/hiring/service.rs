use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    ApplicantView, Application, ApplicationScope, ApplicationSubmission, ApplicationSummary,
    Decision, Interview, InterviewRequest, InterviewUpdate, SeekerInterview,
};
use super::repository::HiringRepository;
use crate::error::ServiceError;
use crate::mail::{MailMessage, MailQueue};
use crate::notifications::{NotificationEmitter, NotificationRepository, UserType};
use crate::persistence::RepositoryError;

/// Orchestrates the application and interview lifecycle.
///
/// The primary write decides the outcome of every operation. Notifications are stored
/// afterwards and a failure there is logged, not returned. Mail is queued last and never
/// waited on.
pub struct HiringWorkflowService<R, N> {
    repository: Arc<R>,
    notifications: Arc<NotificationEmitter<N>>,
    mail: MailQueue,
}

impl<R, N> HiringWorkflowService<R, N>
where
    R: HiringRepository + 'static,
    N: NotificationRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        notifications: Arc<NotificationEmitter<N>>,
        mail: MailQueue,
    ) -> Self {
        Self {
            repository,
            notifications,
            mail,
        }
    }

    pub fn submit(&self, submission: ApplicationSubmission) -> Result<Application, ServiceError> {
        submission.validate()?;

        let application = self
            .repository
            .insert_application(&submission, Utc::now())
            .map_err(|err| match err {
                RepositoryError::NotFound => ServiceError::not_found(format!(
                    "job listing {} or job seeker {} not found",
                    submission.job_listing_id, submission.job_seeker_id
                )),
                RepositoryError::Conflict => {
                    ServiceError::conflict("you have already applied for this job")
                }
                other => other.into(),
            })?;

        info!(
            application_id = application.id,
            job_seeker_id = application.job_seeker_id,
            job_listing_id = application.job_listing_id,
            "application submitted"
        );

        let message = format!(
            "Your application {} has been created successfully.",
            application.id
        );
        self.notify_seeker(application.job_seeker_id, &message);
        self.mail_seeker(application.job_seeker_id, message);

        Ok(application)
    }

    /// `status` must be exactly `Approved` or `Rejected`.
    pub fn decide(&self, application_id: i64, status: &str) -> Result<Application, ServiceError> {
        let decision = Decision::parse(status).ok_or_else(|| {
            ServiceError::validation("Invalid status. Allowed values: 'Approved' or 'Rejected'")
        })?;

        let application = self
            .repository
            .record_decision(application_id, decision)
            .map_err(|err| match err {
                RepositoryError::NotFound => {
                    ServiceError::not_found(format!("application {application_id} not found"))
                }
                RepositoryError::Conflict => ServiceError::conflict(format!(
                    "application {application_id} has already been decided"
                )),
                other => other.into(),
            })?;

        info!(
            application_id,
            decision = decision.label(),
            "application decided"
        );

        let message = format!(
            "Your application {} has been {}",
            application.id,
            decision.label()
        );
        self.notify_seeker(application.job_seeker_id, &message);
        self.mail_seeker(application.job_seeker_id, message);

        Ok(application)
    }

    pub fn schedule_interview(&self, request: InterviewRequest) -> Result<Interview, ServiceError> {
        request.validate()?;

        // Status guard and insert share one transaction in the repository.
        let interview = self
            .repository
            .insert_interview(&request)
            .map_err(|err| match err {
                RepositoryError::NotFound => ServiceError::not_found(format!(
                    "application {} not found",
                    request.application_id
                )),
                RepositoryError::Conflict => ServiceError::conflict(format!(
                    "application {} has already been decided",
                    request.application_id
                )),
                other => other.into(),
            })?;

        info!(
            interview_id = interview.id,
            application_id = interview.application_id,
            "interview scheduled"
        );

        let application = match self.repository.fetch_application(interview.application_id) {
            Ok(Some(application)) => application,
            Ok(None) => return Ok(interview),
            Err(err) => {
                warn!(
                    application_id = interview.application_id,
                    error = %err,
                    "failed to load application for interview notice"
                );
                return Ok(interview);
            }
        };

        self.notify_seeker(
            application.job_seeker_id,
            &format!(
                "Your interview for application {} has been scheduled.",
                application.id
            ),
        );
        self.mail_seeker(
            application.job_seeker_id,
            format!(
                "Your interview for application <strong>#{}</strong> has been scheduled.<br>\
                 <strong>Date:</strong> {}<br>\
                 <strong>Mode:</strong> {}<br>\
                 We look forward to meeting you!",
                application.id,
                interview.scheduled_date.format("%Y-%m-%d %H:%M UTC"),
                interview.interview_mode
            ),
        );

        Ok(interview)
    }

    pub fn update_interview(&self, update: InterviewUpdate) -> Result<Interview, ServiceError> {
        update.validate()?;
        self.repository
            .update_interview(&update)
            .map_err(|err| match err {
                RepositoryError::NotFound => {
                    ServiceError::not_found(format!("interview {} not found", update.id))
                }
                other => other.into(),
            })
    }

    pub fn application(&self, application_id: i64) -> Result<Application, ServiceError> {
        self.repository
            .fetch_application(application_id)?
            .ok_or_else(|| ServiceError::not_found(format!("application {application_id} not found")))
    }

    /// Applications still awaiting a decision.
    pub fn seeker_applications(
        &self,
        job_seeker_id: i64,
    ) -> Result<Vec<ApplicationSummary>, ServiceError> {
        Ok(self
            .repository
            .seeker_applications(job_seeker_id, ApplicationScope::Pending)?)
    }

    /// Applications that have been approved or rejected.
    pub fn results(&self, job_seeker_id: i64) -> Result<Vec<ApplicationSummary>, ServiceError> {
        Ok(self
            .repository
            .seeker_applications(job_seeker_id, ApplicationScope::Decided)?)
    }

    pub fn job_applications(&self, job_listing_id: i64) -> Result<Vec<ApplicantView>, ServiceError> {
        Ok(self.repository.job_applications(job_listing_id)?)
    }

    pub fn application_count(&self, job_seeker_id: i64) -> Result<i64, ServiceError> {
        Ok(self
            .repository
            .count_applications(job_seeker_id, ApplicationScope::All)?)
    }

    pub fn result_count(&self, job_seeker_id: i64) -> Result<i64, ServiceError> {
        Ok(self
            .repository
            .count_applications(job_seeker_id, ApplicationScope::Decided)?)
    }

    pub fn interviews(&self, application_id: i64) -> Result<Vec<Interview>, ServiceError> {
        Ok(self.repository.interviews_for_application(application_id)?)
    }

    pub fn seeker_interviews(&self, job_seeker_id: i64) -> Result<Vec<SeekerInterview>, ServiceError> {
        Ok(self.repository.seeker_interviews(job_seeker_id)?)
    }

    pub fn interview_count(&self, job_seeker_id: i64) -> Result<i64, ServiceError> {
        Ok(self.repository.count_seeker_interviews(job_seeker_id)?)
    }

    fn notify_seeker(&self, job_seeker_id: i64, message: &str) {
        if let Err(err) = self
            .notifications
            .emit(job_seeker_id, UserType::JobSeeker, message)
        {
            warn!(job_seeker_id, error = %err, "failed to store notification");
        }
    }

    fn mail_seeker(&self, job_seeker_id: i64, body_html: String) {
        match self.repository.seeker_email(job_seeker_id) {
            Ok(Some(email)) => {
                self.mail.enqueue(MailMessage::notification(email, body_html));
            }
            Ok(None) => warn!(job_seeker_id, "no email on file, skipping mail"),
            Err(err) => warn!(job_seeker_id, error = %err, "failed to look up job seeker email"),
        }
    }
}
