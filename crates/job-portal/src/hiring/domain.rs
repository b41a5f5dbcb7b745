use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::accounts::domain::{Education, Experience};
use crate::error::ServiceError;

/// Lifecycle of an application. `Applied` is the only state that accepts a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Applied" => Some(Self::Applied),
            "Approved" => Some(Self::Approved),
            "Rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn is_decided(&self) -> bool {
        !matches!(self, ApplicationStatus::Applied)
    }
}

/// Employer verdict on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    /// Exact match only; anything else is a validation failure at the edge.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Approved" => Some(Self::Approved),
            "Rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn status(&self) -> ApplicationStatus {
        match self {
            Decision::Approved => ApplicationStatus::Approved,
            Decision::Rejected => ApplicationStatus::Rejected,
        }
    }

    pub fn label(&self) -> &'static str {
        self.status().label()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub job_seeker_id: i64,
    pub job_listing_id: i64,
    #[serde(rename = "application_status")]
    pub status: ApplicationStatus,
    pub applied_date: DateTime<Utc>,
    pub cover_letter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub job_seeker_id: i64,
    pub job_listing_id: i64,
    #[serde(default)]
    pub cover_letter: String,
}

impl ApplicationSubmission {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.job_seeker_id <= 0 || self.job_listing_id <= 0 {
            return Err(ServiceError::validation(
                "Invalid job seeker ID or job listing ID",
            ));
        }
        Ok(())
    }
}

/// Application joined with the listing it targets, as shown to the job seeker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationSummary {
    #[serde(flatten)]
    pub application: Application,
    pub job_title: String,
    pub location: String,
    pub min_salary: f64,
    pub max_salary: f64,
    pub company_name: String,
}

/// Application joined with the applicant's contact data and profile, as shown to employers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantView {
    pub application_id: i64,
    pub job_seeker_id: i64,
    pub application_status: ApplicationStatus,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub resume: Option<String>,
    pub applied_date: DateTime<Utc>,
    pub cover_letter: String,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub skills: Vec<String>,
}

/// Which of a seeker's applications a read model covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationScope {
    All,
    Pending,
    Decided,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterviewStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    pub fn label(&self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "Scheduled",
            InterviewStatus::Completed => "Completed",
            InterviewStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Scheduled" => Some(Self::Scheduled),
            "Completed" => Some(Self::Completed),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub id: i64,
    pub application_id: i64,
    pub scheduled_date: DateTime<Utc>,
    pub interview_mode: String,
    pub status: InterviewStatus,
    pub interviewer_name: String,
    pub interview_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewRequest {
    pub application_id: i64,
    pub scheduled_date: DateTime<Utc>,
    pub interview_mode: String,
    pub interviewer_name: String,
    #[serde(default)]
    pub interview_link: String,
}

impl InterviewRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.application_id <= 0 {
            return Err(ServiceError::validation("Invalid application ID"));
        }
        validate_interview_fields(&self.interview_mode, &self.interviewer_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewUpdate {
    pub id: i64,
    pub scheduled_date: DateTime<Utc>,
    pub interview_mode: String,
    pub interviewer_name: String,
    #[serde(default)]
    pub interview_link: String,
    /// Left unchanged when absent.
    #[serde(default)]
    pub status: Option<InterviewStatus>,
}

impl InterviewUpdate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.id <= 0 {
            return Err(ServiceError::validation("Invalid interview ID"));
        }
        validate_interview_fields(&self.interview_mode, &self.interviewer_name)
    }
}

fn validate_interview_fields(mode: &str, interviewer: &str) -> Result<(), ServiceError> {
    if mode.trim().is_empty() || interviewer.trim().is_empty() {
        return Err(ServiceError::validation(
            "interview_mode and interviewer_name are required",
        ));
    }
    Ok(())
}

/// Interview joined with the listing and company, as shown to the job seeker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeekerInterview {
    #[serde(flatten)]
    pub interview: Interview,
    pub job_listing_id: i64,
    pub job_title: String,
    pub company_name: String,
}
