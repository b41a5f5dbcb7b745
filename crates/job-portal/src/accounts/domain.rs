use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::notifications::UserType;

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub skill_name: String,
    #[serde(default)]
    pub skill_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub education_level: String,
    pub institution_name: String,
    #[serde(default)]
    pub field_of_study: String,
    #[serde(default)]
    pub start_year: String,
    #[serde(default)]
    pub end_year: String,
    #[serde(default)]
    pub grade: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub job_title: String,
    pub company_name: String,
    #[serde(default)]
    pub location: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Job seeker profile fields shared by registration, update and read models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeekerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub profile_picture: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub experience: Vec<Experience>,
}

impl SeekerDetails {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.first_name.trim().is_empty()
            || self.last_name.trim().is_empty()
            || self.email.trim().is_empty()
        {
            return Err(ServiceError::validation(
                "first_name, last_name and email are required",
            ));
        }
        validate_email(&self.email)?;
        if self.skills.iter().any(|skill| skill.skill_name.trim().is_empty()) {
            return Err(ServiceError::validation("skill_name must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobSeekerRegistration {
    #[serde(flatten)]
    pub details: SeekerDetails,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobSeekerUpdate {
    #[serde(flatten)]
    pub details: SeekerDetails,
    /// Rehashed only when present.
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSeekerProfile {
    pub id: i64,
    #[serde(flatten)]
    pub details: SeekerDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerDetails {
    pub company_id: i64,
    pub email: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub contact_number: String,
}

impl EmployerDetails {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.company_id <= 0 {
            return Err(ServiceError::validation("company_id must be positive"));
        }
        validate_email(&self.email)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmployerRegistration {
    #[serde(flatten)]
    pub details: EmployerDetails,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmployerUpdate {
    #[serde(flatten)]
    pub details: EmployerDetails,
    #[serde(default)]
    pub password: Option<String>,
}

/// Employer joined with its company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployerProfile {
    pub id: i64,
    #[serde(flatten)]
    pub details: EmployerDetails,
    pub company_name: String,
    pub industry: String,
    pub website: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub company_name: String,
    pub industry: String,
    pub website: String,
    pub description: String,
    pub logo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCompany {
    pub company_name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub description: String,
    /// Stored path of an already uploaded logo.
    #[serde(default)]
    pub logo: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    pub email: String,
    pub user_type: UserType,
}

/// Stored login material; never serialized.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: i64,
    pub first_name: Option<String>,
    pub email: String,
    pub password_hash: String,
}

pub fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ServiceError::validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ServiceError> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ServiceError::validation(format!("invalid email address '{trimmed}'"))),
    }
}
