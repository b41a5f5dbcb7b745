use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    Open,
    Closed,
}

impl JobStatus {
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Open => "Open",
            JobStatus::Closed => "Closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Open" => Some(Self::Open),
            "Closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub id: i64,
    pub employer_id: i64,
    pub job_title: String,
    pub description: String,
    pub location: String,
    pub job_type: String,
    pub min_salary: f64,
    pub max_salary: f64,
    pub posted_date: DateTime<Utc>,
    pub expiry_date: NaiveDate,
    pub applicant_count: i64,
    pub status: JobStatus,
    pub job_category: String,
    pub requirements: Vec<String>,
}

/// Request body for creating or replacing a listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobInput {
    pub employer_id: i64,
    pub job_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub min_salary: f64,
    #[serde(default)]
    pub max_salary: f64,
    /// `YYYY-MM-DD`.
    pub expiry_date: String,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub job_category: String,
    #[serde(default)]
    pub requirements: Vec<String>,
}

/// Validated listing fields ready for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub employer_id: i64,
    pub job_title: String,
    pub description: String,
    pub location: String,
    pub job_type: String,
    pub min_salary: f64,
    pub max_salary: f64,
    pub expiry_date: NaiveDate,
    pub status: JobStatus,
    pub job_category: String,
    pub requirements: Vec<String>,
}

impl JobInput {
    pub fn validate(self) -> Result<NewJob, ServiceError> {
        if self.employer_id <= 0 {
            return Err(ServiceError::validation("Invalid employer ID"));
        }
        if self.job_title.trim().is_empty() {
            return Err(ServiceError::validation("job_title is required"));
        }
        let expiry_date = NaiveDate::parse_from_str(self.expiry_date.trim(), "%Y-%m-%d")
            .map_err(|_| ServiceError::validation("Invalid expiry_date format. Use YYYY-MM-DD."))?;
        if self.min_salary < 0.0 || self.max_salary < 0.0 {
            return Err(ServiceError::validation("salaries must not be negative"));
        }
        if self.max_salary > 0.0 && self.min_salary > self.max_salary {
            return Err(ServiceError::validation(
                "min_salary must not exceed max_salary",
            ));
        }

        let mut requirements: Vec<String> = Vec::with_capacity(self.requirements.len());
        for requirement in self.requirements {
            let requirement = requirement.trim().to_string();
            if !requirement.is_empty()
                && !requirements
                    .iter()
                    .any(|existing| existing.eq_ignore_ascii_case(&requirement))
            {
                requirements.push(requirement);
            }
        }

        Ok(NewJob {
            employer_id: self.employer_id,
            job_title: self.job_title.trim().to_string(),
            description: self.description,
            location: self.location.trim().to_string(),
            job_type: self.job_type.trim().to_string(),
            min_salary: self.min_salary,
            max_salary: self.max_salary,
            expiry_date,
            status: self.status.unwrap_or_default(),
            job_category: self.job_category,
            requirements,
        })
    }
}

/// Search criteria; empty fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    /// Every skill must appear among the listing's requirements, ignoring case.
    pub skills: Vec<String>,
}

impl JobFilter {
    /// Builds a filter from raw query pairs. `skills` may repeat or hold a comma list.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, ServiceError> {
        let mut filter = JobFilter::default();
        for (key, value) in pairs {
            let value = value.trim();
            match key.as_str() {
                "location" if !value.is_empty() => filter.location = Some(value.to_string()),
                "job_type" if !value.is_empty() => filter.job_type = Some(value.to_string()),
                "min_salary" if !value.is_empty() => {
                    filter.min_salary = Some(
                        value
                            .parse()
                            .map_err(|_| ServiceError::validation("Invalid min_salary format"))?,
                    )
                }
                "max_salary" if !value.is_empty() => {
                    filter.max_salary = Some(
                        value
                            .parse()
                            .map_err(|_| ServiceError::validation("Invalid max_salary format"))?,
                    )
                }
                "skills" | "skill" => filter.skills.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|skill| !skill.is_empty())
                        .map(str::to_string),
                ),
                _ => {}
            }
        }
        Ok(filter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl Page {
    pub fn new(limit: Option<u32>, offset: Option<u32>) -> Result<Self, ServiceError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(ServiceError::validation(format!(
                "Invalid limit. Use a value between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self {
            limit,
            offset: offset.unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> JobInput {
        JobInput {
            employer_id: 1,
            job_title: " Backend Engineer ".to_string(),
            description: "Build APIs".to_string(),
            location: "Remote".to_string(),
            job_type: "Full-time".to_string(),
            min_salary: 90000.0,
            max_salary: 120000.0,
            expiry_date: "2030-01-31".to_string(),
            status: None,
            job_category: "Engineering".to_string(),
            requirements: vec!["Go".to_string(), " SQL ".to_string(), "go".to_string(), "".to_string()],
        }
    }

    #[test]
    fn validate_normalizes_requirements_and_defaults_status() {
        let job = input().validate().expect("valid input");
        assert_eq!(job.job_title, "Backend Engineer");
        assert_eq!(job.requirements, vec!["Go".to_string(), "SQL".to_string()]);
        assert_eq!(job.status, JobStatus::Open);
        assert_eq!(job.expiry_date, NaiveDate::from_ymd_opt(2030, 1, 31).expect("date"));
    }

    #[test]
    fn validate_rejects_bad_dates_and_salary_ranges() {
        let mut bad_date = input();
        bad_date.expiry_date = "31/01/2030".to_string();
        match bad_date.validate() {
            Err(ServiceError::Validation(message)) => {
                assert_eq!(message, "Invalid expiry_date format. Use YYYY-MM-DD.")
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let mut inverted = input();
        inverted.min_salary = 200000.0;
        assert!(inverted.validate().is_err());

        let mut no_employer = input();
        no_employer.employer_id = 0;
        assert!(no_employer.validate().is_err());
    }

    #[test]
    fn filter_collects_repeated_and_comma_separated_skills() {
        let pairs = vec![
            ("skills".to_string(), "Go, SQL".to_string()),
            ("skills".to_string(), "Docker".to_string()),
            ("location".to_string(), " ".to_string()),
            ("min_salary".to_string(), "50000".to_string()),
        ];
        let filter = JobFilter::from_pairs(&pairs).expect("filter parses");
        assert_eq!(filter.skills, vec!["Go", "SQL", "Docker"]);
        assert_eq!(filter.location, None);
        assert_eq!(filter.min_salary, Some(50000.0));

        let bad = vec![("max_salary".to_string(), "lots".to_string())];
        assert!(JobFilter::from_pairs(&bad).is_err());
    }

    #[test]
    fn page_bounds_limit() {
        assert_eq!(Page::new(None, None).expect("default"), Page::default());
        assert!(Page::new(Some(0), None).is_err());
        assert!(Page::new(Some(MAX_PAGE_SIZE + 1), None).is_err());
    }
}
