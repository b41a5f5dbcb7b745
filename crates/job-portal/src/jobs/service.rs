use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{JobFilter, JobInput, JobListing, Page};
use super::repository::JobRepository;
use crate::error::ServiceError;
use crate::persistence::RepositoryError;

/// Employer-side listing management and the public job search.
pub struct JobBoardService<J> {
    repository: Arc<J>,
}

impl<J> JobBoardService<J>
where
    J: JobRepository + 'static,
{
    pub fn new(repository: Arc<J>) -> Self {
        Self { repository }
    }

    pub fn create(&self, input: JobInput) -> Result<JobListing, ServiceError> {
        let job = input.validate()?;
        let listing = self
            .repository
            .insert_job(&job, Utc::now())
            .map_err(|err| match err {
                RepositoryError::NotFound => {
                    ServiceError::not_found(format!("employer {} not found", job.employer_id))
                }
                other => other.into(),
            })?;

        info!(
            job_listing_id = listing.id,
            employer_id = listing.employer_id,
            requirements = listing.requirements.len(),
            "job listing created"
        );
        Ok(listing)
    }

    pub fn update(&self, id: i64, input: JobInput) -> Result<JobListing, ServiceError> {
        let job = input.validate()?;
        let listing = self.repository.update_job(id, &job).map_err(|err| match err {
            RepositoryError::NotFound => {
                ServiceError::not_found(format!("job listing {id} or employer {} not found", job.employer_id))
            }
            other => other.into(),
        })?;
        info!(job_listing_id = id, "job listing updated");
        Ok(listing)
    }

    pub fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.repository.delete_job(id).map_err(|err| match err {
            RepositoryError::NotFound => ServiceError::not_found(format!("job listing {id} not found")),
            other => other.into(),
        })?;
        info!(job_listing_id = id, "job listing deleted");
        Ok(())
    }

    pub fn job(&self, id: i64) -> Result<JobListing, ServiceError> {
        self.repository
            .fetch_job(id)?
            .ok_or_else(|| ServiceError::not_found(format!("job listing {id} not found")))
    }

    pub fn list(&self, page: Page) -> Result<Vec<JobListing>, ServiceError> {
        Ok(self.repository.list_jobs(page)?)
    }

    pub fn employer_jobs(&self, employer_id: i64) -> Result<Vec<JobListing>, ServiceError> {
        if employer_id <= 0 {
            return Err(ServiceError::validation("Invalid employer_id"));
        }
        Ok(self.repository.jobs_by_employer(employer_id)?)
    }

    pub fn search(&self, filter: &JobFilter) -> Result<Vec<JobListing>, ServiceError> {
        if let (Some(min), Some(max)) = (filter.min_salary, filter.max_salary) {
            if min > 0.0 && max > 0.0 && min > max {
                return Err(ServiceError::validation(
                    "min_salary must not exceed max_salary",
                ));
            }
        }
        Ok(self.repository.filter_jobs(filter)?)
    }
}
