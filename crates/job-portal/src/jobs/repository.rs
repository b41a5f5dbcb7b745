use chrono::{DateTime, Utc};

use super::domain::{JobFilter, JobListing, NewJob, Page};
use crate::persistence::RepositoryError;

pub trait JobRepository: Send + Sync {
    /// Inserts the listing and its requirements atomically. `NotFound` for unknown employers.
    fn insert_job(&self, job: &NewJob, posted_date: DateTime<Utc>)
        -> Result<JobListing, RepositoryError>;

    fn fetch_job(&self, id: i64) -> Result<Option<JobListing>, RepositoryError>;

    /// Newest first.
    fn list_jobs(&self, page: Page) -> Result<Vec<JobListing>, RepositoryError>;

    fn jobs_by_employer(&self, employer_id: i64) -> Result<Vec<JobListing>, RepositoryError>;

    /// Replaces the listing fields and its whole requirement set atomically.
    fn update_job(&self, id: i64, job: &NewJob) -> Result<JobListing, RepositoryError>;

    fn delete_job(&self, id: i64) -> Result<(), RepositoryError>;

    fn filter_jobs(&self, filter: &JobFilter) -> Result<Vec<JobListing>, RepositoryError>;
}
