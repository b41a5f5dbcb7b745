use super::domain::{
    Company, Credentials, EmployerDetails, EmployerProfile, JobSeekerProfile, NewCompany,
    SeekerDetails,
};
use crate::persistence::RepositoryError;

/// Storage for accounts. Password hashes go in but only come out through the credential lookups.
pub trait AccountRepository: Send + Sync {
    /// Inserts the seeker with skills, education and experience atomically.
    /// `Conflict` when the email is taken.
    fn insert_job_seeker(
        &self,
        details: &SeekerDetails,
        password_hash: &str,
    ) -> Result<JobSeekerProfile, RepositoryError>;

    fn fetch_job_seeker(&self, id: i64) -> Result<Option<JobSeekerProfile>, RepositoryError>;

    /// Replaces the profile and every sub-collection atomically. The hash is kept when `None`.
    fn update_job_seeker(
        &self,
        id: i64,
        details: &SeekerDetails,
        password_hash: Option<&str>,
    ) -> Result<JobSeekerProfile, RepositoryError>;

    fn delete_job_seeker(&self, id: i64) -> Result<(), RepositoryError>;

    fn seeker_credentials(&self, email: &str) -> Result<Option<Credentials>, RepositoryError>;

    /// `NotFound` when the company does not exist, `Conflict` when the email is taken.
    fn insert_employer(
        &self,
        details: &EmployerDetails,
        password_hash: &str,
    ) -> Result<EmployerProfile, RepositoryError>;

    fn fetch_employer(&self, id: i64) -> Result<Option<EmployerProfile>, RepositoryError>;

    fn update_employer(
        &self,
        id: i64,
        details: &EmployerDetails,
        password_hash: Option<&str>,
    ) -> Result<EmployerProfile, RepositoryError>;

    fn delete_employer(&self, id: i64) -> Result<(), RepositoryError>;

    fn employer_credentials(&self, email: &str) -> Result<Option<Credentials>, RepositoryError>;

    fn insert_company(&self, company: &NewCompany) -> Result<Company, RepositoryError>;

    fn list_companies(&self) -> Result<Vec<Company>, RepositoryError>;
}
