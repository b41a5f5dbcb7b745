use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{
    validate_password, Company, Credentials, EmployerProfile, EmployerRegistration,
    EmployerUpdate, JobSeekerProfile, JobSeekerRegistration, JobSeekerUpdate, LoginRequest,
    LoginResponse, NewCompany,
};
use super::password::{hash_password, verify_password};
use super::repository::AccountRepository;
use crate::error::ServiceError;
use crate::notifications::UserType;
use crate::persistence::RepositoryError;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Registration, login and profile maintenance for both account kinds.
pub struct AccountService<A> {
    repository: Arc<A>,
}

impl<A> AccountService<A>
where
    A: AccountRepository + 'static,
{
    pub fn new(repository: Arc<A>) -> Self {
        Self { repository }
    }

    pub fn register_job_seeker(
        &self,
        registration: JobSeekerRegistration,
    ) -> Result<JobSeekerProfile, ServiceError> {
        let mut details = registration.details;
        details.validate()?;
        validate_password(&registration.password)?;
        details.email = normalize_email(&details.email);

        let hash = hash(&registration.password)?;
        let profile = self
            .repository
            .insert_job_seeker(&details, &hash)
            .map_err(|err| email_conflict(err, &details.email))?;

        info!(job_seeker_id = profile.id, "job seeker registered");
        Ok(profile)
    }

    pub fn register_employer(
        &self,
        registration: EmployerRegistration,
    ) -> Result<EmployerProfile, ServiceError> {
        let mut details = registration.details;
        details.validate()?;
        validate_password(&registration.password)?;
        details.email = normalize_email(&details.email);

        let hash = hash(&registration.password)?;
        let company_id = details.company_id;
        let profile = self
            .repository
            .insert_employer(&details, &hash)
            .map_err(|err| match err {
                RepositoryError::NotFound => {
                    ServiceError::not_found(format!("company {company_id} not found"))
                }
                other => email_conflict(other, &details.email),
            })?;

        info!(employer_id = profile.id, company_id, "employer registered");
        Ok(profile)
    }

    pub fn seeker_login(&self, request: LoginRequest) -> Result<LoginResponse, ServiceError> {
        let credentials = self
            .repository
            .seeker_credentials(&normalize_email(&request.email))?;
        let credentials = check_credentials(credentials, &request.password)?;
        info!(job_seeker_id = credentials.user_id, "job seeker logged in");
        Ok(login_response(credentials, UserType::JobSeeker))
    }

    pub fn employer_login(&self, request: LoginRequest) -> Result<LoginResponse, ServiceError> {
        let credentials = self
            .repository
            .employer_credentials(&normalize_email(&request.email))?;
        let credentials = check_credentials(credentials, &request.password)?;
        info!(employer_id = credentials.user_id, "employer logged in");
        Ok(login_response(credentials, UserType::Employer))
    }

    pub fn job_seeker(&self, id: i64) -> Result<JobSeekerProfile, ServiceError> {
        self.repository
            .fetch_job_seeker(id)?
            .ok_or_else(|| ServiceError::not_found(format!("job seeker {id} not found")))
    }

    pub fn employer(&self, id: i64) -> Result<EmployerProfile, ServiceError> {
        self.repository
            .fetch_employer(id)?
            .ok_or_else(|| ServiceError::not_found(format!("employer {id} not found")))
    }

    pub fn update_job_seeker(
        &self,
        id: i64,
        update: JobSeekerUpdate,
    ) -> Result<JobSeekerProfile, ServiceError> {
        let mut details = update.details;
        details.validate()?;
        details.email = normalize_email(&details.email);
        let hash = match update.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                Some(hash(password)?)
            }
            None => None,
        };

        let profile = self
            .repository
            .update_job_seeker(id, &details, hash.as_deref())
            .map_err(|err| match err {
                RepositoryError::NotFound => {
                    ServiceError::not_found(format!("job seeker {id} not found"))
                }
                other => email_conflict(other, &details.email),
            })?;

        info!(job_seeker_id = id, password_changed = hash.is_some(), "job seeker profile updated");
        Ok(profile)
    }

    pub fn update_employer(
        &self,
        id: i64,
        update: EmployerUpdate,
    ) -> Result<EmployerProfile, ServiceError> {
        let mut details = update.details;
        details.validate()?;
        details.email = normalize_email(&details.email);
        let hash = match update.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                Some(hash(password)?)
            }
            None => None,
        };

        let profile = self
            .repository
            .update_employer(id, &details, hash.as_deref())
            .map_err(|err| match err {
                RepositoryError::NotFound => ServiceError::not_found(format!(
                    "employer {id} or company {} not found",
                    details.company_id
                )),
                other => email_conflict(other, &details.email),
            })?;

        info!(employer_id = id, password_changed = hash.is_some(), "employer profile updated");
        Ok(profile)
    }

    pub fn delete_job_seeker(&self, id: i64) -> Result<(), ServiceError> {
        self.repository.delete_job_seeker(id).map_err(|err| match err {
            RepositoryError::NotFound => ServiceError::not_found(format!("job seeker {id} not found")),
            other => other.into(),
        })?;
        info!(job_seeker_id = id, "job seeker deleted");
        Ok(())
    }

    pub fn delete_employer(&self, id: i64) -> Result<(), ServiceError> {
        self.repository.delete_employer(id).map_err(|err| match err {
            RepositoryError::NotFound => ServiceError::not_found(format!("employer {id} not found")),
            other => other.into(),
        })?;
        info!(employer_id = id, "employer deleted");
        Ok(())
    }

    pub fn create_company(&self, company: NewCompany) -> Result<Company, ServiceError> {
        if company.company_name.trim().is_empty() {
            return Err(ServiceError::validation("company_name is required"));
        }
        let company = self.repository.insert_company(&company)?;
        info!(company_id = company.id, "company created");
        Ok(company)
    }

    pub fn companies(&self) -> Result<Vec<Company>, ServiceError> {
        Ok(self.repository.list_companies()?)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash(password: &str) -> Result<String, ServiceError> {
    hash_password(password).map_err(|err| ServiceError::Internal(err.to_string()))
}

fn email_conflict(err: RepositoryError, email: &str) -> ServiceError {
    match err {
        RepositoryError::Conflict => {
            ServiceError::conflict(format!("email {email} is already registered"))
        }
        other => other.into(),
    }
}

/// Unknown emails and wrong passwords are indistinguishable to the caller.
fn check_credentials(
    credentials: Option<Credentials>,
    password: &str,
) -> Result<Credentials, ServiceError> {
    let credentials =
        credentials.ok_or_else(|| ServiceError::Auth(INVALID_CREDENTIALS.to_string()))?;
    match verify_password(password, &credentials.password_hash) {
        Ok(true) => Ok(credentials),
        Ok(false) => Err(ServiceError::Auth(INVALID_CREDENTIALS.to_string())),
        Err(err) => {
            warn!(user_id = credentials.user_id, error = %err, "stored password hash rejected");
            Err(ServiceError::Auth(INVALID_CREDENTIALS.to_string()))
        }
    }
}

fn login_response(credentials: Credentials, user_type: UserType) -> LoginResponse {
    LoginResponse {
        user_id: credentials.user_id,
        first_name: credentials.first_name,
        email: credentials.email,
        user_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::domain::{EmployerDetails, SeekerDetails, Skill};
    use crate::persistence::SqliteStore;

    fn service() -> AccountService<SqliteStore> {
        AccountService::new(Arc::new(SqliteStore::open_in_memory().expect("store opens")))
    }

    fn seeker(email: &str) -> JobSeekerRegistration {
        JobSeekerRegistration {
            details: SeekerDetails {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                email: email.to_string(),
                resume: Some("uploads/grace.pdf".to_string()),
                location: "Arlington".to_string(),
                profile_picture: String::new(),
                phone_number: "555-0199".to_string(),
                linkedin_url: String::new(),
                skills: vec![Skill {
                    skill_name: "COBOL".to_string(),
                    skill_level: "Expert".to_string(),
                }],
                education: Vec::new(),
                experience: Vec::new(),
            },
            password: "compil3r".to_string(),
        }
    }

    #[test]
    fn seeker_registration_and_login() {
        let service = service();
        let profile = service
            .register_job_seeker(seeker(" Grace@Navy.example.com "))
            .expect("register");
        assert_eq!(profile.details.email, "grace@navy.example.com");

        let login = service
            .seeker_login(LoginRequest {
                email: "GRACE@navy.example.com".to_string(),
                password: "compil3r".to_string(),
            })
            .expect("login");
        assert_eq!(login.user_id, profile.id);
        assert_eq!(login.first_name.as_deref(), Some("Grace"));
        assert_eq!(login.user_type, UserType::JobSeeker);

        let wrong = service.seeker_login(LoginRequest {
            email: "grace@navy.example.com".to_string(),
            password: "assembler".to_string(),
        });
        assert!(matches!(wrong, Err(ServiceError::Auth(_))));

        let unknown = service.seeker_login(LoginRequest {
            email: "nobody@example.com".to_string(),
            password: "compil3r".to_string(),
        });
        assert!(matches!(unknown, Err(ServiceError::Auth(_))));
    }

    #[test]
    fn duplicate_email_and_short_password_are_rejected() {
        let service = service();
        service
            .register_job_seeker(seeker("grace@navy.example.com"))
            .expect("register");
        assert!(matches!(
            service.register_job_seeker(seeker("grace@navy.example.com")),
            Err(ServiceError::Conflict(_))
        ));

        let mut short = seeker("other@navy.example.com");
        short.password = "abc".to_string();
        assert!(matches!(
            service.register_job_seeker(short),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn employer_needs_existing_company() {
        let service = service();
        let registration = EmployerRegistration {
            details: EmployerDetails {
                company_id: 12,
                email: "hr@initech.example.com".to_string(),
                description: String::new(),
                contact_person: "Bill".to_string(),
                contact_number: String::new(),
            },
            password: "tps-report".to_string(),
        };
        assert!(matches!(
            service.register_employer(registration.clone()),
            Err(ServiceError::NotFound(_))
        ));

        let company = service
            .create_company(NewCompany {
                company_name: "Initech".to_string(),
                industry: "Software".to_string(),
                website: String::new(),
                description: String::new(),
                logo: String::new(),
            })
            .expect("company");
        let mut registration = registration;
        registration.details.company_id = company.id;
        let employer = service.register_employer(registration).expect("employer");
        assert_eq!(employer.company_name, "Initech");

        let login = service
            .employer_login(LoginRequest {
                email: "hr@initech.example.com".to_string(),
                password: "tps-report".to_string(),
            })
            .expect("login");
        assert_eq!(login.user_id, employer.id);
        assert_eq!(login.first_name, None);
    }

    #[test]
    fn update_without_password_keeps_old_one() {
        let service = service();
        let profile = service
            .register_job_seeker(seeker("grace@navy.example.com"))
            .expect("register");

        let mut details = profile.details.clone();
        details.location = "Washington".to_string();
        details.skills.clear();
        let updated = service
            .update_job_seeker(
                profile.id,
                JobSeekerUpdate {
                    details,
                    password: None,
                },
            )
            .expect("update");
        assert_eq!(updated.details.location, "Washington");
        assert!(updated.details.skills.is_empty());

        service
            .seeker_login(LoginRequest {
                email: "grace@navy.example.com".to_string(),
                password: "compil3r".to_string(),
            })
            .expect("old password still valid");
    }

    #[test]
    fn delete_reports_missing_accounts() {
        let service = service();
        let profile = service
            .register_job_seeker(seeker("grace@navy.example.com"))
            .expect("register");
        service.delete_job_seeker(profile.id).expect("delete");
        assert!(matches!(
            service.job_seeker(profile.id),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_job_seeker(profile.id),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_employer(1),
            Err(ServiceError::NotFound(_))
        ));
    }
}
