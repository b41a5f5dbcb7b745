//! Job seeker and employer accounts, login, and the company registry.

pub mod domain;
pub mod password;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    Company, Credentials, Education, EmployerDetails, EmployerProfile, EmployerRegistration,
    EmployerUpdate, Experience, JobSeekerProfile, JobSeekerRegistration, JobSeekerUpdate,
    LoginRequest, LoginResponse, NewCompany, SeekerDetails, Skill,
};
pub use repository::AccountRepository;
pub use router::account_router;
pub use service::AccountService;
