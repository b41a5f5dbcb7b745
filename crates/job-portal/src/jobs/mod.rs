//! Job board: listings with their requirement sets, pagination and search.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{JobFilter, JobInput, JobListing, JobStatus, NewJob, Page};
pub use repository::JobRepository;
pub use router::job_router;
pub use service::JobBoardService;
