//! Application and interview workflow.
//!
//! An application moves `Applied -> Approved | Rejected` exactly once. Deciding an
//! application removes its interviews in the same transaction. Every step emits an in-app
//! notification and, where the job seeker should hear about it by mail, queues a message.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantView, Application, ApplicationScope, ApplicationStatus, ApplicationSubmission,
    ApplicationSummary, Decision, Interview, InterviewRequest, InterviewStatus, InterviewUpdate,
    SeekerInterview,
};
pub use repository::HiringRepository;
pub use router::hiring_router;
pub use service::HiringWorkflowService;
