use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{ApplicationSubmission, InterviewRequest, InterviewUpdate};
use super::repository::HiringRepository;
use super::service::HiringWorkflowService;
use crate::error::ServiceError;
use crate::notifications::NotificationRepository;

type SharedService<R, N> = Arc<HiringWorkflowService<R, N>>;

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub status: String,
}

/// Router builder exposing the application and interview endpoints.
pub fn hiring_router<R, N>(service: SharedService<R, N>) -> Router
where
    R: HiringRepository + 'static,
    N: NotificationRepository + 'static,
{
    Router::new()
        .route("/application/add_application", post(submit_handler::<R, N>))
        .route("/job_seeker/apply", post(submit_handler::<R, N>))
        .route(
            "/application/get_application/:id",
            get(application_handler::<R, N>),
        )
        .route(
            "/application/get_seeker_application/:id",
            get(seeker_applications_handler::<R, N>),
        )
        .route(
            "/application/get_job_application/:id",
            get(job_applications_handler::<R, N>),
        )
        .route("/application/add_result/:id", patch(decide_handler::<R, N>))
        .route("/application/get_result/:id", get(results_handler::<R, N>))
        .route(
            "/application/get_application_count/:id",
            get(application_count_handler::<R, N>),
        )
        .route(
            "/application/get_result_count/:id",
            get(result_count_handler::<R, N>),
        )
        .route(
            "/interview/schedule_interview",
            post(schedule_handler::<R, N>),
        )
        .route(
            "/interview/update_interview",
            patch(update_interview_handler::<R, N>),
        )
        .route(
            "/interview/get_interview/:id",
            get(interviews_handler::<R, N>),
        )
        .route(
            "/interview/get_seeker_interview/:id",
            get(seeker_interviews_handler::<R, N>),
        )
        .route(
            "/interview/get_interview_count/:id",
            get(interview_count_handler::<R, N>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    body: Result<Json<ApplicationSubmission>, JsonRejection>,
) -> Result<Json<Value>, ServiceError>
where
    R: HiringRepository + 'static,
    N: NotificationRepository + 'static,
{
    let Json(submission) = body?;
    let application = service.submit(submission)?;
    Ok(Json(json!({
        "message": "Application created successfully",
        "application": application,
    })))
}

pub(crate) async fn decide_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<DecisionRequest>, JsonRejection>,
) -> Result<Json<Value>, ServiceError>
where
    R: HiringRepository + 'static,
    N: NotificationRepository + 'static,
{
    let Path(application_id) = path?;
    let Json(request) = body?;
    let application = service.decide(application_id, &request.status)?;
    Ok(Json(json!({
        "message": "Application status updated successfully",
        "application": application,
    })))
}

pub(crate) async fn application_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ServiceError>
where
    R: HiringRepository + 'static,
    N: NotificationRepository + 'static,
{
    let Path(application_id) = path?;
    let application = service.application(application_id)?;
    Ok(Json(json!({ "application": application })))
}

pub(crate) async fn seeker_applications_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ServiceError>
where
    R: HiringRepository + 'static,
    N: NotificationRepository + 'static,
{
    let Path(job_seeker_id) = path?;
    let applications = service.seeker_applications(job_seeker_id)?;
    Ok(Json(json!({ "applications": applications })))
}

pub(crate) async fn job_applications_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ServiceError>
where
    R: HiringRepository + 'static,
    N: NotificationRepository + 'static,
{
    let Path(job_listing_id) = path?;
    let applications = service.job_applications(job_listing_id)?;
    Ok(Json(json!({ "applications": applications })))
}

pub(crate) async fn results_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ServiceError>
where
    R: HiringRepository + 'static,
    N: NotificationRepository + 'static,
{
    let Path(job_seeker_id) = path?;
    let applications = service.results(job_seeker_id)?;
    Ok(Json(json!({ "applications": applications })))
}

pub(crate) async fn application_count_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ServiceError>
where
    R: HiringRepository + 'static,
    N: NotificationRepository + 'static,
{
    let Path(job_seeker_id) = path?;
    let count = service.application_count(job_seeker_id)?;
    Ok(Json(json!({
        "job_seeker_id": job_seeker_id,
        "application_count": count,
    })))
}

pub(crate) async fn result_count_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ServiceError>
where
    R: HiringRepository + 'static,
    N: NotificationRepository + 'static,
{
    let Path(job_seeker_id) = path?;
    let count = service.result_count(job_seeker_id)?;
    Ok(Json(json!({
        "job_seeker_id": job_seeker_id,
        "result_count": count,
    })))
}

pub(crate) async fn schedule_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    body: Result<Json<InterviewRequest>, JsonRejection>,
) -> Result<Json<Value>, ServiceError>
where
    R: HiringRepository + 'static,
    N: NotificationRepository + 'static,
{
    let Json(request) = body?;
    let interview = service.schedule_interview(request)?;
    Ok(Json(json!({
        "message": "Interview scheduled successfully",
        "interview": interview,
    })))
}

pub(crate) async fn update_interview_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    body: Result<Json<InterviewUpdate>, JsonRejection>,
) -> Result<Json<Value>, ServiceError>
where
    R: HiringRepository + 'static,
    N: NotificationRepository + 'static,
{
    let Json(update) = body?;
    let interview = service.update_interview(update)?;
    Ok(Json(json!({
        "message": "Interview updated successfully",
        "interview": interview,
    })))
}

pub(crate) async fn interviews_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ServiceError>
where
    R: HiringRepository + 'static,
    N: NotificationRepository + 'static,
{
    let Path(application_id) = path?;
    let interviews = service.interviews(application_id)?;
    Ok(Json(json!({ "interviews": interviews })))
}

pub(crate) async fn seeker_interviews_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ServiceError>
where
    R: HiringRepository + 'static,
    N: NotificationRepository + 'static,
{
    let Path(job_seeker_id) = path?;
    let interviews = service.seeker_interviews(job_seeker_id)?;
    Ok(Json(json!({ "interviews": interviews })))
}

pub(crate) async fn interview_count_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ServiceError>
where
    R: HiringRepository + 'static,
    N: NotificationRepository + 'static,
{
    let Path(job_seeker_id) = path?;
    let count = service.interview_count(job_seeker_id)?;
    Ok(Json(json!({
        "job_seeker_id": job_seeker_id,
        "interview_count": count,
    })))
}
