use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use super::domain::{
    EmployerRegistration, EmployerUpdate, JobSeekerRegistration, JobSeekerUpdate, LoginRequest,
    LoginResponse, NewCompany,
};
use super::repository::AccountRepository;
use super::service::AccountService;
use crate::error::ServiceError;

type SharedService<A> = Arc<AccountService<A>>;

/// Router builder for `/user/*` and `/company/*`.
pub fn account_router<A>(service: SharedService<A>) -> Router
where
    A: AccountRepository + 'static,
{
    Router::new()
        .route("/user/register/jobseeker", post(register_seeker_handler::<A>))
        .route("/user/register/employer", post(register_employer_handler::<A>))
        .route("/user/seeker_login", post(seeker_login_handler::<A>))
        .route("/user/employer_login", post(employer_login_handler::<A>))
        .route("/user/logout", post(logout_handler))
        .route("/user/jobseeker/:id", get(seeker_handler::<A>))
        .route("/user/employer/:id", get(employer_handler::<A>))
        .route("/user/update_jobseeker/:id", put(update_seeker_handler::<A>))
        .route("/user/update_employer/:id", put(update_employer_handler::<A>))
        .route("/user/delete_jobseeker/:id", delete(delete_seeker_handler::<A>))
        .route("/user/delete_employer/:id", delete(delete_employer_handler::<A>))
        .route("/company/create_company", post(create_company_handler::<A>))
        .route("/company/get_companies", get(companies_handler::<A>))
        .with_state(service)
}

/// Runs an argon2-bound service call on the blocking pool.
async fn on_blocking_pool<A, T, F>(service: SharedService<A>, call: F) -> Result<T, ServiceError>
where
    A: AccountRepository + 'static,
    T: Send + 'static,
    F: FnOnce(&AccountService<A>) -> Result<T, ServiceError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || call(&service))
        .await
        .map_err(|err| ServiceError::Internal(format!("account task failed: {err}")))?
}

pub(crate) async fn register_seeker_handler<A>(
    State(service): State<SharedService<A>>,
    body: Result<Json<JobSeekerRegistration>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ServiceError>
where
    A: AccountRepository + 'static,
{
    let Json(registration) = body?;
    let profile =
        on_blocking_pool(service, move |svc| svc.register_job_seeker(registration)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Job Seeker registered successfully",
            "id": profile.id,
            "profile": profile,
        })),
    ))
}

pub(crate) async fn register_employer_handler<A>(
    State(service): State<SharedService<A>>,
    body: Result<Json<EmployerRegistration>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ServiceError>
where
    A: AccountRepository + 'static,
{
    let Json(registration) = body?;
    let profile = on_blocking_pool(service, move |svc| svc.register_employer(registration)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Employer registered successfully",
            "id": profile.id,
            "profile": profile,
        })),
    ))
}

pub(crate) async fn seeker_login_handler<A>(
    State(service): State<SharedService<A>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ServiceError>
where
    A: AccountRepository + 'static,
{
    let Json(request) = body?;
    let response = on_blocking_pool(service, move |svc| svc.seeker_login(request)).await?;
    Ok(Json(response))
}

pub(crate) async fn employer_login_handler<A>(
    State(service): State<SharedService<A>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ServiceError>
where
    A: AccountRepository + 'static,
{
    let Json(request) = body?;
    let response = on_blocking_pool(service, move |svc| svc.employer_login(request)).await?;
    Ok(Json(response))
}

/// Sessions are not tracked server side.
pub(crate) async fn logout_handler() -> Json<Value> {
    Json(json!({ "message": "Logout successful" }))
}

pub(crate) async fn seeker_handler<A>(
    State(service): State<SharedService<A>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ServiceError>
where
    A: AccountRepository + 'static,
{
    let Path(id) = path?;
    let profile = service.job_seeker(id)?;
    Ok(Json(json!({ "profile": profile })))
}

pub(crate) async fn employer_handler<A>(
    State(service): State<SharedService<A>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ServiceError>
where
    A: AccountRepository + 'static,
{
    let Path(id) = path?;
    let profile = service.employer(id)?;
    Ok(Json(json!({ "profile": profile })))
}

pub(crate) async fn update_seeker_handler<A>(
    State(service): State<SharedService<A>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<JobSeekerUpdate>, JsonRejection>,
) -> Result<Json<Value>, ServiceError>
where
    A: AccountRepository + 'static,
{
    let Path(id) = path?;
    let Json(update) = body?;
    let profile = on_blocking_pool(service, move |svc| svc.update_job_seeker(id, update)).await?;
    Ok(Json(json!({
        "message": "Job Seeker profile updated successfully",
        "profile": profile,
    })))
}

pub(crate) async fn update_employer_handler<A>(
    State(service): State<SharedService<A>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<EmployerUpdate>, JsonRejection>,
) -> Result<Json<Value>, ServiceError>
where
    A: AccountRepository + 'static,
{
    let Path(id) = path?;
    let Json(update) = body?;
    let profile = on_blocking_pool(service, move |svc| svc.update_employer(id, update)).await?;
    Ok(Json(json!({
        "message": "Employer profile updated successfully",
        "profile": profile,
    })))
}

pub(crate) async fn delete_seeker_handler<A>(
    State(service): State<SharedService<A>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ServiceError>
where
    A: AccountRepository + 'static,
{
    let Path(id) = path?;
    service.delete_job_seeker(id)?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

pub(crate) async fn delete_employer_handler<A>(
    State(service): State<SharedService<A>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ServiceError>
where
    A: AccountRepository + 'static,
{
    let Path(id) = path?;
    service.delete_employer(id)?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

pub(crate) async fn create_company_handler<A>(
    State(service): State<SharedService<A>>,
    body: Result<Json<NewCompany>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ServiceError>
where
    A: AccountRepository + 'static,
{
    let Json(company) = body?;
    let company = service.create_company(company)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Company created successfully",
            "company": company,
        })),
    ))
}

pub(crate) async fn companies_handler<A>(
    State(service): State<SharedService<A>>,
) -> Result<Json<Value>, ServiceError>
where
    A: AccountRepository + 'static,
{
    let companies = service.companies()?;
    Ok(Json(json!({ "companies": companies })))
}
