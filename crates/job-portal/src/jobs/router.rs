use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{JobFilter, JobInput, Page};
use super::repository::JobRepository;
use super::service::JobBoardService;
use crate::error::ServiceError;

type SharedService<J> = Arc<JobBoardService<J>>;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct EmployerQuery {
    pub employer_id: i64,
}

/// Router builder for employer listing management and the public job board.
///
/// Static `filter` segments take priority over the `:id` captures next to them.
pub fn job_router<J>(service: SharedService<J>) -> Router
where
    J: JobRepository + 'static,
{
    Router::new()
        .route(
            "/employer/jobs",
            get(employer_jobs_handler::<J>).post(create_handler::<J>),
        )
        .route(
            "/employer/jobs/:id",
            get(job_handler::<J>)
                .put(update_handler::<J>)
                .delete(delete_handler::<J>),
        )
        .route("/jobs", get(list_handler::<J>).post(create_handler::<J>))
        .route("/jobs/filter", get(filter_handler::<J>))
        .route("/jobs/:id", get(job_handler::<J>))
        .route("/job_seeker/jobs", get(list_handler::<J>))
        .route("/job_seeker/jobs/filter", get(filter_handler::<J>))
        .route("/job_seeker/jobs/:id", get(job_handler::<J>))
        .with_state(service)
}

pub(crate) async fn create_handler<J>(
    State(service): State<SharedService<J>>,
    body: Result<Json<JobInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ServiceError>
where
    J: JobRepository + 'static,
{
    let Json(input) = body?;
    let job = service.create(input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Job created successfully",
            "job": job,
        })),
    ))
}

pub(crate) async fn update_handler<J>(
    State(service): State<SharedService<J>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<JobInput>, JsonRejection>,
) -> Result<Json<Value>, ServiceError>
where
    J: JobRepository + 'static,
{
    let Path(id) = path?;
    let Json(input) = body?;
    let job = service.update(id, input)?;
    Ok(Json(json!({
        "message": "Job updated successfully",
        "job": job,
    })))
}

pub(crate) async fn delete_handler<J>(
    State(service): State<SharedService<J>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ServiceError>
where
    J: JobRepository + 'static,
{
    let Path(id) = path?;
    service.delete(id)?;
    Ok(Json(json!({ "message": "Job deleted successfully" })))
}

pub(crate) async fn employer_jobs_handler<J>(
    State(service): State<SharedService<J>>,
    query: Result<Query<EmployerQuery>, QueryRejection>,
) -> Result<Json<Value>, ServiceError>
where
    J: JobRepository + 'static,
{
    let Query(query) = query.map_err(|_| ServiceError::validation("Invalid employer_id"))?;
    let jobs = service.employer_jobs(query.employer_id)?;
    Ok(Json(json!({ "jobs": jobs })))
}

pub(crate) async fn job_handler<J>(
    State(service): State<SharedService<J>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ServiceError>
where
    J: JobRepository + 'static,
{
    let Path(id) = path?;
    let job = service.job(id)?;
    Ok(Json(json!({ "job": job })))
}

pub(crate) async fn list_handler<J>(
    State(service): State<SharedService<J>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Value>, ServiceError>
where
    J: JobRepository + 'static,
{
    let Query(query) =
        query.map_err(|_| ServiceError::validation("Invalid limit or offset"))?;
    let page = Page::new(query.limit, query.offset)?;
    let jobs = service.list(page)?;
    Ok(Json(json!({
        "jobs": jobs,
        "limit": page.limit,
        "offset": page.offset,
    })))
}

pub(crate) async fn filter_handler<J>(
    State(service): State<SharedService<J>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Value>, ServiceError>
where
    J: JobRepository + 'static,
{
    let Query(pairs) = query?;
    let filter = JobFilter::from_pairs(&pairs)?;
    let jobs = service.search(&filter)?;
    Ok(Json(json!({ "jobs": jobs })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{fixtures, SqliteStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    async fn read_json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn app() -> (Router, fixtures::Seed) {
        let store = Arc::new(SqliteStore::open_in_memory().expect("store opens"));
        let seed = fixtures::seed(&store);
        (job_router(Arc::new(JobBoardService::new(store))), seed)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn create_then_fetch_through_both_prefixes() {
        let (app, seed) = app();
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/employer/jobs",
                json!({
                    "employer_id": seed.employer,
                    "job_title": "SRE",
                    "location": "Remote",
                    "job_type": "Full-time",
                    "min_salary": 70000,
                    "max_salary": 90000,
                    "expiry_date": "2030-05-01",
                    "requirements": ["Kubernetes", "Terraform"]
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json_body(response).await;
        let id = body["job"]["id"].as_i64().expect("job id");
        assert_eq!(body["job"]["status"], "Open");

        for uri in [format!("/jobs/{id}"), format!("/job_seeker/jobs/{id}")] {
            let response = app
                .clone()
                .oneshot(get_request(&uri))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::OK);
            let body = read_json_body(response).await;
            assert_eq!(body["job"]["requirements"], json!(["Kubernetes", "Terraform"]));
        }
    }

    #[tokio::test]
    async fn public_jobs_path_accepts_new_listings() {
        let (app, seed) = app();
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/jobs",
                json!({
                    "employer_id": seed.employer,
                    "job_title": "Data Engineer",
                    "location": "Berlin",
                    "job_type": "Contract",
                    "expiry_date": "2030-07-01",
                    "requirements": ["SQL"]
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json_body(response).await;
        assert_eq!(body["message"], "Job created successfully");
        let id = body["job"]["id"].as_i64().expect("job id");

        let response = app
            .oneshot(get_request(&format!("/jobs/{id}")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["job"]["job_title"], "Data Engineer");
    }

    #[tokio::test]
    async fn bad_expiry_date_is_rejected() {
        let (app, seed) = app();
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/employer/jobs",
                json!({
                    "employer_id": seed.employer,
                    "job_title": "SRE",
                    "expiry_date": "tomorrow"
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json_body(response).await;
        assert_eq!(body["error"], "Invalid expiry_date format. Use YYYY-MM-DD.");
    }

    #[tokio::test]
    async fn filter_route_is_not_captured_as_id() {
        let (app, _) = app();
        let response = app
            .oneshot(get_request(
                "/job_seeker/jobs/filter?location=remote&min_salary=80000",
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["jobs"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn filter_reports_malformed_salary() {
        let (app, _) = app();
        let response = app
            .oneshot(get_request("/jobs/filter?min_salary=plenty"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json_body(response).await;
        assert_eq!(body["error"], "Invalid min_salary format");
    }

    #[tokio::test]
    async fn list_applies_pagination_bounds() {
        let (app, _) = app();
        let response = app
            .clone()
            .oneshot(get_request("/jobs"))
            .await
            .expect("response");
        let body = read_json_body(response).await;
        assert_eq!(body["limit"], 10);
        assert_eq!(body["jobs"].as_array().map(Vec::len), Some(1));

        let response = app
            .clone()
            .oneshot(get_request("/jobs?limit=0"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(get_request("/jobs?offset=-1"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn employer_listing_and_delete() {
        let (app, seed) = app();
        let response = app
            .clone()
            .oneshot(get_request(&format!("/employer/jobs?employer_id={}", seed.employer)))
            .await
            .expect("response");
        let body = read_json_body(response).await;
        assert_eq!(body["jobs"].as_array().map(Vec::len), Some(1));

        let response = app
            .clone()
            .oneshot(get_request("/employer/jobs?employer_id=abc"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let delete = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/employer/jobs/{}", seed.listing))
            .body(Body::empty())
            .expect("request");
        let response = app.clone().oneshot(delete).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get_request(&format!("/jobs/{}", seed.listing)))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
