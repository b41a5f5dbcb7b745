use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use job_portal::accounts::{account_router, AccountService};
use job_portal::hiring::{hiring_router, HiringWorkflowService};
use job_portal::jobs::{job_router, JobBoardService};
use job_portal::mail::MailQueue;
use job_portal::notifications::{notification_router, NotificationEmitter};
use job_portal::persistence::SqliteStore;
use serde_json::json;
use std::sync::Arc;

/// Every domain router over one store, plus the operational endpoints.
pub(crate) fn portal_routes(store: Arc<SqliteStore>, mail: MailQueue) -> Router {
    let notifications = Arc::new(NotificationEmitter::new(store.clone()));
    let hiring = Arc::new(HiringWorkflowService::new(
        store.clone(),
        notifications.clone(),
        mail,
    ));
    let jobs = Arc::new(JobBoardService::new(store.clone()));
    let accounts = Arc::new(AccountService::new(store));

    Router::new()
        .merge(hiring_router(hiring))
        .merge(notification_router(notifications))
        .merge(job_router(jobs))
        .merge(account_router(accounts))
        .route("/", get(root))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Job portal API is running" }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if state.is_ready() {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use job_portal::mail::MailMessage;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        state: AppState,
        mail: mpsc::Receiver<MailMessage>,
    }

    fn test_app() -> TestApp {
        let store = Arc::new(SqliteStore::open_in_memory().expect("store opens"));
        let (queue, mail) = MailQueue::channel(16);
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            store: store.clone(),
        };
        let router = portal_routes(store, queue).layer(Extension(state.clone()));
        TestApp {
            router,
            state,
            mail,
        }
    }

    async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn root_and_health_respond() {
        let app = test_app();
        let response = app
            .router
            .clone()
            .oneshot(get_request("/"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .router
            .oneshot(get_request("/health"))
            .await
            .expect("response");
        let body = read_json_body(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let app = test_app();
        let response = app
            .router
            .clone()
            .oneshot(get_request("/ready"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        app.state.readiness.store(true, Ordering::Release);
        let response = app
            .router
            .oneshot(get_request("/ready"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_are_plain_text() {
        let app = test_app();
        let response = app
            .router
            .oneshot(get_request("/metrics"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn merged_routers_share_one_store() {
        let mut app = test_app();

        let company = read_json_body(
            app.router
                .clone()
                .oneshot(post_json(
                    "/company/create_company",
                    json!({ "company_name": "Hooli" }),
                ))
                .await
                .expect("response"),
        )
        .await;
        let company_id = company["company"]["id"].as_i64().expect("company id");

        let employer = read_json_body(
            app.router
                .clone()
                .oneshot(post_json(
                    "/user/register/employer",
                    json!({
                        "company_id": company_id,
                        "email": "gavin@hooli.example.com",
                        "password": "nucleus!"
                    }),
                ))
                .await
                .expect("response"),
        )
        .await;
        let employer_id = employer["id"].as_i64().expect("employer id");

        let seeker = read_json_body(
            app.router
                .clone()
                .oneshot(post_json(
                    "/user/register/jobseeker",
                    json!({
                        "first_name": "Richard",
                        "last_name": "Hendricks",
                        "email": "richard@piedpiper.example.com",
                        "password": "middle-out"
                    }),
                ))
                .await
                .expect("response"),
        )
        .await;
        let seeker_id = seeker["id"].as_i64().expect("seeker id");

        let job = read_json_body(
            app.router
                .clone()
                .oneshot(post_json(
                    "/employer/jobs",
                    json!({
                        "employer_id": employer_id,
                        "job_title": "Compression Engineer",
                        "expiry_date": "2031-01-01",
                        "requirements": ["C++"]
                    }),
                ))
                .await
                .expect("response"),
        )
        .await;
        let job_id = job["job"]["id"].as_i64().expect("job id");

        let response = app
            .router
            .clone()
            .oneshot(post_json(
                "/job_seeker/apply",
                json!({ "job_seeker_id": seeker_id, "job_listing_id": job_id }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let mail = app.mail.try_recv().expect("confirmation queued");
        assert_eq!(mail.to, "richard@piedpiper.example.com");

        let response = app
            .router
            .oneshot(get_request(&format!(
                "/notification/get_notifications/{seeker_id}"
            )))
            .await
            .expect("response");
        let body = read_json_body(response).await;
        assert_eq!(body["notifications"].as_array().map(Vec::len), Some(1));
    }
}
