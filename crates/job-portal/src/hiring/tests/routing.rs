use super::common::*;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::hiring::{hiring_router, HiringWorkflowService};
use crate::mail::MailQueue;
use crate::notifications::NotificationEmitter;
use crate::persistence::SqliteStore;

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

#[tokio::test]
async fn add_application_returns_created_record() {
    let harness = harness();
    let seed = harness.seed;
    let router = hiring_router(Arc::new(harness.service));

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/application/add_application",
            json!({
                "job_seeker_id": seed.seeker,
                "job_listing_id": seed.listing,
                "cover_letter": "Hello"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "Application created successfully");
    assert_eq!(payload["application"]["application_status"], "Applied");
    assert_eq!(payload["application"]["job_listing_id"], seed.listing);

    let duplicate = router
        .oneshot(json_request(
            Method::POST,
            "/job_seeker/apply",
            json!({ "job_seeker_id": seed.seeker, "job_listing_id": seed.listing }),
        ))
        .await
        .expect("route executes");
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    let payload = read_json_body(duplicate).await;
    assert_eq!(payload["error"], "you have already applied for this job");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let harness = harness();
    let router = hiring_router(Arc::new(harness.service));

    let response = router
        .oneshot(
            Request::post("/application/add_application")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"].as_str().is_some());
}

#[tokio::test]
async fn add_result_validates_status_and_decides() {
    let harness = harness();
    let application = harness
        .service
        .submit(submission(&harness.seed))
        .expect("submission");
    let router = hiring_router(Arc::new(harness.service));
    let uri = format!("/application/add_result/{}", application.id);

    let response = router
        .clone()
        .oneshot(json_request(Method::PATCH, &uri, json!({ "status": "Pending" })))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["error"],
        "Invalid status. Allowed values: 'Approved' or 'Rejected'"
    );

    let response = router
        .clone()
        .oneshot(json_request(Method::PATCH, &uri, json!({ "status": "Rejected" })))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["application"]["application_status"], "Rejected");

    let response = router
        .oneshot(json_request(
            Method::PATCH,
            "/application/add_result/9999",
            json!({ "status": "Approved" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn interview_routes_round_out_the_flow() {
    let harness = harness();
    let seed = harness.seed;
    let application = harness
        .service
        .submit(submission(&seed))
        .expect("submission");
    let router = hiring_router(Arc::new(harness.service));

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/interview/schedule_interview",
            json!({
                "application_id": application.id,
                "scheduled_date": "2025-03-14T15:00:00Z",
                "interview_mode": "Online",
                "interviewer_name": "Grace Hopper",
                "interview_link": "https://meet.example.com/xyz"
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["interview"]["status"], "Scheduled");
    let interview_id = payload["interview"]["id"].as_i64().expect("interview id");

    let response = router
        .clone()
        .oneshot(json_request(
            Method::PATCH,
            "/interview/update_interview",
            json!({
                "id": interview_id,
                "scheduled_date": "2025-03-15T09:30:00Z",
                "interview_mode": "On-site",
                "interviewer_name": "Grace Hopper"
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(get(&format!("/interview/get_seeker_interview/{}", seed.seeker)))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["interviews"][0]["interview_mode"], "On-site");
    assert_eq!(payload["interviews"][0]["company_name"], "Acme Corp");

    let response = router
        .oneshot(get(&format!("/interview/get_interview_count/{}", seed.seeker)))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["interview_count"], 1);
    assert_eq!(payload["job_seeker_id"], seed.seeker);
}

#[tokio::test]
async fn read_routes_return_empty_lists_and_counts() {
    let harness = harness();
    let seed = harness.seed;
    let router = hiring_router(Arc::new(harness.service));

    let response = router
        .clone()
        .oneshot(get(&format!("/application/get_seeker_application/{}", seed.seeker)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["applications"], json!([]));

    let response = router
        .clone()
        .oneshot(get(&format!("/application/get_result_count/{}", seed.seeker)))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["result_count"], 0);

    let response = router
        .oneshot(get("/application/get_application/12"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn storage_outage_is_internal_error_without_detail() {
    let (queue, _mail) = MailQueue::channel(4);
    let service = HiringWorkflowService::new(
        Arc::new(UnavailableRepository),
        Arc::new(NotificationEmitter::new(Arc::new(
            SqliteStore::open_in_memory().expect("store opens"),
        ))),
        queue,
    );
    let router = hiring_router(Arc::new(service));

    let response = router
        .oneshot(get("/application/get_job_application/1"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "internal server error");
}
