//! HTTP-level tests for the job API.
//!
//! Each test drives the router directly with `tower::ServiceExt::oneshot`;
//! no scheduling loop runs, so submitted jobs stay Queued unless cancelled.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use vox_core::config::OrchestratorConfig;
use vox_core::scheduler::JobScheduler;
use vox_core::stages::StageRegistry;
use vox_core::store::JobStore;
use vox_core::supervisor::ProcessSupervisor;

fn app() -> Router {
    app_with(OrchestratorConfig::default())
}

fn app_with(config: OrchestratorConfig) -> Router {
    let registry = Arc::new(StageRegistry::standard(&config.tools));
    let scheduler = Arc::new(JobScheduler::new(
        config,
        Arc::new(JobStore::new()),
        Arc::new(ProcessSupervisor::new()),
        registry,
    ));
    vox_api::router(scheduler)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn submit_body(user_id: &str) -> Value {
    json!({
        "user_id": user_id,
        "video_path": "input/talk.mp4",
        "target_language": "en",
    })
}

#[tokio::test]
async fn test_health_reports_ok_and_version() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_submit_then_poll_status() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/jobs", Some(submit_body("alice"))).await;
    assert_eq!(status, StatusCode::OK);
    let job_id = body["job_id"].as_str().expect("job_id").to_string();

    let (status, body) = send(&app, Method::GET, &format!("/api/jobs/{job_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "QUEUED");
    assert_eq!(body["progress"], 0);
    // omitted until terminal
    assert!(body.get("result").is_none());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_duplicate_submission_is_conflict() {
    let app = app();
    send(&app, Method::POST, "/api/jobs", Some(submit_body("alice"))).await;

    let (status, body) = send(&app, Method::POST, "/api/jobs", Some(submit_body("alice"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_full_queue_is_service_unavailable() {
    let app = app_with(OrchestratorConfig {
        max_queue_len: Some(1),
        ..OrchestratorConfig::default()
    });

    send(&app, Method::POST, "/api/jobs", Some(submit_body("u1"))).await;
    let (status, body) = send(&app, Method::POST, "/api/jobs", Some(submit_body("u2"))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let app = app();
    let missing = uuid::Uuid::new_v4();

    let (status, body) = send(&app, Method::GET, &format!("/api/jobs/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_cancel_checks_ownership() {
    let app = app();
    let (_, body) = send(&app, Method::POST, "/api/jobs", Some(submit_body("alice"))).await;
    let job_id = body["job_id"].as_str().expect("job_id").to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/jobs/{job_id}/cancel"),
        Some(json!({"user_id": "mallory"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/jobs/{job_id}/cancel"),
        Some(json!({"user_id": "alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (_, body) = send(&app, Method::GET, &format!("/api/jobs/{job_id}"), None).await;
    assert_eq!(body["status"], "CANCELLED");
}

#[tokio::test]
async fn test_history_and_delete_flow() {
    let app = app();
    let (_, body) = send(&app, Method::POST, "/api/jobs", Some(submit_body("alice"))).await;
    let job_id = body["job_id"].as_str().expect("job_id").to_string();

    // queued jobs are not history and cannot be deleted
    let (_, body) = send(&app, Method::GET, "/api/jobs?user_id=alice", None).await;
    assert_eq!(body.as_array().expect("list").len(), 0);
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/jobs/{job_id}?user_id=alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    send(
        &app,
        Method::POST,
        &format!("/api/jobs/{job_id}/cancel"),
        Some(json!({"user_id": "alice"})),
    )
    .await;

    let (_, body) = send(&app, Method::GET, "/api/jobs?user_id=alice", None).await;
    let entries = body.as_array().expect("list");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["status"], "CANCELLED");
    assert_eq!(entries[0]["video_name"], "talk.mp4");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/jobs/{job_id}?user_id=alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (status, _) = send(&app, Method::GET, &format!("/api/jobs/{job_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
