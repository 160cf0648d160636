//! End-to-end route tests: in-memory SQLite store, mocked extraction API.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use copilot_core::SqliteTaskStore;
use copilot_server::{AppState, Config, routes};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JOB_URL: &str = "https://www.linkedin.com/jobs/view/99";
const JOB_PAGE: &str = r#"<html><body><div class="jobs-search__job-details--wrapper">
<h1>Platform Engineer</h1></div></body></html>"#;

async fn app(api_base: &str) -> Router {
    let config = Config {
        api_base: api_base.to_owned(),
        ..Config::default()
    };
    let store = SqliteTaskStore::in_memory().await.unwrap();
    routes::build(Arc::new(AppState::new(config, store).unwrap()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn wait_for_terminal(app: &Router, id: &str) -> Value {
    for _ in 0..100 {
        let (_, task) = send_json(app, Method::GET, &format!("/v1/tasks/{id}"), None).await;
        if matches!(task["status"].as_str(), Some("completed" | "error")) {
            return task;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("task {id} never finished");
}

#[tokio::test]
async fn health_and_openapi() {
    let app = app("http://127.0.0.1:9").await;
    let (status, body) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, doc) = send_json(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/v1/tasks"].is_object());
    assert!(doc["paths"]["/v1/tabs/{tab_id}"].is_object());
}

#[tokio::test]
async fn extract_flow_and_applied_toggle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/html_extract"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"job_id": 99, "job_title": "Platform Engineer", "job_company": "Initech", "job_applied": 0}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/update_job_applied"))
        .and(body_json(json!({"job_id": 99})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server.uri()).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/v1/tabs/7",
        Some(json!({"url": JOB_URL, "html": JOB_PAGE})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, queued) = send_json(&app, Method::POST, "/v1/tasks", Some(json!({"url": JOB_URL}))).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(queued["status"], "queued");
    assert!(queued.get("data").is_none());
    let id = queued["id"].as_str().unwrap().to_owned();

    let done = wait_for_terminal(&app, &id).await;
    assert_eq!(done["status"], "completed");
    assert_eq!(
        done["data"],
        json!({"job_id": 99, "job_title": "Platform Engineer", "job_company": "Initech", "job_applied": 0})
    );
    assert!(done["completedAt"].is_string());

    let (status, toggled) = send_json(&app, Method::POST, &format!("/v1/tasks/{id}/applied"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["data"]["job_applied"], 1);

    let (_, hidden) = send_json(&app, Method::GET, "/v1/tasks?hide_applied=true", None).await;
    assert_eq!(hidden, json!([]));
    let (_, all) = send_json(&app, Method::GET, "/v1/tasks", None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, page) = send(&app, Method::GET, "/pages/session", None).await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(page).unwrap();
    assert!(page.contains("Platform Engineer at Initech"));

    let (status, _) = send(&app, Method::DELETE, "/v1/tasks", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, all) = send_json(&app, Method::GET, "/v1/tasks", None).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn closed_tab_fails_task() {
    let app = app("http://127.0.0.1:9").await;
    send(
        &app,
        Method::PUT,
        "/v1/tabs/1",
        Some(json!({"url": JOB_URL, "html": JOB_PAGE})),
    )
    .await;
    let (status, _) = send(&app, Method::DELETE, "/v1/tabs/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, "/v1/tabs/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, queued) = send_json(&app, Method::POST, "/v1/tasks", Some(json!({"url": JOB_URL}))).await;
    let done = wait_for_terminal(&app, queued["id"].as_str().unwrap()).await;
    assert_eq!(done["status"], "error");
    assert_eq!(done["error"], "Original tab not found. It may have been closed.");
    assert!(done.get("data").is_none());
}

#[tokio::test]
async fn rejects_bad_input() {
    let app = app("http://127.0.0.1:9").await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/v1/tasks",
        Some(json!({"url": "chrome://newtab"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("chrome://newtab"));

    let (status, _) = send(&app, Method::GET, "/v1/tasks/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/v1/resume",
        Some(json!({"document_markdown": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Resume content cannot be empty.");
}

#[tokio::test]
async fn api_endpoint_setting_round_trip() {
    let app = app("http://127.0.0.1:9").await;

    let (_, initial) = send_json(&app, Method::GET, "/v1/settings/api-endpoint", None).await;
    assert_eq!(initial["api_endpoint"], Value::Null);
    assert_eq!(initial["default_endpoint"], "http://127.0.0.1:9/html_extract");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/v1/settings/api-endpoint",
        Some(json!({"api_endpoint": "ftp://example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, set) = send_json(
        &app,
        Method::PUT,
        "/v1/settings/api-endpoint",
        Some(json!({"api_endpoint": "http://10.0.0.2:8000/html_extract"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(set["api_endpoint"], "http://10.0.0.2:8000/html_extract");

    let (_, cleared) = send_json(
        &app,
        Method::PUT,
        "/v1/settings/api-endpoint",
        Some(json!({"api_endpoint": null})),
    )
    .await;
    assert_eq!(cleared["api_endpoint"], Value::Null);
}

#[tokio::test]
async fn history_page_shows_api_errors_inline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "database offline"})))
        .mount(&server)
        .await;
    let app = app(&server.uri()).await;

    let (status, page) = send(&app, Method::GET, "/pages/history?days_back=abc", None).await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(page).unwrap();
    assert!(page.contains("database offline"));
    assert!(page.contains(r#"value="5""#));
}

#[tokio::test]
async fn resume_page_saves_through_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/document_store/upsert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server.uri()).await;

    let req = Request::builder()
        .method(Method::POST)
        .uri("/pages/resume")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("markdown=%23+Jane+Doe%0A**Rust**"))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("Resume saved."));
    assert!(page.contains("<h1>Jane Doe</h1>"));
    assert!(page.contains("<strong>Rust</strong>"));
}
