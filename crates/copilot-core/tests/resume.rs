use copilot_core::viewer::{load_master_resume, save_master_resume};
use copilot_core::{ApiClient, ApiError, ViewError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

#[tokio::test]
async fn loads_master_resume_markdown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/master_resume"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "document_markdown": "# Jane Doe",
            "document_id": "abc"
        })))
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    assert_eq!(load_master_resume(&api).await.unwrap(), "# Jane Doe");
}

#[tokio::test]
async fn missing_markdown_loads_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/master_resume"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    assert_eq!(load_master_resume(&api).await.unwrap(), "");
}

#[tokio::test]
async fn save_upserts_fresh_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/document_store/upsert"))
        .and(body_partial_json(json!({
            "document_name": "master_resume",
            "document_markdown": "# Updated"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(2)
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let first = save_master_resume(&api, "# Updated").await.unwrap();
    let second = save_master_resume(&api, "\n  # Updated \n\n").await.unwrap();
    assert_eq!(second.document_markdown, "# Updated");
    assert_ne!(first.document_id, second.document_id);
    assert!(first.document_timestamp > 1_600_000_000);

    let received: Vec<Request> = server.received_requests().await.unwrap();
    let body: serde_json::Value = received[0].body_json().unwrap();
    assert!(body["document_timestamp"].is_i64());
    let padded: serde_json::Value = received[1].body_json().unwrap();
    assert_eq!(padded["document_markdown"], "# Updated");
}

#[tokio::test]
async fn blank_resume_is_rejected_without_a_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let err = save_master_resume(&api, "  \n\t ").await.unwrap_err();
    assert!(matches!(err, ViewError::EmptyResume));
    assert_eq!(err.to_string(), "Resume content cannot be empty.");
}

#[tokio::test]
async fn credits_and_decode_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openrouter_credits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"remaining_credits": 4.2})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs_recent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let credits = api.openrouter_credits().await.unwrap();
    assert!((credits.remaining_credits - 4.2).abs() < f64::EPSILON);

    let err = api.jobs_recent(5, 200).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}
