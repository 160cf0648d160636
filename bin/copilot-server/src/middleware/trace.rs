use std::time::Instant;

use axum::body::{Body, Bytes};
use axum::extract::Request;
use http::{HeaderMap, HeaderValue, header};
use axum::middleware::Next;
use axum::response::Response;
use http_body_util::BodyExt;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

pub static X_TRACE_ID: &str = "x-trace-id";

/// Request bodies up to this size are logged at debug level.
const LOGGED_BODY_LIMIT: usize = 1024;

/// Tag every request with a trace id (taken from `x-trace-id` when it is a
/// valid UUID) and log its outcome inside an `http_request` span.
///
/// Response bodies are never buffered: `/v1/events` streams indefinitely.
pub async fn trace_middleware(req: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    let header_value = HeaderValue::from_str(&trace_id.to_string()).ok();

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        debug!("request started");
        let (parts, body) = req.into_parts();
        let body = log_small_json(&parts.headers, body).await;
        let mut req = Request::from_parts(parts, body);
        if let Some(v) = &header_value {
            req.headers_mut().insert(X_TRACE_ID, v.clone());
        }

        let mut response = next.run(req).await;
        if let Some(v) = header_value {
            response.headers_mut().insert(X_TRACE_ID, v);
        }

        info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "response finished"
        );
        response
    }
    .instrument(span)
    .await
}

/// Log the body when it is JSON and declares a `content-length` under
/// [`LOGGED_BODY_LIMIT`]. Anything else is passed through unread, so tab
/// snapshots reach the extractor's body limit without being buffered here.
async fn log_small_json(headers: &HeaderMap, body: Body) -> Body {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    let length = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());

    match length {
        None | Some(0) => return body,
        Some(len) if !is_json || len >= LOGGED_BODY_LIMIT => {
            debug!(size = len, is_json, "request body not logged");
            return body;
        }
        Some(_) => {}
    }

    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => Bytes::new(),
    };
    if let Ok(text) = std::str::from_utf8(&bytes) {
        debug!(body = %text, "request body");
    }
    Body::from(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(content_type: &str, length: usize) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
        headers
    }

    async fn read(body: Body) -> Bytes {
        body.collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn small_json_is_logged_and_kept() {
        let json = r#"{"url":"https://example.com"}"#;
        let body = log_small_json(&headers("application/json", json.len()), Body::from(json)).await;
        assert_eq!(read(body).await, json.as_bytes());
        assert!(logs_contain("request body"));
        assert!(logs_contain("example.com"));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn large_bodies_pass_through_unlogged() {
        let page = format!(r#"{{"html":"{}"}}"#, "x".repeat(4096));
        let body = log_small_json(&headers("application/json", page.len()), Body::from(page.clone())).await;
        assert_eq!(read(body).await, page.as_bytes());
        assert!(logs_contain("request body not logged"));
        assert!(!logs_contain("xxxx"));
    }
}
