//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors become a JSON-body HTTP
//! response with an appropriate status code.
//!
//! Internal errors (store, templates) are logged with full detail and only a
//! generic message is returned. Messages from the extraction API are
//! user-facing and are passed through.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use copilot_core::render::RenderError;
use copilot_core::{ApiError, StoreError, SubmitError, ViewError};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// The extraction/assessment API failed or refused the call.
    #[error("upstream error: {0}")]
    Upstream(#[from] ApiError),

    /// The API answered but the operation did not succeed.
    #[error("{0}")]
    UpstreamRejected(String),

    /// The caller referenced a resource that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The resource is not in a state that allows the operation.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
            ServerError::UpstreamRejected(m) => (StatusCode::BAD_GATEWAY, m.clone()),

            ServerError::Upstream(e) => {
                warn!(error = %e, "extraction API call failed");
                let message = match e {
                    ApiError::Status { .. } => e.to_string(),
                    ApiError::Network(_) => "extraction API unreachable".to_owned(),
                    ApiError::Decode { .. } => "unexpected response from extraction API".to_owned(),
                };
                (StatusCode::BAD_GATEWAY, message)
            }
            ServerError::Store(e) => {
                error!(error = %e, "store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
            }
            ServerError::Render(e) => {
                error!(error = %e, "render error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

impl From<ViewError> for ServerError {
    fn from(e: ViewError) -> Self {
        match e {
            ViewError::NotFound(_) => ServerError::NotFound(e.to_string()),
            ViewError::NotCompleted { .. } => ServerError::Conflict(e.to_string()),
            ViewError::MissingJobId | ViewError::EmptyResume => ServerError::BadRequest(e.to_string()),
            ViewError::RegenerateFailed(_) => ServerError::UpstreamRejected(e.to_string()),
            ViewError::Api(e) => ServerError::Upstream(e),
            ViewError::Store(e) => ServerError::Store(e),
        }
    }
}

impl From<SubmitError> for ServerError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::UnsupportedUrl(_) => ServerError::BadRequest(e.to_string()),
            SubmitError::Store(e) => ServerError::Store(e),
        }
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(e: anyhow::Error) -> Self {
        error!(error = ?e, "converting anyhow error to ServerError::Internal");
        ServerError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(err: ServerError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn internal_details_are_hidden() {
        let (status, body) = body_of(ServerError::Internal("path /secret".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal server error");
    }

    #[tokio::test]
    async fn view_errors_map_to_client_statuses() {
        let (status, body) = body_of(ViewError::NotFound("t-1".into()).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "task t-1 not found");

        let (status, body) = body_of(ViewError::RegenerateFailed("queued".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Regeneration failed: queued");

        let (status, _) = body_of(ViewError::EmptyResume.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
