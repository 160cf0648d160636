//! Request and response bodies of the extraction/assessment API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::job::{JobId, JobPayload};

/// `POST /html_extract` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    pub html: String,
    pub url: String,
}

/// `POST /html_extract` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractResponse {
    pub data: JobPayload,
}

/// Body shared by the job-keyed endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobIdRequest {
    pub job_id: JobId,
}

/// `POST /regenerate_job_assessment` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RegenerateResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Option<JobPayload>,
}

impl RegenerateResponse {
    /// The regenerated payload, when the API reports success.
    pub fn into_success(self) -> Option<JobPayload> {
        if self.status == "success" { self.data } else { None }
    }
}

/// `GET /master_resume` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeDocument {
    #[serde(default)]
    pub document_markdown: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `POST /document_store/upsert` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentUpsert {
    pub document_id: String,
    pub document_name: String,
    pub document_markdown: String,
    /// Unix seconds.
    pub document_timestamp: i64,
}

/// `GET /openrouter_credits` response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    pub remaining_credits: f64,
}

/// Error body the API returns alongside non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// The `detail` field rendered as a message, if the server sent one.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn regenerate_success_requires_status_and_data() {
        let ok: RegenerateResponse =
            serde_json::from_value(json!({ "status": "success", "data": { "job_id": 1 } })).unwrap();
        assert!(ok.into_success().is_some());

        let failed: RegenerateResponse =
            serde_json::from_value(json!({ "status": "error", "data": { "job_id": 1 } })).unwrap();
        assert!(failed.into_success().is_none());

        let empty: RegenerateResponse = serde_json::from_value(json!({ "status": "success" })).unwrap();
        assert!(empty.into_success().is_none());
    }

    #[test]
    fn error_detail_message() {
        let body: ErrorBody = serde_json::from_value(json!({ "detail": "bad html" })).unwrap();
        assert_eq!(body.message().as_deref(), Some("bad html"));
        let body: ErrorBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.message(), None);
    }
}
