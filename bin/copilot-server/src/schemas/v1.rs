use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct HideAppliedQuery {
    /// Drop tasks whose job is marked applied.
    #[serde(default)]
    pub hide_applied: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitTaskRequest {
    /// Page to extract; must be `http` or `https`.
    pub url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetAppliedRequest {
    pub applied: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SetAppliedResponse {
    pub job_id: String,
    pub applied: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct DaysBackQuery {
    /// Look-back window of the history page whose cache is refreshed.
    pub days_back: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TabSnapshotRequest {
    pub url: String,
    /// Full serialized DOM of the tab.
    pub html: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreditsResponse {
    pub remaining_credits: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResumeBody {
    pub document_markdown: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResumeSaved {
    pub document_id: String,
    pub document_timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiEndpointSetting {
    /// Stored override; `null` clears it.
    pub api_endpoint: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiEndpointResponse {
    pub api_endpoint: Option<String>,
    /// Endpoint used when no override is stored.
    pub default_endpoint: String,
}
