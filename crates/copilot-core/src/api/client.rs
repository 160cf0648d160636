use copilot_types::api::{
    Credits, DocumentUpsert, ErrorBody, ExtractRequest, ExtractResponse, JobIdRequest,
    RegenerateResponse, ResumeDocument,
};
use copilot_types::{JobId, JobPayload, SkillRow};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Thin async client over the extraction/assessment API.
///
/// Calls carry no timeout and are never retried; a hung request leaves the
/// caller waiting.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    extract_endpoint: Option<String>,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            http: Client::new(),
            base_url,
            extract_endpoint: None,
        }
    }

    /// Use a full URL for `html_extract` instead of `<base>/html_extract`.
    pub fn with_extract_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.extract_endpoint = endpoint.filter(|e| !e.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Configured extraction endpoint.
    pub fn extract_endpoint(&self) -> String {
        self.extract_endpoint
            .clone()
            .unwrap_or_else(|| self.url("html_extract"))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// `POST {html, url}` to the configured extraction endpoint.
    pub async fn html_extract(&self, html: &str, url: &str) -> Result<JobPayload, ApiError> {
        self.html_extract_at(&self.extract_endpoint(), html, url).await
    }

    /// `POST {html, url}` to an explicit extraction endpoint.
    #[instrument(skip(self, html), fields(html_len = html.len()))]
    pub async fn html_extract_at(&self, endpoint: &str, html: &str, url: &str) -> Result<JobPayload, ApiError> {
        let body = ExtractRequest {
            html: html.to_owned(),
            url: url.to_owned(),
        };
        let resp: ExtractResponse = self.post_json(endpoint, &body).await?;
        Ok(resp.data)
    }

    /// Rerun the assessment of a stored job. The caller decides what a
    /// non-`success` status means.
    pub async fn regenerate_job_assessment(&self, job_id: &JobId) -> Result<RegenerateResponse, ApiError> {
        let body = JobIdRequest { job_id: job_id.clone() };
        self.post_json(&self.url("regenerate_job_assessment"), &body).await
    }

    pub async fn jobs_recent(&self, days_back: u32, limit: u32) -> Result<Vec<JobPayload>, ApiError> {
        let endpoint = format!("{}?days_back={days_back}&limit={limit}", self.url("jobs_recent"));
        self.get_json(&endpoint).await
    }

    pub async fn job_skills_recent(&self, days_back: u32, limit: u32) -> Result<Vec<SkillRow>, ApiError> {
        let endpoint = format!("{}?days_back={days_back}&limit={limit}", self.url("job_skills_recent"));
        self.get_json(&endpoint).await
    }

    pub async fn update_job_applied(&self, job_id: &JobId) -> Result<(), ApiError> {
        self.post_ack(&self.url("update_job_applied"), job_id).await
    }

    pub async fn update_job_unapplied(&self, job_id: &JobId) -> Result<(), ApiError> {
        self.post_ack(&self.url("update_job_unapplied"), job_id).await
    }

    pub async fn master_resume(&self) -> Result<ResumeDocument, ApiError> {
        self.get_json(&self.url("master_resume")).await
    }

    pub async fn upsert_document(&self, document: &DocumentUpsert) -> Result<(), ApiError> {
        let endpoint = self.url("document_store/upsert");
        let resp = self.http.post(&endpoint).json(document).send().await?;
        check(resp).await.map(drop)
    }

    pub async fn openrouter_credits(&self) -> Result<Credits, ApiError> {
        self.get_json(&self.url("openrouter_credits")).await
    }

    async fn post_ack(&self, endpoint: &str, job_id: &JobId) -> Result<(), ApiError> {
        let body = JobIdRequest { job_id: job_id.clone() };
        let resp = self.http.post(endpoint).json(&body).send().await?;
        check(resp).await.map(drop)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        debug!(%endpoint, "GET");
        let resp = self.http.get(endpoint).send().await?;
        decode(endpoint, check(resp).await?).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T, ApiError> {
        debug!(%endpoint, "POST");
        let resp = self.http.post(endpoint).json(body).send().await?;
        decode(endpoint, check(resp).await?).await
    }
}

/// Turn a non-success response into [`ApiError::Status`], using the body's
/// `detail` field when it parses.
async fn check(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let detail = resp
        .bytes()
        .await
        .ok()
        .and_then(|b| serde_json::from_slice::<ErrorBody>(&b).ok())
        .and_then(|b| b.message());
    Err(ApiError::status(status.as_u16(), detail))
}

async fn decode<T: DeserializeOwned>(endpoint: &str, resp: Response) -> Result<T, ApiError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
        endpoint: endpoint.to_owned(),
        source,
    })
}
