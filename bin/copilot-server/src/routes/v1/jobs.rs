//! History actions, keyed by the API's job id.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::post;
use axum::{Json, Router};
use copilot_core::viewer::JobDetail;
use copilot_core::viewer::history::clamp_days_back;
use copilot_types::JobId;
use serde_json::Value;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::v1::{DaysBackQuery, SetAppliedRequest, SetAppliedResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(set_applied, regenerate),
    components(schemas(SetAppliedRequest, SetAppliedResponse, DaysBackQuery))
)]
pub struct JobsApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/jobs/{job_id}/applied", post(set_applied))
        .route("/jobs/{job_id}/regenerate", post(regenerate))
}

#[utoipa::path(
    post,
    path = "/v1/jobs/{job_id}/applied",
    tag = "jobs",
    params(("job_id" = String, Path, description = "Job id")),
    request_body = SetAppliedRequest,
    responses(
        (status = 200, description = "Flag updated", body = SetAppliedResponse),
        (status = 502, description = "Extraction API error"),
    )
)]
pub async fn set_applied(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
    Json(req): Json<SetAppliedRequest>,
) -> Result<Json<SetAppliedResponse>, ServerError> {
    let id = JobId::from(job_id.as_str());
    state.history.set_applied(&id, req.applied).await?;
    Ok(Json(SetAppliedResponse {
        job_id: id.to_string(),
        applied: req.applied,
    }))
}

/// Regenerate a job's assessment and return its refreshed detail. The
/// history skills cache is invalidated.
#[utoipa::path(
    post,
    path = "/v1/jobs/{job_id}/regenerate",
    tag = "jobs",
    params(("job_id" = String, Path, description = "Job id"), DaysBackQuery),
    responses(
        (status = 200, description = "Refreshed job detail", body = Value),
        (status = 502, description = "Regeneration failed"),
    )
)]
pub async fn regenerate(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
    Query(q): Query<DaysBackQuery>,
) -> Result<Json<JobDetail>, ServerError> {
    let id = JobId::from(job_id.as_str());
    let days_back = clamp_days_back(q.days_back.as_deref());
    Ok(Json(state.history.regenerate(&id, days_back).await?))
}
