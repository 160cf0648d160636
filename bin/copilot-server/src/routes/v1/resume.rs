//! Master resume load / save.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use copilot_core::viewer::{load_master_resume, save_master_resume};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::v1::{ResumeBody, ResumeSaved};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_resume, put_resume), components(schemas(ResumeBody, ResumeSaved)))]
pub struct ResumeApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/resume", get(get_resume).put(put_resume))
}

#[utoipa::path(
    get,
    path = "/v1/resume",
    tag = "resume",
    responses(
        (status = 200, description = "Master resume Markdown", body = ResumeBody),
        (status = 502, description = "Extraction API error"),
    )
)]
pub async fn get_resume(State(state): State<Arc<AppState>>) -> Result<Json<ResumeBody>, ServerError> {
    Ok(Json(ResumeBody {
        document_markdown: load_master_resume(&state.api).await?,
    }))
}

/// Save a new revision of the master resume. Blank content is rejected.
#[utoipa::path(
    put,
    path = "/v1/resume",
    tag = "resume",
    request_body = ResumeBody,
    responses(
        (status = 200, description = "Saved", body = ResumeSaved),
        (status = 400, description = "Empty resume"),
        (status = 502, description = "Extraction API error"),
    )
)]
pub async fn put_resume(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResumeBody>,
) -> Result<Json<ResumeSaved>, ServerError> {
    let doc = save_master_resume(&state.api, &body.document_markdown).await?;
    Ok(Json(ResumeSaved {
        document_id: doc.document_id,
        document_timestamp: doc.document_timestamp,
    }))
}
