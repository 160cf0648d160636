//! Session task endpoints: submit, list, clear, and the per-task actions.
//!
//! Task bodies are the stored records (camelCase keys, `data` / `error`
//! present according to `status`).

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use copilot_core::TaskStore;
use copilot_core::viewer::actions;
use copilot_types::Task;
use serde_json::Value;
use tracing::info;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::v1::{HideAppliedQuery, SubmitTaskRequest};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_tasks, submit_task, clear_tasks, get_task, toggle_applied, regenerate),
    components(schemas(HideAppliedQuery, SubmitTaskRequest))
)]
pub struct TasksApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks", get(list_tasks).post(submit_task).delete(clear_tasks))
        .route("/tasks/{id}", get(get_task))
        .route("/tasks/{id}/applied", post(toggle_applied))
        .route("/tasks/{id}/regenerate", post(regenerate))
}

#[utoipa::path(
    get,
    path = "/v1/tasks",
    tag = "tasks",
    params(HideAppliedQuery),
    responses(
        (status = 200, description = "Tasks, newest first", body = [Value]),
        (status = 500, description = "Store error"),
    )
)]
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HideAppliedQuery>,
) -> Result<Json<Vec<Task>>, ServerError> {
    Ok(Json(state.session.tasks(q.hide_applied).await?))
}

/// Create a `queued` task for `url` and start processing it.
#[utoipa::path(
    post,
    path = "/v1/tasks",
    tag = "tasks",
    request_body = SubmitTaskRequest,
    responses(
        (status = 202, description = "Task queued", body = Value),
        (status = 400, description = "Not a web page"),
        (status = 500, description = "Store error"),
    )
)]
pub async fn submit_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ServerError> {
    // The processor runs detached; its handle is not awaited here.
    let submission = state.producer.submit(req.url.trim()).await?;
    Ok((StatusCode::ACCEPTED, Json(submission.task)))
}

#[utoipa::path(
    delete,
    path = "/v1/tasks",
    tag = "tasks",
    responses(
        (status = 204, description = "Session cleared"),
        (status = 500, description = "Store error"),
    )
)]
pub async fn clear_tasks(State(state): State<Arc<AppState>>) -> Result<StatusCode, ServerError> {
    state.session.clear().await?;
    info!("session cleared");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/v1/tasks/{id}",
    tag = "tasks",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task", body = Value),
        (status = 404, description = "Task not found"),
    )
)]
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ServerError> {
    state
        .store
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("task {id} not found")))
}

/// Flip the applied flag of a completed task.
#[utoipa::path(
    post,
    path = "/v1/tasks/{id}/applied",
    tag = "tasks",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Updated task", body = Value),
        (status = 404, description = "Task not found"),
        (status = 409, description = "Task is not completed"),
        (status = 502, description = "Extraction API error"),
    )
)]
pub async fn toggle_applied(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ServerError> {
    Ok(Json(actions::toggle_applied(&*state.store, &state.api, &id).await?))
}

/// Replace a completed task's assessment with a regenerated one.
#[utoipa::path(
    post,
    path = "/v1/tasks/{id}/regenerate",
    tag = "tasks",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Updated task", body = Value),
        (status = 404, description = "Task not found"),
        (status = 409, description = "Task is not completed"),
        (status = 502, description = "Regeneration failed"),
    )
)]
pub async fn regenerate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ServerError> {
    Ok(Json(actions::regenerate_task(&*state.store, &state.api, &id).await?))
}
