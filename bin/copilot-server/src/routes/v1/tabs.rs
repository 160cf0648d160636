//! Tab snapshots pushed by the browser shim.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use copilot_core::host::{Tab, TabId};
use serde_json::Value;
use tracing::debug;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::v1::TabSnapshotRequest;
use crate::state::AppState;

/// Serialized pages can be far larger than axum's default body limit.
const MAX_SNAPSHOT_BYTES: usize = 32 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(paths(list_tabs, put_tab, delete_tab), components(schemas(TabSnapshotRequest)))]
pub struct TabsApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tabs", get(list_tabs))
        .route(
            "/tabs/{tab_id}",
            put(put_tab)
                .delete(delete_tab)
                .layer(DefaultBodyLimit::max(MAX_SNAPSHOT_BYTES)),
        )
}

#[utoipa::path(
    get,
    path = "/v1/tabs",
    tag = "tabs",
    responses((status = 200, description = "Known tabs", body = [Value]))
)]
pub async fn list_tabs(State(state): State<Arc<AppState>>) -> Json<Vec<Tab>> {
    Json(state.host.tabs().await)
}

/// Store or replace the snapshot of one tab.
#[utoipa::path(
    put,
    path = "/v1/tabs/{tab_id}",
    tag = "tabs",
    params(("tab_id" = u64, Path, description = "Browser tab id")),
    request_body = TabSnapshotRequest,
    responses((status = 204, description = "Snapshot stored"))
)]
pub async fn put_tab(
    State(state): State<Arc<AppState>>,
    Path(tab_id): Path<TabId>,
    Json(req): Json<TabSnapshotRequest>,
) -> StatusCode {
    debug!(tab_id, url = %req.url, html_len = req.html.len(), "tab snapshot");
    state.host.upsert(tab_id, req.url, req.html).await;
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    delete,
    path = "/v1/tabs/{tab_id}",
    tag = "tabs",
    params(("tab_id" = u64, Path, description = "Browser tab id")),
    responses(
        (status = 204, description = "Tab closed"),
        (status = 404, description = "Unknown tab"),
    )
)]
pub async fn delete_tab(
    State(state): State<Arc<AppState>>,
    Path(tab_id): Path<TabId>,
) -> Result<StatusCode, ServerError> {
    if state.host.remove(tab_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::NotFound(format!("tab {tab_id} not found")))
    }
}
