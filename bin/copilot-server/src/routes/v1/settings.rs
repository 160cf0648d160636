//! The stored `apiEndpoint` override for the extraction endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use copilot_core::SettingsStore;
use copilot_core::producer::ensure_web_page;
use copilot_core::store::API_ENDPOINT_KEY;
use tracing::info;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::v1::{ApiEndpointResponse, ApiEndpointSetting};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(get_api_endpoint, put_api_endpoint),
    components(schemas(ApiEndpointSetting, ApiEndpointResponse))
)]
pub struct SettingsApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/settings/api-endpoint", get(get_api_endpoint).put(put_api_endpoint))
}

async fn current(state: &AppState) -> Result<ApiEndpointResponse, ServerError> {
    Ok(ApiEndpointResponse {
        api_endpoint: state.store.get_setting(API_ENDPOINT_KEY).await?,
        default_endpoint: state.api.extract_endpoint(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/settings/api-endpoint",
    tag = "settings",
    responses((status = 200, description = "Current override", body = ApiEndpointResponse))
)]
pub async fn get_api_endpoint(State(state): State<Arc<AppState>>) -> Result<Json<ApiEndpointResponse>, ServerError> {
    Ok(Json(current(&state).await?))
}

/// Set or clear the override. Applies to tasks dispatched afterwards.
#[utoipa::path(
    put,
    path = "/v1/settings/api-endpoint",
    tag = "settings",
    request_body = ApiEndpointSetting,
    responses(
        (status = 200, description = "Updated override", body = ApiEndpointResponse),
        (status = 400, description = "Not an http(s) URL"),
    )
)]
pub async fn put_api_endpoint(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ApiEndpointSetting>,
) -> Result<Json<ApiEndpointResponse>, ServerError> {
    match body.api_endpoint.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(endpoint) => {
            ensure_web_page(endpoint)?;
            state.store.set_setting(API_ENDPOINT_KEY, endpoint).await?;
            info!(%endpoint, "extraction endpoint override set");
        }
        None => {
            state.store.remove_setting(API_ENDPOINT_KEY).await?;
            info!("extraction endpoint override cleared");
        }
    }
    Ok(Json(current(&state).await?))
}
