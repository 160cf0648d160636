use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::v1::CreditsResponse;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_credits), components(schemas(CreditsResponse)))]
pub struct CreditsApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/credits", get(get_credits))
}

/// Remaining credits of the API's model provider account.
#[utoipa::path(
    get,
    path = "/v1/credits",
    tag = "account",
    responses(
        (status = 200, description = "Remaining credits", body = CreditsResponse),
        (status = 502, description = "Extraction API error"),
    )
)]
pub async fn get_credits(State(state): State<Arc<AppState>>) -> Result<Json<CreditsResponse>, ServerError> {
    let credits = state.api.openrouter_credits().await?;
    Ok(Json(CreditsResponse {
        remaining_credits: credits.remaining_credits,
    }))
}
