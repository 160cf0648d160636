pub mod credits;
pub mod events;
pub mod jobs;
pub mod resume;
pub mod settings;
pub mod tabs;
pub mod tasks;

use std::sync::Arc;

use axum::Router;
use utoipa::OpenApi;

use crate::state::AppState;

/// Routes nested under `/v1`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(tasks::router())
        .merge(jobs::router())
        .merge(tabs::router())
        .merge(events::router())
        .merge(credits::router())
        .merge(resume::router())
        .merge(settings::router())
}

#[derive(OpenApi)]
#[openapi()]
pub struct V1Api;

pub fn api_docs() -> utoipa::openapi::OpenApi {
    let mut doc = V1Api::openapi();
    doc.merge(tasks::TasksApi::openapi());
    doc.merge(jobs::JobsApi::openapi());
    doc.merge(tabs::TabsApi::openapi());
    doc.merge(events::EventsApi::openapi());
    doc.merge(credits::CreditsApi::openapi());
    doc.merge(resume::ResumeApi::openapi());
    doc.merge(settings::SettingsApi::openapi());
    doc
}
