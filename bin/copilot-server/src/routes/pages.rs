//! Server-rendered pages: sidebar, session, history and resume editor.
//!
//! Controls on these pages call the `/v1` routes and reload; the session and
//! sidebar pages also reload on store change events.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Form, Router};
use copilot_core::render::{HistoryContext, ResumeContext, SessionContext, SidebarContext};
use copilot_core::viewer::history::clamp_days_back;
use copilot_core::viewer::{load_master_resume, save_master_resume};
use tracing::warn;

use crate::error::ServerError;
use crate::schemas::pages::{HistoryQuery, ResumeForm, ResumeQuery, SessionQuery, SidebarQuery};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sidebar", get(sidebar))
        .route("/session", get(session))
        .route("/history", get(history))
        .route("/resume", get(resume).post(save_resume))
}

async fn sidebar(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SidebarQuery>,
) -> Result<Html<String>, ServerError> {
    let tabs = state.host.tabs().await;
    let rows = state.session.rows(false).await?;
    let credits = match state.api.openrouter_credits().await {
        Ok(c) => Some(format!("{:.2}", c.remaining_credits)),
        Err(e) => {
            warn!(error = %e, "could not fetch credits");
            None
        }
    };

    let latest = rows.first();
    let latest_error = latest.and_then(|row| row.error.as_deref());
    let mut ctx = SidebarContext::new(q.url.as_deref(), &tabs);
    ctx.latest = latest;
    ctx.latest_error = latest_error;
    ctx.credits = credits;
    Ok(Html(state.renderer.sidebar(&ctx)?))
}

async fn session(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SessionQuery>,
) -> Result<Html<String>, ServerError> {
    let rows = state.session.rows(q.hide_applied).await?;
    let ctx = SessionContext {
        rows: &rows,
        hide_applied: q.hide_applied,
    };
    Ok(Html(state.renderer.session(&ctx)?))
}

/// API failures render inside the page rather than as an error response.
async fn history(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HistoryQuery>,
) -> Result<Html<String>, ServerError> {
    let days_back = clamp_days_back(q.days_back.as_deref());
    if q.refresh {
        state.history.refresh().await;
    }
    let html = match state.history.load(days_back, q.hide_applied).await {
        Ok(page) => state.renderer.history(&HistoryContext::loaded(&page))?,
        Err(e) => {
            warn!(error = %e, days_back, "history load failed");
            state
                .renderer
                .history(&HistoryContext::failed(days_back, q.hide_applied, e))?
        }
    };
    Ok(Html(html))
}

async fn resume(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ResumeQuery>,
) -> Result<Html<String>, ServerError> {
    let ctx = match load_master_resume(&state.api).await {
        Ok(markdown) if q.edit => ResumeContext::editing(markdown),
        Ok(markdown) => ResumeContext::viewing(markdown),
        Err(e) => {
            warn!(error = %e, "could not load master resume");
            ResumeContext {
                editing: q.edit,
                error: Some(format!("Error loading resume: {e}")),
                ..Default::default()
            }
        }
    };
    Ok(Html(state.renderer.resume(&ctx)?))
}

/// Failed saves keep the editor open with the submitted text.
async fn save_resume(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ResumeForm>,
) -> Result<Html<String>, ServerError> {
    let ctx = match save_master_resume(&state.api, &form.markdown).await {
        Ok(_) => ResumeContext {
            status: Some("Resume saved.".to_owned()),
            ..ResumeContext::viewing(form.markdown)
        },
        Err(e) => {
            warn!(error = %e, "could not save master resume");
            ResumeContext {
                error: Some(e.to_string()),
                ..ResumeContext::editing(form.markdown)
            }
        }
    };
    Ok(Html(state.renderer.resume(&ctx)?))
}
