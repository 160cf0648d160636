//! Master resume: load from and save to the document store.

use chrono::Utc;
use copilot_types::api::DocumentUpsert;
use tracing::info;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::ViewError;

pub const MASTER_RESUME_NAME: &str = "master_resume";

/// Markdown of the master resume; empty when none is stored.
pub async fn load_master_resume(api: &ApiClient) -> Result<String, ViewError> {
    let doc = api.master_resume().await?;
    Ok(doc.document_markdown.unwrap_or_default())
}

/// Save `markdown`, trimmed, as a new revision of the master resume.
///
/// Blank content is rejected before anything is sent. Every save gets a
/// fresh document id.
pub async fn save_master_resume(api: &ApiClient, markdown: &str) -> Result<DocumentUpsert, ViewError> {
    let markdown = markdown.trim();
    if markdown.is_empty() {
        return Err(ViewError::EmptyResume);
    }
    let document = DocumentUpsert {
        document_id: Uuid::new_v4().to_string(),
        document_name: MASTER_RESUME_NAME.to_owned(),
        document_markdown: markdown.to_owned(),
        document_timestamp: Utc::now().timestamp(),
    };
    api.upsert_document(&document).await?;
    info!(document_id = %document.document_id, "master resume saved");
    Ok(document)
}
