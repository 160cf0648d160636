//! Task Producer: the "Extract" action.

use std::sync::Arc;

use chrono::Utc;
use copilot_types::Task;
use reqwest::Url;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::SubmitError;
use crate::host::BrowserHost;
use crate::processor::TaskProcessor;
use crate::store::{API_ENDPOINT_KEY, SettingsStore, TaskStore};

/// A task handed to the processor.
#[derive(Debug)]
pub struct Submission {
    /// The record as first persisted (`queued`).
    pub task: Task,
    /// Resolves to the terminal record.
    pub handle: JoinHandle<Task>,
}

pub struct TaskProducer<S, H> {
    store: Arc<S>,
    processor: Arc<TaskProcessor<S, H>>,
}

impl<S, H> TaskProducer<S, H>
where
    S: TaskStore + SettingsStore,
    H: BrowserHost,
{
    pub fn new(store: Arc<S>, processor: Arc<TaskProcessor<S, H>>) -> Self {
        Self { store, processor }
    }

    /// Validate `url` and persist a fresh `queued` task for it without
    /// dispatching.
    pub async fn enqueue(&self, url: &str) -> Result<Task, SubmitError> {
        ensure_web_page(url)?;
        let task = Task::queued(Uuid::new_v4().to_string(), url, Utc::now());
        self.store.set(&task).await?;
        info!(task_id = %task.id, %url, "task queued");
        Ok(task)
    }

    /// Enqueue and dispatch. The stored `apiEndpoint` setting, if any,
    /// overrides the extraction endpoint for this task.
    pub async fn submit(&self, url: &str) -> Result<Submission, SubmitError> {
        let task = self.enqueue(url).await?;
        let endpoint = self.extract_endpoint_override().await;
        let handle = self.processor.dispatch(task.clone(), endpoint);
        Ok(Submission { task, handle })
    }

    async fn extract_endpoint_override(&self) -> Option<String> {
        match self.store.get_setting(API_ENDPOINT_KEY).await {
            Ok(value) => value.filter(|v| !v.trim().is_empty()),
            Err(e) => {
                warn!(error = %e, "could not read apiEndpoint setting, using default endpoint");
                None
            }
        }
    }
}

/// Only `http`/`https` pages carry job postings.
pub fn ensure_web_page(url: &str) -> Result<(), SubmitError> {
    match Url::parse(url) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => Ok(()),
        _ => Err(SubmitError::UnsupportedUrl(url.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_web_pages() {
        assert!(ensure_web_page("https://www.linkedin.com/jobs/view/1").is_ok());
        assert!(ensure_web_page("http://localhost:3000/").is_ok());
        assert!(ensure_web_page("about:blank").is_err());
        assert!(ensure_web_page("file:///tmp/job.html").is_err());
        assert!(ensure_web_page("not a url").is_err());
    }
}
