//! Task Processor: drives a task through
//! `queued → processing → completed | error`.
//!
//! Each dispatched task runs as its own spawned future. The only state shared
//! between runs is the [`TaskStore`]. There is no retry, no timeout and no
//! cancellation; a failure at any step becomes the task's terminal `error`.

use std::sync::Arc;

use chrono::Utc;
use copilot_types::{JobPayload, Task};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::api::ApiClient;
use crate::error::ProcessError;
use crate::host::{BrowserHost, PageDocument, Selector, SelectorError};
use crate::store::TaskStore;

/// Job-detail containers, most specific first.
pub const DEFAULT_SELECTORS: &[&str] = &[
    "div.jobs-search__job-details--wrapper",
    "div.jobs-semantic-search-job-details-wrapper",
    "div.job-view-layout.jobs-details",
];

/// Outer HTML of the first element matching any of `selectors`, tried in
/// order.
pub fn scrape_target_element(doc: &PageDocument, selectors: &[Selector]) -> Option<String> {
    selectors
        .iter()
        .find_map(|s| doc.query_selector(s))
        .map(|el| el.outer_html().to_owned())
}

pub fn parse_selectors<I, T>(selectors: I) -> Result<Vec<Selector>, SelectorError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    selectors.into_iter().map(|s| Selector::parse(s.as_ref())).collect()
}

pub struct TaskProcessor<S, H> {
    store: Arc<S>,
    host: Arc<H>,
    api: ApiClient,
    selectors: Arc<[Selector]>,
}

impl<S: TaskStore, H: BrowserHost> TaskProcessor<S, H> {
    pub fn new(store: Arc<S>, host: Arc<H>, api: ApiClient) -> Result<Self, SelectorError> {
        let selectors = parse_selectors(DEFAULT_SELECTORS)?;
        Ok(Self {
            store,
            host,
            api,
            selectors: selectors.into(),
        })
    }

    /// Replace the ordered selector list. An empty list keeps the current one.
    pub fn with_selectors(mut self, selectors: Vec<Selector>) -> Self {
        if !selectors.is_empty() {
            self.selectors = selectors.into();
        }
        self
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Process `task` in the background. `extract_endpoint` overrides the
    /// client's extraction URL for this task only.
    pub fn dispatch(self: &Arc<Self>, task: Task, extract_endpoint: Option<String>) -> JoinHandle<Task> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.process(task, extract_endpoint).await })
    }

    /// Run one task to a terminal state and return the final record.
    ///
    /// `processing` is persisted before any work starts; the terminal state
    /// is persisted once the work finishes. A task that is not `queued` is
    /// returned untouched.
    #[instrument(skip_all, fields(task_id = %task.id, url = %task.url))]
    pub async fn process(&self, mut task: Task, extract_endpoint: Option<String>) -> Task {
        if let Err(e) = task.start() {
            warn!(error = %e, "refusing to process task");
            return task;
        }
        self.persist(&task).await;

        let outcome = match self.run(&task, extract_endpoint.as_deref()).await {
            Ok(data) => {
                info!("task completed");
                task.complete(data, Utc::now())
            }
            Err(e) => {
                warn!(error = %e, "task failed");
                task.fail(e.to_string())
            }
        };
        if let Err(e) = outcome {
            warn!(error = %e, "task left in its previous state");
        }
        self.persist(&task).await;
        task
    }

    async fn run(&self, task: &Task, extract_endpoint: Option<&str>) -> Result<JobPayload, ProcessError> {
        let tab = self
            .host
            .query_tabs(&task.url)
            .await?
            .into_iter()
            .next()
            .ok_or(ProcessError::TabNotFound)?;
        debug!(tab_id = tab.id, "found originating tab");

        let selectors = Arc::clone(&self.selectors);
        let html = self
            .host
            .run_in_tab(tab.id, move |doc| scrape_target_element(doc, &selectors))
            .await?
            .ok_or(ProcessError::ElementNotFound)?;
        debug!(html_len = html.len(), "scraped target element");

        let data = match extract_endpoint {
            Some(endpoint) => self.api.html_extract_at(endpoint, &html, &task.url).await?,
            None => self.api.html_extract(&html, &task.url).await?,
        };
        Ok(data)
    }

    async fn persist(&self, task: &Task) {
        if let Err(e) = self.store.set(task).await {
            warn!(task_id = %task.id, status = %task.status(), error = %e, "failed to persist task");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SnapshotHost;
    use crate::store::MemoryTaskStore;
    use tracing_test::traced_test;

    #[test]
    fn scrape_prefers_earlier_selectors() {
        let doc = PageDocument::parse(
            r#"<div class="job-view-layout jobs-details">late</div>
               <div class="jobs-semantic-search-job-details-wrapper">early</div>"#,
        );
        let selectors = parse_selectors(DEFAULT_SELECTORS).unwrap();
        let html = scrape_target_element(&doc, &selectors).unwrap();
        assert!(html.contains("early"));
    }

    #[test]
    fn scrape_without_match_is_none() {
        let doc = PageDocument::parse("<main><div class=\"job\">x</div></main>");
        let selectors = parse_selectors(DEFAULT_SELECTORS).unwrap();
        assert!(scrape_target_element(&doc, &selectors).is_none());
    }

    #[test]
    fn bad_selector_is_rejected() {
        assert!(parse_selectors(["div.ok", "div[role=main]"]).is_err());
    }

    #[tokio::test]
    #[traced_test]
    async fn terminal_tasks_are_not_reprocessed() {
        let store = Arc::new(MemoryTaskStore::new());
        let processor = TaskProcessor::new(
            Arc::clone(&store),
            Arc::new(SnapshotHost::new()),
            ApiClient::new("http://127.0.0.1:9"),
        )
        .unwrap();

        let mut task = Task::queued("t-1", "https://example.com/jobs/1", Utc::now());
        task.start().unwrap();
        task.fail("boom").unwrap();

        let out = processor.process(task.clone(), None).await;
        assert_eq!(out, task);
        assert_eq!(store.write_count(), 0);
        assert!(logs_contain("refusing to process task"));
    }
}
