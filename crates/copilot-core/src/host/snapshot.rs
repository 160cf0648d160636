use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::{BrowserHost, HostError, PageDocument, Tab, TabId};

#[derive(Debug, Clone)]
struct Snapshot {
    url: String,
    html: Arc<str>,
}

/// Browser host backed by tab snapshots.
///
/// The browser shim reports each open tab's URL and serialized document
/// (`PUT /v1/tabs/{id}`) and forgets closed tabs (`DELETE /v1/tabs/{id}`).
/// Scripts run against a [`PageDocument`] parsed from the latest snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHost {
    tabs: Arc<RwLock<HashMap<TabId, Snapshot>>>,
}

impl SnapshotHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the snapshot of an open tab.
    pub async fn upsert(&self, id: TabId, url: impl Into<String>, html: impl Into<Arc<str>>) {
        let url = url.into();
        debug!(tab_id = id, %url, "tab snapshot updated");
        self.tabs.write().await.insert(
            id,
            Snapshot {
                url,
                html: html.into(),
            },
        );
    }

    /// Forget a closed tab. Returns `true` if it was known.
    pub async fn remove(&self, id: TabId) -> bool {
        self.tabs.write().await.remove(&id).is_some()
    }

    pub async fn tabs(&self) -> Vec<Tab> {
        let mut tabs: Vec<Tab> = self
            .tabs
            .read()
            .await
            .iter()
            .map(|(id, s)| Tab {
                id: *id,
                url: s.url.clone(),
            })
            .collect();
        tabs.sort_by_key(|t| t.id);
        tabs
    }
}

impl BrowserHost for SnapshotHost {
    async fn query_tabs(&self, url: &str) -> Result<Vec<Tab>, HostError> {
        let mut tabs: Vec<Tab> = self
            .tabs
            .read()
            .await
            .iter()
            .filter(|(_, s)| s.url == url)
            .map(|(id, s)| Tab {
                id: *id,
                url: s.url.clone(),
            })
            .collect();
        tabs.sort_by_key(|t| t.id);
        Ok(tabs)
    }

    async fn run_in_tab<T, F>(&self, tab: TabId, script: F) -> Result<T, HostError>
    where
        F: FnOnce(&PageDocument) -> T + Send + 'static,
        T: Send + 'static,
    {
        let html = self
            .tabs
            .read()
            .await
            .get(&tab)
            .map(|s| Arc::clone(&s.html))
            .ok_or(HostError::TabGone(tab))?;

        // Parsing a full page is CPU work; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            let doc = PageDocument::parse(&html);
            script(&doc)
        })
        .await
        .map_err(|e| HostError::Script(e.to_string()))
    }
}
