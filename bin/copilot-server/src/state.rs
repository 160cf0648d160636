//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use anyhow::Context;
use copilot_core::processor::parse_selectors;
use copilot_core::render::Renderer;
use copilot_core::viewer::{HistoryView, SessionView};
use copilot_core::{ApiClient, SnapshotHost, SqliteTaskStore, TaskProcessor, TaskProducer};

use crate::config::Config;

pub type Store = SqliteTaskStore;
pub type Host = SnapshotHost;

/// State shared across all HTTP handlers.
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Task store; also holds the `apiEndpoint` setting.
    pub store: Arc<Store>,
    /// Tab snapshots pushed by the browser shim.
    pub host: Arc<Host>,
    pub api: ApiClient,
    pub producer: TaskProducer<Store, Host>,
    pub session: SessionView<Store>,
    /// Owns the skills cache for the history page.
    pub history: HistoryView,
    pub renderer: Renderer,
}

impl AppState {
    pub fn new(config: Config, store: Store) -> anyhow::Result<Self> {
        let store = Arc::new(store);
        let host = Arc::new(SnapshotHost::new());
        let api = ApiClient::new(config.api_base.clone()).with_extract_endpoint(config.extract_endpoint.clone());

        let mut processor = TaskProcessor::new(Arc::clone(&store), Arc::clone(&host), api.clone())
            .context("invalid built-in selectors")?;
        if let Some(list) = &config.selectors {
            let selectors = parse_selectors(list).context("invalid COPILOT_SELECTORS")?;
            processor = processor.with_selectors(selectors);
        }

        Ok(Self {
            producer: TaskProducer::new(Arc::clone(&store), Arc::new(processor)),
            session: SessionView::new(Arc::clone(&store)),
            history: HistoryView::new(api.clone()),
            renderer: Renderer::new().context("failed to compile page templates")?,
            config: Arc::new(config),
            store,
            host,
            api,
        })
    }
}
