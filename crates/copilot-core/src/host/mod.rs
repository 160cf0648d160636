//! Browser host capability.
//!
//! The processor never talks to a browser directly. It asks a
//! [`BrowserHost`] for the tabs showing a URL and runs a script against a
//! tab's page document. [`SnapshotHost`] is the implementation backed by the
//! page snapshots the browser shim pushes to the server.

pub mod dom;
pub mod snapshot;

pub use dom::{ElementRef, PageDocument, Selector, SelectorError};
pub use snapshot::SnapshotHost;

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Browser-assigned tab identifier.
pub type TabId = u64;

/// An open tab as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum HostError {
    /// The tab disappeared between lookup and script execution.
    #[error("tab {0} is no longer available")]
    TabGone(TabId),

    /// The injected script could not run to completion.
    #[error("script execution failed: {0}")]
    Script(String),
}

pub trait BrowserHost: Send + Sync + 'static {
    /// Tabs whose current URL equals `url`.
    fn query_tabs(&self, url: &str) -> impl Future<Output = Result<Vec<Tab>, HostError>> + Send;

    /// Run `script` in the page context of `tab` and return its result.
    fn run_in_tab<T, F>(&self, tab: TabId, script: F) -> impl Future<Output = Result<T, HostError>> + Send
    where
        F: FnOnce(&PageDocument) -> T + Send + 'static,
        T: Send + 'static;
}
