//! Job Search Copilot core.
//!
//! - [`store`]: the Task Store (SQLite and in-memory) with change
//!   notifications.
//! - [`host`]: the browser host capability and the page document model
//!   scripts run against.
//! - [`api`]: client for the extraction/assessment API.
//! - [`processor`] and [`producer`]: the task lifecycle.
//! - [`viewer`]: session and history view-models and their actions.
//! - [`markdown`] and [`render`]: resume Markdown and server-rendered pages.

pub mod api;
pub mod error;
pub mod host;
pub mod markdown;
pub mod processor;
pub mod producer;
pub mod render;
pub mod store;
pub mod viewer;

pub use api::{ApiClient, ApiError};
pub use error::{ProcessError, SubmitError, ViewError};
pub use host::{BrowserHost, SnapshotHost};
pub use processor::TaskProcessor;
pub use producer::{Submission, TaskProducer};
pub use store::{MemoryTaskStore, SettingsStore, SqliteTaskStore, StoreChange, StoreError, TaskStore};
