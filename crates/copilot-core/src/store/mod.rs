//! Task Store: persistent key-value area from task id to task record.
//!
//! [`TaskStore`] is the only state shared between the producer, the
//! processor and the viewers. Every `set`/`clear` publishes a
//! [`StoreChange`] to all subscribers so open views can re-render.
//!
//! Implementations:
//! - [`sqlite::SqliteTaskStore`]: durable, used by the server.
//! - [`memory::MemoryTaskStore`]: process-local, used in tests.
//!
//! All trait methods use `impl Future` in their signatures so no extra
//! `async-trait` crate is required.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryTaskStore;
pub use sqlite::SqliteTaskStore;

use std::collections::HashMap;
use std::future::Future;

use copilot_types::{Task, TaskId, TaskStatus};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;

/// Settings key holding an override URL for the extraction endpoint.
pub const API_ENDPOINT_KEY: &str = "apiEndpoint";

/// Buffered change notifications per subscriber before it starts lagging.
const CHANGE_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A record failed to encode, or a stored record failed to decode
    /// (including records whose fields contradict their status).
    #[error("record encoding error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Notification published after every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreChange {
    Set { id: TaskId, status: TaskStatus },
    Cleared,
}

impl StoreChange {
    pub fn set(task: &Task) -> Self {
        StoreChange::Set {
            id: task.id.clone(),
            status: task.status(),
        }
    }
}

pub trait TaskStore: Send + Sync + 'static {
    fn get(&self, id: &str) -> impl Future<Output = Result<Option<Task>, StoreError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<HashMap<TaskId, Task>, StoreError>> + Send;

    /// Insert or overwrite the record under `task.id`. Last write wins.
    fn set(&self, task: &Task) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn subscribe(&self) -> broadcast::Receiver<StoreChange>;
}

/// Small string settings kept next to the tasks (not part of the task area).
pub trait SettingsStore: Send + Sync + 'static {
    fn get_setting(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    fn set_setting(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn remove_setting(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Fan-out of [`StoreChange`] notifications.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<StoreChange>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn notify(&self, change: StoreChange) {
        // No subscribers is fine: nobody is looking.
        let _ = self.tx.send(change);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.tx.subscribe()
    }
}
