use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use copilot_types::{Task, TaskId};
use tokio::sync::{RwLock, broadcast};

use super::{ChangeNotifier, SettingsStore, StoreChange, StoreError, TaskStore};

/// In-memory task store.
///
/// Uses a `tokio::sync::RwLock<HashMap>` so viewers can read snapshots
/// concurrently while the processor writes. Counts writes so callers can
/// assert that no `set` was dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
    settings: Arc<RwLock<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
    notifier: ChangeNotifier,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls served so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl TaskStore for MemoryTaskStore {
    async fn get(&self, id: &str) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.read().await.get(id).cloned())
    }

    async fn get_all(&self) -> Result<HashMap<TaskId, Task>, StoreError> {
        Ok(self.tasks.read().await.clone())
    }

    async fn set(&self, task: &Task) -> Result<(), StoreError> {
        self.tasks.write().await.insert(task.id.clone(), task.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.notifier.notify(StoreChange::set(task));
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.tasks.write().await.clear();
        self.notifier.notify(StoreChange::Cleared);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.notifier.subscribe()
    }
}

impl SettingsStore for MemoryTaskStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.settings.read().await.get(key).cloned())
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.settings.write().await.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove_setting(&self, key: &str) -> Result<(), StoreError> {
        self.settings.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use copilot_types::TaskStatus;

    #[tokio::test]
    async fn set_notifies_subscribers() {
        let store = MemoryTaskStore::new();
        let mut rx = store.subscribe();
        let task = Task::queued("a", "https://example.com", Utc::now());
        store.set(&task).await.unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            StoreChange::Set { id: "a".into(), status: TaskStatus::Queued }
        );
        assert_eq!(store.get("a").await.unwrap(), Some(task));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn clear_empties_and_notifies() {
        let store = MemoryTaskStore::new();
        store.set(&Task::queued("a", "u", Utc::now())).await.unwrap();
        let mut rx = store.subscribe();
        store.clear().await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), StoreChange::Cleared);
        assert!(store.get_all().await.unwrap().is_empty());
    }
}
