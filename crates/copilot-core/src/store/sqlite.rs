//! SQLite implementation of [`TaskStore`] and [`SettingsStore`].
//!
//! Each task is stored as its JSON record under its id, mirroring the flat
//! key-value layout of the task area. Migrations under `./migrations` are
//! embedded at compile time and run by [`SqliteTaskStore::connect`].
//!
//! The runtime-checked `sqlx::query` form is used so no `DATABASE_URL` is
//! needed at compile time.

use std::collections::HashMap;
use std::str::FromStr;

use copilot_types::{Task, TaskId};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::sync::broadcast;
use tracing::warn;

use super::{ChangeNotifier, SettingsStore, StoreChange, StoreError, TaskStore};

#[derive(Clone, Debug)]
pub struct SqliteTaskStore {
    pool: SqlitePool,
    notifier: ChangeNotifier,
}

impl SqliteTaskStore {
    /// Open (or create) the database at `url` and run pending migrations.
    ///
    /// `url` is a sqlx SQLite URL such as `"sqlite://copilot.db"`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// A private in-memory database, kept alive on a single connection.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    /// Round-trip a trivial query to confirm the database answers.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool; later queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self {
            pool,
            notifier: ChangeNotifier::new(),
        })
    }
}

impl TaskStore for SqliteTaskStore {
    async fn get(&self, id: &str) -> Result<Option<Task>, StoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT record FROM tasks WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some((record,)) => Ok(Some(serde_json::from_str(&record)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<HashMap<TaskId, Task>, StoreError> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT id, record FROM tasks")
            .fetch_all(&self.pool)
            .await?;
        let mut tasks = HashMap::with_capacity(rows.len());
        for (id, record) in rows {
            match serde_json::from_str::<Task>(&record) {
                Ok(task) => {
                    tasks.insert(id, task);
                }
                // One unreadable record must not blank every view.
                Err(e) => warn!(task_id = %id, error = %e, "skipping unreadable task record"),
            }
        }
        Ok(tasks)
    }

    async fn set(&self, task: &Task) -> Result<(), StoreError> {
        let record = serde_json::to_string(task)?;
        sqlx::query(
            "INSERT INTO tasks (id, record, submitted_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(id) DO UPDATE SET record = excluded.record",
        )
        .bind(&task.id)
        .bind(&record)
        .bind(task.submitted_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        self.notifier.notify(StoreChange::set(task));
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM tasks").execute(&self.pool).await?;
        self.notifier.notify(StoreChange::Cleared);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.notifier.subscribe()
    }
}

impl SettingsStore for SqliteTaskStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?1, ?2) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_setting(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM settings WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
