use std::sync::Arc;

use copilot_types::Task;
use serde::Serialize;

use super::detail::JobDetail;
use super::summary::JobSummary;
use crate::store::{StoreError, TaskStore};

/// Newest first.
pub fn sort_tasks(tasks: impl IntoIterator<Item = Task>) -> Vec<Task> {
    let mut tasks: Vec<Task> = tasks.into_iter().collect();
    tasks.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then_with(|| a.id.cmp(&b.id)));
    tasks
}

/// Drop tasks already marked as applied. Only affects what is shown.
pub fn filter_applied(tasks: Vec<Task>, hide_applied: bool) -> Vec<Task> {
    if !hide_applied {
        return tasks;
    }
    tasks.into_iter().filter(|t| !t.is_applied()).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionRow {
    pub summary: JobSummary,
    /// Present for completed tasks only.
    pub detail: Option<JobDetail>,
    /// Present for failed tasks only.
    pub error: Option<String>,
}

impl SessionRow {
    pub fn new(task: &Task) -> Self {
        Self {
            summary: JobSummary::from_task(task),
            detail: task.job().as_ref().map(JobDetail::from_job),
            error: task.error().map(str::to_owned),
        }
    }
}

/// Task list backed by the Task Store.
pub struct SessionView<S> {
    store: Arc<S>,
}

impl<S: TaskStore> SessionView<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn tasks(&self, hide_applied: bool) -> Result<Vec<Task>, StoreError> {
        let all = self.store.get_all().await?;
        Ok(filter_applied(sort_tasks(all.into_values()), hide_applied))
    }

    pub async fn rows(&self, hide_applied: bool) -> Result<Vec<SessionRow>, StoreError> {
        Ok(self.tasks(hide_applied).await?.iter().map(SessionRow::new).collect())
    }

    /// "Clear session".
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.clear().await
    }
}
