//! Task records and their lifecycle.
//!
//! A task is persisted as a flat JSON object:
//!
//! ```json
//! { "id": "…", "url": "…", "status": "completed",
//!   "submittedAt": "…", "completedAt": "…", "data": { … } }
//! ```
//!
//! In memory the payload fields live inside [`TaskState`], so a record can
//! never carry `data` without being `completed` or `error` without being
//! `error`. Decoding a stored record that breaks this rule fails with
//! [`TaskError::Inconsistent`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::job::{JobData, JobPayload};

/// Opaque task identifier (a UUID v4 string).
pub type TaskId = String;

/// Wire-level status of a task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Error)
    }
}

/// Lifecycle state together with the fields only that state may carry.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskState {
    Queued,
    Processing,
    Completed {
        data: JobPayload,
        completed_at: DateTime<Utc>,
    },
    Error {
        message: String,
    },
}

impl TaskState {
    pub fn status(&self) -> TaskStatus {
        match self {
            TaskState::Queued => TaskStatus::Queued,
            TaskState::Processing => TaskStatus::Processing,
            TaskState::Completed { .. } => TaskStatus::Completed,
            TaskState::Error { .. } => TaskStatus::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// A stored record's payload fields disagree with its status.
    #[error("inconsistent task record {id}: {reason}")]
    Inconsistent { id: TaskId, reason: String },

    /// The requested transition is not allowed from the current status.
    #[error("task {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },

    /// The operation needs a completed task.
    #[error("task {id} is not completed (status: {status})")]
    NotCompleted { id: TaskId, status: TaskStatus },
}

/// A single scrape-and-assess job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub url: String,
    pub submitted_at: DateTime<Utc>,
    state: TaskState,
}

impl Task {
    /// A freshly submitted task.
    pub fn queued(id: impl Into<TaskId>, url: impl Into<String>, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            submitted_at,
            state: TaskState::Queued,
        }
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    pub fn status(&self) -> TaskStatus {
        self.state.status()
    }

    /// The API payload of a completed task, as received.
    pub fn data(&self) -> Option<&JobPayload> {
        match &self.state {
            TaskState::Completed { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Typed view of [`Task::data`].
    pub fn job(&self) -> Option<JobData> {
        self.data().map(JobPayload::view)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            TaskState::Error { message } => Some(message),
            _ => None,
        }
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            TaskState::Completed { completed_at, .. } => Some(*completed_at),
            _ => None,
        }
    }

    /// `true` when the task completed and its job is marked as applied.
    pub fn is_applied(&self) -> bool {
        self.data().is_some_and(JobPayload::is_applied)
    }

    /// `queued → processing`.
    pub fn start(&mut self) -> Result<(), TaskError> {
        match self.state {
            TaskState::Queued => {
                self.state = TaskState::Processing;
                Ok(())
            }
            _ => Err(self.invalid(TaskStatus::Processing)),
        }
    }

    /// `processing → completed`.
    pub fn complete(&mut self, data: JobPayload, completed_at: DateTime<Utc>) -> Result<(), TaskError> {
        match self.state {
            TaskState::Processing => {
                self.state = TaskState::Completed { data, completed_at };
                Ok(())
            }
            _ => Err(self.invalid(TaskStatus::Completed)),
        }
    }

    /// `processing → error`.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), TaskError> {
        match self.state {
            TaskState::Processing => {
                self.state = TaskState::Error {
                    message: message.into(),
                };
                Ok(())
            }
            _ => Err(self.invalid(TaskStatus::Error)),
        }
    }

    /// Set `data.job_applied`; the only field a viewer may change.
    pub fn set_applied(&mut self, applied: bool) -> Result<(), TaskError> {
        self.data_mut()?.set_applied(applied);
        Ok(())
    }

    /// Replace the payload of a completed task with a regenerated one.
    pub fn replace_data(&mut self, data: JobPayload) -> Result<(), TaskError> {
        *self.data_mut()? = data;
        Ok(())
    }

    fn data_mut(&mut self) -> Result<&mut JobPayload, TaskError> {
        let status = self.status();
        match &mut self.state {
            TaskState::Completed { data, .. } => Ok(data),
            _ => Err(TaskError::NotCompleted {
                id: self.id.clone(),
                status,
            }),
        }
    }

    fn invalid(&self, to: TaskStatus) -> TaskError {
        TaskError::InvalidTransition {
            id: self.id.clone(),
            from: self.status(),
            to,
        }
    }
}

/// Flat persisted shape of a [`Task`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: TaskId,
    pub url: String,
    pub status: TaskStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JobPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskError;

    fn try_from(r: TaskRecord) -> Result<Self, Self::Error> {
        let inconsistent = |reason: &str| TaskError::Inconsistent {
            id: r.id.clone(),
            reason: reason.to_owned(),
        };
        let state = match r.status {
            TaskStatus::Queued | TaskStatus::Processing => {
                if r.data.is_some() || r.error.is_some() {
                    return Err(inconsistent("unfinished task carries data or error"));
                }
                if r.status == TaskStatus::Queued {
                    TaskState::Queued
                } else {
                    TaskState::Processing
                }
            }
            TaskStatus::Completed => {
                if r.error.is_some() {
                    return Err(inconsistent("completed task carries an error"));
                }
                let data = r.data.clone().ok_or_else(|| inconsistent("completed task has no data"))?;
                let completed_at = r
                    .completed_at
                    .ok_or_else(|| inconsistent("completed task has no completedAt"))?;
                TaskState::Completed { data, completed_at }
            }
            TaskStatus::Error => {
                if r.data.is_some() {
                    return Err(inconsistent("failed task carries data"));
                }
                let message = r.error.clone().ok_or_else(|| inconsistent("failed task has no error"))?;
                TaskState::Error { message }
            }
        };
        Ok(Task {
            id: r.id,
            url: r.url,
            submitted_at: r.submitted_at,
            state,
        })
    }
}

impl From<Task> for TaskRecord {
    fn from(t: Task) -> Self {
        let status = t.status();
        let (completed_at, data, error) = match t.state {
            TaskState::Queued | TaskState::Processing => (None, None, None),
            TaskState::Completed { data, completed_at } => (Some(completed_at), Some(data), None),
            TaskState::Error { message } => (None, None, Some(message)),
        };
        TaskRecord {
            id: t.id,
            url: t.url,
            status,
            submitted_at: t.submitted_at,
            completed_at,
            data,
            error,
        }
    }
}
