//! Error types of the task pipeline and the interactive views.

use copilot_types::{TaskError, TaskId, TaskStatus};
use thiserror::Error;

use crate::api::ApiError;
use crate::host::HostError;
use crate::store::StoreError;

/// Why a task ended in the `error` state. The `Display` output is what gets
/// stored as the task's error message.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Original tab not found. It may have been closed.")]
    TabNotFound,

    #[error("Could not find target element on page.")]
    ElementNotFound,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Host(#[from] HostError),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Only web pages (http/https) can be extracted: {0}")]
    UnsupportedUrl(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors reported back to the user by view actions (toggle applied,
/// regenerate, history loading). None of them alter stored state.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("task {0} not found")]
    NotFound(TaskId),

    #[error("task {id} is {status}, not completed")]
    NotCompleted { id: TaskId, status: TaskStatus },

    #[error("job has no job_id")]
    MissingJobId,

    #[error("Regeneration failed: {0}")]
    RegenerateFailed(String),

    #[error("Resume content cannot be empty.")]
    EmptyResume,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<TaskError> for ViewError {
    fn from(e: TaskError) -> Self {
        match e {
            TaskError::NotCompleted { id, status } => ViewError::NotCompleted { id, status },
            TaskError::InvalidTransition { id, from, .. } => ViewError::NotCompleted { id, status: from },
            TaskError::Inconsistent { id, .. } => ViewError::NotCompleted {
                id,
                status: TaskStatus::Error,
            },
        }
    }
}
