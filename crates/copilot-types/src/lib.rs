//! Shared data model for Job Search Copilot.
//!
//! - [`task`]: the task record and its lifecycle state.
//! - [`job`]: job payloads, qualifications and skill rows returned by the
//!   extraction API.
//! - [`api`]: request/response bodies of the extraction API.

pub mod api;
pub mod job;
pub mod lenient;
pub mod task;

pub use job::{JobData, JobId, JobPayload, Qualification, SkillKind, SkillRow};
pub use task::{Task, TaskError, TaskId, TaskState, TaskStatus};
