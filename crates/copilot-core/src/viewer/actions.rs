//! Mutations shared by the session and history views.
//!
//! The API call always happens before the local write, so a failed call
//! leaves stored state untouched. Each successful session action performs
//! exactly one store write.

use copilot_types::{JobId, JobPayload, Task};
use tracing::info;

use crate::api::ApiClient;
use crate::error::ViewError;
use crate::store::TaskStore;

/// Mark or unmark a job as applied at the API.
pub async fn set_job_applied(api: &ApiClient, job_id: &JobId, applied: bool) -> Result<(), ViewError> {
    if applied {
        api.update_job_applied(job_id).await?;
    } else {
        api.update_job_unapplied(job_id).await?;
    }
    info!(%job_id, applied, "job applied flag updated");
    Ok(())
}

/// Ask the API to reassess a job. Anything other than
/// `{status: "success", data}` is a failure.
pub async fn regenerate_job(api: &ApiClient, job_id: &JobId) -> Result<JobPayload, ViewError> {
    let resp = api.regenerate_job_assessment(job_id).await?;
    let status = resp.status.clone();
    resp.into_success().ok_or_else(|| {
        let status = if status.is_empty() { "missing status".to_owned() } else { status };
        ViewError::RegenerateFailed(status)
    })
}

async fn completed_task<S: TaskStore>(store: &S, id: &str) -> Result<(Task, JobId), ViewError> {
    let task = store.get(id).await?.ok_or_else(|| ViewError::NotFound(id.to_owned()))?;
    let data = task.data().ok_or_else(|| ViewError::NotCompleted {
        id: task.id.clone(),
        status: task.status(),
    })?;
    let job_id = data.job_id().ok_or(ViewError::MissingJobId)?;
    Ok((task, job_id))
}

/// Flip the applied flag of a completed task, at the API and in the store.
pub async fn toggle_applied<S: TaskStore>(store: &S, api: &ApiClient, id: &str) -> Result<Task, ViewError> {
    let (mut task, job_id) = completed_task(store, id).await?;
    let applied = !task.is_applied();
    set_job_applied(api, &job_id, applied).await?;
    task.set_applied(applied)?;
    store.set(&task).await?;
    Ok(task)
}

/// Replace a completed task's payload with a freshly regenerated one.
pub async fn regenerate_task<S: TaskStore>(store: &S, api: &ApiClient, id: &str) -> Result<Task, ViewError> {
    let (mut task, job_id) = completed_task(store, id).await?;
    let data = regenerate_job(api, &job_id).await?;
    task.replace_data(data)?;
    store.set(&task).await?;
    info!(task_id = %task.id, %job_id, "assessment regenerated");
    Ok(task)
}
