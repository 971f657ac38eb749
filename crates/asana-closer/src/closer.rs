//! Marks the referenced task completed.

use tracing::{error, info, warn};

use crate::client::TaskApi;
use crate::error::ClientError;
use crate::models::Task;
use crate::reference::TaskReference;

/// Set `completed = true` on `task`.
///
/// Failures are logged with the task ID before being returned.
pub async fn close<A>(api: &A, task: &TaskReference) -> Result<Task, ClientError>
where
    A: TaskApi + ?Sized,
{
    match api.update_task_completion(task, true).await {
        Ok(updated) => {
            if updated.completed {
                info!(task_id = %task, name = %updated.name, "Closed Asana task");
            } else {
                warn!(task_id = %task, "Asana accepted the update but task is not completed");
            }
            Ok(updated)
        }
        Err(e) => {
            error!(
                task_id = %task,
                operation = "close_task",
                error = %e,
                "Failed to close Asana task"
            );
            Err(e)
        }
    }
}
