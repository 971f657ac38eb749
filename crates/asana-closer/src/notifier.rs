//! Posts the push summary as a comment on the referenced task.

use tracing::{error, info};

use crate::client::TaskApi;
use crate::error::ClientError;
use crate::event::PushEvent;
use crate::models::Story;
use crate::reference::TaskReference;

/// Format the comment posted for a push.
///
/// Values are inserted verbatim.
#[must_use]
pub fn compose_comment(
    actor: &str,
    branch: &str,
    repository: &str,
    commit_url: &str,
    commit_message: &str,
) -> String {
    format!("{actor} pushed to branch {branch} of {repository} ({commit_url}): {commit_message}")
}

/// Comment text for `event`, credited to `actor`.
#[must_use]
pub fn comment_for(actor: &str, event: &PushEvent) -> String {
    compose_comment(
        actor,
        &event.branch,
        &event.repository,
        &event.commit_url,
        &event.commit_message,
    )
}

/// Post the push summary as a story on `task`.
///
/// Failures are logged with the task ID before being returned.
pub async fn notify<A>(
    api: &A,
    task: &TaskReference,
    actor: &str,
    event: &PushEvent,
) -> Result<Story, ClientError>
where
    A: TaskApi + ?Sized,
{
    let text = comment_for(actor, event);
    match api.add_task_comment(task, &text).await {
        Ok(story) => {
            info!(task_id = %task, story_id = %story.gid, "Added comment to Asana task");
            Ok(story)
        }
        Err(e) => {
            error!(
                task_id = %task,
                operation = "add_comment",
                error = %e,
                "Failed to add comment to Asana task"
            );
            Err(e)
        }
    }
}
