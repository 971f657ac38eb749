//! One push, start to finish.
//!
//! Credential check → reference parse → authenticate → comment → close.
//! The comment is posted before the task is closed. Each call's failure is
//! logged and recorded in the [`Report`] without preventing the other call.

use std::future::Future;

use tracing::{info, warn};

use crate::client::{AsanaClient, ClientConfig, Credential, TaskApi};
use crate::closer;
use crate::error::ClientError;
use crate::event::PushEvent;
use crate::notifier;
use crate::reference::{find_task_reference, TaskReference};

/// Actor name used when neither the event nor Asana provides one.
const UNKNOWN_ACTOR: &str = "unknown";

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub event: PushEvent,
    pub credential: Option<Credential>,
    /// Log what would happen without calling Asana
    pub dry_run: bool,
}

/// An authenticated API handle plus the name of the user it acts as.
pub struct Session<A> {
    pub api: A,
    pub user_name: String,
}

/// Result of one remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Failed(String),
}

impl StepStatus {
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    fn from_result<T>(result: &Result<T, ClientError>) -> Self {
        match result {
            Ok(_) => Self::Done,
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// What happened to a referenced task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub task: TaskReference,
    pub comment: StepStatus,
    pub close: StepStatus,
}

impl Report {
    /// Both the comment and the close succeeded.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.comment.is_done() && self.close.is_done()
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No credential was configured; nothing was done.
    MissingCredential,
    /// The commit message references no task; nothing was done.
    NoReference,
    /// Dry run: the comment that would have been posted.
    DryRun {
        task: TaskReference,
        comment: String,
    },
    /// Both calls were attempted.
    Processed(Report),
}

impl Outcome {
    /// Process exit code. Remote failures only count in strict mode.
    #[must_use]
    pub const fn exit_code(&self, strict: bool) -> u8 {
        match self {
            Self::Processed(report) if strict && !report.is_complete() => 1,
            _ => 0,
        }
    }
}

/// Authenticate against Asana and wrap the client in a [`Session`].
pub async fn connect_asana(
    credential: Credential,
    config: &ClientConfig,
) -> Result<Session<AsanaClient>, ClientError> {
    let client = AsanaClient::connect_with(credential, config).await?;
    let user_name = client.user().name.clone();
    Ok(Session {
        api: client,
        user_name,
    })
}

/// Run the closer for one push.
///
/// `connect` is only called once a credential and a task reference are both
/// present, so the no-op paths never touch the network.
///
/// # Errors
/// Returns the error from `connect` (authentication or transport failure).
/// Failures of the comment and close calls are reported in the [`Outcome`]
/// instead.
pub async fn run<A, F, Fut>(invocation: Invocation, connect: F) -> Result<Outcome, ClientError>
where
    A: TaskApi,
    F: FnOnce(Credential) -> Fut,
    Fut: Future<Output = Result<Session<A>, ClientError>>,
{
    let Invocation {
        event,
        credential,
        dry_run,
    } = invocation;

    if dry_run {
        return Ok(dry_run_outcome(&event));
    }

    let Some(credential) = credential else {
        info!("ASANA_PAT not found. Exiting...");
        return Ok(Outcome::MissingCredential);
    };

    let Some(task) = find_task_reference(&event.commit_message) else {
        info!("No Asana task ID found in commit message. Exiting...");
        return Ok(Outcome::NoReference);
    };

    info!(
        task_id = %task,
        branch = %event.branch,
        repository = %event.repository,
        "Found Asana task reference"
    );

    let session = connect(credential).await?;
    let actor = resolve_actor(&event, &session.user_name);

    let comment = notifier::notify(&session.api, &task, actor, &event).await;
    let close = closer::close(&session.api, &task).await;

    let report = Report {
        task,
        comment: StepStatus::from_result(&comment),
        close: StepStatus::from_result(&close),
    };

    if report.is_complete() {
        info!(task_id = %report.task, "Asana task commented and closed");
    } else {
        warn!(
            task_id = %report.task,
            commented = report.comment.is_done(),
            closed = report.close.is_done(),
            "Asana task only partially updated"
        );
    }

    Ok(Outcome::Processed(report))
}

fn dry_run_outcome(event: &PushEvent) -> Outcome {
    let Some(task) = find_task_reference(&event.commit_message) else {
        info!(dry_run = true, "No Asana task ID found in commit message");
        return Outcome::NoReference;
    };

    let actor = resolve_actor(event, "");
    let comment = notifier::comment_for(actor, event);
    info!(
        dry_run = true,
        task_id = %task,
        comment = %comment,
        "Would comment on and close Asana task"
    );
    Outcome::DryRun { task, comment }
}

/// Event actor, else the Asana user, else a placeholder.
fn resolve_actor<'a>(event: &'a PushEvent, user_name: &'a str) -> &'a str {
    event
        .actor
        .as_deref()
        .filter(|name| !name.is_empty())
        .or_else(|| Some(user_name).filter(|name| !name.is_empty()))
        .unwrap_or(UNKNOWN_ACTOR)
}
