//! Push event fields consumed by the closer.
//!
//! Fields come from the GitHub push webhook payload (the file GitHub Actions
//! exposes as `GITHUB_EVENT_PATH`) and may be overridden individually from
//! the command line.

use std::path::Path;

use serde::Deserialize;

use crate::error::EventError;

/// The push being processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushEvent {
    /// Head commit message
    pub commit_message: String,
    /// Branch name with any `refs/heads/` prefix removed
    pub branch: String,
    /// Repository name without the owner
    pub repository: String,
    /// Head commit URL
    pub commit_url: String,
    /// User who pushed, if the event names one
    pub actor: Option<String>,
}

/// GitHub push webhook payload (subset)
#[derive(Debug, Clone, Deserialize)]
struct GitHubPushPayload {
    #[serde(rename = "ref", default)]
    ref_name: String,
    #[serde(default)]
    repository: Option<GitHubRepository>,
    #[serde(default)]
    head_commit: Option<GitHubCommit>,
    #[serde(default)]
    pusher: Option<GitHubPusher>,
    #[serde(default)]
    sender: Option<GitHubSender>,
}

#[derive(Debug, Clone, Deserialize)]
struct GitHubRepository {
    name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GitHubCommit {
    #[serde(default)]
    message: String,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GitHubPusher {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GitHubSender {
    login: String,
}

impl PushEvent {
    /// Parse a GitHub push webhook payload.
    ///
    /// A payload without `head_commit` (branch deletion) yields an empty
    /// commit message.
    pub fn from_github_payload(json: &str) -> Result<Self, EventError> {
        let payload: GitHubPushPayload = serde_json::from_str(json)?;
        let head_commit = payload.head_commit.unwrap_or_default();

        let actor = payload
            .pusher
            .and_then(|p| p.name)
            .or_else(|| payload.sender.map(|s| s.login))
            .filter(|name| !name.is_empty());

        Ok(Self {
            commit_message: head_commit.message,
            branch: branch_name(&payload.ref_name).to_string(),
            repository: payload.repository.map(|r| r.name).unwrap_or_default(),
            commit_url: head_commit.url,
            actor,
        })
    }

    /// Read and parse a GitHub push webhook payload from disk.
    pub fn from_github_event_file(path: &Path) -> Result<Self, EventError> {
        let json = std::fs::read_to_string(path).map_err(|source| EventError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_github_payload(&json)
    }
}

/// Strip `refs/heads/` or `refs/tags/` from a git ref.
#[must_use]
pub fn branch_name(git_ref: &str) -> &str {
    git_ref
        .strip_prefix("refs/heads/")
        .or_else(|| git_ref.strip_prefix("refs/tags/"))
        .unwrap_or(git_ref)
}

/// Reduce `owner/name` to `name`.
#[must_use]
pub fn repository_name(full_name: &str) -> &str {
    full_name.rsplit('/').next().unwrap_or(full_name)
}
