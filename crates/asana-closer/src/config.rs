//! Command-line and environment configuration.
//!
//! Every flag has an environment fallback so the binary runs unchanged as a
//! GitHub Actions step. Explicit values override fields read from the push
//! event payload.

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::client::{ClientConfig, Credential, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::EventError;
use crate::event::{branch_name, repository_name, PushEvent};
use crate::workflow::Invocation;

/// Variable GitHub Actions sets for the `asana-pat` action input.
pub const ACTIONS_INPUT_PAT: &str = "INPUT_ASANA-PAT";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Close Asana tasks referenced by commit messages.
#[derive(Clone, Parser)]
#[command(name = "asana-closer")]
#[command(about = "Comment on and close the Asana task referenced by a pushed commit")]
#[command(version)]
pub struct Config {
    /// Asana personal access token (or set `ASANA_PAT`)
    #[arg(long = "asana-pat", env = "ASANA_PAT", hide_env_values = true)]
    pub asana_pat: Option<String>,

    /// GitHub push event payload (or set `GITHUB_EVENT_PATH`)
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Commit message, overriding the payload
    #[arg(long, env = "COMMIT_MESSAGE")]
    pub commit_message: Option<String>,

    /// Commit URL, overriding the payload
    #[arg(long, env = "COMMIT_URL")]
    pub commit_url: Option<String>,

    /// Git ref pushed to, e.g. `refs/heads/main`
    #[arg(long = "ref", env = "GITHUB_REF")]
    pub git_ref: Option<String>,

    /// Repository, as `owner/name` or `name`
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// User who pushed
    #[arg(long, env = "GITHUB_ACTOR")]
    pub actor: Option<String>,

    /// Asana API base URL
    #[arg(long, env = "ASANA_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        env = "ASANA_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Exit non-zero if the comment or close call fails
    #[arg(long, env = "ASANA_CLOSER_STRICT")]
    pub strict: bool,

    /// Log what would happen without calling Asana
    #[arg(long, env = "ASANA_CLOSER_DRY_RUN")]
    pub dry_run: bool,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("asana_pat", &self.asana_pat.as_ref().map(|_| "***"))
            .field("event_path", &self.event_path)
            .field("commit_message", &self.commit_message)
            .field("commit_url", &self.commit_url)
            .field("git_ref", &self.git_ref)
            .field("repository", &self.repository)
            .field("actor", &self.actor)
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("strict", &self.strict)
            .field("dry_run", &self.dry_run)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// The credential from `--asana-pat`/`ASANA_PAT`, falling back to the
    /// GitHub Actions input variable. Blank values count as missing.
    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        self.asana_pat
            .clone()
            .and_then(Credential::new)
            .or_else(|| {
                std::env::var(ACTIONS_INPUT_PAT)
                    .ok()
                    .and_then(Credential::new)
            })
    }

    /// Client settings.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Build the push event from the payload file (if any) and overrides.
    pub fn push_event(&self) -> Result<PushEvent, EventError> {
        let mut event = match &self.event_path {
            Some(path) => PushEvent::from_github_event_file(path)?,
            None => PushEvent::default(),
        };

        if let Some(message) = &self.commit_message {
            event.commit_message.clone_from(message);
        }
        if let Some(url) = &self.commit_url {
            event.commit_url.clone_from(url);
        }
        if let Some(git_ref) = &self.git_ref {
            event.branch = branch_name(git_ref).to_string();
        }
        if let Some(repository) = &self.repository {
            event.repository = repository_name(repository).to_string();
        }
        if let Some(actor) = self.actor.as_ref().filter(|a| !a.is_empty()) {
            event.actor = Some(actor.clone());
        }

        Ok(event)
    }

    /// Assemble the run input.
    pub fn invocation(&self) -> Result<Invocation, EventError> {
        Ok(Invocation {
            event: self.push_event()?,
            credential: self.credential(),
            dry_run: self.dry_run,
        })
    }
}
