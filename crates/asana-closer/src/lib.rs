//! Close Asana tasks referenced from commit messages.
//!
//! On a push, the head commit message is scanned for a closing keyword and
//! task ID (`Fixes #1204`). When one is found and an Asana personal access
//! token is configured, the closer:
//!
//! 1. authenticates against the Asana API,
//! 2. posts `"<actor> pushed to branch <branch> of <repo> (<url>): <message>"`
//!    as a comment on the task,
//! 3. marks the task completed.
//!
//! A missing token or a commit without a reference is a successful no-op.
//!
//! # Usage
//!
//! ```no_run
//! use asana_closer::{run, workflow::connect_asana, Config};
//! use clap::Parser;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::parse();
//! let client_config = config.client_config();
//! let outcome = run(config.invocation()?, |credential| async move {
//!     connect_asana(credential, &client_config).await
//! })
//! .await?;
//! std::process::exit(i32::from(outcome.exit_code(config.strict)));
//! # }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Every API call can fail

pub mod client;
pub mod closer;
pub mod config;
pub mod error;
pub mod event;
pub mod models;
pub mod notifier;
pub mod reference;
pub mod workflow;

pub use client::{AsanaClient, ClientConfig, Credential, TaskApi};
pub use config::{Config, LogFormat};
pub use error::{ClientError, EventError};
pub use event::PushEvent;
pub use reference::{find_task_reference, TaskReference};
pub use workflow::{run, Invocation, Outcome, Report, StepStatus};
