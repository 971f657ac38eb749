//! asana-closer - comment on and close the Asana task a pushed commit references.
//!
//! Intended to run once per push, typically as a GitHub Actions step.
//!
//! # Environment Variables
//!
//! - `ASANA_PAT` / `INPUT_ASANA-PAT` - Asana personal access token (run is a
//!   no-op without it)
//! - `GITHUB_EVENT_PATH` - push event payload
//! - `GITHUB_REF`, `GITHUB_REPOSITORY`, `GITHUB_ACTOR` - event overrides
//! - `RUST_LOG` - log filter (default `info`)
//!
//! # Examples
//!
//! ```bash
//! # Inside a GitHub Actions push job
//! asana-closer
//!
//! # Locally, without touching Asana
//! asana-closer --dry-run --commit-message "Fixes #1204" --ref refs/heads/main \
//!     --repository acme/demo --commit-url https://github.com/acme/demo/commit/abc --actor alice
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use asana_closer::workflow::connect_asana;
use asana_closer::{run, Config, LogFormat};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn execute(config: &Config) -> Result<u8> {
    let invocation = config.invocation().context("Failed to read push event")?;
    let client_config = config.client_config();

    let outcome = run(invocation, |credential| async move {
        connect_asana(credential, &client_config).await
    })
    .await
    .context("Failed to connect to Asana")?;

    Ok(outcome.exit_code(config.strict))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = Config::parse();
    init_tracing(config.log_format);

    match execute(&config).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!(error = %format!("{e:#}"), "An unexpected error occurred");
            ExitCode::FAILURE
        }
    }
}
