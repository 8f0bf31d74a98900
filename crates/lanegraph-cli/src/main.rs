//! lanegraph: print and watch the lane layout of a git history
//!
//! Logs go to stderr; command output goes to stdout.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use lanegraph_cli::commands;
use lanegraph_cli::config::{Command, Config};
use lanegraph_cli::watch::Watcher;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(io::stderr)
        .init();

    config.validate()?;
    let command = config.selected_command();
    debug!(?command, "starting lanegraph");

    match command {
        Command::Watch { interval_ms } => {
            Watcher::new(&config)?
                .run(Duration::from_millis(interval_ms))
                .await
        }
        command => {
            let mut out = io::stdout().lock();
            commands::run(&config, &command, &mut out)?;
            out.flush()?;
            Ok(())
        }
    }
}
