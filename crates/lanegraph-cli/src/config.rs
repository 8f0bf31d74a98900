//! Configuration for the lanegraph command-line viewer
//!
//! This module provides the command-line surface, including the repository
//! path, history selection, session behaviour and logging options.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lanegraph::{DiffCache, SessionOptions};
use lanegraph_git::HistoryOptions;

/// lanegraph - stable lane layout for git histories
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "lanegraph")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run (defaults to `layout`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path inside the git repository to read
    ///
    /// Parent directories are searched for the repository.
    /// Defaults to the current working directory.
    #[arg(short, long, env = "LANEGRAPH_REPO")]
    pub repo: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so command output stays clean.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Notify on reloads that only moved commits
    #[arg(long, default_value = "false")]
    pub notify_on_move_only: bool,

    /// Keep at most this many patches in memory
    ///
    /// Unbounded when not given.
    #[arg(long)]
    pub cache_capacity: Option<usize>,

    /// Read at most this many commits
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Do not show commits that are only reachable from the HEAD reflog
    #[arg(long, default_value = "false")]
    pub no_reflog: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print every commit with its grid coordinate
    Layout {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print references and the commits they point at
    Refs,

    /// Print commits whose patch matches the given commit's patch
    ///
    /// Finds cherry-picks and rebased copies.
    Duplicates {
        /// Commit id or unique prefix
        commit: String,
    },

    /// Check out a branch, tag or commit
    Checkout {
        /// Branch name, tag name or commit id
        reference: String,
    },

    /// Poll the repository and log every change to the layout
    ///
    /// Stop with Ctrl-C.
    Watch {
        /// Milliseconds between refreshes
        #[arg(long, default_value_t = 2000)]
        interval_ms: u64,
    },
}

impl Config {
    /// The subcommand to run, `layout` when none was given
    #[must_use]
    pub fn selected_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Layout { json: false })
    }

    /// Get the repository path, using current directory as default
    ///
    /// Returns `None` if no path is specified and the current
    /// directory cannot be determined.
    #[must_use]
    pub fn repo_path(&self) -> Option<PathBuf> {
        self.repo.clone().or_else(|| std::env::current_dir().ok())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the repository path is specified but doesn't
    /// exist or isn't a directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref repo) = self.repo {
            if !repo.exists() {
                return Err(ConfigError::RepositoryNotFound(repo.clone()));
            }
            if !repo.is_dir() {
                return Err(ConfigError::NotDirectory(repo.clone()));
            }
        }
        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }

    /// Session behaviour selected on the command line
    #[must_use]
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            notify_on_move_only: self.notify_on_move_only,
        }
    }

    /// A patch cache sized per `--cache-capacity`
    #[must_use]
    pub fn diff_cache(&self) -> DiffCache {
        match self.cache_capacity {
            Some(capacity) => DiffCache::bounded(capacity),
            None => DiffCache::new(),
        }
    }

    /// Which commits to read from the repository
    #[must_use]
    pub fn history_options(&self) -> HistoryOptions {
        HistoryOptions {
            limit: self.limit,
            include_reflog: !self.no_reflog,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Repository path not found
    #[error("Repository path not found: {0}")]
    RepositoryNotFound(PathBuf),

    /// Repository path is not a directory
    #[error("Repository path is not a directory: {0}")]
    NotDirectory(PathBuf),
}
