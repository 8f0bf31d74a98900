// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Polling watcher
//!
//! Repository reads are blocking, so each refresh runs on tokio's blocking
//! pool. The loop awaits one refresh before taking the next tick, and ticks
//! missed meanwhile are skipped, so at most one load is ever in flight.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use lanegraph::{ChangeReport, DiffCache, GraphSession, load_records};
use lanegraph_git::{GitRepo, HistoryOptions};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::Config;

/// Keeps a session in step with a repository on disk
pub struct Watcher {
    path: PathBuf,
    options: HistoryOptions,
    session: GraphSession,
    cache: DiffCache,
}

impl Watcher {
    /// Create a watcher for the repository selected by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the repository path cannot be determined.
    pub fn new(config: &Config) -> Result<Self> {
        let path = config
            .repo_path()
            .context("Could not determine the current directory")?;
        let mut session = GraphSession::with_options(config.session_options());
        session.subscribe(Box::new(log_report));

        Ok(Self {
            path,
            options: config.history_options(),
            session,
            cache: config.diff_cache(),
        })
    }

    /// The session being kept up to date
    #[must_use]
    pub fn session(&self) -> &GraphSession {
        &self.session
    }

    /// Patches cached so far
    #[must_use]
    pub fn cache(&self) -> &DiffCache {
        &self.cache
    }

    /// Re-read the repository and load the result into the session
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be read or its history
    /// cannot be laid out; the session keeps its previous snapshot.
    pub async fn refresh(&mut self) -> Result<ChangeReport> {
        let path = self.path.clone();
        let options = self.options.clone();
        let mut cache = std::mem::take(&mut self.cache);

        let (cache, records) = tokio::task::spawn_blocking(move || {
            let records = GitRepo::discover(&path)
                .map(|repo| repo.with_history_options(options))
                .and_then(|repo| load_records(&repo, &mut cache));
            (cache, records)
        })
        .await
        .context("Refresh worker panicked")?;
        self.cache = cache;

        let report = self.session.load_commits(records?)?;
        for link in self.session.duplicate_links(&report) {
            debug!(
                commit = %link.commit,
                source = %link.source,
                column = link.origin.column,
                row = link.origin.row,
                "commit duplicates an existing patch"
            );
        }
        Ok(report)
    }

    /// Refresh every `interval` until Ctrl-C
    ///
    /// Failed refreshes are logged and retried on the next tick.
    ///
    /// # Errors
    ///
    /// Returns an error if a refresh worker panics.
    pub async fn run(mut self, interval: Duration) -> Result<()> {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            path = %self.path.display(),
            ?interval,
            "watching repository"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("stopping watch");
                    return Ok(());
                }
            }

            if let Err(err) = self.refresh().await {
                if err.downcast_ref::<tokio::task::JoinError>().is_some() {
                    return Err(err);
                }
                warn!(error = %err, "refresh failed, keeping previous layout");
            }
        }
    }
}

fn log_report(report: &ChangeReport) {
    info!(
        added = report.added.len(),
        removed = report.removed.len(),
        moved = report.moved.len(),
        initial = report.is_initial_load,
        "layout changed"
    );
    for id in report.added_ids() {
        debug!(commit = %id, "added");
    }
    for id in report.removed_ids() {
        debug!(commit = %id, "removed");
    }
    for moved in &report.moved {
        debug!(
            commit = %moved.commit.id(),
            from = ?moved.from,
            to = ?moved.to,
            "moved"
        );
    }
}
