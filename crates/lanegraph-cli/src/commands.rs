// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! One-shot subcommands
//!
//! Each command reads the repository once, lays the history out and writes
//! its result to the given writer.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use lanegraph::{CommitId, GraphSession, Reference, ReferenceKind, load_records};
use lanegraph_git::GitRepo;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Command, Config};

/// One commit of the printed layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutRow {
    /// Commit id
    pub id: CommitId,
    /// Column (history axis, newest highest)
    pub column: usize,
    /// Lane
    pub row: usize,
    /// Author name
    pub author: String,
    /// Commit time
    pub timestamp: DateTime<Utc>,
    /// First line of the message
    pub subject: String,
    /// Short names of references pointing here
    pub refs: Vec<String>,
}

/// Open the repository selected by `config`
///
/// # Errors
///
/// Returns an error if no repository contains the configured path.
pub fn open_repo(config: &Config) -> Result<GitRepo> {
    let path = config
        .repo_path()
        .context("Could not determine the current directory")?;
    let repo = GitRepo::discover(&path)?.with_history_options(config.history_options());
    debug!(path = %repo.path().display(), "repository opened");
    Ok(repo)
}

/// Read the full history of `repo` into a new session
///
/// # Errors
///
/// Returns an error if the history cannot be read or laid out.
pub fn load_session(repo: &GitRepo, config: &Config) -> Result<GraphSession> {
    let mut cache = config.diff_cache();
    let mut session = GraphSession::with_options(config.session_options());

    let records = load_records(repo, &mut cache)?;
    let report = session.load_commits(records)?;
    info!(
        commits = report.added.len(),
        max_row = session.snapshot().layout().max_row(),
        "history loaded"
    );
    Ok(session)
}

/// Run a one-shot command against the configured repository
///
/// # Errors
///
/// Returns an error if the repository cannot be read, the command's
/// arguments do not resolve, or output cannot be written.
pub fn run(config: &Config, command: &Command, out: &mut impl Write) -> Result<()> {
    let repo = open_repo(config)?;
    match command {
        Command::Layout { json } => {
            let session = load_session(&repo, config)?;
            let rows = layout_rows(&session, &repo.references()?);
            print_layout(&rows, *json, out)
        }
        Command::Refs => {
            let current = repo.current_branch()?;
            print_refs(&repo.references()?, current.as_deref(), out)
        }
        Command::Duplicates { commit } => {
            let session = load_session(&repo, config)?;
            print_duplicates(&session, commit, out)
        }
        Command::Checkout { reference } => {
            repo.checkout(reference)?;
            let head = repo.head_id()?;
            let branch = repo.current_branch()?.unwrap_or_default();
            writeln!(out, "HEAD is now at {} ({branch})", head.short())?;
            Ok(())
        }
        Command::Watch { .. } => bail!("watch runs continuously and is not a one-shot command"),
    }
}

/// Rows for every placed commit, in feed order
#[must_use]
pub fn layout_rows(session: &GraphSession, references: &[Reference]) -> Vec<LayoutRow> {
    let snapshot = session.snapshot();
    snapshot
        .commits()
        .iter()
        .filter_map(|commit| {
            let cell = snapshot.layout().coordinate(commit.id().as_str())?;
            let refs = references
                .iter()
                .filter(|r| &r.target == commit.id())
                .map(|r| r.short_name.clone())
                .collect();
            Some(LayoutRow {
                id: commit.id().clone(),
                column: cell.column,
                row: cell.row,
                author: commit.author().to_string(),
                timestamp: commit.timestamp(),
                subject: commit.subject().to_string(),
                refs,
            })
        })
        .collect()
}

/// Write layout rows as aligned text or pretty JSON
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn print_layout(rows: &[LayoutRow], json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, rows)?;
        writeln!(out)?;
        return Ok(());
    }

    for row in rows {
        let refs = if row.refs.is_empty() {
            String::new()
        } else {
            format!(" ({})", row.refs.join(", "))
        };
        writeln!(
            out,
            "{:<7} {:>5} {:>3}  {}{refs}",
            row.id.short(),
            row.column,
            row.row,
            row.subject
        )?;
    }
    Ok(())
}

fn kind_label(kind: ReferenceKind) -> &'static str {
    match kind {
        ReferenceKind::Head => "branch",
        ReferenceKind::Remote => "remote",
        ReferenceKind::Tag => "tag",
        ReferenceKind::Stash => "stash",
        ReferenceKind::Other => "other",
    }
}

/// Write one line per reference, marking the checked-out branch
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn print_refs(
    references: &[Reference],
    current_branch: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    let current_ref = current_branch.map(|name| format!("refs/heads/{name}"));
    for reference in references {
        let marker = if current_ref.as_deref() == Some(reference.full_name.as_str()) {
            '*'
        } else {
            ' '
        };
        writeln!(
            out,
            "{marker} {:<6} {} {}",
            kind_label(reference.kind),
            reference.target.short(),
            reference.full_name
        )?;
    }
    Ok(())
}

/// Find the single loaded commit whose id starts with `prefix`
///
/// # Errors
///
/// Returns an error if no commit or more than one commit matches.
pub fn resolve_commit(session: &GraphSession, prefix: &str) -> Result<CommitId> {
    let snapshot = session.snapshot();
    let mut matches = snapshot
        .commits()
        .iter()
        .map(|c| c.id())
        .filter(|id| id.as_str().starts_with(prefix));

    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id.clone()),
        (None, _) => bail!("No loaded commit matches '{prefix}'"),
        (Some(_), Some(_)) => bail!("'{prefix}' matches more than one commit"),
    }
}

/// Write every commit whose patch is identical to the given commit's
///
/// # Errors
///
/// Returns an error if the commit cannot be resolved or output cannot be
/// written.
pub fn print_duplicates(session: &GraphSession, prefix: &str, out: &mut impl Write) -> Result<()> {
    let id = resolve_commit(session, prefix)?;
    let matches = session.commits_with_matching_content(id.as_str())?;
    if matches.is_empty() {
        writeln!(out, "No other commit has the same patch as {}", id.short())?;
        return Ok(());
    }

    for duplicate in matches {
        let subject = session
            .commit(duplicate.as_str())
            .map(|c| c.subject().to_string())
            .unwrap_or_default();
        writeln!(out, "{:<7} {subject}", duplicate.short())?;
    }
    Ok(())
}
