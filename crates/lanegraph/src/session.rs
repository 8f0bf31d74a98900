// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Graph session: holds the loaded commits and their layout
//!
//! Every [`GraphSession::load_commits`] call takes a complete, freshly-read
//! commit list, lays it out, diffs it against the previous snapshot and
//! notifies subscribers. Snapshots are immutable and shared through [`Arc`],
//! so a reader on another thread never sees a half-updated layout.
//!
//! # Example
//!
//! ```
//! use lanegraph::{CommitDiff, CommitEntry, CommitId, CommitRecord, GraphSession};
//! use chrono::Utc;
//!
//! let entry = |id: &str, parents: &[&str]| CommitEntry {
//!     id: CommitId::from(id),
//!     parent_ids: parents.iter().map(|p| CommitId::from(*p)).collect(),
//!     author: "Author".to_string(),
//!     timestamp: Utc::now(),
//!     description: format!("commit {id}"),
//! };
//!
//! let mut session = GraphSession::new();
//! let report = session
//!     .load_commits(vec![
//!         CommitRecord::new(entry("b", &["a"]), CommitDiff::new("+b")),
//!         CommitRecord::new(entry("a", &[]), CommitDiff::new("+a")),
//!     ])
//!     .expect("load");
//!
//! assert!(report.is_initial_load);
//! assert_eq!(session.coordinate("b").unwrap().column, 2);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::change::{ChangeReport, detect_changes};
use crate::commit::{CommitId, CommitRecord};
use crate::diff::ContentHash;
use crate::error::GraphError;
use crate::layout::{Coordinate, Layout, LayoutEngine};

/// Callback invoked with every reported change set
pub type ChangeCallback = Box<dyn Fn(&ChangeReport) + Send + Sync>;

/// Session behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Notify subscribers when a load only moved commits
    ///
    /// Off by default: a reload that adds and removes nothing stays silent
    /// even if coordinates shifted. The report is still returned from
    /// [`GraphSession::load_commits`].
    pub notify_on_move_only: bool,
}

/// Whether any commits are loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No commits loaded
    Empty,
    /// A non-empty commit set is loaded
    Loaded,
}

/// An immutable view of one loaded commit list and its layout
#[derive(Debug, Default)]
pub struct Snapshot {
    commits: Vec<Arc<CommitRecord>>,
    positions: HashMap<CommitId, usize>,
    layout: Layout,
}

impl Snapshot {
    fn new(commits: Vec<Arc<CommitRecord>>, layout: Layout) -> Self {
        let positions = commits
            .iter()
            .enumerate()
            .map(|(pos, c)| (c.id().clone(), pos))
            .collect();
        Self {
            commits,
            positions,
            layout,
        }
    }

    /// Commits in feed order
    #[must_use]
    pub fn commits(&self) -> &[Arc<CommitRecord>] {
        &self.commits
    }

    /// Look up a loaded commit
    #[must_use]
    pub fn commit(&self, id: &str) -> Option<&Arc<CommitRecord>> {
        self.positions.get(id).map(|&pos| &self.commits[pos])
    }

    /// The layout of this snapshot
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Number of loaded commits
    #[must_use]
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Whether no commits are loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Coordinate of a commit
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NotPlaced` if the commit has no coordinate.
    pub fn coordinate(&self, id: &str) -> Result<Coordinate, GraphError> {
        self.layout.get(id)
    }

    /// Content hash of a commit's patch
    ///
    /// # Errors
    ///
    /// Returns `GraphError::UnknownCommit` if the commit is not loaded.
    pub fn content_hash(&self, id: &str) -> Result<ContentHash, GraphError> {
        self.commit(id)
            .map(|c| c.diff().content_hash())
            .ok_or_else(|| GraphError::UnknownCommit {
                id: CommitId::from(id),
            })
    }

    /// Other loaded commits whose patch is byte-identical, in feed order
    ///
    /// # Errors
    ///
    /// Returns `GraphError::UnknownCommit` if the commit is not loaded.
    pub fn commits_with_matching_content(&self, id: &str) -> Result<Vec<CommitId>, GraphError> {
        let hash = self.content_hash(id)?;
        Ok(self
            .commits
            .iter()
            .filter(|c| c.id().as_str() != id && c.diff().content_hash() == hash)
            .map(|c| c.id().clone())
            .collect())
    }
}

/// Where an added commit's duplicate lives, for animating a copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateLink {
    /// The newly added commit
    pub commit: CommitId,
    /// The existing commit with identical patch content
    pub source: CommitId,
    /// Cell the source occupied when the change began
    pub origin: Coordinate,
}

/// Orchestrates layout and change detection over successive commit lists
pub struct GraphSession {
    engine: LayoutEngine,
    options: SessionOptions,
    snapshot: Arc<Snapshot>,
    subscribers: Vec<ChangeCallback>,
}

impl GraphSession {
    /// Create an empty session with default options
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(SessionOptions::default())
    }

    /// Create an empty session
    #[must_use]
    pub fn with_options(options: SessionOptions) -> Self {
        Self {
            engine: LayoutEngine::new(),
            options,
            snapshot: Arc::new(Snapshot::default()),
            subscribers: Vec::new(),
        }
    }

    /// Register a change subscriber
    pub fn subscribe(&mut self, callback: ChangeCallback) {
        self.subscribers.push(callback);
    }

    /// Session options
    #[must_use]
    pub fn options(&self) -> SessionOptions {
        self.options
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.snapshot.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Loaded
        }
    }

    /// The current snapshot, shareable with other threads
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Replace the loaded commits with a complete new list
    ///
    /// The list must name every child before its parents. On error the
    /// previous snapshot stays in place.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::MalformedGraph` if the list cannot be laid out.
    pub fn load_commits(&mut self, commits: Vec<CommitRecord>) -> Result<ChangeReport, GraphError> {
        let commits: Vec<Arc<CommitRecord>> = commits.into_iter().map(Arc::new).collect();
        let previous = Arc::clone(&self.snapshot);
        let hint = (!previous.is_empty()).then_some(&previous.layout);

        let layout = self.engine.layout(&commits, hint)?;
        let report = detect_changes(&previous.commits, &commits, &previous.layout, &layout);
        self.snapshot = Arc::new(Snapshot::new(commits, layout));

        info!(
            commits = self.snapshot.len(),
            added = report.added.len(),
            removed = report.removed.len(),
            moved = report.moved.len(),
            initial = report.is_initial_load,
            "commits loaded"
        );

        if self.should_notify(&report) {
            for subscriber in &self.subscribers {
                subscriber(&report);
            }
        } else {
            debug!("change report not published");
        }

        Ok(report)
    }

    fn should_notify(&self, report: &ChangeReport) -> bool {
        report.has_membership_changes()
            || (self.options.notify_on_move_only && !report.moved.is_empty())
    }

    /// Coordinate of a commit in the current layout
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NotPlaced` if the commit has no coordinate.
    pub fn coordinate(&self, id: &str) -> Result<Coordinate, GraphError> {
        self.snapshot.coordinate(id)
    }

    /// Look up a loaded commit
    #[must_use]
    pub fn commit(&self, id: &str) -> Option<&Arc<CommitRecord>> {
        self.snapshot.commit(id)
    }

    /// Content hash of a loaded commit's patch
    ///
    /// # Errors
    ///
    /// Returns `GraphError::UnknownCommit` if the commit is not loaded.
    pub fn content_hash(&self, id: &str) -> Result<ContentHash, GraphError> {
        self.snapshot.content_hash(id)
    }

    /// Other loaded commits with byte-identical patches, in feed order
    ///
    /// # Errors
    ///
    /// Returns `GraphError::UnknownCommit` if the commit is not loaded.
    pub fn commits_with_matching_content(&self, id: &str) -> Result<Vec<CommitId>, GraphError> {
        self.snapshot.commits_with_matching_content(id)
    }

    /// Link each commit added by `report` to an existing duplicate
    ///
    /// When several commits match, the last one in feed order is used. If
    /// that commit moved in the same report, its origin is where it started.
    /// Initial loads produce no links.
    #[must_use]
    pub fn duplicate_links(&self, report: &ChangeReport) -> Vec<DuplicateLink> {
        if report.is_initial_load {
            return Vec::new();
        }

        report
            .added
            .iter()
            .filter_map(|added| {
                let matches = self
                    .snapshot
                    .commits_with_matching_content(added.id().as_str())
                    .ok()?;
                let source = matches.last()?;
                let origin = match report.moved_commit(source.as_str()) {
                    Some(moved) => moved.from,
                    None => self.snapshot.layout.coordinate(source.as_str())?,
                };
                Some(DuplicateLink {
                    commit: added.id().clone(),
                    source: source.clone(),
                    origin,
                })
            })
            .collect()
    }
}

impl Default for GraphSession {
    fn default() -> Self {
        Self::new()
    }
}
