// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Added/removed/moved delta between two successive layouts

use std::collections::HashSet;
use std::sync::Arc;

use crate::commit::{CommitId, CommitRecord};
use crate::layout::{Coordinate, Layout};

/// A commit present in both layouts whose cell changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedCommit {
    /// The commit that moved
    pub commit: Arc<CommitRecord>,
    /// Coordinate in the previous layout
    pub from: Coordinate,
    /// Coordinate in the new layout
    pub to: Coordinate,
}

/// Delta between two layouts, ordered for stable animation keys
///
/// `added` and `moved` follow the new commit list's order, `removed` follows
/// the old one's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeReport {
    /// Commits present now but not before
    pub added: Vec<Arc<CommitRecord>>,
    /// Commits present before but not now
    pub removed: Vec<Arc<CommitRecord>>,
    /// Commits present in both whose coordinate changed
    pub moved: Vec<MovedCommit>,
    /// True iff the previous commit set was empty
    pub is_initial_load: bool,
}

impl ChangeReport {
    /// Whether nothing was added, removed or moved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.moved.is_empty()
    }

    /// Whether the commit set itself changed
    #[must_use]
    pub fn has_membership_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    /// The move entry for a commit, if it moved
    #[must_use]
    pub fn moved_commit(&self, id: &str) -> Option<&MovedCommit> {
        self.moved.iter().find(|m| m.commit.id().as_str() == id)
    }

    /// Ids of the added commits, in order
    pub fn added_ids(&self) -> impl Iterator<Item = &CommitId> + '_ {
        self.added.iter().map(|c| c.id())
    }

    /// Ids of the removed commits, in order
    pub fn removed_ids(&self) -> impl Iterator<Item = &CommitId> + '_ {
        self.removed.iter().map(|c| c.id())
    }
}

/// Compare two commit lists and their layouts
///
/// Identity sets are taken from the two lists. A commit counts as moved only
/// when it is placed in both layouts at different cells.
#[must_use]
pub fn detect_changes(
    old_commits: &[Arc<CommitRecord>],
    new_commits: &[Arc<CommitRecord>],
    old_layout: &Layout,
    new_layout: &Layout,
) -> ChangeReport {
    let old_ids: HashSet<&str> = old_commits.iter().map(|c| c.id().as_str()).collect();
    let new_ids: HashSet<&str> = new_commits.iter().map(|c| c.id().as_str()).collect();

    let added = new_commits
        .iter()
        .filter(|c| !old_ids.contains(c.id().as_str()))
        .cloned()
        .collect();

    let removed = old_commits
        .iter()
        .filter(|c| !new_ids.contains(c.id().as_str()))
        .cloned()
        .collect();

    let moved = new_commits
        .iter()
        .filter(|c| old_ids.contains(c.id().as_str()))
        .filter_map(|c| {
            let from = old_layout.coordinate(c.id().as_str())?;
            let to = new_layout.coordinate(c.id().as_str())?;
            (from != to).then(|| MovedCommit {
                commit: Arc::clone(c),
                from,
                to,
            })
        })
        .collect();

    ChangeReport {
        added,
        removed,
        moved,
        is_initial_load: old_ids.is_empty(),
    }
}
