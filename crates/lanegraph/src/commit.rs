//! Commit identities, raw commit entries and layout-ready commit records

use std::borrow::Borrow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::diff::CommitDiff;

/// Opaque commit identity (a hex object name for git histories)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    /// Wrap an identity string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Validate that a SHA is a valid 40-character hex string
    #[must_use]
    pub fn is_valid_sha(sha: &str) -> bool {
        sha.len() == 40 && sha.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// The identity as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the short form (first 7 characters)
    #[must_use]
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(7)
            .map_or(self.0.len(), |(idx, _)| idx);
        &self.0[..end]
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommitId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CommitId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CommitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A commit tuple as supplied by a history source, before its patch is attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEntry {
    /// Commit identity
    pub id: CommitId,
    /// Parent identities, primary parent first
    pub parent_ids: Vec<CommitId>,
    /// Author name
    pub author: String,
    /// Committer timestamp
    pub timestamp: DateTime<Utc>,
    /// Commit subject line
    pub description: String,
}

/// A node of the commit graph, immutable once constructed
///
/// Each record exclusively owns its [`CommitDiff`]. Commits in version control
/// never change, so neither does the patch text or its content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    id: CommitId,
    parent_ids: Vec<CommitId>,
    description: String,
    author: String,
    timestamp: DateTime<Utc>,
    diff: CommitDiff,
}

impl CommitRecord {
    /// Build a record from a commit entry and its patch
    #[must_use]
    pub fn new(entry: CommitEntry, diff: CommitDiff) -> Self {
        Self {
            id: entry.id,
            parent_ids: entry.parent_ids,
            description: entry.description,
            author: entry.author,
            timestamp: entry.timestamp,
            diff,
        }
    }

    /// Commit identity
    #[must_use]
    pub fn id(&self) -> &CommitId {
        &self.id
    }

    /// Parent identities, primary parent first
    #[must_use]
    pub fn parent_ids(&self) -> &[CommitId] {
        &self.parent_ids
    }

    /// The primary parent, if any
    #[must_use]
    pub fn first_parent(&self) -> Option<&CommitId> {
        self.parent_ids.first()
    }

    /// Commit description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the first line of the description
    #[must_use]
    pub fn subject(&self) -> &str {
        self.description.lines().next().unwrap_or("")
    }

    /// Author name
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Committer timestamp
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The patch introduced by this commit
    #[must_use]
    pub fn diff(&self) -> &CommitDiff {
        &self.diff
    }

    /// Check if this is a merge commit (has multiple parents)
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() > 1
    }

    /// Check if this is a root commit (has no parents)
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_ids.is_empty()
    }
}
