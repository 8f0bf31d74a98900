// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Boundary to the version-control collaborator

use tracing::debug;

use crate::cache::DiffCache;
use crate::commit::{CommitEntry, CommitId, CommitRecord};
use crate::diff::CommitDiff;

/// Supplies commit tuples and, on demand, the patch for a commit
pub trait HistorySource {
    /// Error raised by the underlying tool or library
    type Error;

    /// All commits to display, every child listed before its parents
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read.
    fn commit_entries(&self) -> Result<Vec<CommitEntry>, Self::Error>;

    /// Patch text introduced by one commit
    ///
    /// # Errors
    ///
    /// Returns an error if the patch cannot be produced.
    fn patch_text(&self, id: &CommitId) -> Result<String, Self::Error>;
}

/// Read the full history from `source` and attach each commit's patch
///
/// Patches come through `cache`, so a commit seen in an earlier load is not
/// asked of the source again.
///
/// # Errors
///
/// Propagates errors from the source.
pub fn load_records<S: HistorySource>(
    source: &S,
    cache: &mut DiffCache,
) -> Result<Vec<CommitRecord>, S::Error> {
    let entries = source.commit_entries()?;
    let cached_before = cache.len();

    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        let patch = cache.get_or_compute(&entry.id, |id| source.patch_text(id))?;
        let diff = CommitDiff::new(patch);
        records.push(CommitRecord::new(entry, diff));
    }

    debug!(
        commits = records.len(),
        computed = cache.len().saturating_sub(cached_before),
        "history records assembled"
    );
    Ok(records)
}
