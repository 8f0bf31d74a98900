// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit id → patch text memo
//!
//! History is immutable, so a patch computed once for a commit id never has to
//! be computed again. The cache is append-only by default. A bounded cache is
//! available for long-lived processes; it evicts the least recently used entry
//! and may therefore recompute an evicted patch later.

use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::trace;

use crate::commit::CommitId;
use crate::error::GraphError;

/// Memo of patch text keyed by commit id
#[derive(Debug)]
pub struct DiffCache {
    entries: LruCache<CommitId, String>,
    capacity: Option<usize>,
}

impl Default for DiffCache {
    fn default() -> Self {
        Self {
            entries: LruCache::unbounded(),
            capacity: None,
        }
    }
}

impl DiffCache {
    /// Create an unbounded cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache holding at most `capacity` patches
    ///
    /// A capacity of zero is treated as one.
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            capacity: Some(capacity.get()),
        }
    }

    /// The configured entry limit, `None` when unbounded
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Number of cached patches
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a patch is cached for the id
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains(id)
    }

    /// Look up a cached patch without computing it or marking it as used
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.peek(id).map(String::as_str)
    }

    /// Store a patch for an id that has none yet
    ///
    /// # Errors
    ///
    /// Returns `GraphError::InvariantViolation` if the id is already cached,
    /// whatever its text.
    pub fn insert(&mut self, id: CommitId, text: String) -> Result<(), GraphError> {
        if self.entries.contains(id.as_str()) {
            return Err(GraphError::InvariantViolation {
                message: format!("patch for commit {id} is already cached"),
            });
        }
        self.store(id, text);
        Ok(())
    }

    /// Return the cached patch for `id`, computing and storing it on a miss
    ///
    /// `compute` runs at most once per id while the entry stays cached. If it
    /// fails nothing is stored and the error is returned.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `compute`.
    pub fn get_or_compute<F, E>(&mut self, id: &CommitId, compute: F) -> Result<&str, E>
    where
        F: FnOnce(&CommitId) -> Result<String, E>,
    {
        if !self.entries.contains(id.as_str()) {
            trace!(commit = %id, "diff cache miss");
            let text = compute(id)?;
            self.store(id.clone(), text);
        }
        Ok(self
            .entries
            .get(id.as_str())
            .map(String::as_str)
            .unwrap_or_default())
    }

    fn store(&mut self, id: CommitId, text: String) {
        if let Some((evicted, _)) = self.entries.push(id, text) {
            trace!(commit = %evicted, "evicting cached diff");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;
    use std::cell::Cell;
    use std::convert::Infallible;

    fn id(s: &str) -> CommitId {
        CommitId::new(s)
    }

    #[test]
    fn test_get_or_compute_calls_compute_once() {
        let mut cache = DiffCache::new();
        let calls = Cell::new(0);
        let compute = |c: &CommitId| -> Result<String, Infallible> {
            calls.set(calls.get() + 1);
            Ok(format!("patch of {c}"))
        };

        let first = cache.get_or_compute(&id("a"), compute).unwrap().to_string();
        let second = cache.get_or_compute(&id("a"), compute).unwrap().to_string();

        assert_eq!(first, "patch of a");
        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_compute_stores_nothing() {
        let mut cache = DiffCache::new();
        let result: Result<&str, &str> = cache.get_or_compute(&id("a"), |_| Err("boom"));
        assert_eq!(result, Err("boom"));
        assert!(cache.is_empty());
        assert!(!cache.contains("a"));
    }

    #[test]
    fn test_insert_rejects_different_text() {
        let mut cache = DiffCache::new();
        cache.insert(id("a"), "one".to_string()).unwrap();
        let err = cache.insert(id("a"), "two".to_string()).unwrap_err();
        assert!(matches!(err, GraphError::InvariantViolation { .. }));
        assert_eq!(cache.get("a"), Some("one"));
    }

    #[test]
    fn test_insert_rejects_same_text() {
        let mut cache = DiffCache::new();
        cache.insert(id("a"), "one".to_string()).unwrap();
        let err = cache.insert(id("a"), "one".to_string()).unwrap_err();
        assert!(matches!(err, GraphError::InvariantViolation { .. }));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_after_compute_is_rejected() {
        let mut cache = DiffCache::new();
        let ok = |c: &CommitId| -> Result<String, Infallible> { Ok(c.to_string()) };
        cache.get_or_compute(&id("a"), ok).unwrap();
        assert!(cache.insert(id("a"), "a".to_string()).is_err());
    }

    #[test]
    fn test_unbounded_by_default() {
        let mut cache = DiffCache::new();
        for n in 0..100 {
            cache.insert(id(&n.to_string()), String::new()).unwrap();
        }
        assert_eq!(cache.capacity(), None);
        assert_eq!(cache.len(), 100);
    }

    #[test]
    fn test_bounded_evicts_least_recently_used() {
        let mut cache = DiffCache::bounded(2);
        let ok = |c: &CommitId| -> Result<String, Infallible> { Ok(c.to_string()) };

        cache.get_or_compute(&id("a"), ok).unwrap();
        cache.get_or_compute(&id("b"), ok).unwrap();
        // touch "a" so "b" becomes the oldest
        cache.get_or_compute(&id("a"), ok).unwrap();
        cache.get_or_compute(&id("c"), ok).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_bounded_zero_capacity_holds_one() {
        let mut cache = DiffCache::bounded(0);
        cache.insert(id("a"), "x".to_string()).unwrap();
        cache.insert(id("b"), "y".to_string()).unwrap();
        assert_eq!(cache.capacity(), Some(1));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("b"), Some("y"));
    }

    #[test]
    fn test_get_does_not_refresh_recency() {
        let mut cache = DiffCache::bounded(2);
        cache.insert(id("a"), "x".to_string()).unwrap();
        cache.insert(id("b"), "y".to_string()).unwrap();
        assert_eq!(cache.get("a"), Some("x"));
        cache.insert(id("c"), "z".to_string()).unwrap();

        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_bounded_keeps_capacity_under_many_misses() {
        let mut cache = DiffCache::bounded(100);
        let ok = |c: &CommitId| -> Result<String, Infallible> { Ok(c.to_string()) };
        for n in 0..10_000 {
            cache.get_or_compute(&id(&n.to_string()), ok).unwrap();
        }
        assert_eq!(cache.len(), 100);
        assert!(cache.contains("9999"));
        assert!(!cache.contains("9899"));
    }
}
