// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Patch text with a memoized content hash
//!
//! Two commits whose patches are byte-identical (a cherry-pick, or a rebased
//! commit) share a [`ContentHash`], which lets the presentation layer link them.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// A 32-byte BLAKE3 digest of a patch text
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash a patch text
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self(*blake3::hash(text.as_bytes()).as_bytes())
    }

    /// Returns the digest as a 64-character lowercase hex string
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.to_hex())
    }
}

/// The patch introduced by a commit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitDiff {
    patch_text: String,
    #[serde(skip)]
    content_hash: OnceLock<ContentHash>,
}

impl CommitDiff {
    /// Wrap a patch text; the hash is computed on first request
    #[must_use]
    pub fn new(patch_text: impl Into<String>) -> Self {
        Self {
            patch_text: patch_text.into(),
            content_hash: OnceLock::new(),
        }
    }

    /// The raw patch text
    #[must_use]
    pub fn patch_text(&self) -> &str {
        &self.patch_text
    }

    /// Digest of the patch text, computed at most once per instance
    pub fn content_hash(&self) -> ContentHash {
        *self
            .content_hash
            .get_or_init(|| ContentHash::of(&self.patch_text))
    }

    /// Whether the hash has been computed yet
    #[must_use]
    pub fn is_hashed(&self) -> bool {
        self.content_hash.get().is_some()
    }

    /// Check if another diff carries byte-identical changes
    pub fn same_content(&self, other: &CommitDiff) -> bool {
        self.content_hash() == other.content_hash()
    }
}

impl PartialEq for CommitDiff {
    fn eq(&self, other: &Self) -> bool {
        self.patch_text == other.patch_text
    }
}

impl Eq for CommitDiff {}
