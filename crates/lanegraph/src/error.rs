// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for lanegraph

use thiserror::Error;

use crate::commit::CommitId;

/// Errors that can occur while laying out or querying a commit graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The commit has no coordinate in the current layout
    #[error("Commit not placed: {id}")]
    NotPlaced {
        /// The commit that was queried
        id: CommitId,
    },

    /// The commit is not part of the loaded commit set
    #[error("Unknown commit: {id}")]
    UnknownCommit {
        /// The commit that was queried
        id: CommitId,
    },

    /// The supplied parent graph cannot be laid out
    #[error("Malformed commit graph: {reason}")]
    MalformedGraph {
        /// Description of what made the graph unusable
        reason: String,
    },

    /// An internal invariant was broken by the caller
    #[error("Invariant violation: {message}")]
    InvariantViolation {
        /// Description of the violated invariant
        message: String,
    },
}

impl GraphError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedGraph {
            reason: reason.into(),
        }
    }
}
