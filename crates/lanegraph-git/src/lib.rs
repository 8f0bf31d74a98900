// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! lanegraph-git: git2-backed history source for lanegraph
//!
//! This library crate reads commits, patches and references from a git
//! repository and feeds them to a `lanegraph::GraphSession`.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use lanegraph::{DiffCache, GraphSession, load_records};
//! use lanegraph_git::{GitError, GitRepo, HistoryOptions};
//!
//! # fn main() -> Result<(), GitError> {
//! let repo = GitRepo::discover(".")?.with_history_options(HistoryOptions::latest(200));
//! let mut cache = DiffCache::new();
//! let mut session = GraphSession::new();
//!
//! let records = load_records(&repo, &mut cache)?;
//! let report = session.load_commits(records)?;
//! println!("{} commits placed", report.added.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod repo;

pub use error::GitError;
pub use repo::{GitRepo, HistoryOptions};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::GitError;
    pub use crate::repo::{GitRepo, HistoryOptions};
}
