// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! lanegraph: stable lane layout for evolving commit graphs
//!
//! This library crate assigns every commit of a history a `(column, row)`
//! grid cell, keeps those cells stable as the history changes, and reports
//! what was added, removed or moved between two loads so a viewer can
//! animate the transition. Patch text is memoized per commit and hashed so
//! that cherry-picked or rebased commits can be linked to their originals.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use lanegraph::{DiffCache, GraphSession, HistorySource, load_records};
//!
//! fn refresh<S: HistorySource>(
//!     source: &S,
//!     cache: &mut DiffCache,
//!     session: &mut GraphSession,
//! ) -> Result<(), S::Error>
//! where
//!     S::Error: From<lanegraph::GraphError>,
//! {
//!     let records = load_records(source, cache)?;
//!     let report = session.load_commits(records)?;
//!     println!("{} added, {} removed", report.added.len(), report.removed.len());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod change;
pub mod commit;
pub mod diff;
pub mod error;
pub mod layout;
pub mod reference;
pub mod session;
pub mod source;

#[cfg(test)]
mod test_support;

pub use cache::DiffCache;
pub use change::{ChangeReport, MovedCommit, detect_changes};
pub use commit::{CommitEntry, CommitId, CommitRecord};
pub use diff::{CommitDiff, ContentHash};
pub use error::GraphError;
pub use layout::{Coordinate, Layout, LayoutEngine};
pub use reference::{Reference, ReferenceKind};
pub use session::{
    ChangeCallback, DuplicateLink, GraphSession, SessionOptions, SessionState, Snapshot,
};
pub use source::{HistorySource, load_records};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::change::ChangeReport;
    pub use crate::commit::{CommitId, CommitRecord};
    pub use crate::error::GraphError;
    pub use crate::layout::{Coordinate, LayoutEngine};
    pub use crate::session::{GraphSession, SessionOptions};
}
