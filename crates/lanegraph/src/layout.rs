// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Lane layout for commit graphs
//!
//! [`LayoutEngine`] turns a commit list ordered children-before-parents (the
//! order `git rev-list --topo-order` produces, newest first) into a grid
//! coordinate per commit. Every tip gets its own pass; during a pass a
//! *reservation sequence* tracks which commit owns each lane. A commit hands
//! its lane to its first parent, and each further merge parent is given a
//! fresh lane directly below. Each pass starts below every lane used by the
//! passes before it, so unrelated histories never share a row.
//!
//! Columns come from the commit's position in the feed and are reflected at
//! the end, so the newest commit has the highest column.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{Level, debug, enabled, trace};

use crate::commit::{CommitId, CommitRecord};
use crate::error::GraphError;

/// Grid cell assigned to a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    /// Rank along the history axis, 1-based, newest commit highest
    pub column: usize,
    /// Lane index, 0-based
    pub row: usize,
}

impl Coordinate {
    /// Create a coordinate
    #[must_use]
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

/// Immutable coordinate map produced by one layout run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    coordinates: BTreeMap<CommitId, Coordinate>,
    max_column: usize,
    max_row: usize,
}

impl Layout {
    /// Coordinate of a placed commit
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NotPlaced` if the commit has no coordinate.
    pub fn get(&self, id: &str) -> Result<Coordinate, GraphError> {
        self.coordinate(id).ok_or_else(|| GraphError::NotPlaced {
            id: CommitId::from(id),
        })
    }

    /// Coordinate of a commit, if placed
    #[must_use]
    pub fn coordinate(&self, id: &str) -> Option<Coordinate> {
        self.coordinates.get(id).copied()
    }

    /// Check whether a commit was placed
    #[must_use]
    pub fn is_placed(&self, id: &str) -> bool {
        self.coordinates.contains_key(id)
    }

    /// Number of placed commits
    #[must_use]
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Whether nothing was placed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Highest column in use (0 when empty)
    #[must_use]
    pub fn max_column(&self) -> usize {
        self.max_column
    }

    /// Highest row in use (0 when empty)
    #[must_use]
    pub fn max_row(&self) -> usize {
        self.max_row
    }

    /// Placed commits and their coordinates, ordered by commit id
    pub fn iter(&self) -> impl Iterator<Item = (&CommitId, Coordinate)> + '_ {
        self.coordinates.iter().map(|(id, cell)| (id, *cell))
    }

    /// The commit with the lowest column (the oldest placed commit)
    #[must_use]
    pub fn leftmost(&self) -> Option<&CommitId> {
        self.coordinates
            .iter()
            .min_by_key(|(_, cell)| cell.column)
            .map(|(id, _)| id)
    }

    /// The commit with the highest column (the newest placed commit)
    #[must_use]
    pub fn rightmost(&self) -> Option<&CommitId> {
        self.coordinates
            .iter()
            .max_by_key(|(_, cell)| cell.column)
            .map(|(id, _)| id)
    }
}

/// Raw `(scan position, row)` before column reflection
#[derive(Debug, Clone, Copy)]
struct RawCell {
    x: usize,
    row: usize,
}

/// Adjacency view over the input list, indexed by feed position
struct FeedIndex<'a> {
    ids: Vec<&'a str>,
    parents: Vec<&'a [CommitId]>,
    has_children: Vec<bool>,
    /// Upper bound on the reservation sequence: every distinct id referenced
    lane_limit: usize,
}

impl<'a> FeedIndex<'a> {
    fn build<C: Borrow<CommitRecord>>(commits: &'a [C]) -> Result<Self, GraphError> {
        let mut position: HashMap<&'a str, usize> = HashMap::with_capacity(commits.len());
        let mut ids = Vec::with_capacity(commits.len());
        let mut parents = Vec::with_capacity(commits.len());

        for (pos, commit) in commits.iter().enumerate() {
            let commit = commit.borrow();
            if position.insert(commit.id().as_str(), pos).is_some() {
                return Err(GraphError::malformed(format!(
                    "commit {} is listed more than once",
                    commit.id()
                )));
            }
            ids.push(commit.id().as_str());
            parents.push(commit.parent_ids());
        }

        let mut has_children = vec![false; commits.len()];
        let mut dangling: HashSet<&str> = HashSet::new();
        for (pos, parent_ids) in parents.iter().enumerate() {
            for parent in parent_ids.iter() {
                match position.get(parent.as_str()) {
                    Some(&parent_pos) if parent_pos <= pos => {
                        return Err(GraphError::malformed(format!(
                            "commit {} is listed after its parent {}",
                            ids[pos], parent
                        )));
                    }
                    Some(&parent_pos) => has_children[parent_pos] = true,
                    // Truncated history; the edge ends at the boundary
                    None => {
                        dangling.insert(parent.as_str());
                    }
                }
            }
        }

        Ok(Self {
            lane_limit: ids.len() + dangling.len(),
            ids,
            parents,
            has_children,
        })
    }

    fn tips(&self) -> impl Iterator<Item = usize> + '_ {
        self.has_children
            .iter()
            .enumerate()
            .filter(|(_, has)| !**has)
            .map(|(pos, _)| pos)
    }
}

/// State of one tip's pass over the feed
struct Pass<'a> {
    tip: usize,
    row_offset: usize,
    reservations: Vec<&'a str>,
}

impl<'a> Pass<'a> {
    fn new(index: &FeedIndex<'a>, tip: usize, row_offset: usize) -> Self {
        Self {
            tip,
            row_offset,
            reservations: vec![index.ids[tip]],
        }
    }

    /// Scan from the tip to the end of the feed, placing every commit that
    /// holds a reservation. Returns the highest row placed.
    fn run(
        mut self,
        index: &FeedIndex<'a>,
        placed: &mut [Option<RawCell>],
    ) -> Result<Option<usize>, GraphError> {
        let mut max_row = None;

        for pos in self.tip..index.ids.len() {
            if self.reservations.is_empty() {
                break;
            }
            if placed[pos].is_some() {
                continue;
            }
            if let Some(row) = self.place(index, pos)? {
                placed[pos] = Some(RawCell { x: pos + 1, row });
                max_row = max_row.max(Some(row));
            }
        }

        trace!(tip = index.ids[self.tip], ?max_row, "pass finished");
        Ok(max_row)
    }

    /// Place the commit at `pos` if it holds a reservation and reserve its
    /// parents. Returns the absolute row it was placed on.
    fn place(&mut self, index: &FeedIndex<'a>, pos: usize) -> Result<Option<usize>, GraphError> {
        let id = index.ids[pos];
        // Not part of this tip's tracked lineage
        let Some(row) = self.reservations.iter().position(|r| *r == id) else {
            return Ok(None);
        };

        self.reserve_parents(row, index.parents[pos]);
        if self.reservations.len() > index.lane_limit {
            return Err(GraphError::malformed(format!(
                "lane reservations grew past {} while placing {id}",
                index.lane_limit
            )));
        }
        Ok(Some(row + self.row_offset))
    }

    fn reserve_parents(&mut self, row: usize, parents: &'a [CommitId]) {
        let Some((first, merged)) = parents.split_first() else {
            // Root commit: the lane ends here
            self.reservations.remove(row);
            return;
        };

        for parent in merged {
            if !self.reservations.contains(&parent.as_str()) {
                self.reservations.insert(row + 1, parent.as_str());
            }
        }
        self.reservations.remove(row);
        if !self.reservations.contains(&first.as_str()) {
            self.reservations.insert(row, first.as_str());
        }
    }
}

/// Assigns grid coordinates to commits
///
/// The engine keeps no state between runs: the same input always yields the
/// same layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine;

impl LayoutEngine {
    /// Create a layout engine
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Lay out `commits`, which must list every child before its parents
    ///
    /// `previous` is the layout of the last run, if any. It is consulted for
    /// diagnostics only and never changes placement.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::MalformedGraph` if a commit id is repeated, a
    /// commit is listed after one of its parents, or lane reservations grow
    /// past the number of ids in the graph.
    pub fn layout<C: Borrow<CommitRecord>>(
        &self,
        commits: &[C],
        previous: Option<&Layout>,
    ) -> Result<Layout, GraphError> {
        let index = FeedIndex::build(commits)?;
        let mut placed: Vec<Option<RawCell>> = vec![None; commits.len()];
        let mut max_row: Option<usize> = None;
        let mut passes = 0usize;

        for tip in index.tips() {
            if placed[tip].is_some() {
                continue;
            }
            let row_offset = max_row.map_or(0, |row| row + 1);
            let pass_max = Pass::new(&index, tip, row_offset).run(&index, &mut placed)?;
            max_row = max_row.max(pass_max);
            passes += 1;
        }

        let max_x = placed.iter().flatten().map(|cell| cell.x).max().unwrap_or(0);
        let coordinates: BTreeMap<CommitId, Coordinate> = placed
            .iter()
            .enumerate()
            .filter_map(|(pos, cell)| {
                cell.map(|cell| {
                    (
                        CommitId::from(index.ids[pos]),
                        Coordinate::new(max_x - cell.x + 1, cell.row),
                    )
                })
            })
            .collect();

        let layout = Layout {
            max_column: coordinates.values().map(|c| c.column).max().unwrap_or(0),
            max_row: max_row.unwrap_or(0),
            coordinates,
        };

        let lanes = if layout.is_empty() { 0 } else { layout.max_row + 1 };
        debug!(
            commits = commits.len(),
            placed = layout.len(),
            passes,
            lanes,
            "layout computed"
        );
        if let Some(previous) = previous
            && enabled!(Level::DEBUG)
        {
            let unchanged = layout
                .iter()
                .filter(|(id, cell)| previous.coordinate(id.as_str()) == Some(*cell))
                .count();
            debug!(unchanged, previous = previous.len(), "coordinates kept from previous layout");
        }

        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::record;
    use super::*;
    use similar_asserts::assert_eq;

    fn layout(commits: &[CommitRecord]) -> Layout {
        LayoutEngine::new().layout(commits, None).expect("layout")
    }

    fn cell(layout: &Layout, id: &str) -> (usize, usize) {
        let c = layout.get(id).expect("placed");
        (c.column, c.row)
    }

    #[test]
    fn test_empty_input() {
        let layout = layout(&[]);
        assert!(layout.is_empty());
        assert_eq!(layout.max_column(), 0);
        assert!(layout.rightmost().is_none());
    }

    #[test]
    fn test_single_lane_chain() {
        let commits = vec![record("C", &["B"]), record("B", &["A"]), record("A", &[])];
        let layout = layout(&commits);

        assert_eq!(cell(&layout, "C"), (3, 0));
        assert_eq!(cell(&layout, "B"), (2, 0));
        assert_eq!(cell(&layout, "A"), (1, 0));
        assert_eq!(layout.rightmost().map(CommitId::as_str), Some("C"));
        assert_eq!(layout.leftmost().map(CommitId::as_str), Some("A"));
    }

    #[test]
    fn test_fork_gives_tips_distinct_rows() {
        let commits = vec![record("B", &["A"]), record("C", &["A"]), record("A", &[])];
        let layout = layout(&commits);

        assert_eq!(cell(&layout, "B"), (3, 0));
        assert_eq!(cell(&layout, "C"), (2, 1));
        assert_eq!(cell(&layout, "A"), (1, 0));
    }

    #[test]
    fn test_merge_fans_out_below() {
        let commits = vec![
            record("M", &["B", "C"]),
            record("B", &["A"]),
            record("C", &["A"]),
            record("A", &[]),
        ];
        let layout = layout(&commits);

        assert_eq!(cell(&layout, "M"), (4, 0));
        assert_eq!(cell(&layout, "B"), (3, 0));
        assert_eq!(cell(&layout, "C"), (2, 1));
        assert_eq!(cell(&layout, "A"), (1, 0));
        assert_eq!(layout.max_row(), 1);
    }

    #[test]
    fn test_octopus_merge_fans_out_in_reverse() {
        let commits = vec![
            record("M", &["P", "Q", "R"]),
            record("P", &["O"]),
            record("Q", &["O"]),
            record("R", &["O"]),
            record("O", &[]),
        ];
        let layout = layout(&commits);

        assert_eq!(cell(&layout, "M"), (5, 0));
        assert_eq!(cell(&layout, "P"), (4, 0));
        // extra parents fan out in reverse: R is reserved directly below M
        assert_eq!(cell(&layout, "Q"), (3, 2));
        assert_eq!(cell(&layout, "R"), (2, 1));
        assert_eq!(cell(&layout, "O"), (1, 0));
    }

    #[test]
    fn test_disconnected_histories_get_separate_rows() {
        let commits = vec![
            record("X2", &["X1"]),
            record("Y2", &["Y1"]),
            record("X1", &[]),
            record("Y1", &[]),
        ];
        let layout = layout(&commits);

        assert_eq!(cell(&layout, "X2"), (4, 0));
        assert_eq!(cell(&layout, "Y2"), (3, 1));
        assert_eq!(cell(&layout, "X1"), (2, 0));
        assert_eq!(cell(&layout, "Y1"), (1, 1));
    }

    #[test]
    fn test_dangling_parent_is_a_boundary() {
        let commits = vec![record("C", &["B"]), record("B", &["missing"])];
        let layout = layout(&commits);

        assert_eq!(layout.len(), 2);
        assert_eq!(cell(&layout, "C"), (2, 0));
        assert_eq!(cell(&layout, "B"), (1, 0));
        assert!(!layout.is_placed("missing"));
    }

    #[test]
    fn test_unknown_commit_is_not_placed() {
        let layout = layout(&[record("A", &[])]);
        let err = layout.get("nope").unwrap_err();
        assert_eq!(
            err,
            GraphError::NotPlaced {
                id: CommitId::from("nope")
            }
        );
    }

    #[test]
    fn test_duplicate_id_is_malformed() {
        let commits = vec![record("A", &[]), record("A", &[])];
        let err = LayoutEngine::new().layout(&commits, None).unwrap_err();
        assert!(matches!(err, GraphError::MalformedGraph { .. }));
    }

    #[test]
    fn test_parent_before_child_is_malformed() {
        let commits = vec![record("A", &[]), record("B", &["A"])];
        let err = LayoutEngine::new().layout(&commits, None).unwrap_err();
        assert!(matches!(err, GraphError::MalformedGraph { .. }));
    }

    #[test]
    fn test_cycle_is_malformed() {
        let commits = vec![record("A", &["B"]), record("B", &["A"])];
        let err = LayoutEngine::new().layout(&commits, None).unwrap_err();
        assert!(matches!(err, GraphError::MalformedGraph { .. }));
    }

    #[test]
    fn test_self_parent_is_malformed() {
        let commits = vec![record("A", &["A"])];
        let err = LayoutEngine::new().layout(&commits, None).unwrap_err();
        assert!(matches!(err, GraphError::MalformedGraph { .. }));
    }

    #[test]
    fn test_previous_layout_does_not_change_placement() {
        let commits = vec![record("B", &["A"]), record("C", &["A"]), record("A", &[])];
        let first = layout(&commits);
        let second = LayoutEngine::new()
            .layout(&commits, Some(&first))
            .expect("layout");
        assert_eq!(first, second);
    }

    #[test]
    fn test_accepts_shared_records() {
        let commits: Vec<std::sync::Arc<CommitRecord>> = vec![
            std::sync::Arc::new(record("B", &["A"])),
            std::sync::Arc::new(record("A", &[])),
        ];
        let layout = LayoutEngine::new().layout(&commits, None).expect("layout");
        assert_eq!(layout.len(), 2);
    }
}
