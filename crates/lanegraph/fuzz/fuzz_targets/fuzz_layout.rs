#![no_main]

//! Fuzz target for lane layout
//!
//! Each input byte describes one commit: the low nibble picks a parent
//! offset and the high nibble a merge parent offset, so the fuzzer explores
//! arbitrary fan-in, fan-out and dangling edges. Layout must either succeed
//! with no two commits sharing a cell or reject the graph as malformed.

use std::collections::HashSet;

use chrono::Utc;
use libfuzzer_sys::fuzz_target;

use lanegraph::{CommitDiff, CommitEntry, CommitId, CommitRecord, GraphError, GraphSession};

fn build(data: &[u8]) -> Vec<CommitRecord> {
    let id = |i: usize| CommitId::from(format!("c{i}"));
    data.iter()
        .enumerate()
        .map(|(pos, byte)| {
            let mut parents = Vec::new();
            let first = usize::from(byte & 0x0f);
            let merge = usize::from(byte >> 4);
            // Zero offset means root; offsets past the end leave dangling parents
            if first > 0 {
                parents.push(id(pos + first));
            }
            if merge > 0 && merge != first {
                parents.push(id(pos + merge));
            }
            CommitRecord::new(
                CommitEntry {
                    id: id(pos),
                    parent_ids: parents,
                    author: String::new(),
                    timestamp: Utc::now(),
                    description: String::new(),
                },
                CommitDiff::new(format!("{}", byte % 4)),
            )
        })
        .collect()
}

fuzz_target!(|data: &[u8]| {
    let commits = build(data);
    let count = commits.len();
    let mut session = GraphSession::new();

    match session.load_commits(commits) {
        Ok(_) => {
            let snapshot = session.snapshot();
            let cells: HashSet<_> = snapshot.layout().iter().map(|(_, c)| c).collect();
            assert_eq!(cells.len(), snapshot.layout().len());
            assert_eq!(snapshot.layout().len(), count);
        }
        Err(GraphError::MalformedGraph { .. }) => {}
        Err(other) => panic!("unexpected error: {other}"),
    }

    // Reloading the reversed list must never panic
    let mut reversed = build(data);
    reversed.reverse();
    let _ = session.load_commits(reversed);
});
