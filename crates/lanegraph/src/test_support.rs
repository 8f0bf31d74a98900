//! Record builders shared by the unit tests

use chrono::{TimeZone, Utc};

use crate::commit::{CommitEntry, CommitId, CommitRecord};
use crate::diff::CommitDiff;

/// Build a record with the given parents and a patch unique to its id
pub(crate) fn record(id: &str, parents: &[&str]) -> CommitRecord {
    record_with_patch(id, parents, &format!("+{id}\n"))
}

/// Build a record with an explicit patch text
pub(crate) fn record_with_patch(id: &str, parents: &[&str], patch: &str) -> CommitRecord {
    CommitRecord::new(
        CommitEntry {
            id: CommitId::from(id),
            parent_ids: parents.iter().map(|p| CommitId::from(*p)).collect(),
            author: "Test Author".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 1, 17, 12, 0, 0).unwrap(),
            description: format!("commit {id}"),
        },
        CommitDiff::new(patch),
    )
}
