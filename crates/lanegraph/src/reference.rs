//! Named references (branches, tags, remotes, stash) pointing at commits
//!
//! References never take part in layout; the presentation layer uses them to
//! label commits.

use serde::{Deserialize, Serialize};

use crate::commit::CommitId;

/// What kind of reference a full ref path names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// `refs/heads/*`
    Head,
    /// `refs/remotes/*`
    Remote,
    /// `refs/tags/*`
    Tag,
    /// `refs/stash`
    Stash,
    /// Anything else
    Other,
}

/// A reference and the commit it targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Full path, e.g. `refs/remotes/origin/main`
    pub full_name: String,
    /// Last path component, e.g. `main`
    pub short_name: String,
    /// Target commit
    pub target: CommitId,
    /// Reference kind derived from the path
    pub kind: ReferenceKind,
    /// Remote name for `refs/remotes/<remote>/<name>`
    pub remote: Option<String>,
}

impl Reference {
    /// Classify a full reference path
    #[must_use]
    pub fn new(full_name: impl Into<String>, target: CommitId) -> Self {
        let full_name = full_name.into();
        let parts: Vec<&str> = full_name.split('/').collect();
        let short_name = parts.last().copied().unwrap_or_default().to_string();

        let mut remote = None;
        let kind = match parts.get(1).copied() {
            Some("heads") => ReferenceKind::Head,
            Some("remotes") => {
                // Only the plain refs/remotes/<remote>/<name> shape names its remote
                if parts.len() == 4 {
                    remote = Some(parts[2].to_string());
                }
                ReferenceKind::Remote
            }
            Some("tags") => ReferenceKind::Tag,
            Some("stash") => ReferenceKind::Stash,
            _ => ReferenceKind::Other,
        };

        Self {
            full_name,
            short_name,
            target,
            kind,
            remote,
        }
    }

    /// Whether this is a local branch
    #[must_use]
    pub fn is_branch(&self) -> bool {
        self.kind == ReferenceKind::Head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn target() -> CommitId {
        CommitId::from("a".repeat(40))
    }

    #[test]
    fn test_local_branch() {
        let r = Reference::new("refs/heads/main", target());
        assert_eq!(r.kind, ReferenceKind::Head);
        assert_eq!(r.short_name, "main");
        assert!(r.remote.is_none());
        assert!(r.is_branch());
    }

    #[test]
    fn test_nested_branch_keeps_last_component() {
        let r = Reference::new("refs/heads/feature/lanes", target());
        assert_eq!(r.kind, ReferenceKind::Head);
        assert_eq!(r.short_name, "lanes");
    }

    #[test]
    fn test_remote_branch() {
        let r = Reference::new("refs/remotes/origin/HEAD", target());
        assert_eq!(r.kind, ReferenceKind::Remote);
        assert_eq!(r.short_name, "HEAD");
        assert_eq!(r.remote.as_deref(), Some("origin"));
    }

    #[test]
    fn test_nested_remote_branch_has_no_remote_name() {
        let r = Reference::new("refs/remotes/origin/feature/x", target());
        assert_eq!(r.kind, ReferenceKind::Remote);
        assert!(r.remote.is_none());
    }

    #[test]
    fn test_tag_and_stash() {
        assert_eq!(
            Reference::new("refs/tags/v1.0", target()).kind,
            ReferenceKind::Tag
        );
        assert_eq!(
            Reference::new("refs/stash", target()).kind,
            ReferenceKind::Stash
        );
    }

    #[test]
    fn test_other() {
        let r = Reference::new("HEAD", target());
        assert_eq!(r.kind, ReferenceKind::Other);
        assert_eq!(r.short_name, "HEAD");
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ReferenceKind::Remote).expect("serialize");
        assert_eq!(json, "\"remote\"");
    }
}
