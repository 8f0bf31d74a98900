// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Repository access through `git2`
//!
//! [`GitRepo`] reads everything a [`GraphSession`](lanegraph::GraphSession)
//! needs: the commits reachable from any reference (and optionally the HEAD
//! reflog) in children-first order, the patch each commit introduces, and
//! the reference list used to label commits.

use std::path::Path;

use chrono::{DateTime, Utc};
use git2::build::CheckoutBuilder;
use git2::{DiffFormat, DiffOptions, ErrorCode, Oid, Repository, Revwalk, Sort};
use lanegraph::{CommitEntry, CommitId, HistorySource, Reference};
use tracing::{debug, info, warn};

use crate::error::GitError;

/// Which commits a history walk collects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryOptions {
    /// Maximum number of commits to retrieve
    pub limit: Option<usize>,
    /// Also start from every commit recorded in the HEAD reflog, so that
    /// rebased or reset-away commits stay visible
    pub include_reflog: bool,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            limit: None,
            include_reflog: true,
        }
    }
}

impl HistoryOptions {
    /// Create options for walking the N most recent commits
    #[must_use]
    pub fn latest(n: usize) -> Self {
        Self {
            limit: Some(n),
            ..Default::default()
        }
    }

    /// Only walk from references and HEAD
    #[must_use]
    pub fn without_reflog(mut self) -> Self {
        self.include_reflog = false;
        self
    }
}

/// A git repository wrapper acting as a history source
pub struct GitRepo {
    repo: Repository,
    history_options: HistoryOptions,
}

impl GitRepo {
    /// Open a git repository at the given path
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if the path is not a git repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self::from_repository(repo))
    }

    /// Discover and open a git repository containing the given path
    ///
    /// This walks up the directory tree to find a `.git` directory.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if no repository is found.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self::from_repository(repo))
    }

    fn from_repository(repo: Repository) -> Self {
        Self {
            repo,
            history_options: HistoryOptions::default(),
        }
    }

    /// Set the options used when this repository serves as a [`HistorySource`]
    #[must_use]
    pub fn with_history_options(mut self, options: HistoryOptions) -> Self {
        self.history_options = options;
        self
    }

    /// Options used when this repository serves as a [`HistorySource`]
    #[must_use]
    pub fn history_options(&self) -> &HistoryOptions {
        &self.history_options
    }

    /// Get the repository path
    #[must_use]
    pub fn path(&self) -> &Path {
        self.repo.path()
    }

    /// Get the working directory path (None for bare repos)
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Collect commits, every child listed before its parents
    ///
    /// The walk starts from every reference that resolves to a commit, from
    /// HEAD, and (if requested) from each commit in the HEAD reflog. A
    /// repository with no commits yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the repository cannot be walked.
    pub fn walk_history(&self, options: &HistoryOptions) -> Result<Vec<CommitEntry>, GitError> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        let mut starts = self.push_references(&mut revwalk)?;
        starts += self.push_head(&mut revwalk)?;
        if options.include_reflog {
            starts += self.push_reflog(&mut revwalk)?;
        }
        if starts == 0 {
            debug!("no commits to walk");
            return Ok(Vec::new());
        }

        let limit = options.limit.unwrap_or(usize::MAX);
        let mut entries = Vec::new();
        for oid in revwalk.take(limit) {
            let git_commit = self.repo.find_commit(oid?)?;
            entries.push(entry_from_commit(&git_commit));
        }

        debug!(
            starts,
            commits = entries.len(),
            reflog = options.include_reflog,
            "history walked"
        );
        Ok(entries)
    }

    fn push_references(&self, revwalk: &mut Revwalk<'_>) -> Result<usize, GitError> {
        let mut pushed = 0;
        for reference in self.repo.references()? {
            let reference = reference?;
            // Tags on trees or blobs have no history to walk
            if let Ok(commit) = reference.peel_to_commit() {
                revwalk.push(commit.id())?;
                pushed += 1;
            }
        }
        Ok(pushed)
    }

    fn push_head(&self, revwalk: &mut Revwalk<'_>) -> Result<usize, GitError> {
        match self.repo.head() {
            Ok(head) => {
                let commit = head.peel_to_commit()?;
                revwalk.push(commit.id())?;
                Ok(1)
            }
            Err(err) if is_unborn(&err) => Ok(0),
            Err(err) => Err(err.into()),
        }
    }

    fn push_reflog(&self, revwalk: &mut Revwalk<'_>) -> Result<usize, GitError> {
        let reflog = self.repo.reflog("HEAD")?;
        let mut pushed = 0;
        for entry in reflog.iter() {
            let oid = entry.id_new();
            if oid.is_zero() {
                continue;
            }
            if self.repo.find_commit(oid).is_err() {
                warn!(commit = %oid, "skipping reflog entry for missing commit");
                continue;
            }
            revwalk.push(oid)?;
            pushed += 1;
        }
        Ok(pushed)
    }

    /// Patch introduced by a commit, relative to its first parent
    ///
    /// The patch carries no context lines. Root commits are diffed against
    /// the empty tree. The `index` header line is omitted, so the same change
    /// applied on different bases produces the same text.
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if `id` does not name a commit.
    pub fn patch_text(&self, id: &CommitId) -> Result<String, GitError> {
        // Oid::from_str zero-pads abbreviated ids instead of resolving them
        if !CommitId::is_valid_sha(id.as_str()) {
            return Err(GitError::InvalidReference {
                reference: id.to_string(),
            });
        }
        let git_commit = Oid::from_str(id.as_str())
            .and_then(|oid| self.repo.find_commit(oid))
            .map_err(|_| GitError::InvalidReference {
                reference: id.to_string(),
            })?;
        let tree = git_commit.tree()?;

        // Get parent tree (or empty for root commits)
        let parent_tree = if git_commit.parent_count() > 0 {
            Some(git_commit.parent(0)?.tree()?)
        } else {
            None
        };

        let mut opts = DiffOptions::new();
        opts.context_lines(0);

        let diff =
            self.repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;

        let mut patch = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            let content = String::from_utf8_lossy(line.content());
            match line.origin() {
                origin @ ('+' | '-' | ' ') => {
                    patch.push(origin);
                    patch.push_str(&content);
                }
                'F' => content
                    .split_inclusive('\n')
                    .filter(|header| !header.starts_with("index "))
                    .for_each(|header| patch.push_str(header)),
                _ => patch.push_str(&content),
            }
            true
        })?;

        Ok(patch)
    }

    /// Every reference that resolves to a commit, sorted by full name
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the reference database cannot be read.
    pub fn references(&self) -> Result<Vec<Reference>, GitError> {
        let mut references = Vec::new();
        for reference in self.repo.references()? {
            let reference = reference?;
            let Some(name) = reference.name() else {
                debug!("skipping reference with a non-UTF-8 name");
                continue;
            };
            match reference.peel_to_commit() {
                Ok(commit) => references.push(Reference::new(
                    name,
                    CommitId::from(commit.id().to_string()),
                )),
                Err(_) => debug!(reference = name, "reference does not point at a commit"),
            }
        }
        references.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(references)
    }

    /// Name of the checked-out branch
    ///
    /// Returns the short commit id when HEAD is detached and `None` when the
    /// current branch has no commits yet.
    ///
    /// # Errors
    ///
    /// Returns `GitError` if HEAD cannot be read.
    pub fn current_branch(&self) -> Result<Option<String>, GitError> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(err) if is_unborn(&err) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        if head.is_branch() {
            return Ok(head.shorthand().map(str::to_string));
        }
        let id = CommitId::from(head.peel_to_commit()?.id().to_string());
        Ok(Some(id.short().to_string()))
    }

    /// Get the HEAD commit id
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if HEAD does not resolve to a commit.
    pub fn head_id(&self) -> Result<CommitId, GitError> {
        let commit = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|_| GitError::InvalidReference {
                reference: "HEAD".to_string(),
            })?;
        Ok(CommitId::from(commit.id().to_string()))
    }

    /// Check out a branch, tag or commit
    ///
    /// Local branches become the current branch; anything else detaches
    /// HEAD. Uncommitted changes that would be overwritten abort the
    /// checkout.
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if `reference` does not resolve
    /// to a commit, or `GitError::Git2` if the working tree conflicts.
    pub fn checkout(&self, reference: &str) -> Result<(), GitError> {
        let invalid = || GitError::InvalidReference {
            reference: reference.to_string(),
        };
        let (object, resolved) = self.repo.revparse_ext(reference).map_err(|_| invalid())?;
        let commit = object.peel_to_commit().map_err(|_| invalid())?;

        let mut builder = CheckoutBuilder::new();
        builder.safe();
        self.repo
            .checkout_tree(commit.as_object(), Some(&mut builder))?;

        let branch = resolved
            .filter(git2::Reference::is_branch)
            .and_then(|r| r.name().map(str::to_string));
        match branch {
            Some(name) => self.repo.set_head(&name)?,
            None => self.repo.set_head_detached(commit.id())?,
        }

        info!(reference, commit = %commit.id(), "checked out");
        Ok(())
    }
}

impl HistorySource for GitRepo {
    type Error = GitError;

    fn commit_entries(&self) -> Result<Vec<CommitEntry>, GitError> {
        self.walk_history(&self.history_options)
    }

    fn patch_text(&self, id: &CommitId) -> Result<String, GitError> {
        GitRepo::patch_text(self, id)
    }
}

fn is_unborn(err: &git2::Error) -> bool {
    matches!(err.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound)
}

/// Extract commit metadata from a git2 commit
fn entry_from_commit(git_commit: &git2::Commit<'_>) -> CommitEntry {
    let timestamp =
        DateTime::from_timestamp(git_commit.time().seconds(), 0).unwrap_or_else(Utc::now);

    CommitEntry {
        id: CommitId::from(git_commit.id().to_string()),
        parent_ids: git_commit
            .parent_ids()
            .map(|id| CommitId::from(id.to_string()))
            .collect(),
        author: git_commit.author().name().unwrap_or("Unknown").to_string(),
        timestamp,
        description: git_commit.message().unwrap_or("").trim_end().to_string(),
    }
}
