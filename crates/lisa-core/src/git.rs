//! Working-tree inspection of the destination

use std::path::Path;

use git2::{Repository, Status, StatusOptions};

use crate::Result;

/// Answers whether the destination has uncommitted work.
pub trait GitInspector {
    /// Whether `dir` is the root of a git working tree.
    fn is_repository(&self, dir: &Path) -> bool;

    /// Short status lines (`XY path`) for uncommitted changes; empty when clean.
    fn status_lines(&self, dir: &Path) -> Result<Vec<String>>;
}

/// [`GitInspector`] backed by libgit2.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibGit;

impl GitInspector for LibGit {
    fn is_repository(&self, dir: &Path) -> bool {
        dir.join(".git").exists() && Repository::open(dir).is_ok()
    }

    fn status_lines(&self, dir: &Path) -> Result<Vec<String>> {
        let repo = Repository::open(dir)?;
        let mut options = StatusOptions::new();
        options.include_untracked(true).recurse_untracked_dirs(false);

        let statuses = repo.statuses(Some(&mut options))?;
        Ok(statuses
            .iter()
            .filter(|entry| !entry.status().is_ignored())
            .map(|entry| {
                format!(
                    "{} {}",
                    short_code(entry.status()),
                    entry.path().unwrap_or("<non-utf8 path>")
                )
            })
            .collect())
    }
}

/// Inspector for destinations that should never be checked.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGit;

impl GitInspector for NoGit {
    fn is_repository(&self, _dir: &Path) -> bool {
        false
    }

    fn status_lines(&self, _dir: &Path) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Two-letter code in the style of `git status --short`.
fn short_code(status: Status) -> String {
    if status.is_wt_new() && !status.is_index_new() {
        return "??".to_string();
    }

    let index = if status.is_index_new() {
        'A'
    } else if status.is_index_modified() {
        'M'
    } else if status.is_index_deleted() {
        'D'
    } else if status.is_index_renamed() {
        'R'
    } else {
        ' '
    };
    let worktree = if status.is_wt_modified() {
        'M'
    } else if status.is_wt_deleted() {
        'D'
    } else if status.is_wt_renamed() {
        'R'
    } else {
        ' '
    };
    format!("{index}{worktree}")
}
