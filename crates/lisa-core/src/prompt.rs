//! User interaction seam

use lisa_fs::NormalizedPath;
use tracing::info;

use crate::Result;

/// Answer to an overwrite question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteDecision {
    Yes,
    No,
    /// Show the differences, then ask again.
    Diff,
}

/// Interactive questions asked during a run.
///
/// The engine answers overwrite and project-type questions itself in yes
/// mode; the dirty-git confirmation is always delegated.
pub trait Prompter {
    /// Ask whether a differing destination file may be overwritten.
    fn prompt_overwrite(&self, relative: &NormalizedPath) -> Result<OverwriteDecision>;

    /// Display a rendered unified diff for `relative`.
    fn show_diff(&self, relative: &NormalizedPath, diff: &str) -> Result<()>;

    /// Confirm or edit the detected project types.
    fn confirm_project_types(&self, detected: &[String]) -> Result<Vec<String>>;

    /// Ask whether to continue despite uncommitted changes.
    fn confirm_dirty_git(&self, status: &[String]) -> Result<bool>;
}

/// Non-interactive prompter: accepts every overwrite and detected type.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoAcceptPrompter {
    allow_dirty_git: bool,
}

impl AutoAcceptPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue even when the destination has uncommitted changes.
    pub fn allow_dirty_git(mut self, allow: bool) -> Self {
        self.allow_dirty_git = allow;
        self
    }
}

impl Prompter for AutoAcceptPrompter {
    fn prompt_overwrite(&self, relative: &NormalizedPath) -> Result<OverwriteDecision> {
        info!(path = %relative, "Auto-accepting overwrite");
        Ok(OverwriteDecision::Yes)
    }

    fn show_diff(&self, _relative: &NormalizedPath, _diff: &str) -> Result<()> {
        Ok(())
    }

    fn confirm_project_types(&self, detected: &[String]) -> Result<Vec<String>> {
        Ok(detected.to_vec())
    }

    fn confirm_dirty_git(&self, _status: &[String]) -> Result<bool> {
        Ok(self.allow_dirty_git)
    }
}
