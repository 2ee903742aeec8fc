//! Per-file results, counters and run reports

use std::fmt;

use lisa_fs::NormalizedPath;

use crate::kind::StrategyKind;

/// What a strategy did (or, in a dry run, would do) to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Copied,
    Created,
    Skipped,
    Overwritten,
    Appended,
    Merged,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Copied => "copied",
            Self::Created => "created",
            Self::Skipped => "skipped",
            Self::Overwritten => "overwritten",
            Self::Appended => "appended",
            Self::Merged => "merged",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of applying one authoritative file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOperationResult {
    /// Destination-relative path.
    pub relative_path: NormalizedPath,
    pub strategy: StrategyKind,
    pub action: Action,
    /// Lines appended, for `copy-contents` only.
    pub lines_added: Option<usize>,
}

/// Aggregate counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationCounters {
    /// Files copied or created.
    pub copied: usize,
    pub skipped: usize,
    pub overwritten: usize,
    pub appended: usize,
    pub merged: usize,
    pub deleted: usize,
    pub ignored: usize,
}

impl OperationCounters {
    pub fn record(&mut self, action: Action) {
        match action {
            Action::Copied | Action::Created => self.copied += 1,
            Action::Skipped => self.skipped += 1,
            Action::Overwritten => self.overwritten += 1,
            Action::Appended => self.appended += 1,
            Action::Merged => self.merged += 1,
        }
    }
}

/// Which operation produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Apply,
    DryRun,
    Validate,
    Uninstall,
}

/// Summary of an uninstall pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallStats {
    /// Files removed (or that would be removed in a dry run).
    pub removed: Vec<NormalizedPath>,
    /// Files left in place for manual review, or already absent.
    pub skipped: Vec<NormalizedPath>,
}

/// Report from an apply, validate or uninstall run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Whether the run completed without error
    pub success: bool,
    pub mode: RunMode,
    pub counters: OperationCounters,
    /// Project types the run was applied for (after confirmation).
    pub detected_types: Vec<String>,
    /// Per-file results in processing order.
    pub results: Vec<FileOperationResult>,
    /// Paths removed by deletion lists.
    pub deleted: Vec<NormalizedPath>,
    /// Uninstall outcome, for uninstall runs.
    pub uninstall: Option<UninstallStats>,
    /// Non-fatal problems worth surfacing to the user.
    pub warnings: Vec<String>,
    /// Errors encountered during the run
    pub errors: Vec<String>,
}

impl RunReport {
    pub fn new(mode: RunMode) -> Self {
        Self {
            success: true,
            mode,
            counters: OperationCounters::default(),
            detected_types: Vec::new(),
            results: Vec::new(),
            deleted: Vec::new(),
            uninstall: None,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Add a file result and count it.
    pub fn push_result(&mut self, result: FileOperationResult) {
        self.counters.record(result.action);
        self.results.push(result);
    }

    /// Mark the run failed with the given errors.
    pub fn fail(&mut self, errors: impl IntoIterator<Item = String>) {
        self.success = false;
        self.errors.extend(errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(action: Action) -> FileOperationResult {
        FileOperationResult {
            relative_path: NormalizedPath::new("a.txt"),
            strategy: StrategyKind::CopyOverwrite,
            action,
            lines_added: None,
        }
    }

    #[test]
    fn test_created_counts_as_copied() {
        let mut report = RunReport::new(RunMode::Apply);
        report.push_result(result(Action::Created));
        report.push_result(result(Action::Copied));
        report.push_result(result(Action::Skipped));
        assert_eq!(report.counters.copied, 2);
        assert_eq!(report.counters.skipped, 1);
        assert_eq!(report.results.len(), 3);
    }

    #[test]
    fn test_fail_keeps_counters() {
        let mut report = RunReport::new(RunMode::Apply);
        report.push_result(result(Action::Merged));
        report.fail(["boom".to_string()]);
        assert!(!report.success);
        assert_eq!(report.counters.merged, 1);
        assert_eq!(report.errors, vec!["boom"]);
    }
}
