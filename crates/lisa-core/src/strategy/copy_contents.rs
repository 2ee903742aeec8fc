//! Line-union merge for append-style files

use std::collections::HashSet;

use super::{FileJob, Plan, Strategy};
use crate::Result;
use crate::context::StrategyContext;
use crate::kind::StrategyKind;
use crate::report::Action;

/// Appends authoritative lines the destination lacks; never removes a line.
///
/// Lines compare after trimming trailing whitespace; blank lines are ignored
/// on both sides.
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyContents;

impl Strategy for CopyContents {
    fn kind(&self) -> StrategyKind {
        StrategyKind::CopyContents
    }

    fn plan(&self, job: &FileJob, _ctx: &StrategyContext<'_>) -> Result<Plan> {
        if !job.dest.exists() {
            return Ok(Plan::copy(Action::Copied));
        }

        let incoming = lisa_fs::read_text(&job.source)?;
        let existing = lisa_fs::read_text(&job.dest)?;

        Ok(match append_missing_lines(&existing, &incoming) {
            Some((contents, added)) => {
                Plan::write(Action::Appended, contents).with_lines_added(added)
            }
            None => Plan::skip(true),
        })
    }
}

/// Append every line of `incoming` missing from `existing`.
///
/// Returns the new contents and the number of lines added, or `None` when
/// nothing is missing.
pub(crate) fn append_missing_lines(existing: &str, incoming: &str) -> Option<(String, usize)> {
    let mut seen: HashSet<&str> = existing
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();

    let missing: Vec<&str> = incoming
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty() && seen.insert(*line))
        .collect();

    if missing.is_empty() {
        return None;
    }

    let mut contents = existing.to_string();
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    for line in &missing {
        contents.push_str(line);
        contents.push('\n');
    }

    Some((contents, missing.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::testing::Harness;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_appends_only_missing_lines() {
        let (contents, added) = append_missing_lines("x\n", "x\ny\n").unwrap();
        assert_eq!(contents, "x\ny\n");
        assert_eq!(added, 1);
    }

    #[test]
    fn test_adds_terminator_before_appending() {
        let (contents, _) = append_missing_lines("node_modules", "dist\n").unwrap();
        assert_eq!(contents, "node_modules\ndist\n");
    }

    #[test]
    fn test_trailing_whitespace_and_blank_lines_ignored() {
        assert!(append_missing_lines("dist   \n\n", "\ndist\n\n").is_none());
    }

    #[test]
    fn test_duplicate_source_lines_appended_once() {
        let (contents, added) = append_missing_lines("", "a\na\nb\n").unwrap();
        assert_eq!(contents, "a\nb\n");
        assert_eq!(added, 2);
    }

    #[test]
    fn test_strategy_appends_and_records() {
        let mut h = Harness::new();
        let job = h.job(&CopyContents, ".gitignore", "node_modules\n.env\n");
        h.write_dest(".gitignore", "node_modules\ncoverage\n");

        let result = h.run(&CopyContents, &job).unwrap();

        assert_eq!(result.action, Action::Appended);
        assert_eq!(result.lines_added, Some(1));
        assert_eq!(h.read_dest(".gitignore"), "node_modules\ncoverage\n.env\n");
        assert_eq!(h.backups.0.len(), 1);
        assert_eq!(h.recorded.0.len(), 1);
    }

    #[test]
    fn test_second_run_is_skipped() {
        let mut h = Harness::new();
        let job = h.job(&CopyContents, ".gitignore", "node_modules\n.env\n");
        h.write_dest(".gitignore", "coverage\n");

        h.run(&CopyContents, &job).unwrap();
        let second = h.run(&CopyContents, &job).unwrap();

        assert_eq!(second.action, Action::Skipped);
        assert_eq!(h.read_dest(".gitignore"), "coverage\nnode_modules\n.env\n");
    }

    #[test]
    fn test_dry_run_plans_append_without_writing() {
        let mut h = Harness::new().dry_run();
        let job = h.job(&CopyContents, ".gitignore", "x\ny\n");
        h.write_dest(".gitignore", "x\n");

        let result = h.run(&CopyContents, &job).unwrap();

        assert_eq!(result.action, Action::Appended);
        assert_eq!(result.lines_added, Some(1));
        assert_eq!(h.read_dest(".gitignore"), "x\n");
    }
}
