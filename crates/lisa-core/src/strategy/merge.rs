//! Deep JSON merge where the project wins

use super::{FileJob, Plan, Strategy, merged_plan, read_object};
use crate::Result;
use crate::context::StrategyContext;
use crate::kind::StrategyKind;
use crate::report::Action;

/// Fills keys the destination lacks from the authoritative document.
///
/// Destination values win on every conflict; nested objects are merged
/// recursively, other values are never combined.
#[derive(Debug, Default, Clone, Copy)]
pub struct Merge;

impl Strategy for Merge {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Merge
    }

    fn plan(&self, job: &FileJob, _ctx: &StrategyContext<'_>) -> Result<Plan> {
        if !job.dest.exists() {
            return Ok(Plan::copy(Action::Copied));
        }

        let source = read_object(&job.source, job, "source")?;
        let dest = read_object(&job.dest, job, "destination")?;
        let merged = lisa_merge::fill_defaults(&dest, &source);

        Ok(merged_plan(&dest, &merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::strategy::testing::Harness;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_destination_values_win() {
        let mut h = Harness::new();
        let job = h.job(
            &Merge,
            ".claude/settings.json",
            r#"{"model": "default", "permissions": {"allow": ["Read"], "deny": []}}"#,
        );
        h.write_dest(".claude/settings.json", r#"{"permissions": {"allow": ["Bash"]}}"#);

        let result = h.run(&Merge, &job).unwrap();

        assert_eq!(result.action, Action::Merged);
        assert_eq!(
            h.read_dest(".claude/settings.json"),
            "{\n  \"permissions\": {\n    \"allow\": [\n      \"Bash\"\n    ],\n    \"deny\": []\n  },\n  \"model\": \"default\"\n}\n"
        );
    }

    #[test]
    fn test_already_merged_is_skipped() {
        let mut h = Harness::new();
        let job = h.job(&Merge, "a.json", r#"{"a": 1}"#);
        h.write_dest("a.json", r#"{"a": 2, "b": 3}"#);

        let result = h.run(&Merge, &job).unwrap();

        assert_eq!(result.action, Action::Skipped);
        assert_eq!(h.read_dest("a.json"), r#"{"a": 2, "b": 3}"#);
        assert_eq!(h.recorded.0.len(), 1);
    }

    #[test]
    fn test_missing_destination_is_copied_verbatim() {
        let mut h = Harness::new();
        let job = h.job(&Merge, "a.json", "{\"a\":1}");

        let result = h.run(&Merge, &job).unwrap();

        assert_eq!(result.action, Action::Copied);
        assert_eq!(h.read_dest("a.json"), "{\"a\":1}");
    }

    #[test]
    fn test_unparseable_destination_is_merge_error() {
        let mut h = Harness::new();
        let job = h.job(&Merge, "a.json", r#"{"a": 1}"#);
        h.write_dest("a.json", "{ broken");

        let err = h.run(&Merge, &job).unwrap_err();

        assert!(matches!(err, Error::MergeError { ref path, .. } if path == "a.json"));
        assert_eq!(h.read_dest("a.json"), "{ broken");
    }
}
