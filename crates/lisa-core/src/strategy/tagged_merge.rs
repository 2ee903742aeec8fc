//! Section-governed JSON merge

use super::{FileJob, Plan, Strategy, merged_plan, read_object};
use crate::Result;
use crate::context::StrategyContext;
use crate::kind::StrategyKind;
use crate::report::Action;

/// Applies the `//lisa-<behavior>-<category>` sections of the authoritative
/// document and passes everything else in the destination through.
#[derive(Debug, Default, Clone, Copy)]
pub struct TaggedMerge;

impl Strategy for TaggedMerge {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TaggedMerge
    }

    fn plan(&self, job: &FileJob, _ctx: &StrategyContext<'_>) -> Result<Plan> {
        let source = read_object(&job.source, job, "source")?;

        // Written in merged order so the next run is a fixed point.
        if !job.dest.exists() {
            let seeded = lisa_merge::merge_tagged(&source, &source);
            return Ok(Plan::write(Action::Copied, lisa_merge::render_file(&seeded)));
        }

        let dest = read_object(&job.dest, job, "destination")?;
        let merged = lisa_merge::merge_tagged(&source, &dest);

        Ok(merged_plan(&dest, &merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::strategy::testing::Harness;
    use serde_json::{Value, json};

    const SOURCE: &str = r#"{
  "//lisa-force-scripts": "Governed by Lisa",
  "scripts": {"test": "a"},
  "//end-lisa-force-scripts": ""
}"#;

    #[test]
    fn test_force_section_applied_and_extras_kept() {
        let mut h = Harness::new();
        let job = h.job(&TaggedMerge, "package.json", SOURCE);
        h.write_dest(
            "package.json",
            r#"{"scripts": {"test": "b", "custom": "c"}, "extra": "e"}"#,
        );

        let result = h.run(&TaggedMerge, &job).unwrap();

        assert_eq!(result.action, Action::Merged);
        let written: Value = serde_json::from_str(&h.read_dest("package.json")).unwrap();
        assert_eq!(written["scripts"], json!({"test": "a"}));
        assert_eq!(written["extra"], json!("e"));
    }

    #[test]
    fn test_second_run_is_skipped() {
        let mut h = Harness::new();
        let job = h.job(&TaggedMerge, "package.json", SOURCE);
        h.write_dest("package.json", r#"{"name": "app"}"#);

        h.run(&TaggedMerge, &job).unwrap();
        let after_first = h.read_dest("package.json");
        let second = h.run(&TaggedMerge, &job).unwrap();

        assert_eq!(second.action, Action::Skipped);
        assert_eq!(h.read_dest("package.json"), after_first);
        assert_eq!(h.backups.0.len(), 1);
    }

    #[test]
    fn test_created_file_is_stable_on_next_run() {
        let mut h = Harness::new();
        let source = r#"{
  "name": "governed",
  "//lisa-force-scripts": "",
  "scripts": {"build": "tsc"},
  "//end-lisa-force-scripts": ""
}"#;
        let job = h.job(&TaggedMerge, "package.json", source);

        let first = h.run(&TaggedMerge, &job).unwrap();
        let after_first = h.read_dest("package.json");
        let second = h.run(&TaggedMerge, &job).unwrap();

        assert_eq!(first.action, Action::Copied);
        assert_eq!(second.action, Action::Skipped);
        assert_eq!(h.read_dest("package.json"), after_first);
    }

    #[test]
    fn test_unparseable_source_is_merge_error() {
        let mut h = Harness::new();
        let job = h.job(&TaggedMerge, "package.json", "not json");
        h.write_dest("package.json", "{}");

        let err = h.run(&TaggedMerge, &job).unwrap_err();

        assert!(matches!(err, Error::MergeError { .. }));
    }
}
