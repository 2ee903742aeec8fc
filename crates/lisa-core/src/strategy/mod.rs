//! Per-file strategies
//!
//! Each strategy splits its work in two: [`Strategy::plan`] inspects the
//! authoritative and destination files and decides what should happen, and
//! [`StrategyContext::commit`] carries that decision out. Dry runs stop after
//! planning.

mod copy_contents;
mod copy_overwrite;
mod create_only;
mod merge;
mod package_lisa;
mod registry;
mod tagged_merge;

#[cfg(test)]
pub(crate) mod testing;

pub use copy_contents::CopyContents;
pub use copy_overwrite::CopyOverwrite;
pub use create_only::CreateOnly;
pub use merge::Merge;
pub use package_lisa::{PackageLisa, TEMPLATE_SUFFIX};
pub use registry::StrategyRegistry;
pub use tagged_merge::TaggedMerge;

use std::path::PathBuf;

use lisa_fs::NormalizedPath;
use lisa_merge::Object;

use crate::context::StrategyContext;
use crate::kind::StrategyKind;
use crate::report::{Action, FileOperationResult};
use crate::{Error, Result};

/// One authoritative file paired with its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileJob {
    /// Absolute path of the authoritative file.
    pub source: PathBuf,
    /// Absolute path of the destination file.
    pub dest: PathBuf,
    /// Destination-relative path, as recorded in the manifest.
    pub relative: NormalizedPath,
    /// Path of the authoritative file inside its strategy directory.
    pub origin: NormalizedPath,
}

/// Side effect a plan asks the context to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Nothing,
    /// Copy the authoritative file over the destination.
    CopySource,
    /// Write these bytes to the destination.
    Write(String),
    /// Replace a differing destination with the authoritative file, if the
    /// prompt allows it.
    ConfirmOverwrite,
}

/// A strategy's decision for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub action: Action,
    pub lines_added: Option<usize>,
    pub effect: Effect,
    /// Whether the file is recorded in the manifest once committed.
    pub record: bool,
}

impl Plan {
    /// Leave the destination alone.
    pub fn skip(record: bool) -> Self {
        Self {
            action: Action::Skipped,
            lines_added: None,
            effect: Effect::Nothing,
            record,
        }
    }

    /// Copy the authoritative file into place.
    pub fn copy(action: Action) -> Self {
        Self {
            action,
            lines_added: None,
            effect: Effect::CopySource,
            record: true,
        }
    }

    /// Write computed contents.
    pub fn write(action: Action, contents: String) -> Self {
        Self {
            action,
            lines_added: None,
            effect: Effect::Write(contents),
            record: true,
        }
    }

    /// Overwrite after confirmation.
    pub fn confirm_overwrite() -> Self {
        Self {
            action: Action::Overwritten,
            lines_added: None,
            effect: Effect::ConfirmOverwrite,
            record: true,
        }
    }

    pub fn with_lines_added(mut self, lines: usize) -> Self {
        self.lines_added = Some(lines);
        self
    }
}

/// A per-file reconciliation policy.
///
/// Strategies are stateless; per-run state lives in the context.
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Destination-relative path for a file found at `relative` inside the
    /// strategy's source directory.
    fn target_path(&self, relative: &NormalizedPath) -> NormalizedPath {
        relative.clone()
    }

    /// Decide what to do with `job`. Must not modify the destination.
    fn plan(&self, job: &FileJob, ctx: &StrategyContext<'_>) -> Result<Plan>;

    /// Plan and commit in one step.
    fn apply(&self, job: &FileJob, ctx: &mut StrategyContext<'_>) -> Result<FileOperationResult> {
        let plan = self.plan(job, ctx)?;
        ctx.commit(self.kind(), job, plan)
    }
}

/// Read and parse a JSON object, mapping failures to a merge error for `job`.
fn read_object(path: &std::path::Path, job: &FileJob, side: &str) -> Result<Object> {
    let text = lisa_fs::read_text(path)?;
    lisa_merge::parse_object(&text, &path.display().to_string())
        .map_err(|e| Error::merge(job.relative.as_str(), format!("{side}: {e}")))
}

/// Plan for a merged document: skip when canonical forms match, else write.
fn merged_plan(before: &Object, after: &Object) -> Plan {
    if lisa_merge::render(before) == lisa_merge::render(after) {
        Plan::skip(true)
    } else {
        Plan::write(Action::Merged, lisa_merge::render_file(after))
    }
}
