//! Authoritative file replaces the destination

use tracing::debug;

use super::{FileJob, Plan, Strategy};
use crate::Result;
use crate::context::StrategyContext;
use crate::kind::StrategyKind;
use crate::report::Action;

/// Keeps the destination byte-identical to the authoritative file.
///
/// A differing destination is only replaced after the overwrite prompt
/// agrees; a declined prompt leaves the file unmanaged.
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyOverwrite;

impl Strategy for CopyOverwrite {
    fn kind(&self) -> StrategyKind {
        StrategyKind::CopyOverwrite
    }

    fn plan(&self, job: &FileJob, _ctx: &StrategyContext<'_>) -> Result<Plan> {
        if !job.dest.exists() {
            return Ok(Plan::copy(Action::Copied));
        }

        if lisa_fs::files_identical(&job.source, &job.dest) {
            return Ok(Plan::skip(true));
        }

        debug!(path = %job.relative, "Destination differs from authoritative copy");
        Ok(Plan::confirm_overwrite())
    }
}
