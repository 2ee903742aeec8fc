//! Seed a file once, never touch it again

use super::{FileJob, Plan, Strategy};
use crate::Result;
use crate::context::StrategyContext;
use crate::kind::StrategyKind;
use crate::report::Action;

/// Creates the destination when missing. An existing file belongs to the
/// project and is neither modified nor recorded.
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateOnly;

impl Strategy for CreateOnly {
    fn kind(&self) -> StrategyKind {
        StrategyKind::CreateOnly
    }

    fn plan(&self, job: &FileJob, _ctx: &StrategyContext<'_>) -> Result<Plan> {
        if job.dest.exists() {
            Ok(Plan::skip(false))
        } else {
            Ok(Plan::copy(Action::Created))
        }
    }
}
