//! Layered package manifest templates

use std::path::PathBuf;

use lisa_fs::NormalizedPath;
use lisa_merge::{Object, ResolvedTemplate, TemplateFragment};
use tracing::debug;

use super::{FileJob, Plan, Strategy, merged_plan, read_object};
use crate::context::StrategyContext;
use crate::kind::StrategyKind;
use crate::report::Action;
use crate::{Error, Result};

/// Suffix of template files; `package.lisa.json` governs `package.json`.
pub const TEMPLATE_SUFFIX: &str = ".lisa.json";

/// Composes the same template file from every type directory in the chain
/// and applies the result with `force` / `defaults` / `merge` semantics.
#[derive(Debug, Default, Clone, Copy)]
pub struct PackageLisa;

impl PackageLisa {
    fn template_paths(&self, origin: &NormalizedPath, ctx: &StrategyContext<'_>) -> Vec<PathBuf> {
        ctx.type_chain
            .iter()
            .map(|label| {
                origin.under(
                    &ctx.config
                        .source_dir
                        .join(label)
                        .join(StrategyKind::PackageLisa.as_str()),
                )
            })
            .filter(|path| path.is_file())
            .collect()
    }

    fn resolve(&self, job: &FileJob, ctx: &StrategyContext<'_>) -> Result<ResolvedTemplate> {
        let mut fragments = Vec::new();
        for path in self.template_paths(&job.origin, ctx) {
            let text = lisa_fs::read_text(&path)?;
            let fragment = TemplateFragment::parse(&text, &path.display().to_string())
                .map_err(|e| Error::merge(job.relative.as_str(), e))?;
            debug!(template = %path.display(), "Loaded template fragment");
            fragments.push(fragment);
        }
        Ok(ResolvedTemplate::compose(&fragments))
    }
}

impl Strategy for PackageLisa {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PackageLisa
    }

    fn target_path(&self, relative: &NormalizedPath) -> NormalizedPath {
        match relative.as_str().strip_suffix(TEMPLATE_SUFFIX) {
            Some(stem) => NormalizedPath::new(format!("{stem}.json")),
            None => relative.clone(),
        }
    }

    fn plan(&self, job: &FileJob, ctx: &StrategyContext<'_>) -> Result<Plan> {
        let template = self.resolve(job, ctx)?;

        if !job.dest.exists() {
            let created = template.apply(&Object::new());
            return Ok(Plan::write(Action::Copied, lisa_merge::render_file(&created)));
        }

        let dest = read_object(&job.dest, job, "destination")?;
        let applied = template.apply(&dest);

        Ok(merged_plan(&dest, &applied))
    }
}
