//! Capabilities handed to every strategy invocation

use std::path::Path;

use lisa_fs::NormalizedPath;
use tracing::debug;

use crate::Result;
use crate::config::ApplyConfig;
use crate::kind::StrategyKind;
use crate::report::{Action, FileOperationResult};
use crate::strategy::{Effect, FileJob, Plan};

/// Records files Lisa now manages.
pub trait FileRecorder {
    fn record(&mut self, relative: &NormalizedPath, kind: StrategyKind);
}

/// Captures a destination file before its first mutation in a run.
pub trait FileBackup {
    /// Called before every mutation of `path`. Only the first call per path
    /// captures anything; a missing file is remembered as created by the run.
    fn before_mutation(&mut self, relative: &NormalizedPath, path: &Path) -> Result<()>;

    /// Called before `path` is deleted; directories are captured whole.
    fn before_removal(&mut self, relative: &NormalizedPath, path: &Path) -> Result<()> {
        self.before_mutation(relative, path)
    }
}

/// Decides whether a differing destination file may be replaced.
pub trait OverwritePrompt {
    fn confirm_overwrite(&self, relative: &NormalizedPath, source: &Path, dest: &Path)
    -> Result<bool>;
}

/// No-op recorder and backup used for dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl FileRecorder for Discard {
    fn record(&mut self, _relative: &NormalizedPath, _kind: StrategyKind) {}
}

impl FileBackup for Discard {
    fn before_mutation(&mut self, _relative: &NormalizedPath, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Everything a strategy may consult or trigger while handling one file.
pub struct StrategyContext<'a> {
    pub config: &'a ApplyConfig,
    /// `all` followed by the confirmed project types, generic first.
    pub type_chain: &'a [String],
    recorder: &'a mut dyn FileRecorder,
    backup: &'a mut dyn FileBackup,
    prompt: &'a dyn OverwritePrompt,
}

impl<'a> StrategyContext<'a> {
    pub fn new(
        config: &'a ApplyConfig,
        type_chain: &'a [String],
        recorder: &'a mut dyn FileRecorder,
        backup: &'a mut dyn FileBackup,
        prompt: &'a dyn OverwritePrompt,
    ) -> Self {
        Self {
            config,
            type_chain,
            recorder,
            backup,
            prompt,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.config.is_dry_run()
    }

    /// Carry out a plan: prompt, back up, write and record as it demands.
    ///
    /// In a dry run nothing is touched and the planned action is reported.
    pub fn commit(
        &mut self,
        kind: StrategyKind,
        job: &FileJob,
        plan: Plan,
    ) -> Result<FileOperationResult> {
        let Plan {
            mut action,
            lines_added,
            effect,
            mut record,
        } = plan;
        let dry_run = self.is_dry_run();

        match effect {
            Effect::Nothing => {}
            Effect::CopySource => {
                if !dry_run {
                    self.backup.before_mutation(&job.relative, &job.dest)?;
                    lisa_fs::copy_file(&job.source, &job.dest)?;
                }
            }
            Effect::Write(contents) => {
                if !dry_run {
                    self.backup.before_mutation(&job.relative, &job.dest)?;
                    lisa_fs::write_text(&job.dest, &contents)?;
                }
            }
            Effect::ConfirmOverwrite => {
                if !dry_run {
                    if self
                        .prompt
                        .confirm_overwrite(&job.relative, &job.source, &job.dest)?
                    {
                        self.backup.before_mutation(&job.relative, &job.dest)?;
                        lisa_fs::copy_file(&job.source, &job.dest)?;
                    } else {
                        action = Action::Skipped;
                        record = false;
                    }
                }
            }
        }

        if record && !dry_run {
            self.recorder.record(&job.relative, kind);
        }

        debug!(path = %job.relative, strategy = %kind, action = %action, dry_run, "File processed");

        Ok(FileOperationResult {
            relative_path: job.relative.clone(),
            strategy: kind,
            action,
            lines_added,
        })
    }
}
