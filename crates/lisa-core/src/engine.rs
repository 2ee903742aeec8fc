//! Run orchestration
//!
//! The [`Engine`] drives one apply, validate or uninstall run against a
//! destination project:
//!
//! 1. validate the destination and the authoritative root
//! 2. gate on uncommitted git changes
//! 3. detect and confirm project types
//! 4. apply every authoritative file, generic `all` first, then each type
//! 5. process deletion lists
//! 6. persist the manifest, or roll everything back on failure

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use lisa_fs::NormalizedPath;
use tracing::{debug, error, info, warn};

use crate::backup::{BackupSet, prune_empty_parents};
use crate::config::ApplyConfig;
use crate::context::{Discard, FileBackup, FileRecorder, OverwritePrompt, StrategyContext};
use crate::deletions::load_deletions;
use crate::detection::{DetectorRegistry, TypeDetector};
use crate::diff::diff_files;
use crate::git::{GitInspector, LibGit};
use crate::ignore::IgnoreRules;
use crate::kind::StrategyKind;
use crate::manifest::{MANIFEST_FILE, Manifest};
use crate::prompt::{AutoAcceptPrompter, OverwriteDecision, Prompter};
use crate::report::{RunMode, RunReport, UninstallStats};
use crate::strategy::{FileJob, StrategyRegistry};
use crate::{Error, Result};

/// Label of the type directory applied to every project.
pub const ALL_TYPE: &str = "all";

/// Orchestrates runs against one destination.
pub struct Engine {
    config: ApplyConfig,
    registry: StrategyRegistry,
    detector: Box<dyn TypeDetector>,
    prompter: Box<dyn Prompter>,
    git: Box<dyn GitInspector>,
}

impl Engine {
    /// Engine with the built-in strategies, detectors and git inspection,
    /// and a prompter that accepts everything.
    pub fn new(config: ApplyConfig) -> Self {
        Self {
            config,
            registry: StrategyRegistry::new(),
            detector: Box::new(DetectorRegistry::new()),
            prompter: Box::new(AutoAcceptPrompter::new()),
            git: Box::new(LibGit),
        }
    }

    pub fn with_registry(mut self, registry: StrategyRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_detector(mut self, detector: impl TypeDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    pub fn with_prompter(mut self, prompter: impl Prompter + 'static) -> Self {
        self.prompter = Box::new(prompter);
        self
    }

    pub fn with_git(mut self, git: impl GitInspector + 'static) -> Self {
        self.git = Box::new(git);
        self
    }

    pub fn config(&self) -> &ApplyConfig {
        &self.config
    }

    /// Apply the authoritative configuration to the destination.
    ///
    /// Honors the dry-run and validate flags of the configuration.
    ///
    /// # Errors
    ///
    /// Pre-run failures (missing destination or authoritative root, an
    /// aborted confirmation, a failing detector) are returned as errors and
    /// leave the destination untouched. Failures while applying are rolled
    /// back and reported through a report with `success == false`.
    pub fn apply(&self) -> Result<RunReport> {
        let mode = if self.config.validate_only {
            RunMode::Validate
        } else if self.config.dry_run {
            RunMode::DryRun
        } else {
            RunMode::Apply
        };
        self.run(&self.config, mode)
    }

    /// Report what an apply would do without touching the destination.
    pub fn validate(&self) -> Result<RunReport> {
        let config = self.config.clone().with_validate_only(true);
        self.run(&config, RunMode::Validate)
    }

    /// Remove the files recorded in the destination's manifest.
    ///
    /// Only files written whole by Lisa are removed; files Lisa merged into
    /// are left for manual review.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestNotFound`] when the destination was never set
    /// up, or the I/O error that stopped the removal.
    pub fn uninstall(&self) -> Result<RunReport> {
        let config = &self.config;
        validate_destination(&config.dest_dir)?;

        let manifest = Manifest::load(&config.dest_dir)?;
        info!(entries = manifest.len(), dry_run = config.dry_run, "Uninstalling");

        let mut report = RunReport::new(RunMode::Uninstall);
        let mut stats = UninstallStats::default();

        for entry in manifest.entries() {
            let relative = &entry.relative_path;
            if !relative.is_contained() {
                let message = format!("Skipping manifest entry outside project: {relative}");
                warn!("{message}");
                report.warnings.push(message);
                stats.skipped.push(relative.clone());
                continue;
            }

            if !entry.strategy.is_removable() {
                let message = format!("Cannot auto-remove ({}): {relative}", entry.strategy);
                warn!("{message}");
                report.warnings.push(message);
                stats.skipped.push(relative.clone());
                continue;
            }

            let path = relative.under(&config.dest_dir);
            if !path.is_file() {
                debug!(path = %relative, "Already absent");
                stats.skipped.push(relative.clone());
                continue;
            }

            if !config.dry_run {
                fs::remove_file(&path).map_err(|e| lisa_fs::Error::io(&path, e))?;
                prune_empty_parents(&path, &config.dest_dir);
                info!(path = %relative, "Removed");
            }
            stats.removed.push(relative.clone());
        }

        if !config.dry_run {
            Manifest::remove(&config.dest_dir)?;
            info!("Removed manifest");
        }

        report.uninstall = Some(stats);
        Ok(report)
    }

    fn run(&self, config: &ApplyConfig, mode: RunMode) -> Result<RunReport> {
        validate_destination(&config.dest_dir)?;
        if !config.source_dir.is_dir() {
            return Err(Error::SourceNotFound {
                path: config.source_dir.clone(),
            });
        }
        self.check_git_state(config)?;

        let mut report = RunReport::new(mode);
        report.detected_types = self.confirm_types(config)?;
        info!(types = ?report.detected_types, ?mode, "Project types confirmed");

        let chain: Vec<String> = std::iter::once(ALL_TYPE.to_string())
            .chain(report.detected_types.iter().cloned())
            .collect();

        let ignore = IgnoreRules::load(&config.dest_dir)?;
        if !ignore.is_empty() {
            info!(patterns = ignore.len(), "Loaded .lisaignore");
        }

        let run = Run {
            engine: self,
            config,
            chain: &chain,
            ignore: &ignore,
        };

        if config.is_dry_run() {
            if let Err(e) = run.process(&mut Discard, &mut Discard, &mut report) {
                error!(error = %e, "Dry run failed");
                report.fail([e.to_string()]);
            }
            return Ok(report);
        }

        let mut backup = BackupSet::begin(&config.dest_dir)?;
        let mut manifest = Manifest::new();

        let outcome = run
            .process(&mut manifest, &mut backup, &mut report)
            .and_then(|()| {
                let manifest_path = Manifest::path_in(&config.dest_dir);
                backup.before_mutation(&NormalizedPath::new(MANIFEST_FILE), &manifest_path)?;
                manifest.save(&config.dest_dir, &config.source_dir)
            });

        match outcome {
            Ok(()) => {
                if let Err(e) = backup.discard() {
                    warn!(error = %e, "Backup cleanup failed");
                    report.warnings.push(e.to_string());
                }
                info!(
                    files = report.results.len(),
                    deleted = report.deleted.len(),
                    "Run complete"
                );
            }
            Err(e) => {
                error!(error = %e, "Run failed, rolling back");
                let rollback = backup.rollback();
                let failures = rollback.failures.into_iter().map(|failure| {
                    Error::Rollback { reason: failure }.to_string()
                });
                report.fail(std::iter::once(e.to_string()).chain(failures));
            }
        }

        Ok(report)
    }

    /// Refuse to touch a working tree with uncommitted changes unless the
    /// prompter explicitly agrees. Asked even in yes mode.
    fn check_git_state(&self, config: &ApplyConfig) -> Result<()> {
        if config.skip_git_check || !self.git.is_repository(&config.dest_dir) {
            return Ok(());
        }

        let status = self.git.status_lines(&config.dest_dir)?;
        if status.is_empty() {
            return Ok(());
        }

        warn!(changes = status.len(), "Git working directory has uncommitted changes");
        if self.prompter.confirm_dirty_git(&status)? {
            Ok(())
        } else {
            Err(Error::aborted(
                "please commit or stash your changes before running Lisa",
            ))
        }
    }

    fn confirm_types(&self, config: &ApplyConfig) -> Result<Vec<String>> {
        let detected = self.detector.detect(&config.dest_dir)?;
        if config.yes_mode {
            return Ok(detected);
        }
        self.prompter.confirm_project_types(&detected)
    }
}

/// State shared by every file of one apply run.
struct Run<'a> {
    engine: &'a Engine,
    config: &'a ApplyConfig,
    chain: &'a [String],
    ignore: &'a IgnoreRules,
}

impl Run<'_> {
    fn process(
        &self,
        recorder: &mut dyn FileRecorder,
        backup: &mut dyn FileBackup,
        report: &mut RunReport,
    ) -> Result<()> {
        let gate = OverwriteGate {
            prompter: self.engine.prompter.as_ref(),
            yes_mode: self.config.yes_mode,
        };
        {
            let mut ctx = StrategyContext::new(self.config, self.chain, recorder, backup, &gate);
            let mut composed = HashSet::new();
            for label in self.chain {
                self.process_type(label, &mut ctx, &mut composed, report)?;
            }
        }
        self.process_deletions(backup, report)
    }

    fn process_type(
        &self,
        label: &str,
        ctx: &mut StrategyContext<'_>,
        composed: &mut HashSet<NormalizedPath>,
        report: &mut RunReport,
    ) -> Result<()> {
        let type_dir = self.config.source_dir.join(label);
        if !type_dir.is_dir() {
            if label != ALL_TYPE {
                let message = format!("No configuration directory found for type: {label}");
                warn!("{message}");
                report.warnings.push(message);
            }
            return Ok(());
        }
        info!(label, "Processing configurations");

        for kind in StrategyKind::ORDER {
            let strategy_dir = type_dir.join(kind.as_str());
            if !strategy_dir.is_dir() {
                continue;
            }
            let strategy = self.engine.registry.get(kind)?;
            debug!(label, strategy = %kind, "Processing strategy directory");

            for source in lisa_fs::list_files_recursive(&strategy_dir)? {
                let Some(origin) = NormalizedPath::relative(&strategy_dir, &source) else {
                    continue;
                };
                let relative = strategy.target_path(&origin);

                if self.ignore.is_ignored(origin.as_str())
                    || self.ignore.is_ignored(relative.as_str())
                {
                    info!(path = %relative, "Ignored");
                    report.counters.ignored += 1;
                    continue;
                }

                // Templates from every label are composed on the first visit.
                if kind == StrategyKind::PackageLisa && !composed.insert(relative.clone()) {
                    continue;
                }

                let job = FileJob {
                    dest: relative.under(&self.config.dest_dir),
                    source,
                    relative,
                    origin,
                };
                let result = strategy.apply(&job, ctx)?;
                report.push_result(result);
            }
        }
        Ok(())
    }

    fn process_deletions(&self, backup: &mut dyn FileBackup, report: &mut RunReport) -> Result<()> {
        let dest_root = dunce::canonicalize(&self.config.dest_dir)?;

        for label in self.chain {
            let type_dir = self.config.source_dir.join(label);
            for relative in load_deletions(&type_dir, &mut report.warnings) {
                let target = relative.under(&self.config.dest_dir);
                if !target.exists() {
                    continue;
                }
                if !dunce::canonicalize(&target).is_ok_and(|resolved| {
                    resolved != dest_root && resolved.starts_with(&dest_root)
                }) {
                    let message = format!("Skipping deletion outside project directory: {relative}");
                    warn!("{message}");
                    report.warnings.push(message);
                    continue;
                }

                if !self.config.is_dry_run() {
                    backup.before_removal(&relative, &target)?;
                    remove_path(&target)?;
                    info!(path = %relative, "Deleted");
                }
                report.counters.deleted += 1;
                report.deleted.push(relative);
            }
        }
        Ok(())
    }
}

/// Answers overwrite questions, accepting everything in yes mode and showing
/// diffs on request otherwise.
struct OverwriteGate<'a> {
    prompter: &'a dyn Prompter,
    yes_mode: bool,
}

impl OverwritePrompt for OverwriteGate<'_> {
    fn confirm_overwrite(&self, relative: &NormalizedPath, source: &Path, dest: &Path) -> Result<bool> {
        if self.yes_mode {
            info!(path = %relative, "Auto-accepting overwrite");
            return Ok(true);
        }

        loop {
            match self.prompter.prompt_overwrite(relative)? {
                OverwriteDecision::Yes => return Ok(true),
                OverwriteDecision::No => return Ok(false),
                OverwriteDecision::Diff => {
                    let diff = diff_files(relative.as_str(), dest, source);
                    self.prompter.show_diff(relative, &diff)?;
                }
            }
        }
    }
}

fn validate_destination(dest: &Path) -> Result<()> {
    if !dest.exists() {
        return Err(Error::DestinationNotFound {
            path: dest.to_path_buf(),
        });
    }
    if !dest.is_dir() {
        return Err(Error::DestinationNotDirectory {
            path: dest.to_path_buf(),
        });
    }
    Ok(())
}

fn remove_path(path: &Path) -> Result<()> {
    let removed = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|e| lisa_fs::Error::io(path, e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::tempdir;

    struct Scripted {
        answers: RefCell<Vec<OverwriteDecision>>,
        diffs: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(mut answers: Vec<OverwriteDecision>) -> Self {
            answers.reverse();
            Self {
                answers: RefCell::new(answers),
                diffs: RefCell::new(Vec::new()),
            }
        }
    }

    impl Prompter for Scripted {
        fn prompt_overwrite(&self, _relative: &NormalizedPath) -> Result<OverwriteDecision> {
            Ok(self.answers.borrow_mut().pop().unwrap_or(OverwriteDecision::No))
        }

        fn show_diff(&self, _relative: &NormalizedPath, diff: &str) -> Result<()> {
            self.diffs.borrow_mut().push(diff.to_string());
            Ok(())
        }

        fn confirm_project_types(&self, detected: &[String]) -> Result<Vec<String>> {
            Ok(detected.to_vec())
        }

        fn confirm_dirty_git(&self, _status: &[String]) -> Result<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_diff_reprompts() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source");
        let dest = dir.path().join("dest");
        fs::write(&source, "new\n").unwrap();
        fs::write(&dest, "old\n").unwrap();

        let prompter = Scripted::new(vec![OverwriteDecision::Diff, OverwriteDecision::Yes]);
        let gate = OverwriteGate {
            prompter: &prompter,
            yes_mode: false,
        };

        let accepted = gate
            .confirm_overwrite(&NormalizedPath::new("file"), &source, &dest)
            .unwrap();

        assert!(accepted);
        let diffs = prompter.diffs.borrow();
        assert_eq!(diffs.len(), 1);
        assert!(diffs[0].contains("-old"));
        assert!(diffs[0].contains("+new"));
    }

    #[test]
    fn test_yes_mode_skips_prompter() {
        let prompter = Scripted::new(vec![]);
        let gate = OverwriteGate {
            prompter: &prompter,
            yes_mode: true,
        };
        assert!(
            gate.confirm_overwrite(&NormalizedPath::new("f"), Path::new("a"), Path::new("b"))
                .unwrap()
        );
    }

    #[test]
    fn test_missing_destination() {
        let err = validate_destination(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, Error::DestinationNotFound { .. }));
    }

    #[test]
    fn test_file_destination() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, "").unwrap();
        let err = validate_destination(&file).unwrap_err();
        assert!(matches!(err, Error::DestinationNotDirectory { .. }));
    }
}
