//! Run configuration

use std::path::PathBuf;

/// Environment variable naming the authoritative template root.
pub const LISA_DIR_ENV: &str = "LISA_DIR";

/// Configuration for one apply, validate or uninstall run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyConfig {
    /// Authoritative template root (`<root>/<type>/<strategy>/...`).
    pub source_dir: PathBuf,
    /// Target project directory.
    pub dest_dir: PathBuf,
    /// Compute every decision without touching the destination.
    pub dry_run: bool,
    /// Accept overwrite prompts and detected types without asking.
    pub yes_mode: bool,
    /// Report compatibility only; implies dry-run behaviour.
    pub validate_only: bool,
    /// Do not inspect the destination's git working tree.
    pub skip_git_check: bool,
}

impl ApplyConfig {
    pub fn new(source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            dry_run: false,
            yes_mode: false,
            validate_only: false,
            skip_git_check: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_yes_mode(mut self, yes_mode: bool) -> Self {
        self.yes_mode = yes_mode;
        self
    }

    pub fn with_validate_only(mut self, validate_only: bool) -> Self {
        self.validate_only = validate_only;
        self
    }

    pub fn with_skip_git_check(mut self, skip: bool) -> Self {
        self.skip_git_check = skip;
        self
    }

    /// Whether mutations are suppressed for this run.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run || self.validate_only
    }
}
