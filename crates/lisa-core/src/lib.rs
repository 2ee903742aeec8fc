//! Governed file synchronization for Lisa
//!
//! An authoritative template root holds one directory per project type, and
//! below each one a directory per strategy:
//!
//! ```text
//! <root>/<type>/<strategy>/<relative-path>
//! <root>/<type>/deletions.json
//! ```
//!
//! The [`Engine`] reconciles a destination project against that root:
//!
//! - **Strategies**: per-file policies ([`strategy`]) deciding how an
//!   authoritative file combines with what the project already has
//! - **Transaction**: every mutated path is captured in a [`BackupSet`] and
//!   restored if the run fails
//! - **Manifest**: the `.lisa-manifest` ledger of managed files, read back by
//!   uninstall
//! - **Collaborators**: project-type detection, prompting and git inspection
//!   sit behind traits so front ends can supply their own
//!
//! # Architecture
//!
//! ```text
//!           lisa-cli
//!              |
//!          lisa-core
//!              |
//!     +--------+--------+
//!     |                 |
//!  lisa-fs          lisa-merge
//! ```

pub mod backup;
pub mod config;
pub mod context;
pub mod deletions;
pub mod detection;
pub mod diff;
pub mod engine;
pub mod error;
pub mod git;
pub mod ignore;
pub mod kind;
pub mod manifest;
pub mod prompt;
pub mod report;
pub mod strategy;

pub use backup::{BackupSet, RollbackReport};
pub use config::{ApplyConfig, LISA_DIR_ENV};
pub use context::{Discard, FileBackup, FileRecorder, OverwritePrompt, StrategyContext};
pub use detection::{DetectorRegistry, ProjectType, ProjectTypeDetector, TypeDetector};
pub use diff::{diff_files, unified_diff};
pub use engine::{ALL_TYPE, Engine};
pub use error::{Error, Result};
pub use git::{GitInspector, LibGit, NoGit};
pub use ignore::{IGNORE_FILE, IgnoreRules};
pub use kind::StrategyKind;
pub use manifest::{MANIFEST_FILE, Manifest, ManifestEntry};
pub use prompt::{AutoAcceptPrompter, OverwriteDecision, Prompter};
pub use report::{
    Action, FileOperationResult, OperationCounters, RunMode, RunReport, UninstallStats,
};
pub use strategy::{FileJob, Plan, Strategy, StrategyRegistry};
