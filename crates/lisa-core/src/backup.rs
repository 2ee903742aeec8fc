//! Session-scoped backups and rollback
//!
//! A [`BackupSet`] mirrors every destination file the run is about to mutate
//! into a private temporary directory outside the target tree. Capture is
//! lazy: a path is mirrored immediately before its first mutation and never
//! again, so the mirror always holds the pre-run bytes. Paths that did not
//! exist before the run are remembered as created and deleted on rollback,
//! together with any parent directories the run had to create for them.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use lisa_fs::NormalizedPath;
use tempfile::TempDir;
use tracing::{debug, error, info, warn};

use crate::context::FileBackup;
use crate::{Error, Result};

const BACKUP_PREFIX: &str = "lisa-backup-";

/// What a destination path looked like before the run touched it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Original {
    /// The file existed; its bytes are mirrored at this path.
    Existing(PathBuf),
    /// The file did not exist.
    Absent,
}

/// Outcome of a rollback.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RollbackReport {
    /// Files copied back from the mirror.
    pub restored: Vec<NormalizedPath>,
    /// Files created by the run and deleted again.
    pub removed: Vec<NormalizedPath>,
    /// Paths that could not be restored, with the reason.
    pub failures: Vec<String>,
}

impl RollbackReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Pre-run state of every path mutated during one run.
pub struct BackupSet {
    dest_root: PathBuf,
    store: TempDir,
    captured: HashMap<NormalizedPath, Original>,
    /// Capture order, for deterministic rollback.
    order: Vec<NormalizedPath>,
    /// Directories missing when a created path was captured.
    created_dirs: Vec<PathBuf>,
}

impl BackupSet {
    /// Start a backup session for `dest_root` in a fresh temporary directory.
    pub fn begin(dest_root: &Path) -> Result<Self> {
        let store = tempfile::Builder::new()
            .prefix(BACKUP_PREFIX)
            .tempdir()
            .map_err(|e| Error::Backup {
                operation: "init".to_string(),
                reason: e.to_string(),
            })?;
        debug!(store = %store.path().display(), "Backup session started");

        Ok(Self {
            dest_root: dest_root.to_path_buf(),
            store,
            captured: HashMap::new(),
            order: Vec::new(),
            created_dirs: Vec::new(),
        })
    }

    /// Directory holding mirrored files.
    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    /// Number of paths captured so far.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Capture every file below a directory that is about to be removed.
    pub fn capture_tree(&mut self, relative: &NormalizedPath) -> Result<()> {
        let root = relative.under(&self.dest_root);
        for file in lisa_fs::list_files_recursive(&root)? {
            let Some(inner) = NormalizedPath::relative(&self.dest_root, &file) else {
                continue;
            };
            self.capture(&inner, &file)?;
        }
        Ok(())
    }

    fn capture(&mut self, relative: &NormalizedPath, path: &Path) -> Result<()> {
        if self.captured.contains_key(relative) {
            return Ok(());
        }

        let original = if path.is_file() {
            let mirror = relative.under(self.store.path());
            lisa_fs::copy_file(path, &mirror).map_err(|e| Error::Backup {
                operation: format!("capture of {relative}"),
                reason: e.to_string(),
            })?;
            Original::Existing(mirror)
        } else {
            self.note_missing_parents(path);
            Original::Absent
        };

        debug!(path = %relative, existed = matches!(original, Original::Existing(_)), "Captured");
        self.captured.insert(relative.clone(), original);
        self.order.push(relative.clone());
        Ok(())
    }

    fn note_missing_parents(&mut self, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir == self.dest_root || !dir.starts_with(&self.dest_root) || dir.exists() {
                break;
            }
            if !self.created_dirs.iter().any(|known| known == dir) {
                self.created_dirs.push(dir.to_path_buf());
            }
            current = dir.parent();
        }
    }

    /// Restore every captured path and delete every created one.
    ///
    /// Keeps going past individual failures so as much as possible is put
    /// back; the failures are listed in the report. The store is removed
    /// afterwards.
    pub fn rollback(self) -> RollbackReport {
        let mut report = RollbackReport::default();
        warn!(files = self.order.len(), "Rolling back");

        for relative in self.order.iter().rev() {
            let target = relative.under(&self.dest_root);
            match self.captured.get(relative) {
                Some(Original::Existing(mirror)) => match lisa_fs::copy_file(mirror, &target) {
                    Ok(()) => report.restored.push(relative.clone()),
                    Err(e) => report.failures.push(format!("{relative}: {e}")),
                },
                Some(Original::Absent) => {
                    if !target.exists() {
                        continue;
                    }
                    match fs::remove_file(&target) {
                        Ok(()) => report.removed.push(relative.clone()),
                        Err(e) => report.failures.push(format!("{relative}: {e}")),
                    }
                }
                None => {}
            }
        }

        let mut created_dirs = self.created_dirs.clone();
        created_dirs.sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));
        for dir in &created_dirs {
            if fs::remove_dir(dir).is_err() {
                debug!(dir = %dir.display(), "Created directory not empty, kept");
            }
        }

        if let Err(e) = self.store.close() {
            report.failures.push(format!("backup store cleanup: {e}"));
        }

        if report.is_complete() {
            info!(
                restored = report.restored.len(),
                removed = report.removed.len(),
                "Rollback complete"
            );
        } else {
            error!(failures = report.failures.len(), "Rollback incomplete");
        }
        report
    }

    /// Discard the mirror after a successful run.
    pub fn discard(self) -> Result<()> {
        debug!(files = self.order.len(), "Discarding backups");
        self.store.close().map_err(|e| Error::Backup {
            operation: "cleanup".to_string(),
            reason: e.to_string(),
        })
    }
}

/// Remove directories left empty by deleting `path`, stopping at `root`.
pub(crate) fn prune_empty_parents(path: &Path, root: &Path) {
    let mut current = path.parent();
    while let Some(dir) = current {
        if dir == root || !dir.starts_with(root) || fs::remove_dir(dir).is_err() {
            break;
        }
        current = dir.parent();
    }
}

impl FileBackup for BackupSet {
    fn before_mutation(&mut self, relative: &NormalizedPath, path: &Path) -> Result<()> {
        self.capture(relative, path)
    }

    fn before_removal(&mut self, relative: &NormalizedPath, path: &Path) -> Result<()> {
        if path.is_dir() {
            self.capture_tree(relative)
        } else {
            self.capture(relative, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_store_lives_outside_destination() {
        let dest = tempdir().unwrap();
        let backups = BackupSet::begin(dest.path()).unwrap();

        assert!(!backups.store_path().starts_with(dest.path()));
        let name = backups.store_path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(BACKUP_PREFIX));
    }

    #[test]
    fn test_first_capture_wins() {
        let dest = tempdir().unwrap();
        let file = dest.path().join("a.txt");
        fs::write(&file, "original").unwrap();
        let relative = NormalizedPath::new("a.txt");

        let mut backups = BackupSet::begin(dest.path()).unwrap();
        backups.before_mutation(&relative, &file).unwrap();
        fs::write(&file, "first change").unwrap();
        backups.before_mutation(&relative, &file).unwrap();
        fs::write(&file, "second change").unwrap();

        let report = backups.rollback();

        assert!(report.is_complete());
        assert_eq!(fs::read_to_string(&file).unwrap(), "original");
    }

    #[test]
    fn test_rollback_deletes_created_files() {
        let dest = tempdir().unwrap();
        let file = dest.path().join("nested/new.txt");
        let relative = NormalizedPath::new("nested/new.txt");

        let mut backups = BackupSet::begin(dest.path()).unwrap();
        backups.before_mutation(&relative, &file).unwrap();
        lisa_fs::write_text(&file, "created").unwrap();

        let report = backups.rollback();

        assert_eq!(report.removed, vec![relative]);
        assert!(!file.exists());
        assert!(!dest.path().join("nested").exists());
    }

    #[test]
    fn test_rollback_keeps_pre_existing_empty_parent() {
        let dest = tempdir().unwrap();
        fs::create_dir_all(dest.path().join(".github")).unwrap();
        let file = dest.path().join(".github/workflows/ci.yml");
        let relative = NormalizedPath::new(".github/workflows/ci.yml");

        let mut backups = BackupSet::begin(dest.path()).unwrap();
        backups.before_mutation(&relative, &file).unwrap();
        lisa_fs::write_text(&file, "on: push").unwrap();

        let report = backups.rollback();

        assert!(report.is_complete());
        assert!(dest.path().join(".github").is_dir());
        assert!(!dest.path().join(".github/workflows").exists());
    }

    #[test]
    fn test_prune_stops_at_non_empty_parent() {
        let dest = tempdir().unwrap();
        lisa_fs::write_text(&dest.path().join("a/keep.txt"), "k").unwrap();
        let file = dest.path().join("a/b/c/gone.txt");
        lisa_fs::write_text(&file, "x").unwrap();
        fs::remove_file(&file).unwrap();

        prune_empty_parents(&file, dest.path());

        assert!(!dest.path().join("a/b").exists());
        assert!(dest.path().join("a/keep.txt").exists());
        assert!(dest.path().exists());
    }

    #[test]
    fn test_rollback_restores_removed_tree() {
        let dest = tempdir().unwrap();
        lisa_fs::write_text(&dest.path().join("old/a.txt"), "a").unwrap();
        lisa_fs::write_text(&dest.path().join("old/deep/b.txt"), "b").unwrap();

        let mut backups = BackupSet::begin(dest.path()).unwrap();
        backups.capture_tree(&NormalizedPath::new("old")).unwrap();
        fs::remove_dir_all(dest.path().join("old")).unwrap();

        let report = backups.rollback();

        assert_eq!(report.restored.len(), 2);
        assert_eq!(fs::read_to_string(dest.path().join("old/deep/b.txt")).unwrap(), "b");
    }

    #[test]
    fn test_discard_removes_store() {
        let dest = tempdir().unwrap();
        let file = dest.path().join("a.txt");
        fs::write(&file, "x").unwrap();

        let mut backups = BackupSet::begin(dest.path()).unwrap();
        backups.before_mutation(&NormalizedPath::new("a.txt"), &file).unwrap();
        let store = backups.store_path().to_path_buf();
        backups.discard().unwrap();

        assert!(!store.exists());
        assert!(file.exists());
    }
}
