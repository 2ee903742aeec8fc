//! The `.lisa-manifest` file
//!
//! Plain text, one managed file per line:
//!
//! ```text
//! # Lisa manifest - DO NOT EDIT
//! # Generated: 2026-10-16T09:30:00+00:00
//! # Lisa directory: /opt/lisa
//!
//! copy-overwrite:.github/workflows/ci.yml
//! tagged-merge:package.json
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use lisa_fs::NormalizedPath;
use tracing::{debug, warn};

use crate::context::FileRecorder;
use crate::kind::StrategyKind;
use crate::{Error, Result};

/// File name of the manifest in the destination root.
pub const MANIFEST_FILE: &str = ".lisa-manifest";

const TITLE: &str = "# Lisa manifest - DO NOT EDIT";

/// One managed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub strategy: StrategyKind,
    pub relative_path: NormalizedPath,
}

/// Ordered set of managed files, at most one entry per path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
    index: HashMap<NormalizedPath, usize>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the manifest inside `dest_root`.
    pub fn path_in(dest_root: &Path) -> PathBuf {
        dest_root.join(MANIFEST_FILE)
    }

    /// Record a managed file. A later record for the same path replaces the
    /// strategy but keeps the original position.
    pub fn record(&mut self, relative: &NormalizedPath, strategy: StrategyKind) {
        match self.index.get(relative) {
            Some(&position) => self.entries[position].strategy = strategy,
            None => {
                self.index.insert(relative.clone(), self.entries.len());
                self.entries.push(ManifestEntry {
                    strategy,
                    relative_path: relative.clone(),
                });
            }
        }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse manifest text. Comments, blank lines, lines without a `:` and
    /// unknown strategies are skipped.
    pub fn parse(content: &str) -> Self {
        let mut manifest = Self::new();
        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((strategy, relative)) = line.split_once(':') else {
                warn!(line, "Skipping malformed manifest line");
                continue;
            };
            match strategy.parse::<StrategyKind>() {
                Ok(kind) => manifest.record(&NormalizedPath::new(relative), kind),
                Err(_) => warn!(strategy, "Skipping manifest entry with unknown strategy"),
            }
        }
        manifest
    }

    /// Render the manifest file, header first.
    pub fn render(&self, source_dir: &Path) -> String {
        let mut out = format!(
            "{TITLE}\n# Generated: {}\n# Lisa directory: {}\n\n",
            Utc::now().to_rfc3339(),
            source_dir.display()
        );
        for entry in &self.entries {
            out.push_str(entry.strategy.as_str());
            out.push(':');
            out.push_str(entry.relative_path.as_str());
            out.push('\n');
        }
        out
    }

    /// Read the manifest from `dest_root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestNotFound`] when there is no manifest.
    pub fn load(dest_root: &Path) -> Result<Self> {
        let path = Self::path_in(dest_root);
        if !path.is_file() {
            return Err(Error::ManifestNotFound { path });
        }
        let content = lisa_fs::read_text(&path)?;
        Ok(Self::parse(&content))
    }

    /// Write the manifest into `dest_root`.
    pub fn save(&self, dest_root: &Path, source_dir: &Path) -> Result<()> {
        let path = Self::path_in(dest_root);
        lisa_fs::write_text(&path, &self.render(source_dir))?;
        debug!(entries = self.entries.len(), path = %path.display(), "Manifest written");
        Ok(())
    }

    /// Delete the manifest from `dest_root` if present.
    pub fn remove(dest_root: &Path) -> Result<()> {
        let path = Self::path_in(dest_root);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| lisa_fs::Error::io(&path, e))?;
        }
        Ok(())
    }
}

impl FileRecorder for Manifest {
    fn record(&mut self, relative: &NormalizedPath, kind: StrategyKind) {
        Manifest::record(self, relative, kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn paths(manifest: &Manifest) -> Vec<String> {
        manifest
            .entries()
            .iter()
            .map(|e| format!("{}:{}", e.strategy, e.relative_path))
            .collect()
    }

    #[test]
    fn test_record_keeps_one_entry_per_path() {
        let mut manifest = Manifest::new();
        manifest.record(&NormalizedPath::new("a.json"), StrategyKind::Merge);
        manifest.record(&NormalizedPath::new("b.txt"), StrategyKind::CopyOverwrite);
        manifest.record(&NormalizedPath::new("a.json"), StrategyKind::TaggedMerge);

        assert_eq!(paths(&manifest), vec!["tagged-merge:a.json", "copy-overwrite:b.txt"]);
    }

    #[test]
    fn test_parse_skips_noise() {
        let manifest = Manifest::parse(
            "# Lisa manifest - DO NOT EDIT\n\
             # Generated: now\n\
             \n\
             copy-overwrite:.github/ci.yml\n\
             no-colon-here\n\
             teleport:somewhere\n\
             create-only:src/a:b.ts\n",
        );

        assert_eq!(
            paths(&manifest),
            vec!["copy-overwrite:.github/ci.yml", "create-only:src/a:b.ts"]
        );
    }

    #[test]
    fn test_render_has_header_then_entries() {
        let mut manifest = Manifest::new();
        manifest.record(&NormalizedPath::new(".nvmrc"), StrategyKind::CopyOverwrite);

        let text = manifest.render(Path::new("/opt/lisa"));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], TITLE);
        assert!(lines[1].starts_with("# Generated: "));
        assert_eq!(lines[2], "# Lisa directory: /opt/lisa");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "copy-overwrite:.nvmrc");
    }

    #[test]
    fn test_save_load_remove() {
        let dir = tempdir().unwrap();
        let mut manifest = Manifest::new();
        manifest.record(&NormalizedPath::new("x/y.json"), StrategyKind::PackageLisa);

        manifest.save(dir.path(), Path::new("/lisa")).unwrap();
        let loaded = Manifest::load(dir.path()).unwrap();
        assert_eq!(loaded.entries(), manifest.entries());

        Manifest::remove(dir.path()).unwrap();
        assert!(matches!(
            Manifest::load(dir.path()),
            Err(Error::ManifestNotFound { .. })
        ));
    }
}
