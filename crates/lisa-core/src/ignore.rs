//! `.lisaignore` rules
//!
//! Gitignore-flavoured patterns, one per line, matched against paths relative
//! to a strategy directory:
//!
//! - `#` comments and blank lines are skipped
//! - `dir/` matches the directory and everything below it
//! - `exact/path.json` matches that path
//! - glob patterns match with dot files included (`*` stays within a segment)
//! - a pattern without `/` matches any single path segment

use std::path::Path;

use glob::{MatchOptions, Pattern};
use tracing::warn;

use crate::Result;

/// File name of the ignore list in the destination root.
pub const IGNORE_FILE: &str = ".lisaignore";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
struct IgnorePattern {
    raw: String,
    glob: Option<Pattern>,
}

impl IgnorePattern {
    fn new(raw: &str) -> Self {
        let glob = match Pattern::new(raw) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!(pattern = raw, error = %e, "Invalid glob in ignore file, matching literally");
                None
            }
        };
        Self {
            raw: raw.to_string(),
            glob,
        }
    }

    fn glob_matches(&self, candidate: &str) -> bool {
        match &self.glob {
            Some(glob) => glob.matches_with(candidate, MATCH_OPTIONS),
            None => self.raw == candidate,
        }
    }

    fn matches(&self, path: &str) -> bool {
        if let Some(dir) = self.raw.strip_suffix('/') {
            return path == dir || path.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/'));
        }

        if path == self.raw || self.glob_matches(path) {
            return true;
        }

        !self.raw.contains('/') && path.split('/').any(|segment| self.glob_matches(segment))
    }
}

/// Parsed ignore list.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreRules {
    pub fn parse(content: &str) -> Self {
        let patterns = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(IgnorePattern::new)
            .collect();
        Self { patterns }
    }

    /// Load `.lisaignore` from `dest_root`; a missing file ignores nothing.
    pub fn load(dest_root: &Path) -> Result<Self> {
        let path = dest_root.join(IGNORE_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        Ok(Self::parse(&lisa_fs::read_text(&path)?))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether a forward-slash relative path is ignored.
    pub fn is_ignored(&self, relative: &str) -> bool {
        let normalized = relative.replace('\\', "/");
        self.patterns.iter().any(|pattern| pattern.matches(&normalized))
    }
}
