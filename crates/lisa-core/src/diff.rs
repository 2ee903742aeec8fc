//! Unified diff rendering for overwrite prompts

use std::fs;
use std::path::Path;

use similar::TextDiff;

/// Render a unified diff turning `current` into `incoming`.
pub fn unified_diff(label: &str, current: &str, incoming: &str) -> String {
    TextDiff::from_lines(current, incoming)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{label}"), &format!("b/{label}"))
        .to_string()
}

/// Diff two files on disk, destination first.
///
/// Files that are not valid UTF-8 are reported as differing binaries.
pub fn diff_files(label: &str, dest: &Path, source: &Path) -> String {
    match (fs::read_to_string(dest), fs::read_to_string(source)) {
        (Ok(current), Ok(incoming)) => unified_diff(label, &current, &incoming),
        _ => format!("Binary files a/{label} and b/{label} differ\n"),
    }
}
