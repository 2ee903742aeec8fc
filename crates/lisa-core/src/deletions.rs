//! Per-type deletion lists (`<type>/deletions.json`)

use std::path::Path;

use lisa_fs::NormalizedPath;
use serde::Deserialize;
use tracing::warn;

/// File name of a deletion list inside a type directory.
pub const DELETIONS_FILE: &str = "deletions.json";

#[derive(Debug, Deserialize)]
struct DeletionList {
    paths: Vec<String>,
}

/// Read the deletion list for one type directory.
///
/// A missing file yields nothing. A malformed file, or entries that would
/// reach the destination root or outside it, are skipped with a warning.
pub fn load_deletions(type_dir: &Path, warnings: &mut Vec<String>) -> Vec<NormalizedPath> {
    let path = type_dir.join(DELETIONS_FILE);
    if !path.is_file() {
        return Vec::new();
    }

    let list = lisa_fs::read_text(&path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str::<DeletionList>(&text).map_err(|e| e.to_string()));

    let list = match list {
        Ok(list) => list,
        Err(e) => {
            let message = format!("Invalid deletions file {}: {e}", path.display());
            warn!("{message}");
            warnings.push(message);
            return Vec::new();
        }
    };

    list.paths
        .iter()
        .filter_map(|raw| {
            let relative = NormalizedPath::new(raw);
            if relative.is_contained() {
                Some(relative)
            } else {
                let message = format!("Skipping deletion outside project directory: {raw:?}");
                warn!("{message}");
                warnings.push(message);
                None
            }
        })
        .collect()
}
