//! Governed sections inside JSON objects.
//!
//! A section is delimited by two ordinary keys:
//!
//! ```json
//! {
//!   "//lisa-force-scripts": "Governed by Lisa",
//!   "scripts": { "test": "vitest" },
//!   "//end-lisa-force-scripts": ""
//! }
//! ```
//!
//! The keys strictly between opener and closer are the section's content.
//! Any key starting with `//` is treated as a marker/comment key and never
//! passed through from the destination.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::Object;
use crate::deep::dedupe_concat;

/// Regex for opening section markers: `//lisa-<behavior>-<category>`.
static OPEN_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^//lisa-(force|defaults|merge)-(.+)$").expect("Invalid open marker regex")
});

const MARKER_PREFIX: &str = "//";

/// How a governed section treats the destination's copy of its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Behavior {
    /// Authoritative content replaces the destination's.
    Force,
    /// Destination content is kept when it has a non-empty matching section.
    Defaults,
    /// Arrays are unioned, authoritative items first.
    Merge,
}

impl Behavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Force => "force",
            Self::Defaults => "defaults",
            Self::Merge => "merge",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "force" => Some(Self::Force),
            "defaults" => Some(Self::Defaults),
            "merge" => Some(Self::Merge),
            _ => None,
        }
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A well-formed section found in an object's key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSection {
    pub behavior: Behavior,
    pub category: String,
    /// Position of the opener in the object's key order.
    pub open_index: usize,
    /// Position of the closer; always greater than `open_index`.
    pub close_index: usize,
    /// Keys strictly between opener and closer, in order.
    pub content_keys: Vec<String>,
}

impl TagSection {
    pub fn open_key(&self) -> String {
        open_key(self.behavior, &self.category)
    }

    pub fn close_key(&self) -> String {
        close_key(self.behavior, &self.category)
    }
}

fn open_key(behavior: Behavior, category: &str) -> String {
    format!("//lisa-{}-{}", behavior, category)
}

fn close_key(behavior: Behavior, category: &str) -> String {
    format!("//end-lisa-{}-{}", behavior, category)
}

/// Whether `key` is a marker or comment key.
pub fn is_marker_key(key: &str) -> bool {
    key.starts_with(MARKER_PREFIX)
}

/// Positions of every key, for closer lookup by name.
fn key_positions(object: &Object) -> HashMap<&str, usize> {
    object
        .keys()
        .enumerate()
        .map(|(index, key)| (key.as_str(), index))
        .collect()
}

fn section_at(
    keys: &[&String],
    positions: &HashMap<&str, usize>,
    behavior: Behavior,
    category: &str,
    open_index: usize,
) -> Option<TagSection> {
    let close_index = *positions.get(close_key(behavior, category).as_str())?;
    if close_index <= open_index {
        return None;
    }

    Some(TagSection {
        behavior,
        category: category.to_string(),
        open_index,
        close_index,
        content_keys: keys[open_index + 1..close_index]
            .iter()
            .map(|key| key.to_string())
            .collect(),
    })
}

/// Parse every well-formed section of `object`, in document order.
///
/// Openers without a closer, or whose closer comes first, are not sections.
pub fn parse_sections(object: &Object) -> Vec<TagSection> {
    let keys: Vec<&String> = object.keys().collect();
    let positions = key_positions(object);

    keys.iter()
        .enumerate()
        .filter_map(|(index, key)| {
            let caps = OPEN_MARKER_REGEX.captures(key)?;
            let behavior = Behavior::from_token(caps.get(1)?.as_str())?;
            let category = caps.get(2)?.as_str();
            section_at(&keys, &positions, behavior, category, index)
        })
        .collect()
}

/// Locate the section with the given behavior and category in `object`.
fn find_section(object: &Object, behavior: Behavior, category: &str) -> Option<TagSection> {
    let positions = key_positions(object);
    let open_index = *positions.get(open_key(behavior, category).as_str())?;
    let keys: Vec<&String> = object.keys().collect();
    section_at(&keys, &positions, behavior, category, open_index)
}

/// Keys already placed by a section, threaded through the merge.
#[derive(Debug, Default)]
struct Claims {
    content: HashSet<String>,
    markers: HashSet<String>,
}

impl Claims {
    fn contains(&self, key: &str) -> bool {
        self.content.contains(key) || self.markers.contains(key)
    }
}

/// Merge an authoritative document into a destination using its governed
/// sections.
///
/// Output order: every section of `source` in document order, then the
/// destination's unclaimed non-marker keys, then `source` marker keys that no
/// section claimed (orphaned openers, stray closers, free comments).
pub fn merge_tagged(source: &Object, dest: &Object) -> Object {
    let mut result = Object::new();
    let mut claims = Claims::default();

    for section in parse_sections(source) {
        apply_section(&section, source, dest, &mut result, &mut claims);
    }

    for (key, value) in dest {
        if !claims.contains(key) && !is_marker_key(key) {
            result.insert(key.clone(), value.clone());
        }
    }

    for (key, value) in source {
        if is_marker_key(key) && !claims.contains(key) {
            result.insert(key.clone(), value.clone());
        }
    }

    result
}

fn apply_section(
    section: &TagSection,
    source: &Object,
    dest: &Object,
    result: &mut Object,
    claims: &mut Claims,
) {
    let open = section.open_key();
    let close = section.close_key();
    debug!(behavior = %section.behavior, category = %section.category, "Applying section");

    copy_key(source, &open, result);

    match section.behavior {
        Behavior::Force => {
            for key in &section.content_keys {
                copy_key(source, key, result);
            }
        }
        Behavior::Defaults => {
            let kept = find_section(dest, section.behavior, &section.category)
                .filter(|existing| !existing.content_keys.is_empty());
            match kept {
                Some(existing) => {
                    for key in &existing.content_keys {
                        copy_key(dest, key, result);
                    }
                    claims.content.extend(existing.content_keys);
                }
                None => {
                    for key in &section.content_keys {
                        copy_key(source, key, result);
                    }
                }
            }
        }
        Behavior::Merge => {
            for key in &section.content_keys {
                match (source.get(key), dest.get(key)) {
                    (Some(Value::Array(ours)), Some(Value::Array(theirs))) => {
                        result.insert(key.clone(), Value::Array(dedupe_concat(ours, theirs)));
                    }
                    (Some(Value::Array(ours)), _) => {
                        result.insert(key.clone(), Value::Array(dedupe_concat(ours, &[])));
                    }
                    (Some(value), _) | (None, Some(value)) => {
                        result.insert(key.clone(), value.clone());
                    }
                    (None, None) => {}
                }
            }
        }
    }

    copy_key(source, &close, result);

    claims.content.extend(section.content_keys.iter().cloned());
    claims.markers.insert(open);
    claims.markers.insert(close);
}

fn copy_key(from: &Object, key: &str, into: &mut Object) {
    if let Some(value) = from.get(key) {
        into.insert(key.to_string(), value.clone());
    }
}
