//! Structured document merging for Lisa.
//!
//! Everything in this crate is pure: values in, values out, no filesystem
//! access. The engine in `lisa-core` reads files, calls into here and decides
//! what to write back.
//!
//! Three families of algorithms live here:
//!
//! - [`deep`]: recursive object merges and order-preserving array dedup.
//! - [`tagged`]: governed sections delimited by `//lisa-<behavior>-<category>`
//!   and `//end-lisa-<behavior>-<category>` marker keys.
//! - [`template`]: `force` / `defaults` / `merge` fragments folded along a
//!   project-type chain and applied to a destination document.
//!
//! All objects are key-ordered (`serde_json` with `preserve_order`), so the
//! output of every function is deterministic for identical input.

pub mod deep;
pub mod document;
pub mod error;
pub mod tagged;
pub mod template;

pub use deep::{canonical_key, dedupe_concat, deep_merge, fill_defaults};
pub use document::{parse_object, render, render_file};
pub use error::{Error, Result};
pub use tagged::{Behavior, TagSection, is_marker_key, merge_tagged, parse_sections};
pub use template::{ResolvedTemplate, TemplateFragment};

/// Key-ordered JSON object used throughout the merge algorithms.
pub type Object = serde_json::Map<String, serde_json::Value>;
