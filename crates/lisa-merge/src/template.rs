//! Layered `force` / `defaults` / `merge` templates.
//!
//! A template fragment looks like:
//!
//! ```json
//! {
//!   "force":    { "scripts": { "lint": "eslint ." } },
//!   "defaults": { "engines": { "node": ">=20" } },
//!   "merge":    { "trustedDependencies": ["esbuild"] }
//! }
//! ```
//!
//! Fragments are folded generic-first along a project-type chain and the
//! result is applied to a destination document.

use serde::Deserialize;
use serde_json::Value;

use crate::deep::{dedupe_concat, deep_merge, fill_defaults};
use crate::document::parse_object;
use crate::{Error, Object, Result};

/// One template file as written on disk. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TemplateFragment {
    pub force: Object,
    pub defaults: Object,
    pub merge: Object,
}

impl TemplateFragment {
    /// Parse a fragment, requiring every `merge` entry to be an array.
    pub fn parse(text: &str, label: &str) -> Result<Self> {
        let object = parse_object(text, label)?;
        let fragment: Self =
            serde_json::from_value(Value::Object(object)).map_err(|source| Error::Parse {
                label: label.to_string(),
                source,
            })?;

        if let Some((key, _)) = fragment.merge.iter().find(|(_, v)| !v.is_array()) {
            return Err(Error::NotAnObject {
                label: format!("{label} (merge.{key} must be an array)"),
            });
        }

        Ok(fragment)
    }
}

/// The fold of every fragment along a type chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedTemplate {
    pub force: Object,
    pub defaults: Object,
    /// Per key, the concatenation of every fragment's items (not deduplicated).
    pub merge: Vec<(String, Vec<Value>)>,
}

impl ResolvedTemplate {
    /// Fold fragments in order; later fragments override earlier ones in
    /// `force` and `defaults` and append to `merge`.
    pub fn compose<'a>(fragments: impl IntoIterator<Item = &'a TemplateFragment>) -> Self {
        fragments
            .into_iter()
            .fold(Self::default(), |acc, fragment| acc.layer(fragment))
    }

    fn layer(mut self, fragment: &TemplateFragment) -> Self {
        self.force = deep_merge(&self.force, &fragment.force);
        self.defaults = deep_merge(&self.defaults, &fragment.defaults);

        for (key, value) in &fragment.merge {
            let items = value.as_array().map(Vec::as_slice).unwrap_or_default();
            match self.merge.iter_mut().find(|(existing, _)| existing == key) {
                Some((_, acc)) => acc.extend_from_slice(items),
                None => self.merge.push((key.clone(), items.to_vec())),
            }
        }

        self
    }

    pub fn is_empty(&self) -> bool {
        self.force.is_empty() && self.defaults.is_empty() && self.merge.is_empty()
    }

    /// Apply to a destination document.
    ///
    /// `force` wins over the destination, the destination wins over
    /// `defaults`, and each `merge` key becomes template items followed by
    /// the destination's, deduplicated. A non-array destination value under a
    /// `merge` key is replaced.
    pub fn apply(&self, dest: &Object) -> Object {
        let forced = deep_merge(dest, &self.force);
        let mut result = fill_defaults(&forced, &self.defaults);

        for (key, items) in &self.merge {
            let existing: &[Value] = match result.get(key) {
                Some(Value::Array(existing)) => existing.as_slice(),
                _ => &[],
            };
            let combined = dedupe_concat(items, existing);
            result.insert(key.clone(), Value::Array(combined));
        }

        result
    }
}
