//! Strategy kinds and their canonical processing order

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The per-file policy applied to an authoritative file.
///
/// The kebab-case name is both the sub-directory under each type directory
/// and the token written to the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrategyKind {
    CopyOverwrite,
    CopyContents,
    CreateOnly,
    Merge,
    TaggedMerge,
    PackageLisa,
}

impl StrategyKind {
    /// Every kind, in the order strategy directories are processed.
    pub const ORDER: [StrategyKind; 6] = [
        Self::CopyOverwrite,
        Self::CopyContents,
        Self::CreateOnly,
        Self::Merge,
        Self::TaggedMerge,
        Self::PackageLisa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CopyOverwrite => "copy-overwrite",
            Self::CopyContents => "copy-contents",
            Self::CreateOnly => "create-only",
            Self::Merge => "merge",
            Self::TaggedMerge => "tagged-merge",
            Self::PackageLisa => "package-lisa",
        }
    }

    /// Whether uninstall may delete files recorded under this kind.
    ///
    /// Files produced by merging or appending also carry project content.
    pub fn is_removable(&self) -> bool {
        matches!(self, Self::CopyOverwrite | Self::CreateOnly)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownStrategy {
                name: s.to_string(),
            })
    }
}
