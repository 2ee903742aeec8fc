//! Strategy lookup by kind

use std::collections::HashMap;

use super::{CopyContents, CopyOverwrite, CreateOnly, Merge, PackageLisa, Strategy, TaggedMerge};
use crate::kind::StrategyKind;
use crate::{Error, Result};

/// Registry mapping each kind to its strategy implementation.
pub struct StrategyRegistry {
    strategies: HashMap<StrategyKind, Box<dyn Strategy>>,
}

impl StrategyRegistry {
    /// Create a registry holding all six built-in strategies.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(CopyOverwrite));
        registry.register(Box::new(CopyContents));
        registry.register(Box::new(CreateOnly));
        registry.register(Box::new(Merge));
        registry.register(Box::new(TaggedMerge));
        registry.register(Box::new(PackageLisa));
        registry
    }

    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Register a strategy, replacing any existing one of the same kind.
    pub fn register(&mut self, strategy: Box<dyn Strategy>) {
        self.strategies.insert(strategy.kind(), strategy);
    }

    /// Look up the strategy for `kind`.
    pub fn get(&self, kind: StrategyKind) -> Result<&dyn Strategy> {
        self.strategies
            .get(&kind)
            .map(|strategy| strategy.as_ref())
            .ok_or_else(|| Error::UnknownStrategy {
                name: kind.to_string(),
            })
    }

    /// Registered kinds in canonical order.
    pub fn kinds(&self) -> Vec<StrategyKind> {
        StrategyKind::ORDER
            .into_iter()
            .filter(|kind| self.strategies.contains_key(kind))
            .collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_all_kinds() {
        let registry = StrategyRegistry::new();
        assert_eq!(registry.kinds(), StrategyKind::ORDER.to_vec());
        for kind in StrategyKind::ORDER {
            assert_eq!(registry.get(kind).unwrap().kind(), kind);
        }
    }

    #[test]
    fn test_unregistered_kind_is_error() {
        let mut registry = StrategyRegistry::empty();
        registry.register(Box::new(Merge));

        assert!(registry.get(StrategyKind::Merge).is_ok());
        let err = registry.get(StrategyKind::TaggedMerge).err().unwrap();
        assert!(matches!(err, Error::UnknownStrategy { ref name } if name == "tagged-merge"));
    }
}
