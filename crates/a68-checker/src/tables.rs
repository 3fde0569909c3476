//! Side tables filled in by the mode-check pass.
//!
//! The tree itself only records the mode each node yields. What each node
//! is *required* to yield, which operator a formula applies and how a call
//! was parametrised live here, keyed by [`NodeId`].

use a68_core::{ModeId, NodeId, TagId};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::soid::Soid;

/// How a call binds its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallShape {
    /// The mode of the procedure being called, after coercion.
    pub procedure: ModeId,
    /// `PROC (supplied params) VOID` for a partial call.
    pub locale: Option<ModeId>,
    /// The mode a partial call yields: a procedure over the omitted
    /// parameters.
    pub partial: Option<ModeId>,
    /// Parameter positions an argument was given for.
    pub supplied: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct SideTables {
    /// The context each checked unit stood in.
    pub required: FxHashMap<NodeId, Soid>,
    /// The operator identified for each formula.
    pub operators: FxHashMap<NodeId, TagId>,
    /// The tag each applied identifier refers to.
    pub identifiers: FxHashMap<NodeId, TagId>,
    pub calls: FxHashMap<NodeId, CallShape>,
    /// Nodes inside which a diagnostic was reported. The insertion pass
    /// leaves them alone.
    pub poisoned: FxHashSet<NodeId>,
}

impl SideTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(&self, node: NodeId) -> Option<&Soid> {
        self.required.get(&node)
    }

    pub fn is_poisoned(&self, node: NodeId) -> bool {
        self.poisoned.contains(&node)
    }

    /// Rewrites every key through `node_map` (old id to new id), dropping
    /// entries for nodes that no longer exist.
    pub fn remap(&self, node_map: &FxHashMap<NodeId, NodeId>) -> SideTables {
        fn keys<V: Clone>(
            table: &FxHashMap<NodeId, V>,
            node_map: &FxHashMap<NodeId, NodeId>,
        ) -> FxHashMap<NodeId, V> {
            table
                .iter()
                .filter_map(|(k, v)| node_map.get(k).map(|n| (*n, v.clone())))
                .collect()
        }
        SideTables {
            required: keys(&self.required, node_map),
            operators: keys(&self.operators, node_map),
            identifiers: keys(&self.identifiers, node_map),
            calls: keys(&self.calls, node_map),
            poisoned: self
                .poisoned
                .iter()
                .filter_map(|k| node_map.get(k).copied())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a68_registry::standard::INT;

    #[test]
    fn remap_moves_entries_and_drops_missing_ones() {
        let mut tables = SideTables::new();
        let (a, b, c) = (NodeId::new(0), NodeId::new(1), NodeId::new(2));
        tables.required.insert(a, Soid::strong(INT));
        tables.required.insert(b, Soid::strong(INT));
        tables.poisoned.insert(b);

        let mut map = FxHashMap::default();
        map.insert(a, c);
        let moved = tables.remap(&map);
        assert_eq!(moved.required(c), Some(&Soid::strong(INT)));
        assert!(moved.required(a).is_none());
        assert!(moved.poisoned.is_empty());
    }
}
