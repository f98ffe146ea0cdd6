//! Traversability predicates

use std::collections::BTreeMap;

/// Decides whether a traversal may cross an edge.
///
/// Called once per candidate edge as (parent key, child key), left to
/// right and parent before child, so stateful implementations see a
/// deterministic discovery order. A predicate instance belongs to one
/// traversal; it is consumed by construction and never shared.
pub trait EdgePredicate<K> {
    /// Decide (and update any internal state) for one edge.
    fn traverse(&mut self, parent: &K, child: &K) -> bool;
}

/// Accepts every edge. The default predicate.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl<K> EdgePredicate<K> for AllowAll {
    fn traverse(&mut self, _parent: &K, _child: &K) -> bool {
        true
    }
}

/// Rejects every edge; the traversal visits only its starting node.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowNone;

impl<K> EdgePredicate<K> for AllowNone {
    fn traverse(&mut self, _parent: &K, _child: &K) -> bool {
        false
    }
}

/// Accepts an edge while the source key's first-discovered depth is below
/// the configured ceiling.
///
/// Depths are recorded on first sight and never overwritten, so a key
/// reached again along a longer path keeps its original depth.
#[derive(Clone, Debug)]
pub struct MaxDepth<K> {
    max_depth: u64,
    depths: BTreeMap<K, u64>,
}

impl<K: Ord + Clone> MaxDepth<K> {
    /// Accept edges whose source lies at depth `< max_depth`.
    pub fn new(max_depth: u64) -> Self {
        MaxDepth {
            max_depth,
            depths: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> EdgePredicate<K> for MaxDepth<K> {
    fn traverse(&mut self, parent: &K, child: &K) -> bool {
        let depth = self.depths.get(parent).copied().unwrap_or(0);
        self.depths.entry(parent.clone()).or_insert(depth);
        self.depths.entry(child.clone()).or_insert(depth + 1);
        depth < self.max_depth
    }
}

impl<K, F> EdgePredicate<K> for F
where
    F: FnMut(&K, &K) -> bool,
{
    fn traverse(&mut self, parent: &K, child: &K) -> bool {
        self(parent, child)
    }
}
