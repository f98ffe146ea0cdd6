//! Edge record used for reverse lookup and reference counting

use serde::{Deserialize, Serialize};

/// A (child, parent) reference record.
///
/// Edges point from a child back at a referencing parent, so the store can
/// answer "who references this node" and count references per child. An
/// edge whose endpoints are equal is a pin: a synthetic self-reference
/// keeping a node alive (see [`Pin`]).
///
/// [`Pin`]: crate::Pin
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge<K> {
    /// Key of the referenced (child) node
    pub child: K,

    /// Key of the referencing (parent) node
    pub parent: K,
}

impl<K> Edge<K> {
    /// Create an edge from `parent` down to `child`.
    pub fn new(child: K, parent: K) -> Self {
        Edge { child, parent }
    }
}

impl<K: Clone> Edge<K> {
    /// The self-referential edge used to pin `key`.
    pub fn pin(key: &K) -> Self {
        Edge {
            child: key.clone(),
            parent: key.clone(),
        }
    }
}

impl<K: PartialEq> Edge<K> {
    /// Whether this edge is a synthetic self-reference.
    pub fn is_pin(&self) -> bool {
        self.child == self.parent
    }
}
