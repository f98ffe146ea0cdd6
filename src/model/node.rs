//! Node capability and the ready-made keyed node type

use serde::{Deserialize, Serialize};
use std::fmt;

/// The capability a node type must expose to live in a [`Forest`].
///
/// A vertex knows its own key, lists its children as an ordered sequence of
/// keys, and can produce a modified copy carrying a different child list.
///
/// When a vertex type is used under [`Tree`], keys are expected to be
/// content-derived: a copy with a different child list addresses different
/// content and must therefore report a different key. How the key is
/// derived (hashing, version counters, ...) is the implementor's concern;
/// this crate never computes keys itself.
///
/// [`Forest`]: crate::Forest
/// [`Tree`]: crate::Tree
pub trait Vertex: Clone {
    /// Opaque, totally ordered identifier addressing a node.
    type Key: Ord + Clone + fmt::Debug;

    /// The key this vertex is stored under.
    fn key(&self) -> Self::Key;

    /// Ordered child-key list (the vertex's declared edges).
    fn children(&self) -> &[Self::Key];

    /// A copy of this vertex with a different child list.
    fn with_children(&self, children: Vec<Self::Key>) -> Self;
}

/// A plain node with an explicit key and an attached value.
///
/// Sufficient for [`Forest`] storage and for the traversals. Under
/// [`Tree`] it is only appropriate when the caller mints a fresh key for
/// every new version, since `with_children` keeps the key as-is.
///
/// [`Forest`]: crate::Forest
/// [`Tree`]: crate::Tree
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node<K, V> {
    key: K,
    value: V,
    children: Vec<K>,
}

impl<K, V> Node<K, V> {
    /// Create a childless node.
    pub fn new(key: K, value: V) -> Self {
        Node {
            key,
            value,
            children: Vec::new(),
        }
    }

    /// Create a node with a declared child list.
    pub fn with_edges(key: K, value: V, children: Vec<K>) -> Self {
        Node {
            key,
            value,
            children,
        }
    }

    /// The attached value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Append a child key.
    pub fn push_child(&mut self, child: K) {
        self.children.push(child);
    }
}

impl<K, V> Vertex for Node<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    type Key = K;

    fn key(&self) -> K {
        self.key.clone()
    }

    fn children(&self) -> &[K] {
        &self.children
    }

    fn with_children(&self, children: Vec<K>) -> Self {
        Node {
            key: self.key.clone(),
            value: self.value.clone(),
            children,
        }
    }
}
