//! The reference-counted node store

use crate::model::{Edge, Vertex};
use std::collections::{BTreeMap, VecDeque};
use tracing::trace;

/// Owning container of nodes plus the edge multimap.
///
/// Nodes are stored under their own key; edges are (child, parent) pairs
/// kept in a multimap keyed by child, so the number of entries under a key
/// is that node's reference count. Inserting a node creates one edge per
/// declared child; erasing an edge cascades per the reference-count rule.
///
/// Contract violations (inserting a node whose declared children are
/// absent, erasing a node that is still referenced) are programmer errors
/// and fail fast with a panic. Soft outcomes (duplicate key, absent edge)
/// are reported through success flags.
pub struct Forest<N: Vertex> {
    nodes: BTreeMap<N::Key, N>,
    /// child key → referencing parent keys, in insertion order
    edges: BTreeMap<N::Key, Vec<N::Key>>,
}

impl<N: Vertex> Forest<N> {
    /// Create an empty forest.
    pub fn new() -> Self {
        Forest {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
        }
    }

    /// Insert a node, creating one edge per declared child.
    ///
    /// Every declared child must already exist. Returns the key the node
    /// is stored under and whether it was inserted; a duplicate key is a
    /// complete no-op reported as `false`.
    pub fn insert(&mut self, node: N) -> (N::Key, bool) {
        let key = node.key();
        for child in node.children() {
            assert!(
                self.nodes.contains_key(child),
                "insert: declared child {:?} of {:?} does not exist",
                child,
                key
            );
        }
        if self.nodes.contains_key(&key) {
            return (key, false);
        }
        let children: Vec<N::Key> = node.children().to_vec();
        self.nodes.insert(key.clone(), node);
        for child in children {
            let parents = self.edges.entry(child).or_default();
            if !parents.contains(&key) {
                parents.push(key.clone());
            }
        }
        (key, true)
    }

    /// Insert an edge between two existing nodes.
    ///
    /// Returns `false` without change if an identical edge is already
    /// present under the child's entry.
    pub fn insert_edge(&mut self, edge: Edge<N::Key>) -> bool {
        assert!(
            self.nodes.contains_key(&edge.child),
            "insert_edge: child {:?} does not exist",
            edge.child
        );
        assert!(
            self.nodes.contains_key(&edge.parent),
            "insert_edge: parent {:?} does not exist",
            edge.parent
        );
        let parents = self.edges.entry(edge.child).or_default();
        if parents.contains(&edge.parent) {
            return false;
        }
        parents.push(edge.parent);
        true
    }

    /// Remove an unreferenced node, cascading through its children.
    ///
    /// Panics if the node still has referencing edges. An absent key is a
    /// no-op.
    pub fn erase(&mut self, key: &N::Key) {
        assert_eq!(
            self.ref_count(key),
            0,
            "erase: node {:?} is still referenced",
            key
        );
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        let children: Vec<N::Key> = node.children().to_vec();
        for child in &children {
            self.erase_edge(&Edge::new(child.clone(), key.clone()));
        }
        self.nodes.remove(key);
    }

    /// Remove an edge, collecting nodes that become unreferenced.
    ///
    /// If the removed edge was the child's last, the child node is removed
    /// and the rule applies transitively to its own declared children. The
    /// walk is iterative (explicit worklist); an edge or node already gone
    /// earlier in the same call is skipped. Returns `false` if the edge
    /// was not present.
    pub fn erase_edge(&mut self, edge: &Edge<N::Key>) -> bool {
        if !self.has_edge(edge) {
            return false;
        }
        let mut to_visit: VecDeque<(N::Key, N::Key)> = VecDeque::new();
        to_visit.push_back((edge.child.clone(), edge.parent.clone()));
        while let Some((child, parent)) = to_visit.pop_front() {
            let Some(parents) = self.edges.get_mut(&child) else {
                continue;
            };
            let Some(index) = parents.iter().position(|p| *p == parent) else {
                continue;
            };
            parents.remove(index);
            if parents.is_empty() {
                self.edges.remove(&child);
            }
            if self.ref_count(&child) == 0 {
                if let Some(node) = self.nodes.remove(&child) {
                    trace!(key = ?child, "collecting unreferenced node");
                    for grandchild in node.children() {
                        to_visit.push_back((grandchild.clone(), child.clone()));
                    }
                }
            }
        }
        true
    }

    /// Unconditionally empty both mappings, bypassing reference checks.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.nodes.clear();
    }

    // === Read access ===

    /// Look up a node by key.
    pub fn get(&self, key: &N::Key) -> Option<&N> {
        self.nodes.get(key)
    }

    /// Whether a node exists under `key`.
    pub fn contains(&self, key: &N::Key) -> bool {
        self.nodes.contains_key(key)
    }

    /// Keys of the parents referencing `key`, in insertion order.
    pub fn parents(&self, key: &N::Key) -> &[N::Key] {
        self.edges.get(key).map_or(&[], Vec::as_slice)
    }

    /// Number of edges referencing `key`.
    pub fn ref_count(&self, key: &N::Key) -> usize {
        self.edges.get(key).map_or(0, Vec::len)
    }

    /// Whether the exact edge is present.
    pub fn has_edge(&self, edge: &Edge<N::Key>) -> bool {
        self.parents(&edge.child).contains(&edge.parent)
    }

    /// Number of stored nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the forest holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in key order.
    pub fn iter(&self) -> impl Iterator<Item = &N> {
        self.nodes.values()
    }

    /// Iterate over all node keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &N::Key> {
        self.nodes.keys()
    }

    /// Iterate over all edges, child-major.
    pub fn edges(&self) -> impl Iterator<Item = Edge<N::Key>> + '_ {
        self.edges.iter().flat_map(|(child, parents)| {
            parents
                .iter()
                .map(move |parent| Edge::new(child.clone(), parent.clone()))
        })
    }

    /// Total number of edges, pins included.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

impl<N: Vertex> Default for Forest<N> {
    fn default() -> Self {
        Forest::new()
    }
}
