//! Copy-on-write persistent tree

use super::Pin;
use crate::error::{Error, Result};
use crate::model::Vertex;
use crate::store::Forest;
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use tracing::{debug, trace};

/// Shared handle to a forest. Trees sharing one handle share structure;
/// the sharing is single-threaded by construction.
pub type SharedForest<N> = Rc<RefCell<Forest<N>>>;

/// A persistent tree: a shared node store plus a distinguished root.
///
/// `update` never mutates an existing node. It inserts a new version of
/// the changed node and rewrites the minimal ancestor set up to the root,
/// so the new value is reachable at the same logical position from a
/// (possibly new) root while untouched sibling subtrees are reused by
/// reference. Prior versions stay valid for any holder that still
/// references them and are collected once truly unreferenced.
pub struct Tree<N: Vertex> {
    forest: SharedForest<N>,
    root: Option<N::Key>,
}

impl<N: Vertex> Tree<N> {
    /// Create a rootless tree over the given store.
    pub fn new(forest: SharedForest<N>) -> Self {
        Tree { forest, root: None }
    }

    /// Create a tree rooted at an existing node.
    pub fn with_root(forest: SharedForest<N>, root: N::Key) -> Result<Self> {
        if !forest.borrow().contains(&root) {
            return Err(Error::not_found(&root));
        }
        Ok(Tree {
            forest,
            root: Some(root),
        })
    }

    /// The current root key, if any.
    pub fn root(&self) -> Option<&N::Key> {
        self.root.as_ref()
    }

    /// Whether the tree has no root or a childless root.
    pub fn is_empty(&self) -> bool {
        let Some(root) = self.root.as_ref() else {
            return true;
        };
        self.forest
            .borrow()
            .get(root)
            .is_none_or(|node| node.children().is_empty())
    }

    /// The shared node store.
    pub fn forest(&self) -> &SharedForest<N> {
        &self.forest
    }

    /// Produce a new version of the node at `source` and rewrite the
    /// ancestor paths so `value` takes its place under a (possibly new)
    /// root. Returns the key of the inserted value, which is not
    /// necessarily the new root.
    ///
    /// Ancestor rewriting walks an explicit worklist of (child, parent)
    /// pairs; work-in-progress versions are pinned so cascading deletion
    /// cannot reap them mid-algorithm. A rewrite chain that dead-ends
    /// without reaching the root is unwound rather than leaked. Not
    /// transactional: an already-promoted root is not rolled back if the
    /// caller aborts between calls.
    pub fn update(&mut self, source: &N::Key, value: N) -> Result<N::Key> {
        if !self.forest.borrow().contains(source) {
            return Err(Error::not_found(source));
        }
        let target = value.key();
        self.forest.borrow_mut().insert(value.clone());

        // pins prevent deletion of work-in-progress versions
        let mut pins: Vec<Pin<N>> = Vec::new();
        let mut updated = Mapping::new();
        updated.set(source.clone(), target.clone());

        let mut to_visit: VecDeque<(N::Key, N::Key)> = VecDeque::new();
        self.enqueue_parents(source, &value, &mut to_visit);
        if self.root.as_ref() == Some(source) {
            self.set_root(target.clone());
        }

        while let Some((src_child, src_parent)) = to_visit.pop_front() {
            let tgt_parent = updated.resolve(&src_parent);
            let tgt_child = updated.resolve(&src_child);
            let parent_node = {
                let forest = self.forest.borrow();
                if forest.contains(&tgt_child) {
                    forest.get(&tgt_parent).cloned()
                } else {
                    None
                }
            };
            let Some(parent_node) = parent_node else {
                // An ancestor on this path was collected mid-call (for
                // example by a sibling path's promotion). If this call
                // minted a version for the child that nothing references,
                // collect it now instead of leaking it.
                if tgt_child != src_child && tgt_child != target {
                    let mut forest = self.forest.borrow_mut();
                    if forest.contains(&tgt_child) && forest.ref_count(&tgt_child) == 0 {
                        trace!(key = ?tgt_child, "collecting stranded version");
                        forest.erase(&tgt_child);
                    }
                }
                continue;
            };

            if pins.last().is_none_or(|pin| pin.key() != &tgt_child) {
                pins.push(Pin::new(Rc::clone(&self.forest), tgt_child.clone()));
            }

            let mut children = exclude_copy(parent_node.children(), &src_child);
            insert_unique(&mut children, tgt_child.clone());
            let new_parent = parent_node.with_children(children);
            let new_key = new_parent.key();
            trace!(old = ?src_parent, new = ?new_key, "rewriting ancestor");
            self.forest.borrow_mut().insert(new_parent);

            if self.root.as_ref() == Some(&tgt_parent) {
                self.set_root(new_key.clone());
                // sibling paths of a multi-parent update must resolve
                // against the promoted root, not the collected one
                updated.set(src_parent, new_key);
            } else {
                let before = to_visit.len();
                self.enqueue_parents(&src_parent, &value, &mut to_visit);
                if to_visit.len() == before {
                    // dead end that never reached the root
                    let mut forest = self.forest.borrow_mut();
                    if forest.ref_count(&new_key) == 0 {
                        trace!(key = ?new_key, "unwinding dead-end version");
                        forest.erase(&new_key);
                    }
                    drop(forest);
                    updated.set(src_parent, tgt_parent);
                } else {
                    updated.set(src_parent, new_key);
                }
            }
        }

        Ok(target)
    }

    /// Include `child` in `parent`'s child list via a copy-on-write
    /// update. Returns the key of `parent`'s new version.
    pub fn link(&mut self, parent: &N::Key, child: &N::Key) -> Result<N::Key> {
        let parent_node = self
            .forest
            .borrow()
            .get(parent)
            .cloned()
            .ok_or_else(|| Error::not_found(parent))?;
        if !self.forest.borrow().contains(child) {
            return Err(Error::not_found(child));
        }
        let mut children = unique_copy(parent_node.children());
        insert_unique(&mut children, child.clone());
        self.update(parent, parent_node.with_children(children))
    }

    /// Insert `child` into the store and link it under `parent`.
    /// Returns the key of `parent`'s new version.
    pub fn insert(&mut self, parent: &N::Key, child: N) -> Result<N::Key> {
        if !self.forest.borrow().contains(parent) {
            return Err(Error::not_found(parent));
        }
        let (key, _) = self.forest.borrow_mut().insert(child);
        self.link(parent, &key)
    }

    /// Exclude `child` from `parent`'s child list via a copy-on-write
    /// update. The child's subtree is collected once unreferenced.
    pub fn unlink(&mut self, parent: &N::Key, child: &N::Key) -> Result<N::Key> {
        let parent_node = self
            .forest
            .borrow()
            .get(parent)
            .cloned()
            .ok_or_else(|| Error::not_found(parent))?;
        let children = exclude_copy(parent_node.children(), child);
        self.update(parent, parent_node.with_children(children))
    }

    // === Internal helpers ===

    /// Promote `key` to root. The previous root is erased only when
    /// nothing references it, so a pinned snapshot survives promotion.
    fn set_root(&mut self, key: N::Key) {
        debug!(root = ?key, "promoting root");
        let old = self.root.replace(key);
        if let Some(old) = old {
            if self.root.as_ref() == Some(&old) {
                return;
            }
            let mut forest = self.forest.borrow_mut();
            if forest.contains(&old) && forest.ref_count(&old) == 0 {
                forest.erase(&old);
            }
        }
    }

    /// Enqueue the (child, parent) rewrites for every parent edge of
    /// `child` worth preserving: skip the new value's own synthetic
    /// self-reference, skip parents the new value already lists as
    /// children (cycle guard), and skip parents that are neither
    /// referenced elsewhere nor the current root.
    fn enqueue_parents(
        &self,
        child: &N::Key,
        value: &N,
        to_visit: &mut VecDeque<(N::Key, N::Key)>,
    ) {
        if self.root.as_ref() == Some(child) {
            return;
        }
        let forest = self.forest.borrow();
        let value_key = value.key();
        for parent in forest.parents(child) {
            if *parent == value_key || value.children().contains(parent) {
                continue;
            }
            let grandparents = forest.ref_count(parent);
            if grandparents != 0 || self.root.as_ref() == Some(parent) {
                to_visit.push_back((child.clone(), parent.clone()));
            }
        }
    }
}

impl<N: Vertex> PartialEq for Tree<N> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.forest, &other.forest) && self.root == other.root
    }
}

/// Update-local old-key → new-key translation table.
struct Mapping<K: Ord + Clone> {
    map: BTreeMap<K, K>,
}

impl<K: Ord + Clone> Mapping<K> {
    fn new() -> Self {
        Mapping {
            map: BTreeMap::new(),
        }
    }

    fn set(&mut self, input: K, output: K) {
        if input != output {
            self.map.insert(input, output);
        }
    }

    fn resolve(&self, input: &K) -> K {
        self.map.get(input).cloned().unwrap_or_else(|| input.clone())
    }
}

fn unique_copy<K: PartialEq + Clone>(input: &[K]) -> Vec<K> {
    let mut output = Vec::with_capacity(input.len());
    for key in input {
        if !output.contains(key) {
            output.push(key.clone());
        }
    }
    output
}

fn exclude_copy<K: PartialEq + Clone>(input: &[K], exclude: &K) -> Vec<K> {
    let mut output = Vec::with_capacity(input.len());
    for key in input {
        if key != exclude && !output.contains(key) {
            output.push(key.clone());
        }
    }
    output
}

fn insert_unique<K: PartialEq>(list: &mut Vec<K>, key: K) {
    if !list.contains(&key) {
        list.push(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Content-keyed test node: the key is derived from the label and the
    /// child list, so every new version addresses a distinct key.
    #[derive(Clone, Debug, PartialEq)]
    struct Rev {
        label: String,
        children: Vec<String>,
    }

    impl Rev {
        fn new(label: &str, children: &[&str]) -> Self {
            Rev {
                label: label.to_string(),
                children: children.iter().map(|c| c.to_string()).collect(),
            }
        }
    }

    impl Vertex for Rev {
        type Key = String;

        fn key(&self) -> String {
            if self.children.is_empty() {
                self.label.clone()
            } else {
                format!("{}({})", self.label, self.children.join(","))
            }
        }

        fn children(&self) -> &[String] {
            &self.children
        }

        fn with_children(&self, children: Vec<String>) -> Self {
            Rev {
                label: self.label.clone(),
                children,
            }
        }
    }

    fn shared() -> SharedForest<Rev> {
        Rc::new(RefCell::new(Forest::new()))
    }

    fn key(label: &str, children: &[&str]) -> String {
        Rev::new(label, children).key()
    }

    /// c ← b ← a, rooted at a.
    fn chain(forest: &SharedForest<Rev>) -> Tree<Rev> {
        let mut f = forest.borrow_mut();
        f.insert(Rev::new("c", &[]));
        f.insert(Rev::new("b", &["c"]));
        let (root, _) = f.insert(Rev::new("a", &[&key("b", &["c"])]));
        drop(f);
        Tree::with_root(Rc::clone(forest), root).unwrap()
    }

    #[test]
    fn test_update_rewrites_ancestor_path() {
        let forest = shared();
        let mut tree = chain(&forest);
        let old_root = tree.root().unwrap().clone();

        let target = tree.update(&"c".to_string(), Rev::new("c2", &[])).unwrap();
        assert_eq!(target, "c2");

        let b2 = key("b", &["c2"]);
        let a2 = key("a", &[&b2]);
        assert_eq!(tree.root(), Some(&a2));

        let f = forest.borrow();
        assert!(f.contains(&"c2".to_string()));
        assert!(f.contains(&b2));
        // the unpinned old versions were collected with the old root
        assert!(!f.contains(&old_root));
        assert!(!f.contains(&key("b", &["c"])));
        assert!(!f.contains(&"c".to_string()));
        assert_eq!(f.len(), 3);
    }

    #[test]
    fn test_update_keeps_pinned_snapshot() {
        let forest = shared();
        let mut tree = chain(&forest);
        let old_root = tree.root().unwrap().clone();

        let pin = Pin::new(Rc::clone(&forest), old_root.clone());
        tree.update(&"c".to_string(), Rev::new("c2", &[])).unwrap();

        {
            let f = forest.borrow();
            // the pinned snapshot resolves unchanged to the old subtree
            let old = f.get(&old_root).unwrap();
            assert_eq!(old.children(), [key("b", &["c"])]);
            assert!(f.contains(&key("b", &["c"])));
            assert!(f.contains(&"c".to_string()));
            assert_eq!(f.len(), 6);
        }

        drop(pin);
        let f = forest.borrow();
        assert!(!f.contains(&old_root));
        assert_eq!(f.len(), 3);
    }

    #[test]
    fn test_update_at_root_promotes_immediately() {
        let forest = shared();
        let mut tree = chain(&forest);
        let old_root = tree.root().unwrap().clone();
        let b = key("b", &["c"]);

        let target = tree
            .update(&old_root, Rev::new("a2", &[&b]))
            .unwrap();
        assert_eq!(tree.root(), Some(&target));
        let f = forest.borrow();
        assert!(!f.contains(&old_root));
        assert_eq!(f.parents(&b), [target.clone()]);
    }

    #[test]
    fn test_diamond_update_rewrites_both_paths() {
        // r → {a, b}, a → c, b → c: updating c must rewrite both
        // ancestor paths and converge on one root.
        let forest = shared();
        let (a, b) = (key("a", &["c"]), key("b", &["c"]));
        let root = {
            let mut f = forest.borrow_mut();
            f.insert(Rev::new("c", &[]));
            f.insert(Rev::new("a", &["c"]));
            f.insert(Rev::new("b", &["c"]));
            f.insert(Rev::new("r", &[&a, &b])).0
        };
        let mut tree = Tree::with_root(Rc::clone(&forest), root.clone()).unwrap();

        tree.update(&"c".to_string(), Rev::new("c2", &[])).unwrap();

        let a2 = key("a", &["c2"]);
        let b2 = key("b", &["c2"]);
        let new_root = key("r", &[&a2, &b2]);
        assert_eq!(tree.root(), Some(&new_root));

        let f = forest.borrow();
        assert!(f.contains(&a2));
        assert!(f.contains(&b2));
        assert!(!f.contains(&root));
        assert!(!f.contains(&"c".to_string()));
        assert_eq!(f.len(), 4);
        // no leaks, no phantom references: everything reachable, nothing
        // pinned
        for key in f.keys() {
            if Some(key) != tree.root() {
                assert!(f.ref_count(key) >= 1, "unreferenced node {:?}", key);
            }
        }
        assert!(f.edges().all(|e| !e.is_pin()));
    }

    #[test]
    fn test_link_produces_new_parent_version() {
        let forest = shared();
        let root = {
            let mut f = forest.borrow_mut();
            f.insert(Rev::new("x", &[]));
            f.insert(Rev::new("r", &["x"])).0
        };
        let mut tree = Tree::with_root(Rc::clone(&forest), root.clone()).unwrap();
        forest.borrow_mut().insert(Rev::new("y", &[]));

        let new_root = tree.link(&root, &"y".to_string()).unwrap();
        assert_eq!(new_root, key("r", &["x", "y"]));
        assert_eq!(tree.root(), Some(&new_root));
        let f = forest.borrow();
        assert!(!f.contains(&root));
        assert_eq!(f.parents(&"y".to_string()), [new_root.clone()]);
        assert_eq!(f.parents(&"x".to_string()), [new_root]);
    }

    #[test]
    fn test_insert_links_new_child() {
        let forest = shared();
        let root = {
            let mut f = forest.borrow_mut();
            f.insert(Rev::new("x", &[]));
            f.insert(Rev::new("r", &["x"])).0
        };
        let mut tree = Tree::with_root(Rc::clone(&forest), root.clone()).unwrap();

        let new_root = tree.insert(&root, Rev::new("y", &[])).unwrap();
        assert_eq!(new_root, key("r", &["x", "y"]));
        assert!(forest.borrow().contains(&"y".to_string()));
    }

    #[test]
    fn test_unlink_collects_orphaned_subtree() {
        let forest = shared();
        let root = {
            let mut f = forest.borrow_mut();
            f.insert(Rev::new("x", &[]));
            f.insert(Rev::new("y", &[]));
            f.insert(Rev::new("r", &["x", "y"])).0
        };
        let mut tree = Tree::with_root(Rc::clone(&forest), root.clone()).unwrap();

        let new_root = tree.unlink(&root, &"y".to_string()).unwrap();
        assert_eq!(new_root, key("r", &["x"]));
        let f = forest.borrow();
        assert!(!f.contains(&"y".to_string()));
        assert!(f.contains(&"x".to_string()));
    }

    #[test]
    fn test_update_missing_source_is_soft_error() {
        let forest = shared();
        let mut tree = chain(&forest);
        let result = tree.update(&"ghost".to_string(), Rev::new("g", &[]));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_tree_identity() {
        let forest = shared();
        let tree_a = chain(&forest);
        let tree_b = Tree::with_root(Rc::clone(&forest), tree_a.root().unwrap().clone()).unwrap();
        assert!(tree_a == tree_b);
        let other = Tree::new(Rc::clone(&forest));
        assert!(tree_a != other);
        assert!(other.is_empty());
        assert!(!tree_a.is_empty());
    }
}
