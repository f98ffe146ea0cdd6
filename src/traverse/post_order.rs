//! Post-order traversal: children before node

use super::{AllowAll, EdgePredicate};
use crate::model::Vertex;
use crate::store::Forest;

/// Depth-first post-order walk over a forest of binary nodes.
///
/// Visits the left subtree, then the right subtree, then the node. The
/// machine keeps the path from the start to the current node on an
/// explicit stack and tracks the previously visited key to tell a
/// descent from a return without revisiting, so each node is yielded
/// exactly once. Children of non-binary nodes are not descended.
pub struct PostOrderTraversal<'a, N: Vertex, P = AllowAll> {
    forest: &'a Forest<N>,
    start: N::Key,
    position: Option<N::Key>,
    prev: Option<N::Key>,
    to_visit: Vec<N::Key>,
    predicate: P,
    started: bool,
}

impl<'a, N: Vertex> PostOrderTraversal<'a, N, AllowAll> {
    /// Walk from `start`, crossing every edge.
    pub fn new(forest: &'a Forest<N>, start: N::Key) -> Self {
        Self::with_predicate(forest, start, AllowAll)
    }
}

impl<'a, N: Vertex, P: EdgePredicate<N::Key>> PostOrderTraversal<'a, N, P> {
    /// Walk from `start`, crossing only edges the predicate accepts.
    pub fn with_predicate(forest: &'a Forest<N>, start: N::Key, predicate: P) -> Self {
        PostOrderTraversal {
            forest,
            start,
            position: None,
            prev: None,
            to_visit: Vec::new(),
            predicate,
            started: false,
        }
    }

    /// The key of the most recently visited node.
    pub fn position(&self) -> Option<&N::Key> {
        self.position.as_ref()
    }

    fn resolve(&self, key: &N::Key) -> Option<N::Key> {
        self.forest.contains(key).then(|| key.clone())
    }

    /// Descends the left spine from the current position, stacking each
    /// step of the path. Stops on reaching a node already visited, a
    /// missing left child, or a pruned edge. On success the deepest key
    /// is popped back off; it is about to become the position itself.
    fn traverse_left(&mut self) -> bool {
        let mut moved = false;
        while let Some(position) = self.position.clone() {
            let Some(node) = self.forest.get(&position) else {
                break;
            };
            let [left_key, right_key] = node.children() else {
                break;
            };
            let left = self.resolve(left_key);
            if self.resolve(right_key) == self.prev
                || left == self.prev
                || left.is_none()
                || !self.predicate.traverse(&position, left_key)
            {
                moved = false;
                break;
            }
            self.to_visit.push(left_key.clone());
            self.position = left;
            moved = true;
        }
        if moved {
            self.to_visit.pop();
        }
        moved
    }

    /// Steps into the right child of the current position unless that
    /// child is missing, already visited, or pruned.
    fn traverse_right(&mut self) -> bool {
        let Some(position) = self.position.clone() else {
            return false;
        };
        let Some(node) = self.forest.get(&position) else {
            return false;
        };
        let [_, right_key] = node.children() else {
            return false;
        };
        if self.forest.contains(right_key)
            && Some(right_key) != self.prev.as_ref()
            && self.predicate.traverse(&position, right_key)
        {
            self.to_visit.push(right_key.clone());
            self.position = Some(right_key.clone());
            return true;
        }
        false
    }
}

impl<'a, N: Vertex, P: EdgePredicate<N::Key>> Iterator for PostOrderTraversal<'a, N, P> {
    type Item = &'a N;

    fn next(&mut self) -> Option<&'a N> {
        let forest = self.forest;
        if !self.started {
            self.started = true;
            if !forest.contains(&self.start) {
                return None;
            }
            self.to_visit.push(self.start.clone());
            self.position = Some(self.start.clone());
        }
        self.prev = self.position.clone();
        let mut moved = false;
        while !self.to_visit.is_empty() {
            if !moved {
                // returning to the deepest unvisited node on the path
                self.position = self.to_visit.last().cloned();
                moved = true;
            } else if self.traverse_left() {
                break;
            } else if !self.traverse_right() {
                self.to_visit.pop();
                break;
            }
        }
        if !moved {
            self.position = None;
            return None;
        }
        self.position.as_ref().and_then(|key| forest.get(key))
    }
}
