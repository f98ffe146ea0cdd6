//! In-order traversal: left subtree, node, right subtree

use super::{AllowAll, EdgePredicate};
use crate::model::Vertex;
use crate::store::Forest;

/// Depth-first in-order walk over a forest of at-most-binary nodes.
///
/// Two-child nodes are visited between their left and right subtrees.
/// Nodes of any other arity degrade to pre-order at that node: the node
/// is visited first, then its traversable children left to right.
pub struct InOrderTraversal<'a, N: Vertex, P = AllowAll> {
    forest: &'a Forest<N>,
    start: N::Key,
    position: Option<N::Key>,
    next_position: Option<N::Key>,
    /// Pending keys; the flag records whether the key's left spine has
    /// already been descended. Keys stacked by a degrading wide node
    /// have not been, and get their descent at pop time.
    to_visit: Vec<(N::Key, bool)>,
    predicate: P,
    started: bool,
}

impl<'a, N: Vertex> InOrderTraversal<'a, N, AllowAll> {
    /// Walk from `start`, crossing every edge.
    pub fn new(forest: &'a Forest<N>, start: N::Key) -> Self {
        Self::with_predicate(forest, start, AllowAll)
    }
}

impl<'a, N: Vertex, P: EdgePredicate<N::Key>> InOrderTraversal<'a, N, P> {
    /// Walk from `start`, crossing only edges the predicate accepts.
    pub fn with_predicate(forest: &'a Forest<N>, start: N::Key, predicate: P) -> Self {
        InOrderTraversal {
            forest,
            start,
            position: None,
            next_position: None,
            to_visit: Vec::new(),
            predicate,
            started: false,
        }
    }

    /// The key of the most recently visited node.
    pub fn position(&self) -> Option<&N::Key> {
        self.position.as_ref()
    }

    /// Follows left edges of two-child nodes from `next_position`,
    /// stacking each traversable left child. Stops at a leaf, a
    /// non-binary node, a missing child, or a pruned edge.
    fn descend_left(&mut self) {
        let forest = self.forest;
        let mut cursor = self.next_position.clone();
        while let Some(key) = cursor {
            let Some(node) = forest.get(&key) else { break };
            let [left, _] = node.children() else { break };
            if !forest.contains(left) || !self.predicate.traverse(&key, left) {
                break;
            }
            self.to_visit.push((left.clone(), true));
            cursor = Some(left.clone());
        }
    }
}

impl<'a, N: Vertex, P: EdgePredicate<N::Key>> Iterator for InOrderTraversal<'a, N, P> {
    type Item = &'a N;

    fn next(&mut self) -> Option<&'a N> {
        let forest = self.forest;
        if !self.started {
            self.started = true;
            if !forest.contains(&self.start) {
                return None;
            }
            self.to_visit.push((self.start.clone(), true));
            self.next_position = Some(self.start.clone());
        }
        loop {
            self.descend_left();
            let Some((key, descended)) = self.to_visit.pop() else {
                self.position = None;
                return None;
            };
            let Some(node) = forest.get(&key) else {
                self.next_position = None;
                continue;
            };
            if !descended && node.children().len() == 2 {
                // a binary node reached as a wide node's child still gets
                // its left subtree first
                self.to_visit.push((key.clone(), true));
                self.next_position = Some(key);
                continue;
            }
            self.position = Some(key.clone());
            match node.children() {
                [] => self.next_position = None,
                [_, right] => {
                    if forest.contains(right) && self.predicate.traverse(&key, right) {
                        self.to_visit.push((right.clone(), true));
                        self.next_position = Some(right.clone());
                    } else {
                        self.next_position = None;
                    }
                }
                children => {
                    // arity other than two: this node first, children next
                    let mut accepted = Vec::new();
                    for child in children {
                        if forest.contains(child) && self.predicate.traverse(&key, child) {
                            accepted.push(child.clone());
                        }
                    }
                    self.next_position = None;
                    self.to_visit
                        .extend(accepted.into_iter().rev().map(|child| (child, false)));
                }
            }
            return Some(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{keys, node, sample_binary_tree};
    use super::*;
    use crate::store::Forest;

    #[test]
    fn test_in_order_visits_binary_tree() {
        let forest = sample_binary_tree();
        let traversal = InOrderTraversal::new(&forest, "F".to_string());
        assert_eq!(
            keys(traversal),
            ["A", "B", "C", "D", "E", "F", "G", "H", "I"]
        );
    }

    #[test]
    fn test_in_order_from_subtree() {
        let forest = sample_binary_tree();
        let traversal = InOrderTraversal::new(&forest, "D".to_string());
        assert_eq!(keys(traversal), ["C", "D", "E"]);
    }

    #[test]
    fn test_in_order_degrades_on_wide_nodes() {
        let mut forest = Forest::new();
        for key in ["a", "b", "c"] {
            forest.insert(node(key, &[]));
        }
        forest.insert(node("r", &["a", "b", "c"]));
        let traversal = InOrderTraversal::new(&forest, "r".to_string());
        assert_eq!(keys(traversal), ["r", "a", "b", "c"]);
    }

    #[test]
    fn test_in_order_binary_child_of_wide_node_keeps_left_subtree() {
        let mut forest = Forest::new();
        for key in ["a", "c", "x", "y"] {
            forest.insert(node(key, &[]));
        }
        forest.insert(node("b", &["x", "y"]));
        forest.insert(node("r", &["a", "b", "c"]));
        let traversal = InOrderTraversal::new(&forest, "r".to_string());
        assert_eq!(keys(traversal), ["r", "a", "x", "b", "y", "c"]);
    }

    #[test]
    fn test_in_order_pruned_left_edge_halts_descent() {
        let forest = sample_binary_tree();
        let not_into_a = |_parent: &String, child: &String| child != "A";
        let traversal = InOrderTraversal::with_predicate(&forest, "F".to_string(), not_into_a);
        assert_eq!(keys(traversal), ["B", "C", "D", "E", "F", "G", "H", "I"]);
    }

    #[test]
    fn test_in_order_absent_start_is_exhausted() {
        let forest = sample_binary_tree();
        let mut traversal = InOrderTraversal::new(&forest, "Z".to_string());
        assert!(traversal.next().is_none());
        assert!(traversal.position().is_none());
    }
}
