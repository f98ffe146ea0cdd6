//! Pre-order traversal: node before children, leftmost first

use super::{AllowAll, EdgePredicate};
use crate::model::Vertex;
use crate::store::Forest;

/// Depth-first pre-order walk over a forest.
///
/// Visits each node before its children and descends into the leftmost
/// traversable child first. Works for any arity.
pub struct PreOrderTraversal<'a, N: Vertex, P = AllowAll> {
    forest: &'a Forest<N>,
    start: N::Key,
    position: Option<N::Key>,
    to_visit: Vec<N::Key>,
    predicate: P,
    started: bool,
}

impl<'a, N: Vertex> PreOrderTraversal<'a, N, AllowAll> {
    /// Walk from `start`, crossing every edge.
    pub fn new(forest: &'a Forest<N>, start: N::Key) -> Self {
        Self::with_predicate(forest, start, AllowAll)
    }
}

impl<'a, N: Vertex, P: EdgePredicate<N::Key>> PreOrderTraversal<'a, N, P> {
    /// Walk from `start`, crossing only edges the predicate accepts.
    pub fn with_predicate(forest: &'a Forest<N>, start: N::Key, predicate: P) -> Self {
        PreOrderTraversal {
            forest,
            start,
            position: None,
            to_visit: Vec::new(),
            predicate,
            started: false,
        }
    }

    /// The key of the most recently visited node.
    pub fn position(&self) -> Option<&N::Key> {
        self.position.as_ref()
    }
}

impl<'a, N: Vertex, P: EdgePredicate<N::Key>> Iterator for PreOrderTraversal<'a, N, P> {
    type Item = &'a N;

    fn next(&mut self) -> Option<&'a N> {
        if !self.started {
            self.started = true;
            let node = self.forest.get(&self.start)?;
            self.position = Some(self.start.clone());
            return Some(node);
        }
        let position = self.position.clone()?;
        if let Some(node) = self.forest.get(&position) {
            // evaluate left to right, then stack in reverse so the
            // leftmost accepted child is visited next
            let mut accepted = Vec::new();
            for child in node.children() {
                if self.predicate.traverse(&position, child) {
                    accepted.push(child.clone());
                }
            }
            self.to_visit.extend(accepted.into_iter().rev());
        }
        while let Some(key) = self.to_visit.pop() {
            if let Some(node) = self.forest.get(&key) {
                self.position = Some(key);
                return Some(node);
            }
            // missing child: descent halts along that edge
        }
        self.position = None;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{keys, sample_dag};
    use super::*;

    #[test]
    fn test_pre_order_visits_dag() {
        let forest = sample_dag();
        let traversal = PreOrderTraversal::new(&forest, "1".to_string());
        assert_eq!(
            keys(traversal),
            ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12"]
        );
    }

    #[test]
    fn test_pre_order_from_subtree() {
        let forest = sample_dag();
        let traversal = PreOrderTraversal::new(&forest, "8".to_string());
        assert_eq!(keys(traversal), ["8", "9", "10", "11", "12"]);
    }

    #[test]
    fn test_pre_order_absent_start_is_exhausted() {
        let forest = sample_dag();
        let mut traversal = PreOrderTraversal::new(&forest, "99".to_string());
        assert!(traversal.next().is_none());
        assert!(traversal.position().is_none());
    }

    #[test]
    fn test_pre_order_pruned_subtree() {
        let forest = sample_dag();
        let not_into_2 =
            |_parent: &String, child: &String| child != "2";
        let traversal = PreOrderTraversal::with_predicate(&forest, "1".to_string(), not_into_2);
        assert_eq!(keys(traversal), ["1", "7", "8", "9", "10", "11", "12"]);
    }
}
