//! Breadth-first traversal

use super::{AllowAll, EdgePredicate};
use crate::model::Vertex;
use crate::store::Forest;
use std::collections::VecDeque;

/// Level-by-level walk over a forest.
///
/// A FIFO worklist is seeded from the current position's traversable
/// child edges; each step dequeues one edge, resolves its endpoint, and
/// schedules that node's children next. Works for any arity.
pub struct BreadthFirstTraversal<'a, N: Vertex, P = AllowAll> {
    forest: &'a Forest<N>,
    start: N::Key,
    position: Option<N::Key>,
    to_visit: VecDeque<N::Key>,
    predicate: P,
    started: bool,
}

impl<'a, N: Vertex> BreadthFirstTraversal<'a, N, AllowAll> {
    /// Walk from `start`, crossing every edge.
    pub fn new(forest: &'a Forest<N>, start: N::Key) -> Self {
        Self::with_predicate(forest, start, AllowAll)
    }
}

impl<'a, N: Vertex, P: EdgePredicate<N::Key>> BreadthFirstTraversal<'a, N, P> {
    /// Walk from `start`, crossing only edges the predicate accepts.
    pub fn with_predicate(forest: &'a Forest<N>, start: N::Key, predicate: P) -> Self {
        BreadthFirstTraversal {
            forest,
            start,
            position: None,
            to_visit: VecDeque::new(),
            predicate,
            started: false,
        }
    }

    /// The key of the most recently visited node.
    pub fn position(&self) -> Option<&N::Key> {
        self.position.as_ref()
    }
}

impl<'a, N: Vertex, P: EdgePredicate<N::Key>> Iterator for BreadthFirstTraversal<'a, N, P> {
    type Item = &'a N;

    fn next(&mut self) -> Option<&'a N> {
        let forest = self.forest;
        if !self.started {
            self.started = true;
            let node = forest.get(&self.start)?;
            self.position = Some(self.start.clone());
            return Some(node);
        }
        if let Some(position) = self.position.clone() {
            if let Some(node) = forest.get(&position) {
                for child in node.children() {
                    if self.predicate.traverse(&position, child) {
                        self.to_visit.push_back(child.clone());
                    }
                }
            }
        }
        while let Some(key) = self.to_visit.pop_front() {
            if let Some(node) = forest.get(&key) {
                self.position = Some(key);
                return Some(node);
            }
            // missing child: the edge leads nowhere
        }
        self.position = None;
        None
    }
}
