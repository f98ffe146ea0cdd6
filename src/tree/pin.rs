//! Scoped guard protecting a node from collection

use super::SharedForest;
use crate::model::{Edge, Vertex};

/// A transient self-edge keeping a node's reference count above zero.
///
/// While a `Pin` is held, the pinned node cannot be reaped by cascading
/// deletion. Dropping the pin removes the protective edge exactly once;
/// if that edge was the node's last reference, the node (and any subtree
/// it solely owned) is collected at that point.
///
/// [`Tree::update`] pins work-in-progress versions internally; callers can
/// also pin a root before updating to retain the old snapshot across the
/// promotion.
///
/// [`Tree::update`]: crate::Tree::update
pub struct Pin<N: Vertex> {
    forest: SharedForest<N>,
    key: N::Key,
    /// Whether this pin owns the protective edge. A pin taken on an
    /// already-pinned key is a no-op guard and releases nothing.
    held: bool,
}

impl<N: Vertex> Pin<N> {
    /// Pin the node stored under `key`. The node must exist.
    pub fn new(forest: SharedForest<N>, key: N::Key) -> Self {
        let held = forest.borrow_mut().insert_edge(Edge::pin(&key));
        Pin { forest, key, held }
    }

    /// The pinned key.
    pub fn key(&self) -> &N::Key {
        &self.key
    }
}

impl<N: Vertex> Drop for Pin<N> {
    fn drop(&mut self) {
        if self.held {
            self.forest.borrow_mut().erase_edge(&Edge::pin(&self.key));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;
    use crate::store::Forest;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_pin_releases_on_drop() {
        let forest = Rc::new(RefCell::new(Forest::new()));
        forest.borrow_mut().insert(Node::new("a", ()));
        {
            let _pin = Pin::new(Rc::clone(&forest), "a");
            assert_eq!(forest.borrow().ref_count(&"a"), 1);
        }
        // last reference gone: collected
        assert!(!forest.borrow().contains(&"a"));
    }

    #[test]
    fn test_second_pin_is_noop_guard() {
        let forest = Rc::new(RefCell::new(Forest::new()));
        forest.borrow_mut().insert(Node::new("a", ()));
        let _outer = Pin::new(Rc::clone(&forest), "a");
        {
            let _inner = Pin::new(Rc::clone(&forest), "a");
            assert_eq!(forest.borrow().ref_count(&"a"), 1);
        }
        // the outer pin still protects the node
        assert!(forest.borrow().contains(&"a"));
    }
}
