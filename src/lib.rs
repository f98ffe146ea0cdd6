//! # canopy
//!
//! A persistent tree and graph toolkit for content-addressed,
//! hierarchical storage.
//!
//! canopy keeps nodes in a reference-counted store where subtrees are
//! collected automatically as they become unreachable, layers a
//! copy-on-write persistent tree on top, and walks either through a
//! family of pruning traversals.
//!
//! ## Core Concepts
//!
//! - **Forest**: node store plus child-to-parent edge map; dropping the
//!   last edge into a node cascades deletion through its subtree
//! - **Tree**: distinguished root over a shared forest; `update` never
//!   mutates a node in place, it path-copies new versions to a new root
//! - **Pin**: self-edge guard keeping a node alive mid-rewrite
//! - **Traversals**: pre-order, in-order, post-order and breadth-first
//!   iterators with predicate-driven edge pruning
//!
//! ## Example
//!
//! ```ignore
//! use canopy::{Forest, Node, Tree};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let forest = Rc::new(RefCell::new(Forest::new()));
//! let mut tree = Tree::new(Rc::clone(&forest));
//! tree.insert(Node::new("leaf", 1));
//! let root = Node::with_edges("root", 0, vec!["leaf"]);
//! tree.insert(root.clone());
//! tree.update(&"leaf".into(), Node::new("leaf2", 2))?;
//! ```

pub mod model;
pub mod store;
pub mod traverse;
pub mod tree;

mod error;

pub use error::{Error, Result};
pub use model::{Edge, Node, Vertex};
pub use store::Forest;
pub use traverse::{
    AllowAll, AllowNone, BreadthFirstTraversal, EdgePredicate, InOrderTraversal, MaxDepth,
    PostOrderTraversal, PreOrderTraversal,
};
pub use tree::{Pin, SharedForest, Tree};
