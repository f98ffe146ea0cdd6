//! Traversal engine: resumable walks over a node store
//!
//! Each traversal is an [`Iterator`] over `&Forest` holding a current
//! position, strategy-specific worklist state, and a traversability
//! predicate over (parent key, child key). Traversals are forward-only,
//! single-pass, and resumable only by construction; `next` is the
//! single-step advance and `None` is the end marker. A traversal started
//! at an absent position is immediately exhausted. A missing child key
//! halts descent along that edge without error.
//!
//! Traversals never mutate the store, so any number may run concurrently
//! over a forest that is not being mutated; the immutable borrow makes
//! advancing concurrently with mutation unrepresentable.
//!
//! [`Iterator`]: std::iter::Iterator

mod breadth_first;
mod in_order;
mod post_order;
mod pre_order;
mod predicate;

pub use breadth_first::BreadthFirstTraversal;
pub use in_order::InOrderTraversal;
pub use post_order::PostOrderTraversal;
pub use pre_order::PreOrderTraversal;
pub use predicate::{AllowAll, AllowNone, EdgePredicate, MaxDepth};
