//! Persistent tree layered on the reference-counted store
//!
//! A [`Tree`] pairs a shared [`Forest`] with a distinguished root key and
//! evolves by copy-on-write: mutating one node inserts new versions along
//! the ancestor path to the root, leaving prior versions intact for any
//! other holder. Unchanged sibling subtrees are shared by reference, never
//! copied.
//!
//! [`Forest`]: crate::Forest

mod pin;
#[allow(clippy::module_inception)]
mod tree;

pub use pin::Pin;
pub use tree::{SharedForest, Tree};
