//! Reference-counted node storage
//!
//! A [`Forest`] owns every node in an arena keyed by the node's own key,
//! plus a non-owning multimap of (child, parent) edges. A node stays alive
//! while at least one edge references it; removing the last edge into a
//! node collects it and, transitively, any children that consequently
//! become unreferenced.

mod forest;

pub use forest::Forest;
