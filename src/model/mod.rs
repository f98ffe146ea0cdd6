//! Core data model types: the node capability and plain data records

mod edge;
mod node;

pub use edge::Edge;
pub use node::{Node, Vertex};
