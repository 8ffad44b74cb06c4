//! Dependency graph model and its read-only traverser.

pub mod model;
pub mod traverser;

pub use model::{Adjacency, Graph, GraphDependency, GraphEdge};
pub use traverser::{GraphTarget, GraphTargetReference, GraphTraverser};
