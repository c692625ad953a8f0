//! Smelly graph for agglomeration analysis
//!
//! Pure Rust implementation using petgraph. Nodes are smelly types and
//! methods (plus the entities that connect them); edges are containment
//! and structural relations.

pub mod builder;
pub mod relations;
pub mod smelly_graph;
pub mod store_models;

pub use builder::{BuildStats, SmellyGraphBuilder};
pub use relations::{InheritanceRelations, Relation, RelationKind, RelationSource};
pub use smelly_graph::SmellyGraph;
pub use store_models::{GraphEdge, GraphNode, NodeKind};
