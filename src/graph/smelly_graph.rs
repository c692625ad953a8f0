//! The smelly graph: smelly entities joined by containment and coupling
//!
//! Built once by [`SmellyGraphBuilder`](crate::graph::SmellyGraphBuilder),
//! read-only afterwards. Node ids are entity ids; lookups go through an
//! insertion-ordered index so iteration order is stable across runs.

use crate::graph::{GraphEdge, GraphNode, NodeKind, RelationKind};
use indexmap::IndexMap;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

/// Undirected graph of smelly types and methods
#[derive(Debug, Clone, Default)]
pub struct SmellyGraph {
    graph: UnGraph<GraphNode, GraphEdge>,
    index: IndexMap<String, NodeIndex>,
}

impl SmellyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn graph(&self) -> &UnGraph<GraphNode, GraphEdge> {
        &self.graph
    }

    /// Add a node unless one with the same id exists; returns its index
    pub(crate) fn ensure_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node.id) {
            return idx;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        idx
    }

    pub(crate) fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, edge: GraphEdge) -> EdgeIndex {
        self.graph.add_edge(a, b, edge)
    }

    pub(crate) fn edge_mut(&mut self, idx: EdgeIndex) -> Option<&mut GraphEdge> {
        self.graph.edge_weight_mut(idx)
    }

    /// Position of `id` in insertion order
    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.index.get_index_of(id)
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index(id).and_then(|idx| self.graph.node_weight(idx))
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.index.values().map(move |&idx| &self.graph[idx])
    }

    /// Edges as (endpoint id, endpoint id, edge)
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &GraphEdge)> {
        self.graph.edge_references().map(move |e| {
            (
                self.graph[e.source()].id.as_str(),
                self.graph[e.target()].id.as_str(),
                e.weight(),
            )
        })
    }

    /// The edge of `kind` between `a` and `b`, in either direction
    pub fn edge_between(&self, a: &str, b: &str, kind: RelationKind) -> Option<&GraphEdge> {
        let (a, b) = (self.node_index(a)?, self.node_index(b)?);
        self.graph
            .edges_connecting(a, b)
            .map(|e| e.weight())
            .find(|edge| edge.kind == kind)
    }

    /// Ids of the nodes adjacent to `id`, sorted and deduplicated
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(idx) = self.node_index(id) else {
            return Vec::new();
        };
        let mut ids: Vec<&str> = self
            .graph
            .neighbors(idx)
            .map(|n| self.graph[n].id.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn count_nodes(&self, kind: NodeKind) -> usize {
        self.nodes().filter(|n| n.kind == kind).count()
    }
}
