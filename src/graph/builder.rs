//! Smelly graph construction
//!
//! Three passes over fully detected types:
//!
//! 1. every smelly method becomes a node with a containment edge to its
//!    type (the type node is added even when the type has no own smells)
//! 2. every smelly type becomes a node
//! 3. relations touching a node from (1)/(2) become coupling edges; the
//!    other endpoint joins as a node if it is not one yet
//!
//! Relations between the same unordered pair with the same kind collapse
//! into one edge whose weight is the sum.

use crate::graph::{GraphEdge, GraphNode, Relation, RelationKind, RelationSource, SmellyGraph};
use crate::models::{Entity, Method, Type};
use petgraph::graph::{EdgeIndex, NodeIndex};
use rustc_hash::FxHashMap;
use std::time::Instant;
use tracing::{debug, info};

/// Counters from one graph build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub type_nodes: usize,
    pub method_nodes: usize,
    pub containment_edges: usize,
    pub coupling_edges: usize,
    /// Relations folded into an existing edge
    pub merged_relations: usize,
    /// Relations from an entity to itself
    pub self_relations: usize,
    /// Relations naming an id that matches no entity
    pub dangling_relations: usize,
    /// Relations with neither endpoint smelly
    pub unrelated_relations: usize,
    pub duration_ms: u64,
}

enum EntityRef<'a> {
    Type(&'a Type),
    Method(&'a Method),
}

impl EntityRef<'_> {
    fn to_node(&self) -> GraphNode {
        match self {
            EntityRef::Type(ty) => GraphNode::for_type(ty),
            EntityRef::Method(method) => GraphNode::for_method(method),
        }
    }
}

/// Builds a [`SmellyGraph`] from detected types and relation sources
pub struct SmellyGraphBuilder<'a> {
    types: &'a [Type],
    sources: Vec<&'a dyn RelationSource>,
}

impl<'a> SmellyGraphBuilder<'a> {
    pub fn new(types: &'a [Type]) -> Self {
        Self {
            types,
            sources: Vec::new(),
        }
    }

    /// Add a relation source; sources are read in the order added
    pub fn with_relations(mut self, source: &'a dyn RelationSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn build(&self) -> (SmellyGraph, BuildStats) {
        let start = Instant::now();
        let mut graph = SmellyGraph::new();
        let mut stats = BuildStats::default();
        let mut edges: FxHashMap<(NodeIndex, NodeIndex, RelationKind), EdgeIndex> =
            FxHashMap::default();

        for ty in self.types {
            for method in ty.smelly_methods() {
                let t = graph.ensure_node(GraphNode::for_type(ty));
                let m = graph.ensure_node(GraphNode::for_method(method));
                let edge = GraphEdge::contains(ty.name(), method.id());
                insert_edge(&mut graph, &mut edges, &mut stats, t, m, edge);
            }
        }
        for ty in self.types.iter().filter(|ty| !ty.own_smells().is_empty()) {
            graph.ensure_node(GraphNode::for_type(ty));
        }
        let smelly_nodes = graph.node_count();

        let entities = self.entity_index();
        for source in &self.sources {
            let relations = source.relations();
            debug!("{} relations from {} source", relations.len(), source.name());
            for relation in relations {
                self.add_relation(
                    &mut graph,
                    &mut edges,
                    &mut stats,
                    &entities,
                    smelly_nodes,
                    &relation,
                );
            }
        }

        stats.type_nodes = graph.count_nodes(crate::graph::NodeKind::Type);
        stats.method_nodes = graph.count_nodes(crate::graph::NodeKind::Method);
        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Built smelly graph: {} nodes ({} types, {} methods), {} edges in {}ms",
            graph.node_count(),
            stats.type_nodes,
            stats.method_nodes,
            graph.edge_count(),
            stats.duration_ms
        );
        if stats.dangling_relations > 0 {
            info!("Discarded {} relations with unknown endpoints", stats.dangling_relations);
        }
        (graph, stats)
    }

    fn entity_index(&self) -> FxHashMap<&'a str, EntityRef<'a>> {
        let mut index = FxHashMap::default();
        for ty in self.types {
            index.insert(ty.name(), EntityRef::Type(ty));
            for method in ty.methods() {
                index.insert(method.id(), EntityRef::Method(method));
            }
        }
        index
    }

    fn add_relation(
        &self,
        graph: &mut SmellyGraph,
        edges: &mut FxHashMap<(NodeIndex, NodeIndex, RelationKind), EdgeIndex>,
        stats: &mut BuildStats,
        entities: &FxHashMap<&'a str, EntityRef<'a>>,
        smelly_nodes: usize,
        relation: &Relation,
    ) {
        if relation.is_self_relation() {
            stats.self_relations += 1;
            return;
        }
        let (Some(from), Some(to)) = (
            entities.get(relation.from.as_str()),
            entities.get(relation.to.as_str()),
        ) else {
            debug!(
                "Discarding {} relation {} -> {}: unknown endpoint",
                relation.kind, relation.from, relation.to
            );
            stats.dangling_relations += 1;
            return;
        };

        let eligible = |id: &str| graph.position(id).is_some_and(|pos| pos < smelly_nodes);
        if !eligible(&relation.from) && !eligible(&relation.to) {
            stats.unrelated_relations += 1;
            return;
        }

        let a = graph.ensure_node(from.to_node());
        let b = graph.ensure_node(to.to_node());
        let edge = GraphEdge::new(relation.kind, &relation.from, &relation.to, relation.weight);
        insert_edge(graph, edges, stats, a, b, edge);
    }
}

fn insert_edge(
    graph: &mut SmellyGraph,
    edges: &mut FxHashMap<(NodeIndex, NodeIndex, RelationKind), EdgeIndex>,
    stats: &mut BuildStats,
    a: NodeIndex,
    b: NodeIndex,
    edge: GraphEdge,
) {
    let key = (a.min(b), a.max(b), edge.kind);
    if let Some(&existing) = edges.get(&key) {
        if let Some(current) = graph.edge_mut(existing) {
            current.merge(&edge.source, &edge.target, edge.weight);
            stats.merged_relations += 1;
        }
        return;
    }
    if edge.kind.is_containment() {
        stats.containment_edges += 1;
    } else {
        stats.coupling_edges += 1;
    }
    let kind = edge.kind;
    let idx = graph.add_edge(a, b, edge);
    edges.insert((key.0, key.1, kind), idx);
}
