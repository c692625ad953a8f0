//! Agglomerations: connected clusters of smelly entities
//!
//! The finder partitions the smelly graph into connected components with a
//! disjoint-set forest over its edges. Every edge kind connects, and every
//! node lands in exactly one component, isolated nodes included. Filtering
//! by size is left to [`AgglomerationReport`].

mod report;

pub use report::{AgglomerationPolicy, AgglomerationReport, Coverage};

use crate::graph::{NodeKind, RelationKind, SmellyGraph};
use crate::models::SmellKind;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// One connected cluster of the smelly graph
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Agglomeration {
    /// Member ids, sorted
    pub members: Vec<String>,
    pub size: usize,
    /// Type members
    pub types: usize,
    /// Method members
    pub methods: usize,
    /// Members carrying smells of their own
    pub smelly_members: usize,
    /// Smell count per kind over all members
    pub smell_histogram: BTreeMap<SmellKind, usize>,
    /// Edge kinds inside the cluster
    pub relation_kinds: BTreeSet<RelationKind>,
}

impl Agglomeration {
    pub fn contains(&self, id: &str) -> bool {
        self.members.binary_search_by(|m| m.as_str().cmp(id)).is_ok()
    }

    /// Smallest member id, the tie-breaker for ordering
    pub fn first_member(&self) -> &str {
        self.members.first().map(String::as_str).unwrap_or("")
    }

    /// Total smells across members
    pub fn total_smells(&self) -> usize {
        self.smell_histogram.values().sum()
    }
}

/// Partitions a smelly graph into agglomerations
#[derive(Debug, Clone, Default)]
pub struct AgglomerationFinder;

impl AgglomerationFinder {
    pub fn new() -> Self {
        Self
    }

    /// All connected components, largest first, ties by smallest member id
    pub fn find_all(&self, graph: &SmellyGraph) -> Vec<Agglomeration> {
        let inner = graph.graph();
        let n = inner.node_count();
        if n == 0 {
            debug!("Empty smelly graph, no agglomerations");
            return Vec::new();
        }

        let mut forest: UnionFind<usize> = UnionFind::new(n);
        for edge in inner.edge_references() {
            forest.union(edge.source().index(), edge.target().index());
        }
        let labels = forest.into_labeling();

        let mut by_root: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
        for (node, root) in labels.iter().enumerate() {
            by_root.entry(*root).or_default().push(node);
        }
        let mut kinds_by_root: FxHashMap<usize, BTreeSet<RelationKind>> = FxHashMap::default();
        for edge in inner.edge_references() {
            kinds_by_root
                .entry(labels[edge.source().index()])
                .or_default()
                .insert(edge.weight().kind);
        }

        let mut agglomerations: Vec<Agglomeration> = by_root
            .into_iter()
            .map(|(root, nodes)| {
                let mut members = Vec::with_capacity(nodes.len());
                let mut types = 0;
                let mut smelly_members = 0;
                let mut smell_histogram = BTreeMap::new();
                for idx in nodes {
                    let node = &inner[petgraph::graph::NodeIndex::new(idx)];
                    if node.kind == NodeKind::Type {
                        types += 1;
                    }
                    if node.smelly {
                        smelly_members += 1;
                    }
                    for kind in &node.smell_kinds {
                        *smell_histogram.entry(*kind).or_insert(0) += 1;
                    }
                    members.push(node.id.clone());
                }
                members.sort();
                let size = members.len();
                Agglomeration {
                    members,
                    size,
                    types,
                    methods: size - types,
                    smelly_members,
                    smell_histogram,
                    relation_kinds: kinds_by_root.remove(&root).unwrap_or_default(),
                }
            })
            .collect();

        agglomerations.sort_by(|a, b| {
            b.size
                .cmp(&a.size)
                .then_with(|| a.first_member().cmp(b.first_member()))
        });

        info!(
            "Found {} agglomerations over {} nodes (largest: {})",
            agglomerations.len(),
            n,
            agglomerations.first().map(|a| a.size).unwrap_or(0)
        );
        agglomerations
    }
}

#[cfg(test)]
mod tests;
