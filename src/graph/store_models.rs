use crate::graph::RelationKind;
use crate::models::{Entity, Method, SmellKind, Type};
use serde::Serialize;

/// Node types in the smelly graph
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Type,
    Method,
}

/// A node in the smelly graph
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    /// Whether the entity carries smells of its own
    pub smelly: bool,
    /// Distinct kinds of the entity's own smells
    pub smell_kinds: Vec<SmellKind>,
}

impl GraphNode {
    pub fn for_type(ty: &Type) -> Self {
        Self {
            id: ty.name().to_string(),
            kind: NodeKind::Type,
            smelly: !ty.own_smells().is_empty(),
            smell_kinds: distinct_kinds(ty),
        }
    }

    pub fn for_method(method: &Method) -> Self {
        Self {
            id: method.id().to_string(),
            kind: NodeKind::Method,
            smelly: method.is_smelly(),
            smell_kinds: distinct_kinds(method),
        }
    }
}

fn distinct_kinds(entity: &impl Entity) -> Vec<SmellKind> {
    let mut kinds: Vec<SmellKind> = entity.smells().iter().map(|s| s.kind).collect();
    kinds.sort();
    kinds.dedup();
    kinds
}

/// An edge in the smelly graph
///
/// The graph is undirected; `source`/`target` record the direction of the
/// first relation that produced the edge.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub kind: RelationKind,
    /// Sum of the weights of all merged relations
    pub weight: f64,
    pub source: String,
    pub target: String,
    /// Set once relations in both directions were merged into this edge
    pub bidirectional: bool,
}

impl GraphEdge {
    pub fn new(kind: RelationKind, source: &str, target: &str, weight: f64) -> Self {
        Self {
            kind,
            weight,
            source: source.to_string(),
            target: target.to_string(),
            bidirectional: false,
        }
    }

    pub fn contains(type_id: &str, method_id: &str) -> Self {
        Self::new(RelationKind::Contains, type_id, method_id, 1.0)
    }

    /// Fold another relation between the same pair into this edge
    pub fn merge(&mut self, from: &str, to: &str, weight: f64) {
        self.weight += weight;
        if from == self.target && to == self.source {
            self.bidirectional = true;
        }
    }
}
