//! Structural relations between entities
//!
//! Relations come from outside detection: the metrics document can list
//! them, and inheritance is derived from the types themselves. The graph
//! builder only needs `(from id, to id, kind, weight)`.

use crate::models::Type;
use serde::{Deserialize, Serialize};

/// Kind of a structural relation or graph edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    /// Type owns method
    Contains,
    Calls,
    FieldAccess,
    Inherits,
    Uses,
}

impl RelationKind {
    pub fn is_containment(&self) -> bool {
        matches!(self, RelationKind::Contains)
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RelationKind::Contains => "contains",
            RelationKind::Calls => "calls",
            RelationKind::FieldAccess => "fieldAccess",
            RelationKind::Inherits => "inherits",
            RelationKind::Uses => "uses",
        };
        write!(f, "{}", s)
    }
}

fn default_weight() -> f64 {
    1.0
}

/// A relation between two entity ids (type names or `Type::signature`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
    /// Strength of the relation, e.g. a call count
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl Relation {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            weight: default_weight(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn is_self_relation(&self) -> bool {
        self.from == self.to
    }
}

/// Supplies structural relations to the graph builder
pub trait RelationSource {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn relations(&self) -> Vec<Relation>;
}

impl RelationSource for Vec<Relation> {
    fn name(&self) -> &'static str {
        "explicit"
    }

    fn relations(&self) -> Vec<Relation> {
        self.clone()
    }
}

/// Derives `Inherits` relations from each type's super-type
pub struct InheritanceRelations<'a> {
    types: &'a [Type],
}

impl<'a> InheritanceRelations<'a> {
    pub fn new(types: &'a [Type]) -> Self {
        Self { types }
    }
}

impl RelationSource for InheritanceRelations<'_> {
    fn name(&self) -> &'static str {
        "inheritance"
    }

    fn relations(&self) -> Vec<Relation> {
        self.types
            .iter()
            .filter_map(|ty| {
                ty.super_type()
                    .map(|parent| Relation::new(ty.name(), parent, RelationKind::Inherits))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_json_defaults_weight() {
        let relation: Relation =
            serde_json::from_str(r#"{"from": "A", "to": "B", "kind": "fieldAccess"}"#)
                .expect("parse relation");
        assert_eq!(relation.kind, RelationKind::FieldAccess);
        assert_eq!(relation.weight, 1.0);
        assert!(!relation.is_self_relation());
    }

    #[test]
    fn test_inheritance_relations() {
        let types = vec![
            Type::new("Child").with_super_type("Parent"),
            Type::new("Parent"),
        ];
        let relations = InheritanceRelations::new(&types).relations();
        assert_eq!(
            relations,
            vec![Relation::new("Child", "Parent", RelationKind::Inherits)]
        );
    }
}
