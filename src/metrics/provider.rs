//! Metrics document loader
//!
//! The parsing and metric-collection stages run outside this crate and
//! hand over a JSON document with one record per type. This module turns
//! that document into [`Type`] entities plus the optional list of
//! structural relations used by the graph builder.

use crate::errors::{SmellError, SmellResult};
use crate::graph::Relation;
use crate::models::{method_id, MethodSpec, MetricMap, SourceRange, Type, TypeKind};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One type as supplied by the metric provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSpec {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub super_type: Option<String>,
    #[serde(default)]
    pub location: Option<SourceRange>,
    #[serde(default)]
    pub metrics: MetricMap,
    #[serde(default)]
    pub methods: Vec<MethodSpec>,
}

/// Whole provider output for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsDocument {
    #[serde(default)]
    pub types: Vec<TypeSpec>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl MetricsDocument {
    /// Read and decode a document from disk
    pub fn from_path(path: &Path) -> SmellResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SmellError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> SmellResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build entities, rejecting duplicate type names, duplicate
    /// signatures within a type, and any two entities sharing a graph id
    /// (a type named `A::f()` next to method `f()` of `A`).
    pub fn into_entities(self) -> SmellResult<(Vec<Type>, Vec<Relation>)> {
        let mut seen_types = FxHashSet::default();
        let mut seen_ids = FxHashSet::default();
        let mut types = Vec::with_capacity(self.types.len());

        for spec in self.types {
            if !seen_types.insert(spec.name.clone()) {
                return Err(SmellError::DuplicateType(spec.name));
            }
            if !seen_ids.insert(spec.name.clone()) {
                return Err(SmellError::DuplicateEntity(spec.name));
            }

            let mut ty = Type::new(spec.name)
                .with_kind(spec.kind)
                .with_metrics(spec.metrics);
            if let Some(super_type) = spec.super_type {
                ty = ty.with_super_type(super_type);
            }
            if let Some(location) = spec.location {
                ty = ty.with_location(location);
            }

            let mut seen_methods = FxHashSet::default();
            for method in spec.methods {
                if !seen_methods.insert(method.signature.clone()) {
                    return Err(SmellError::DuplicateMethod {
                        owner: ty.name().to_string(),
                        signature: method.signature,
                    });
                }
                let id = method_id(ty.name(), &method.signature);
                if !seen_ids.insert(id.clone()) {
                    return Err(SmellError::DuplicateEntity(id));
                }
                ty.push_method(method);
            }
            types.push(ty);
        }

        debug!(
            "Loaded {} types and {} relations from metrics document",
            types.len(),
            self.relations.len()
        );
        Ok((types, self.relations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RelationKind;
    use crate::models::Entity;

    const DOC: &str = r#"{
        "types": [
            {
                "name": "com.acme.Order",
                "superType": "com.acme.Entity",
                "location": { "file": "Order.java", "lineStart": 1, "lineEnd": 120 },
                "metrics": { "classLoc": 120 },
                "methods": [
                    {
                        "signature": "total()",
                        "metrics": { "methodLoc": 40, "cyclomaticComplexity": 12 }
                    },
                    { "signature": "id()" }
                ]
            },
            { "name": "com.acme.Customer", "kind": "interface" }
        ],
        "relations": [
            {
                "from": "com.acme.Order::total()",
                "to": "com.acme.Customer",
                "kind": "calls",
                "weight": 3
            }
        ]
    }"#;

    #[test]
    fn test_document_into_entities() {
        let (types, relations) = MetricsDocument::from_json(DOC)
            .expect("parse document")
            .into_entities()
            .expect("build entities");

        assert_eq!(types.len(), 2);
        let order = &types[0];
        assert_eq!(order.super_type(), Some("com.acme.Entity"));
        assert_eq!(order.metric("classLoc"), Some(120.0));
        assert_eq!(order.methods().len(), 2);
        assert_eq!(order.methods()[0].id(), "com.acme.Order::total()");
        assert_eq!(order.methods()[1].metrics().len(), 0);
        assert_eq!(types[1].kind(), TypeKind::Interface);

        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].kind, RelationKind::Calls);
        assert_eq!(relations[0].weight, 3.0);
    }

    #[test]
    fn test_empty_document() {
        let (types, relations) = MetricsDocument::from_json("{}")
            .expect("parse")
            .into_entities()
            .expect("entities");
        assert!(types.is_empty());
        assert!(relations.is_empty());
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let doc = r#"{ "types": [ { "name": "A" }, { "name": "A" } ] }"#;
        let err = MetricsDocument::from_json(doc)
            .expect("parse")
            .into_entities()
            .unwrap_err();
        assert!(matches!(err, SmellError::DuplicateType(name) if name == "A"));
    }

    #[test]
    fn test_duplicate_method_rejected() {
        let doc = r#"{ "types": [
            { "name": "A", "methods": [ { "signature": "f()" }, { "signature": "f()" } ] }
        ] }"#;
        let err = MetricsDocument::from_json(doc)
            .expect("parse")
            .into_entities()
            .unwrap_err();
        assert!(matches!(err, SmellError::DuplicateMethod { .. }));
    }

    #[test]
    fn test_type_name_colliding_with_method_id_rejected() {
        let doc = r#"{ "types": [
            { "name": "A", "methods": [ { "signature": "f()", "metrics": { "methodLoc": 80 } } ] },
            { "name": "A::f()", "metrics": { "numberOfPublicAttributes": 5 } }
        ] }"#;
        let err = MetricsDocument::from_json(doc)
            .expect("parse")
            .into_entities()
            .unwrap_err();
        assert!(matches!(err, SmellError::DuplicateEntity(id) if id == "A::f()"));
    }

    #[test]
    fn test_method_id_colliding_with_earlier_type_rejected() {
        let doc = r#"{ "types": [
            { "name": "A::B", "methods": [ { "signature": "f()" } ] },
            { "name": "A", "methods": [ { "signature": "B::f()" } ] }
        ] }"#;
        let err = MetricsDocument::from_json(doc)
            .expect("parse")
            .into_entities()
            .unwrap_err();
        assert!(matches!(err, SmellError::DuplicateEntity(id) if id == "A::B::f()"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = MetricsDocument::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, SmellError::Io { .. }));
    }
}
