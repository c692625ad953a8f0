//! JSON reporter
//!
//! Serializes borrowed views of the run result as pretty-printed JSON.
//! Optional fields are written as `null` rather than left out, so every
//! record has the same shape.

use crate::agglomeration::AgglomerationReport;
use crate::models::{Entity, Method, MetricMap, Smell, SourceRange, Type, TypeKind};
use anyhow::Result;
use serde::Serialize;

/// One method in the smells file
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodRecord<'a> {
    pub signature: &'a str,
    pub qualified_name: &'a str,
    pub location: Option<&'a SourceRange>,
    pub metrics: &'a MetricMap,
    pub smells: &'a [Smell],
    pub is_smelly: bool,
}

impl<'a> MethodRecord<'a> {
    pub fn new(method: &'a Method) -> Self {
        Self {
            signature: method.signature(),
            qualified_name: method.id(),
            location: method.location(),
            metrics: method.metrics(),
            smells: method.smells(),
            is_smelly: method.is_smelly(),
        }
    }
}

/// One type in the smells file
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRecord<'a> {
    pub name: &'a str,
    pub kind: TypeKind,
    pub super_type: Option<&'a str>,
    pub location: Option<&'a SourceRange>,
    pub metrics: &'a MetricMap,
    pub smells: &'a [Smell],
    pub is_smelly: bool,
    pub methods: Vec<MethodRecord<'a>>,
}

impl<'a> TypeRecord<'a> {
    /// Record for a type; with `only_smelly`, non-smelly methods are hidden
    pub fn new(ty: &'a Type, only_smelly: bool) -> Self {
        let methods = ty
            .methods()
            .iter()
            .filter(|m| !only_smelly || m.is_smelly())
            .map(MethodRecord::new)
            .collect();
        Self {
            name: ty.name(),
            kind: ty.kind(),
            super_type: ty.super_type(),
            location: ty.location(),
            metrics: ty.metrics(),
            smells: ty.own_smells(),
            is_smelly: ty.is_smelly(),
            methods,
        }
    }
}

/// Records for the smells file, in input order
pub fn type_records(types: &[Type], only_smelly: bool) -> Vec<TypeRecord<'_>> {
    types
        .iter()
        .filter(|t| !only_smelly || t.is_smelly())
        .map(|t| TypeRecord::new(t, only_smelly))
        .collect()
}

/// Render the smells file
pub fn render_smells(types: &[Type], only_smelly: bool) -> Result<String> {
    Ok(serde_json::to_string_pretty(&type_records(types, only_smelly))?)
}

/// Render the agglomerations file
pub fn render_agglomerations(report: &AgglomerationReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::{detected_types, sample_report};

    #[test]
    fn test_smells_json_shape() {
        let types = detected_types();
        let json_str = render_smells(&types, false).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");

        let records = parsed.as_array().expect("array of types");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "Order");
        assert_eq!(records[0]["isSmelly"], true);
        assert_eq!(records[0]["kind"], "class");
        // nulls are kept
        assert!(records[0]["superType"].is_null());
        assert!(records[1]["location"].is_null());

        let total = &records[0]["methods"][0];
        assert_eq!(total["qualifiedName"], "Order::total()");
        assert_eq!(total["smells"][0]["kind"], "HighComplexity");
        assert_eq!(total["smells"][0]["readings"][0]["value"], 25.0);
        assert!(total["smells"][0]["count"].is_null());
        assert_eq!(records[0]["methods"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_only_smelly_filter() {
        let types = detected_types();
        let records = type_records(&types, true);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Order");
        assert_eq!(records[0].methods.len(), 1);
        assert_eq!(records[0].methods[0].signature, "total()");
        // The entities themselves are untouched
        assert_eq!(types[0].methods().len(), 2);
    }

    #[test]
    fn test_agglomerations_json() {
        let json_str = render_agglomerations(&sample_report()).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");

        assert_eq!(parsed["minSize"], 2);
        assert_eq!(parsed["coverage"]["totalComponents"], 1);
        let first = &parsed["agglomerations"][0];
        assert_eq!(first["members"][0], "Order");
        assert_eq!(first["smellHistogram"]["HighComplexity"], 1);
        assert_eq!(first["relationKinds"][0], "contains");
    }
}
