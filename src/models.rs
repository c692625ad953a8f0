//! Core data models for smellgraph
//!
//! Types own their methods; a method only remembers its owner by name.
//! Smell sets start empty and are appended to by the detection engine,
//! never edited afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metric name to value, sorted for stable output
pub type MetricMap = BTreeMap<String, f64>;

/// Separator between a type name and a method signature in method ids
pub const METHOD_ID_SEPARATOR: &str = "::";

/// Build the graph-wide id of a method
pub fn method_id(owner: &str, signature: &str) -> String {
    format!("{owner}{METHOD_ID_SEPARATOR}{signature}")
}

/// Severity of a smell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Every smell the rule engine can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SmellKind {
    // Method level
    LongMethod,
    HighComplexity,
    LongParameterList,
    FeatureEnvy,
    DispersedCoupling,
    IntensiveCoupling,
    ShotgunSurgery,
    MessageChain,
    BrainMethod,
    // Class level
    GodClass,
    BrainClass,
    ComplexClass,
    SpaghettiCode,
    DataClass,
    LazyClass,
    RefusedBequest,
    ClassDataShouldBePrivate,
    SpeculativeGenerality,
}

impl SmellKind {
    /// Whether this kind is attached to methods rather than types
    pub fn is_method_level(&self) -> bool {
        matches!(
            self,
            SmellKind::LongMethod
                | SmellKind::HighComplexity
                | SmellKind::LongParameterList
                | SmellKind::FeatureEnvy
                | SmellKind::DispersedCoupling
                | SmellKind::IntensiveCoupling
                | SmellKind::ShotgunSurgery
                | SmellKind::MessageChain
                | SmellKind::BrainMethod
        )
    }
}

impl fmt::Display for SmellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One metric observation that made a rule fire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricReading {
    pub metric: String,
    pub value: f64,
    pub threshold: f64,
}

impl MetricReading {
    pub fn new(metric: impl Into<String>, value: f64, threshold: f64) -> Self {
        Self {
            metric: metric.into(),
            value,
            threshold,
        }
    }
}

/// A detected design smell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Smell {
    pub kind: SmellKind,
    pub severity: Severity,
    pub reason: String,
    pub readings: Vec<MetricReading>,
    /// Contributing element count, for rules that count (e.g. long methods)
    pub count: Option<usize>,
}

impl Smell {
    pub fn new(kind: SmellKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::default(),
            reason: reason.into(),
            readings: Vec::new(),
            count: None,
        }
    }

    pub fn with_reading(mut self, metric: impl Into<String>, value: f64, threshold: f64) -> Self {
        self.readings.push(MetricReading::new(metric, value, threshold));
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// The observed value of a metric that triggered this smell
    pub fn reading(&self, metric: &str) -> Option<f64> {
        self.readings
            .iter()
            .find(|r| r.metric == metric)
            .map(|r| r.value)
    }
}

/// Where an entity lives in the analyzed sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRange {
    pub file: String,
    #[serde(default)]
    pub line_start: Option<u32>,
    #[serde(default)]
    pub line_end: Option<u32>,
}

/// Declaration kind of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    Record,
}

/// Anything that carries metrics and smells
pub trait Entity {
    /// Graph-wide identifier
    fn id(&self) -> &str;

    fn metrics(&self) -> &MetricMap;

    fn smells(&self) -> &[Smell];

    fn is_smelly(&self) -> bool;

    fn metric(&self, name: &str) -> Option<f64> {
        self.metrics().get(name).copied()
    }

    fn has_smell(&self, kind: SmellKind) -> bool {
        self.smells().iter().any(|s| s.kind == kind)
    }
}

/// Append smells whose kind is not present yet; an entity carries at most
/// one smell per kind, so detecting an entity again adds nothing.
fn merge_smells(existing: &mut Vec<Smell>, incoming: impl IntoIterator<Item = Smell>) {
    for smell in incoming {
        if !existing.iter().any(|s| s.kind == smell.kind) {
            existing.push(smell);
        }
    }
}

/// A method and its metrics
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    signature: String,
    qualified_name: String,
    owner: String,
    metrics: MetricMap,
    location: Option<SourceRange>,
    smells: Vec<Smell>,
}

impl Method {
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Name of the owning type
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn location(&self) -> Option<&SourceRange> {
        self.location.as_ref()
    }

    pub(crate) fn add_smells(&mut self, smells: impl IntoIterator<Item = Smell>) {
        merge_smells(&mut self.smells, smells);
    }
}

impl Entity for Method {
    fn id(&self) -> &str {
        &self.qualified_name
    }

    fn metrics(&self) -> &MetricMap {
        &self.metrics
    }

    fn smells(&self) -> &[Smell] {
        &self.smells
    }

    fn is_smelly(&self) -> bool {
        !self.smells.is_empty()
    }
}

/// A type (class, interface, ...) and the methods it declares
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    name: String,
    kind: TypeKind,
    super_type: Option<String>,
    location: Option<SourceRange>,
    metrics: MetricMap,
    methods: Vec<Method>,
    smells: Vec<Smell>,
}

impl Type {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::default(),
            super_type: None,
            location: None,
            metrics: MetricMap::new(),
            methods: Vec::new(),
            smells: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_super_type(mut self, super_type: impl Into<String>) -> Self {
        self.super_type = Some(super_type.into());
        self
    }

    pub fn with_location(mut self, location: SourceRange) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metrics.insert(name.to_string(), value);
        self
    }

    pub fn with_metrics(mut self, metrics: MetricMap) -> Self {
        self.metrics.extend(metrics);
        self
    }

    /// Append a method in declaration order. The method's owner is this type.
    pub fn with_method(mut self, method: MethodSpec) -> Self {
        self.push_method(method);
        self
    }

    pub fn push_method(&mut self, method: MethodSpec) {
        self.methods.push(Method {
            qualified_name: method_id(&self.name, &method.signature),
            owner: self.name.clone(),
            signature: method.signature,
            metrics: method.metrics,
            location: method.location,
            smells: Vec::new(),
        });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn super_type(&self) -> Option<&str> {
        self.super_type.as_deref()
    }

    pub fn location(&self) -> Option<&SourceRange> {
        self.location.as_ref()
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn method(&self, signature: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.signature == signature)
    }

    /// Methods that carry at least one smell, in declaration order
    pub fn smelly_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(|m| m.is_smelly())
    }

    /// Smells attached to the type itself (not its methods)
    pub fn own_smells(&self) -> &[Smell] {
        &self.smells
    }

    pub(crate) fn methods_mut(&mut self) -> &mut [Method] {
        &mut self.methods
    }

    pub(crate) fn add_smells(&mut self, smells: impl IntoIterator<Item = Smell>) {
        merge_smells(&mut self.smells, smells);
    }
}

impl Entity for Type {
    fn id(&self) -> &str {
        &self.name
    }

    fn metrics(&self) -> &MetricMap {
        &self.metrics
    }

    fn smells(&self) -> &[Smell] {
        &self.smells
    }

    fn is_smelly(&self) -> bool {
        !self.smells.is_empty() || self.methods.iter().any(|m| m.is_smelly())
    }
}

/// Method data as supplied by the metric provider, before it joins a type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSpec {
    pub signature: String,
    #[serde(default)]
    pub metrics: MetricMap,
    #[serde(default)]
    pub location: Option<SourceRange>,
}

impl MethodSpec {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            metrics: MetricMap::new(),
            location: None,
        }
    }

    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metrics.insert(name.to_string(), value);
        self
    }

    pub fn with_location(mut self, location: SourceRange) -> Self {
        self.location = Some(location);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_ids_are_qualified_by_owner() {
        let ty = Type::new("com.acme.Order").with_method(MethodSpec::new("total()"));
        let method = &ty.methods()[0];
        assert_eq!(method.id(), "com.acme.Order::total()");
        assert_eq!(method.owner(), "com.acme.Order");
        assert_eq!(method.signature(), "total()");
    }

    #[test]
    fn test_type_is_smelly_through_methods() {
        let mut ty = Type::new("A")
            .with_method(MethodSpec::new("a()"))
            .with_method(MethodSpec::new("b()"));
        assert!(!ty.is_smelly());

        ty.methods_mut()[1].add_smells([Smell::new(SmellKind::LongMethod, "long")]);
        assert!(ty.is_smelly());
        assert!(ty.own_smells().is_empty());
        assert_eq!(ty.smelly_methods().count(), 1);
    }

    #[test]
    fn test_one_smell_per_kind() {
        let mut ty = Type::new("A").with_method(MethodSpec::new("a()"));
        ty.methods_mut()[0].add_smells([Smell::new(SmellKind::LongMethod, "long")]);
        ty.methods_mut()[0].add_smells([
            Smell::new(SmellKind::LongMethod, "long again"),
            Smell::new(SmellKind::HighComplexity, "complex"),
        ]);
        ty.add_smells([Smell::new(SmellKind::GodClass, "god")]);
        ty.add_smells([Smell::new(SmellKind::GodClass, "god")]);

        let kinds: Vec<SmellKind> = ty.methods()[0].smells().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SmellKind::LongMethod, SmellKind::HighComplexity]);
        assert_eq!(ty.methods()[0].smells()[0].reason, "long");
        assert_eq!(ty.own_smells().len(), 1);
    }

    #[test]
    fn test_missing_metric_is_none() {
        let method = Type::new("A")
            .with_method(MethodSpec::new("a()").with_metric("methodLoc", 12.0))
            .methods()[0]
            .clone();
        assert_eq!(method.metric("methodLoc"), Some(12.0));
        assert_eq!(method.metric("cyclomaticComplexity"), None);
    }

    #[test]
    fn test_smell_reading_lookup() {
        let smell = Smell::new(SmellKind::HighComplexity, "complex")
            .with_reading("cyclomaticComplexity", 25.0, 10.0)
            .with_severity(Severity::High);
        assert_eq!(smell.reading("cyclomaticComplexity"), Some(25.0));
        assert_eq!(smell.reading("methodLoc"), None);
        assert_eq!(smell.severity.to_string(), "high");
    }

    #[test]
    fn test_smell_kind_levels() {
        assert!(SmellKind::FeatureEnvy.is_method_level());
        assert!(!SmellKind::GodClass.is_method_level());
        assert_eq!(SmellKind::GodClass.to_string(), "GodClass");
    }
}
