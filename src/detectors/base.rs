//! Base rule traits and types
//!
//! This module defines the core abstractions for smell detection:
//! - `MethodRule` for rules that look at a single method
//! - `ClassRule` for rules that look at a type and its detected methods
//! - `DetectorConfig` for per-rule thresholds
//! - `DetectionSummary` for run statistics

use crate::config::{normalize_detector_name, ProjectConfig, ThresholdValue};
use crate::detectors::class_level::ClassFacts;
use crate::detectors::method_level::MethodsDetected;
use crate::models::{Method, Severity, Smell, SmellKind, Type};
use std::collections::{BTreeMap, HashMap};

/// Configuration options for a single rule
#[derive(Debug, Clone, Default)]
pub struct DetectorConfig {
    /// Rule-specific thresholds and options
    pub options: HashMap<String, serde_json::Value>,
}

impl DetectorConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Threshold overrides for `rule_name` from the project config
    pub fn from_project(rule_name: &str, project: &ProjectConfig) -> Self {
        let mut config = Self::new();
        let Some(thresholds) = project.thresholds_for(rule_name) else {
            return config;
        };
        for (key, value) in thresholds {
            let json = match value {
                ThresholdValue::Integer(v) => serde_json::json!(v),
                ThresholdValue::Float(v) => serde_json::json!(v),
                ThresholdValue::Boolean(v) => serde_json::json!(v),
                ThresholdValue::String(v) => serde_json::json!(v),
            };
            config.options.insert(key.clone(), json);
        }
        config
    }

    /// Set a custom option
    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Get a typed option value
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.options
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Get an option with a default value
    pub fn get_option_or<T: serde::de::DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_option(key).unwrap_or(default)
    }
}

/// A threshold rule over one method's metrics
///
/// Rules never look at smells produced by other rules, so any subset of
/// them can run in any order.
pub trait MethodRule: Send + Sync {
    /// Config key, kebab-case (e.g. "long-method")
    fn name(&self) -> &'static str;

    /// Kind of smell this rule emits
    fn kind(&self) -> SmellKind;

    /// Human-readable description of what this rule finds
    fn description(&self) -> &'static str;

    /// Evaluate the rule. Returns `None` when the rule does not fire or a
    /// metric it needs is missing.
    fn detect(&self, method: &Method) -> Option<Smell>;
}

/// A threshold rule over a type whose methods were already analyzed
pub trait ClassRule: Send + Sync {
    /// Config key, kebab-case (e.g. "god-class")
    fn name(&self) -> &'static str;

    /// Kind of smell this rule emits
    fn kind(&self) -> SmellKind;

    /// Human-readable description of what this rule finds
    fn description(&self) -> &'static str;

    /// Evaluate the rule on a type.
    ///
    /// Accepting `MethodsDetected` rather than `Type` means the method
    /// smells `facts` are derived from are already final.
    fn detect(&self, ty: &MethodsDetected, facts: &ClassFacts) -> Option<Smell>;
}

/// Severity from how far `value` overshoots `threshold`
pub(crate) fn overshoot_severity(value: f64, threshold: f64) -> Severity {
    if threshold <= 0.0 {
        return Severity::Medium;
    }
    let ratio = value / threshold;
    if ratio >= 4.0 {
        Severity::Critical
    } else if ratio >= 2.0 {
        Severity::High
    } else if ratio >= 1.5 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Whether a rule is switched on in the project config
pub(crate) fn rule_enabled(project: &ProjectConfig, rule_name: &str) -> bool {
    project.is_detector_enabled(&normalize_detector_name(rule_name))
}

/// Summary statistics from one detection pass
#[derive(Debug, Clone, Default)]
pub struct DetectionSummary {
    /// Types analyzed
    pub types: usize,
    /// Methods analyzed
    pub methods: usize,
    /// Types carrying a smell of their own or through a method
    pub smelly_types: usize,
    /// Methods carrying at least one smell
    pub smelly_methods: usize,
    /// Total smells across types and methods
    pub total_smells: usize,
    /// Smell count per kind
    pub by_kind: BTreeMap<SmellKind, usize>,
    /// Execution time in milliseconds
    pub duration_ms: u64,
}

impl DetectionSummary {
    /// Tally the smells of one fully detected type
    pub fn add_type(&mut self, ty: &Type) {
        use crate::models::Entity;

        self.types += 1;
        if ty.is_smelly() {
            self.smelly_types += 1;
        }
        for smell in ty.own_smells() {
            self.record(smell);
        }
        for method in ty.methods() {
            self.methods += 1;
            if method.is_smelly() {
                self.smelly_methods += 1;
            }
            for smell in method.smells() {
                self.record(smell);
            }
        }
    }

    fn record(&mut self, smell: &Smell) {
        self.total_smells += 1;
        *self.by_kind.entry(smell.kind).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MethodSpec;

    #[test]
    fn test_detector_config() {
        let config = DetectorConfig::new().with_option("threshold", serde_json::json!(10));

        assert_eq!(config.get_option::<i32>("threshold"), Some(10));
        assert_eq!(config.get_option_or("missing", 5), 5);
        assert_eq!(config.get_option_or("threshold", 0.0), 10.0);
    }

    #[test]
    fn test_detector_config_from_project() {
        let project: ProjectConfig = toml::from_str(
            r#"
            [detectors.long-method]
            thresholds = { max_loc = 80, strict = true }
            "#,
        )
        .expect("parse config");

        let config = DetectorConfig::from_project("long-method", &project);
        assert_eq!(config.get_option::<u32>("max_loc"), Some(80));
        assert_eq!(config.get_option::<bool>("strict"), Some(true));

        let other = DetectorConfig::from_project("god-class", &project);
        assert!(other.options.is_empty());
    }

    #[test]
    fn test_overshoot_severity() {
        assert_eq!(overshoot_severity(11.0, 10.0), Severity::Low);
        assert_eq!(overshoot_severity(16.0, 10.0), Severity::Medium);
        assert_eq!(overshoot_severity(25.0, 10.0), Severity::High);
        assert_eq!(overshoot_severity(40.0, 10.0), Severity::Critical);
        assert_eq!(overshoot_severity(3.0, 0.0), Severity::Medium);
    }

    #[test]
    fn test_detection_summary() {
        let mut ty = Type::new("A")
            .with_method(MethodSpec::new("a()"))
            .with_method(MethodSpec::new("b()"));
        ty.methods_mut()[0].add_smells([
            Smell::new(SmellKind::LongMethod, "long"),
            Smell::new(SmellKind::HighComplexity, "complex"),
        ]);
        ty.add_smells([Smell::new(SmellKind::GodClass, "god")]);

        let mut summary = DetectionSummary::default();
        summary.add_type(&ty);
        summary.add_type(&Type::new("B"));

        assert_eq!(summary.types, 2);
        assert_eq!(summary.methods, 2);
        assert_eq!(summary.smelly_types, 1);
        assert_eq!(summary.smelly_methods, 1);
        assert_eq!(summary.total_smells, 3);
        assert_eq!(summary.by_kind.get(&SmellKind::LongMethod), Some(&1));
    }
}
