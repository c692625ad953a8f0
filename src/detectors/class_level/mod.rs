//! Class-level smell detection
//!
//! Class rules see a type only after its methods went through
//! [`MethodLevelSmellDetector::apply`](crate::detectors::MethodLevelSmellDetector::apply),
//! because several of them count method smells. The ordering is enforced
//! by the input type: there is no way to build a [`MethodsDetected`]
//! without running method detection first.
//!
//! ```compile_fail
//! use smellgraph::detectors::ClassLevelSmellDetector;
//! use smellgraph::models::Type;
//!
//! // A raw type cannot skip method-level detection.
//! ClassLevelSmellDetector::new().apply(Type::new("A"));
//! ```

mod complexity;
mod data_class;
mod god_class;
mod hierarchy;

pub use complexity::{ComplexClassRule, SpaghettiCodeRule};
pub use data_class::{
    ClassDataShouldBePrivateRule, DataClassRule, DataClassThresholds, LazyClassRule,
};
pub use god_class::{BrainClassRule, BrainClassThresholds, GodClassRule, GodClassThresholds};
pub use hierarchy::{RefusedBequestRule, RefusedBequestThresholds, SpeculativeGeneralityRule};

use crate::config::ProjectConfig;
use crate::detectors::base::{rule_enabled, ClassRule, DetectorConfig};
use crate::detectors::method_level::MethodsDetected;
use crate::metrics::{names, TypeMetrics};
use crate::models::{Entity, Smell, SmellKind, Type};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// All class rules with default thresholds, in evaluation order
pub fn default_class_rules() -> Vec<Arc<dyn ClassRule>> {
    vec![
        Arc::new(GodClassRule::new()),
        Arc::new(BrainClassRule::new()),
        Arc::new(ComplexClassRule::new()),
        Arc::new(SpaghettiCodeRule::new()),
        Arc::new(DataClassRule::new()),
        Arc::new(LazyClassRule::new()),
        Arc::new(RefusedBequestRule::new()),
        Arc::new(ClassDataShouldBePrivateRule::new()),
        Arc::new(SpeculativeGeneralityRule::new()),
    ]
}

/// Class rules configured from the project config, disabled rules left out
pub fn configured_class_rules(project: &ProjectConfig) -> Vec<Arc<dyn ClassRule>> {
    let cfg = |name: &str| DetectorConfig::from_project(name, project);
    let rules: Vec<Arc<dyn ClassRule>> = vec![
        Arc::new(GodClassRule::with_config(&cfg("god-class"))),
        Arc::new(BrainClassRule::with_config(&cfg("brain-class"))),
        Arc::new(ComplexClassRule::with_config(&cfg("complex-class"))),
        Arc::new(SpaghettiCodeRule::with_config(&cfg("spaghetti-code"))),
        Arc::new(DataClassRule::with_config(&cfg("data-class"))),
        Arc::new(LazyClassRule::with_config(&cfg("lazy-class"))),
        Arc::new(RefusedBequestRule::with_config(&cfg("refused-bequest"))),
        Arc::new(ClassDataShouldBePrivateRule::with_config(&cfg(
            "class-data-should-be-private",
        ))),
        Arc::new(SpeculativeGeneralityRule::with_config(&cfg(
            "speculative-generality",
        ))),
    ];
    rules
        .into_iter()
        .filter(|rule| rule_enabled(project, rule.name()))
        .collect()
}

/// Aggregates over a type's detected methods, computed once per type and
/// shared by every class rule
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassFacts {
    /// Supplied `numberOfMethods`, else declared methods
    pub method_count: f64,
    pub weighted_method_count: Option<f64>,
    pub average_method_weight: Option<f64>,
    /// Methods carrying each method-level smell kind
    pub smell_counts: BTreeMap<SmellKind, usize>,
    /// Methods carrying two or more smells
    pub multi_smell_methods: usize,
    /// `LongMethod` methods declared with zero parameters
    pub long_parameterless_methods: usize,
}

impl ClassFacts {
    pub fn of(detected: &MethodsDetected) -> Self {
        let ty = detected.ty();
        let metrics = TypeMetrics::new(ty);
        let mut facts = Self {
            method_count: metrics.method_count(),
            weighted_method_count: metrics.weighted_method_count(),
            average_method_weight: metrics.average_method_weight(),
            ..Self::default()
        };

        for method in ty.methods() {
            let mut kinds: Vec<SmellKind> = method.smells().iter().map(|s| s.kind).collect();
            kinds.sort();
            kinds.dedup();
            for kind in &kinds {
                *facts.smell_counts.entry(*kind).or_insert(0) += 1;
            }
            if method.smells().len() >= 2 {
                facts.multi_smell_methods += 1;
            }
            if method.has_smell(SmellKind::LongMethod)
                && method.metric(names::PARAMETER_COUNT) == Some(0.0)
            {
                facts.long_parameterless_methods += 1;
            }
        }
        facts
    }

    /// Number of methods carrying a smell of `kind`
    pub fn methods_with(&self, kind: SmellKind) -> usize {
        self.smell_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Share of declared methods with more than one smell
    pub fn multi_smell_fraction(&self) -> f64 {
        if self.method_count <= 0.0 {
            0.0
        } else {
            self.multi_smell_methods as f64 / self.method_count
        }
    }
}

/// Applies class rules to types whose methods were already analyzed
#[derive(Clone)]
pub struct ClassLevelSmellDetector {
    rules: Vec<Arc<dyn ClassRule>>,
}

impl ClassLevelSmellDetector {
    /// Detector with every rule at its default thresholds
    pub fn new() -> Self {
        Self::with_rules(default_class_rules())
    }

    pub fn with_rules(rules: Vec<Arc<dyn ClassRule>>) -> Self {
        Self { rules }
    }

    pub fn from_config(project: &ProjectConfig) -> Self {
        Self::with_rules(configured_class_rules(project))
    }

    /// Active rules in evaluation order
    pub fn rules(&self) -> &[Arc<dyn ClassRule>] {
        &self.rules
    }

    /// Class smells for a type. Reads only; repeated calls agree.
    pub fn detect(&self, ty: &MethodsDetected) -> Vec<Smell> {
        let facts = ClassFacts::of(ty);
        self.rules
            .iter()
            .filter_map(|rule| rule.detect(ty, &facts))
            .collect()
    }

    /// Detect and attach class smells, releasing the finished type
    pub fn apply(&self, detected: MethodsDetected) -> Type {
        let smells = self.detect(&detected);
        let mut ty = detected.into_type();
        if !smells.is_empty() {
            debug!("{} class smells on {}", smells.len(), ty.name());
        }
        ty.add_smells(smells);
        ty
    }
}

impl Default for ClassLevelSmellDetector {
    fn default() -> Self {
        Self::new()
    }
}
