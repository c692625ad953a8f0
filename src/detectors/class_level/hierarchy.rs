//! Inheritance detectors: refused bequest and speculative generality

use crate::detectors::base::{ClassRule, DetectorConfig};
use crate::detectors::class_level::ClassFacts;
use crate::detectors::method_level::MethodsDetected;
use crate::metrics::{cutoffs, names, TypeMetrics};
use crate::models::{Severity, Smell, SmellKind};

/// Thresholds for refused bequest detection
#[derive(Debug, Clone)]
pub struct RefusedBequestThresholds {
    /// Usage/overriding ratio below which the inheritance is ignored
    pub few_inherited: f64,
    /// Methods above which a class is not trivially small
    pub min_methods: f64,
    /// Average method weight above which methods are non-trivial
    pub average_method_weight: f64,
    /// WMC above which the class is non-trivial
    pub weighted_method_count: f64,
}

impl Default for RefusedBequestThresholds {
    fn default() -> Self {
        Self {
            few_inherited: cutoffs::ONE_THIRD,
            min_methods: cutoffs::SHORT_MEMORY_CAP,
            average_method_weight: 2.0,
            weighted_method_count: 14.0,
        }
    }
}

/// Subclasses that ignore what they inherit
pub struct RefusedBequestRule {
    thresholds: RefusedBequestThresholds,
}

impl RefusedBequestRule {
    pub fn new() -> Self {
        Self {
            thresholds: RefusedBequestThresholds::default(),
        }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        let d = RefusedBequestThresholds::default();
        Self {
            thresholds: RefusedBequestThresholds {
                few_inherited: config.get_option_or("few_inherited", d.few_inherited),
                min_methods: config.get_option_or("min_methods", d.min_methods),
                average_method_weight: config
                    .get_option_or("average_method_weight", d.average_method_weight),
                weighted_method_count: config
                    .get_option_or("weighted_method_count", d.weighted_method_count),
            },
        }
    }
}

impl Default for RefusedBequestRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRule for RefusedBequestRule {
    fn name(&self) -> &'static str {
        "refused-bequest"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::RefusedBequest
    }

    fn description(&self) -> &'static str {
        "Detects subclasses that barely use or override what they inherit"
    }

    fn detect(&self, ty: &MethodsDetected, facts: &ClassFacts) -> Option<Smell> {
        let t = &self.thresholds;
        let metrics = TypeMetrics::new(ty.ty());
        let bur = metrics.get(names::BASE_CLASS_USAGE_RATIO);
        let bovr = metrics.get(names::BASE_CLASS_OVERRIDING_RATIO);

        let ignored: Vec<(&'static str, f64)> = [
            (names::BASE_CLASS_USAGE_RATIO, bur),
            (names::BASE_CLASS_OVERRIDING_RATIO, bovr),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.filter(|v| *v < t.few_inherited).map(|v| (name, v)))
        .collect();
        if ignored.is_empty() || facts.method_count <= t.min_methods {
            return None;
        }

        let amw = facts.average_method_weight;
        let wmc = facts.weighted_method_count;
        let heavy_methods = amw.filter(|v| *v > t.average_method_weight);
        let heavy_class = wmc.filter(|v| *v > t.weighted_method_count);
        if heavy_methods.is_none() && heavy_class.is_none() {
            return None;
        }

        let mut smell = Smell::new(
            SmellKind::RefusedBequest,
            format!(
                "{} methods but little use of inherited members",
                facts.method_count
            ),
        );
        for (metric, value) in ignored {
            smell = smell.with_reading(metric, value, t.few_inherited);
        }
        smell = smell.with_reading(names::NUMBER_OF_METHODS, facts.method_count, t.min_methods);
        if let Some(amw) = heavy_methods {
            smell =
                smell.with_reading(names::AVERAGE_METHOD_WEIGHT, amw, t.average_method_weight);
        }
        if let Some(wmc) = heavy_class {
            smell = smell.with_reading(names::WEIGHTED_METHOD_COUNT, wmc, t.weighted_method_count);
        }
        Some(smell.with_severity(Severity::Medium))
    }
}

/// Abstractions nobody needs yet
pub struct SpeculativeGeneralityRule {
    max_children: f64,
}

impl SpeculativeGeneralityRule {
    pub fn new() -> Self {
        Self { max_children: 1.0 }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        Self {
            max_children: config.get_option_or("max_children", 1.0),
        }
    }
}

impl Default for SpeculativeGeneralityRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRule for SpeculativeGeneralityRule {
    fn name(&self) -> &'static str {
        "speculative-generality"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::SpeculativeGenerality
    }

    fn description(&self) -> &'static str {
        "Detects abstract types with at most one subclass"
    }

    fn detect(&self, ty: &MethodsDetected, _facts: &ClassFacts) -> Option<Smell> {
        let metrics = TypeMetrics::new(ty.ty());
        if metrics.get(names::IS_ABSTRACT)? != 1.0 {
            return None;
        }
        let children = metrics.get(names::NUMBER_OF_CHILDREN)?;
        if children > self.max_children {
            return None;
        }
        Some(
            Smell::new(
                SmellKind::SpeculativeGenerality,
                format!("abstract type with {} subclasses", children),
            )
            .with_reading(names::NUMBER_OF_CHILDREN, children, self.max_children)
            .with_severity(Severity::Low),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::method_level::MethodLevelSmellDetector;
    use crate::models::{MethodSpec, Type};

    fn facts_for(ty: Type) -> (MethodsDetected, ClassFacts) {
        let detected = MethodLevelSmellDetector::new().apply(ty);
        let facts = ClassFacts::of(&detected);
        (detected, facts)
    }

    fn subclass(bur: f64) -> Type {
        let mut ty = Type::new("Child")
            .with_super_type("Parent")
            .with_metric(names::BASE_CLASS_USAGE_RATIO, bur)
            .with_metric(names::BASE_CLASS_OVERRIDING_RATIO, 0.9);
        for i in 0..9 {
            ty.push_method(
                MethodSpec::new(format!("m{}()", i))
                    .with_metric(names::CYCLOMATIC_COMPLEXITY, 3.0),
            );
        }
        ty
    }

    #[test]
    fn test_refused_bequest() {
        let (ty, facts) = facts_for(subclass(0.1));
        let smell = RefusedBequestRule::new()
            .detect(&ty, &facts)
            .expect("refused bequest");
        assert_eq!(smell.reading(names::BASE_CLASS_USAGE_RATIO), Some(0.1));
        assert_eq!(smell.reading(names::BASE_CLASS_OVERRIDING_RATIO), None);
        assert_eq!(smell.reading(names::AVERAGE_METHOD_WEIGHT), Some(3.0));
    }

    #[test]
    fn test_well_used_inheritance() {
        let (ty, facts) = facts_for(subclass(0.8));
        assert!(RefusedBequestRule::new().detect(&ty, &facts).is_none());
    }

    #[test]
    fn test_without_inheritance_metrics() {
        let (ty, facts) = facts_for(Type::new("Root").with_method(MethodSpec::new("a()")));
        assert!(RefusedBequestRule::new().detect(&ty, &facts).is_none());
    }

    #[test]
    fn test_speculative_generality() {
        let abstract_ty = |children: f64| {
            Type::new("AbstractThing")
                .with_metric(names::IS_ABSTRACT, 1.0)
                .with_metric(names::NUMBER_OF_CHILDREN, children)
        };
        let (ty, facts) = facts_for(abstract_ty(1.0));
        assert!(SpeculativeGeneralityRule::new().detect(&ty, &facts).is_some());

        let (ty, facts) = facts_for(abstract_ty(4.0));
        assert!(SpeculativeGeneralityRule::new().detect(&ty, &facts).is_none());

        let (ty, facts) =
            facts_for(Type::new("Concrete").with_metric(names::NUMBER_OF_CHILDREN, 0.0));
        assert!(SpeculativeGeneralityRule::new().detect(&ty, &facts).is_none());
    }
}
