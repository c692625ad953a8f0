//! Data-holder detectors: data class, lazy class and exposed class data

use crate::detectors::base::{overshoot_severity, ClassRule, DetectorConfig};
use crate::detectors::class_level::ClassFacts;
use crate::detectors::method_level::MethodsDetected;
use crate::metrics::{cutoffs, names, TypeMetrics};
use crate::models::{Severity, Smell, SmellKind};

/// Thresholds for data class detection
#[derive(Debug, Clone)]
pub struct DataClassThresholds {
    /// Weight of class below which the interface is mostly data
    pub max_weight_of_class: f64,
    /// Exposed members (public attributes + accessors) above which a class leaks data
    pub few_exposed: f64,
    /// Exposed members for the larger-class branch
    pub many_exposed: f64,
    /// WMC below which a class with few exposed members does little
    pub high_wmc: f64,
    /// WMC below which a class with many exposed members does little
    pub very_high_wmc: f64,
}

impl Default for DataClassThresholds {
    fn default() -> Self {
        Self {
            max_weight_of_class: cutoffs::ONE_THIRD,
            few_exposed: cutoffs::FEW,
            many_exposed: cutoffs::MANY,
            high_wmc: 31.0,
            very_high_wmc: 47.0,
        }
    }
}

/// Classes that expose data but provide little behavior
pub struct DataClassRule {
    thresholds: DataClassThresholds,
}

impl DataClassRule {
    pub fn new() -> Self {
        Self {
            thresholds: DataClassThresholds::default(),
        }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        let d = DataClassThresholds::default();
        Self {
            thresholds: DataClassThresholds {
                max_weight_of_class: config
                    .get_option_or("max_weight_of_class", d.max_weight_of_class),
                few_exposed: config.get_option_or("few_exposed", d.few_exposed),
                many_exposed: config.get_option_or("many_exposed", d.many_exposed),
                high_wmc: config.get_option_or("high_wmc", d.high_wmc),
                very_high_wmc: config.get_option_or("very_high_wmc", d.very_high_wmc),
            },
        }
    }
}

impl Default for DataClassRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRule for DataClassRule {
    fn name(&self) -> &'static str {
        "data-class"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::DataClass
    }

    fn description(&self) -> &'static str {
        "Detects classes that expose their data and have little behavior"
    }

    fn detect(&self, ty: &MethodsDetected, facts: &ClassFacts) -> Option<Smell> {
        let t = &self.thresholds;
        let metrics = TypeMetrics::new(ty.ty());
        let woc = metrics.get(names::WEIGHT_OF_CLASS)?;
        let exposed = metrics.sum(
            names::NUMBER_OF_PUBLIC_ATTRIBUTES,
            names::NUMBER_OF_ACCESSOR_METHODS,
        )?;
        let wmc = facts.weighted_method_count?;

        if woc >= t.max_weight_of_class {
            return None;
        }
        let (exposed_bound, wmc_bound) = if exposed > t.few_exposed && wmc < t.high_wmc {
            (t.few_exposed, t.high_wmc)
        } else if exposed > t.many_exposed && wmc < t.very_high_wmc {
            (t.many_exposed, t.very_high_wmc)
        } else {
            return None;
        };

        Some(
            Smell::new(
                SmellKind::DataClass,
                format!(
                    "{} exposed members, weight of class {:.2}, WMC {}",
                    exposed, woc, wmc
                ),
            )
            .with_reading(names::WEIGHT_OF_CLASS, woc, t.max_weight_of_class)
            .with_reading("exposedMembers", exposed, exposed_bound)
            .with_reading(names::WEIGHTED_METHOD_COUNT, wmc, wmc_bound)
            .with_severity(Severity::Medium),
        )
    }
}

/// Classes too small to justify their existence
pub struct LazyClassRule {
    max_loc: f64,
    min_methods: f64,
}

impl LazyClassRule {
    pub fn new() -> Self {
        Self {
            max_loc: 20.0,
            min_methods: 3.0,
        }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        Self {
            max_loc: config.get_option_or("max_loc", 20.0),
            min_methods: config.get_option_or("min_methods", 3.0),
        }
    }
}

impl Default for LazyClassRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRule for LazyClassRule {
    fn name(&self) -> &'static str {
        "lazy-class"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::LazyClass
    }

    fn description(&self) -> &'static str {
        "Detects classes with very little code and very few methods"
    }

    fn detect(&self, ty: &MethodsDetected, facts: &ClassFacts) -> Option<Smell> {
        let loc = TypeMetrics::new(ty.ty()).get(names::CLASS_LOC)?;
        if loc >= self.max_loc || facts.method_count >= self.min_methods {
            return None;
        }
        Some(
            Smell::new(
                SmellKind::LazyClass,
                format!("{} lines and {} methods", loc, facts.method_count),
            )
            .with_reading(names::CLASS_LOC, loc, self.max_loc)
            .with_reading(names::NUMBER_OF_METHODS, facts.method_count, self.min_methods)
            .with_severity(Severity::Low),
        )
    }
}

/// Classes exposing fields instead of encapsulating them
pub struct ClassDataShouldBePrivateRule {
    max_public: f64,
}

impl ClassDataShouldBePrivateRule {
    pub fn new() -> Self {
        Self { max_public: 1.0 }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        Self {
            max_public: config.get_option_or("max_public", 1.0),
        }
    }
}

impl Default for ClassDataShouldBePrivateRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRule for ClassDataShouldBePrivateRule {
    fn name(&self) -> &'static str {
        "class-data-should-be-private"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::ClassDataShouldBePrivate
    }

    fn description(&self) -> &'static str {
        "Detects classes with public attributes"
    }

    fn detect(&self, ty: &MethodsDetected, _facts: &ClassFacts) -> Option<Smell> {
        let public = TypeMetrics::new(ty.ty())
            .get(names::NUMBER_OF_PUBLIC_ATTRIBUTES)
            .filter(|&n| n > self.max_public)?;
        Some(
            Smell::new(
                SmellKind::ClassDataShouldBePrivate,
                format!("{} public attributes", public),
            )
            .with_reading(names::NUMBER_OF_PUBLIC_ATTRIBUTES, public, self.max_public)
            .with_severity(overshoot_severity(public, self.max_public.max(1.0))),
        )
    }
}
