//! God class and brain class detectors
//!
//! A "god class" centralizes the intelligence of a system:
//! - It hosts several long methods
//! - Or it is complex, uses a lot of foreign data and has low cohesion
//!
//! A "brain class" is a large, complex class whose size comes from one or
//! more brain methods. Both rules read the method-level smells of the type.

use crate::detectors::base::{ClassRule, DetectorConfig};
use crate::detectors::class_level::ClassFacts;
use crate::detectors::method_level::MethodsDetected;
use crate::metrics::{cutoffs, names, TypeMetrics};
use crate::models::{Severity, Smell, SmellKind};

/// Thresholds for god class detection
#[derive(Debug, Clone)]
pub struct GodClassThresholds {
    /// Long methods at or above which a class is a god class
    pub min_long_methods: usize,
    /// Foreign data accesses above which a class is suspicious
    pub few_foreign_accesses: f64,
    /// Weighted method count at or above which a class is very complex
    pub very_high_wmc: f64,
    /// Cohesion below which a class is not cohesive
    pub max_cohesion: f64,
}

impl Default for GodClassThresholds {
    fn default() -> Self {
        Self {
            min_long_methods: 3,
            few_foreign_accesses: cutoffs::FEW,
            very_high_wmc: 47.0,
            max_cohesion: cutoffs::ONE_THIRD,
        }
    }
}

/// Detects god classes (classes with too many responsibilities)
pub struct GodClassRule {
    thresholds: GodClassThresholds,
}

impl GodClassRule {
    /// Create a new rule with default thresholds
    pub fn new() -> Self {
        Self::with_thresholds(GodClassThresholds::default())
    }

    /// Create with custom thresholds
    pub fn with_thresholds(thresholds: GodClassThresholds) -> Self {
        Self { thresholds }
    }

    /// Create with custom config
    ///
    /// Supports both `min_long_methods` and `long_methods` as keys.
    pub fn with_config(config: &DetectorConfig) -> Self {
        let defaults = GodClassThresholds::default();
        Self::with_thresholds(GodClassThresholds {
            min_long_methods: config
                .get_option("min_long_methods")
                .or_else(|| config.get_option("long_methods"))
                .unwrap_or(defaults.min_long_methods),
            few_foreign_accesses: config
                .get_option_or("few_foreign_accesses", defaults.few_foreign_accesses),
            very_high_wmc: config.get_option_or("very_high_wmc", defaults.very_high_wmc),
            max_cohesion: config.get_option_or("max_cohesion", defaults.max_cohesion),
        })
    }

    /// Metric-based branch: complex, envious and not cohesive
    fn metric_readings(&self, ty: &MethodsDetected) -> Option<[(&'static str, f64, f64); 3]> {
        let t = &self.thresholds;
        let metrics = TypeMetrics::new(ty.ty());
        let atfd = metrics.get(names::ACCESS_TO_FOREIGN_DATA)?;
        let tcc = metrics.get(names::TIGHT_CLASS_COHESION)?;
        let wmc = metrics.weighted_method_count()?;

        if atfd > t.few_foreign_accesses && wmc >= t.very_high_wmc && tcc < t.max_cohesion {
            Some([
                (names::ACCESS_TO_FOREIGN_DATA, atfd, t.few_foreign_accesses),
                (names::WEIGHTED_METHOD_COUNT, wmc, t.very_high_wmc),
                (names::TIGHT_CLASS_COHESION, tcc, t.max_cohesion),
            ])
        } else {
            None
        }
    }
}

impl Default for GodClassRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRule for GodClassRule {
    fn name(&self) -> &'static str {
        "god-class"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::GodClass
    }

    fn description(&self) -> &'static str {
        "Detects classes with several long methods or with high complexity and low cohesion"
    }

    fn detect(&self, ty: &MethodsDetected, facts: &ClassFacts) -> Option<Smell> {
        let long_methods = facts.methods_with(SmellKind::LongMethod);
        let by_count = long_methods >= self.thresholds.min_long_methods;
        let by_metrics = self.metric_readings(ty);

        if !by_count && by_metrics.is_none() {
            return None;
        }

        let mut reasons = Vec::new();
        let mut smell = Smell::new(SmellKind::GodClass, String::new()).with_count(long_methods);
        if by_count {
            reasons.push(format!("{} long methods", long_methods));
            smell = smell.with_reading(
                "longMethods",
                long_methods as f64,
                self.thresholds.min_long_methods as f64,
            );
        }
        if let Some(readings) = &by_metrics {
            reasons.push(format!(
                "high complexity (WMC {}) with low cohesion (TCC {:.2})",
                readings[1].1, readings[2].1
            ));
            for (metric, value, threshold) in readings {
                smell = smell.with_reading(*metric, *value, *threshold);
            }
        }
        smell.reason = reasons.join(", ");

        let severity = if (by_count && by_metrics.is_some())
            || facts.multi_smell_fraction() >= cutoffs::HALF
        {
            Severity::Critical
        } else {
            Severity::High
        };
        Some(smell.with_severity(severity))
    }
}

/// Thresholds for brain class detection
#[derive(Debug, Clone)]
pub struct BrainClassThresholds {
    /// Class size at or above which a class is very large
    pub very_high_loc: f64,
    /// Weighted method count at or above which a class is very complex
    pub very_high_wmc: f64,
    /// Cohesion below which a class is not cohesive
    pub max_cohesion: f64,
}

impl Default for BrainClassThresholds {
    fn default() -> Self {
        Self {
            very_high_loc: 195.0,
            very_high_wmc: 47.0,
            max_cohesion: cutoffs::HALF,
        }
    }
}

/// Detects large, complex classes built around brain methods
pub struct BrainClassRule {
    thresholds: BrainClassThresholds,
}

impl BrainClassRule {
    pub fn new() -> Self {
        Self {
            thresholds: BrainClassThresholds::default(),
        }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        let defaults = BrainClassThresholds::default();
        Self {
            thresholds: BrainClassThresholds {
                very_high_loc: config.get_option_or("very_high_loc", defaults.very_high_loc),
                very_high_wmc: config.get_option_or("very_high_wmc", defaults.very_high_wmc),
                max_cohesion: config.get_option_or("max_cohesion", defaults.max_cohesion),
            },
        }
    }
}

impl Default for BrainClassRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRule for BrainClassRule {
    fn name(&self) -> &'static str {
        "brain-class"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::BrainClass
    }

    fn description(&self) -> &'static str {
        "Detects large, complex, non-cohesive classes containing brain methods"
    }

    fn detect(&self, ty: &MethodsDetected, facts: &ClassFacts) -> Option<Smell> {
        let t = &self.thresholds;
        let brain_methods = facts.methods_with(SmellKind::BrainMethod);
        if brain_methods == 0 {
            return None;
        }

        let metrics = TypeMetrics::new(ty.ty());
        let loc = metrics.get(names::CLASS_LOC)?;
        let tcc = metrics.get(names::TIGHT_CLASS_COHESION)?;
        let wmc = metrics.weighted_method_count()?;

        let sized = if brain_methods > 1 {
            loc >= t.very_high_loc
        } else {
            loc >= 2.0 * t.very_high_loc && wmc >= 2.0 * t.very_high_wmc
        };
        if !(sized && wmc >= t.very_high_wmc && tcc < t.max_cohesion) {
            return None;
        }

        let loc_bound = if brain_methods > 1 {
            t.very_high_loc
        } else {
            2.0 * t.very_high_loc
        };
        Some(
            Smell::new(
                SmellKind::BrainClass,
                format!(
                    "{} brain methods in {} lines (WMC {}, TCC {:.2})",
                    brain_methods, loc, wmc, tcc
                ),
            )
            .with_reading(names::CLASS_LOC, loc, loc_bound)
            .with_reading(names::WEIGHTED_METHOD_COUNT, wmc, t.very_high_wmc)
            .with_reading(names::TIGHT_CLASS_COHESION, tcc, t.max_cohesion)
            .with_count(brain_methods)
            .with_severity(Severity::High),
        )
    }
}
