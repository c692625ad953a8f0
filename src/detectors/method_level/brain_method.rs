//! Brain method detector
//!
//! A brain method centralizes the behavior of its class: it is long,
//! branchy, deeply nested and touches many variables at once. Brain
//! methods feed the `BrainClass` rule on the class level.

use crate::detectors::base::{DetectorConfig, MethodRule};
use crate::metrics::{cutoffs, names};
use crate::models::{Entity, Method, Severity, Smell, SmellKind};

/// Thresholds for brain method detection
#[derive(Debug, Clone)]
pub struct BrainMethodThresholds {
    /// Lines of code above which a method is long for its class
    pub high_loc: f64,
    /// Minimum cyclomatic complexity
    pub high_complexity: f64,
    /// Minimum nesting depth
    pub deep_nesting: f64,
    /// Accessed variables above which a method holds too much state
    pub many_variables: f64,
}

impl Default for BrainMethodThresholds {
    fn default() -> Self {
        Self {
            high_loc: 65.0,
            high_complexity: 4.0,
            deep_nesting: cutoffs::DEEP,
            many_variables: cutoffs::SHORT_MEMORY_CAP,
        }
    }
}

pub struct BrainMethodRule {
    thresholds: BrainMethodThresholds,
}

impl BrainMethodRule {
    pub fn new() -> Self {
        Self {
            thresholds: BrainMethodThresholds::default(),
        }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        let defaults = BrainMethodThresholds::default();
        Self {
            thresholds: BrainMethodThresholds {
                high_loc: config.get_option_or("high_loc", defaults.high_loc),
                high_complexity: config.get_option_or("high_complexity", defaults.high_complexity),
                deep_nesting: config.get_option_or("deep_nesting", defaults.deep_nesting),
                many_variables: config.get_option_or("many_variables", defaults.many_variables),
            },
        }
    }
}

impl Default for BrainMethodRule {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodRule for BrainMethodRule {
    fn name(&self) -> &'static str {
        "brain-method"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::BrainMethod
    }

    fn description(&self) -> &'static str {
        "Detects long, complex, deeply nested methods that hold too much state"
    }

    fn detect(&self, method: &Method) -> Option<Smell> {
        let t = &self.thresholds;
        let loc = method.metric(names::METHOD_LOC)?;
        let cc = method.metric(names::CYCLOMATIC_COMPLEXITY)?;
        let nesting = method.metric(names::MAX_NESTING)?;
        let noav = method.metric(names::ACCESSED_VARIABLES)?;

        let fires = loc > t.high_loc
            && cc >= t.high_complexity
            && nesting >= t.deep_nesting
            && noav > t.many_variables;
        if !fires {
            return None;
        }

        Some(
            Smell::new(
                SmellKind::BrainMethod,
                format!(
                    "{} lines, complexity {}, nesting {}, {} variables",
                    loc, cc, nesting, noav
                ),
            )
            .with_reading(names::METHOD_LOC, loc, t.high_loc)
            .with_reading(names::CYCLOMATIC_COMPLEXITY, cc, t.high_complexity)
            .with_reading(names::MAX_NESTING, nesting, t.deep_nesting)
            .with_reading(names::ACCESSED_VARIABLES, noav, t.many_variables)
            .with_severity(Severity::High),
        )
    }
}
