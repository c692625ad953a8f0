//! Complex class and spaghetti code detectors
//!
//! Both rules count methods by the smells they already carry.

use crate::detectors::base::{ClassRule, DetectorConfig};
use crate::detectors::class_level::ClassFacts;
use crate::detectors::method_level::MethodsDetected;
use crate::models::{Severity, Smell, SmellKind};

/// Classes hosting several overly complex methods
pub struct ComplexClassRule {
    min_complex_methods: usize,
}

impl ComplexClassRule {
    pub fn new() -> Self {
        Self {
            min_complex_methods: 2,
        }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        Self {
            min_complex_methods: config.get_option_or("min_complex_methods", 2),
        }
    }
}

impl Default for ComplexClassRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRule for ComplexClassRule {
    fn name(&self) -> &'static str {
        "complex-class"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::ComplexClass
    }

    fn description(&self) -> &'static str {
        "Detects classes with several high-complexity methods"
    }

    fn detect(&self, _ty: &MethodsDetected, facts: &ClassFacts) -> Option<Smell> {
        let complex = facts.methods_with(SmellKind::HighComplexity);
        if complex < self.min_complex_methods {
            return None;
        }
        let severity = if complex >= 2 * self.min_complex_methods {
            Severity::High
        } else {
            Severity::Medium
        };
        Some(
            Smell::new(
                SmellKind::ComplexClass,
                format!("{} methods with high complexity", complex),
            )
            .with_reading("complexMethods", complex as f64, self.min_complex_methods as f64)
            .with_count(complex)
            .with_severity(severity),
        )
    }
}

/// Classes made of long, parameterless procedures
pub struct SpaghettiCodeRule {
    min_methods: usize,
}

impl SpaghettiCodeRule {
    pub fn new() -> Self {
        Self { min_methods: 2 }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        Self {
            min_methods: config.get_option_or("min_methods", 2),
        }
    }
}

impl Default for SpaghettiCodeRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRule for SpaghettiCodeRule {
    fn name(&self) -> &'static str {
        "spaghetti-code"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::SpaghettiCode
    }

    fn description(&self) -> &'static str {
        "Detects classes with several long methods that take no parameters"
    }

    fn detect(&self, _ty: &MethodsDetected, facts: &ClassFacts) -> Option<Smell> {
        let procedures = facts.long_parameterless_methods;
        if procedures < self.min_methods {
            return None;
        }
        Some(
            Smell::new(
                SmellKind::SpaghettiCode,
                format!("{} long methods without parameters", procedures),
            )
            .with_reading(
                "longParameterlessMethods",
                procedures as f64,
                self.min_methods as f64,
            )
            .with_count(procedures)
            .with_severity(Severity::Medium),
        )
    }
}
