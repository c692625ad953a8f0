//! Metric names and derived aggregates
//!
//! Metric values are computed upstream and arrive as plain name/value maps.
//! This module names the metrics the rule engine reads, and derives the
//! few type-level aggregates that can be recovered from method metrics
//! when the provider did not supply them. Supplied maps are never mutated.

pub mod provider;

use crate::models::{Entity, Type};

/// Metric names understood by the detectors
pub mod names {
    // Method metrics
    pub const METHOD_LOC: &str = "methodLoc";
    pub const CYCLOMATIC_COMPLEXITY: &str = "cyclomaticComplexity";
    pub const PARAMETER_COUNT: &str = "parameterCount";
    pub const MAX_NESTING: &str = "maxNesting";
    pub const MAX_CALL_CHAIN: &str = "maxCallChain";
    pub const ACCESSED_VARIABLES: &str = "accessedVariables";
    pub const LOCALITY_OF_ATTRIBUTE_ACCESSES: &str = "localityOfAttributeAccesses";
    pub const FOREIGN_DATA_PROVIDERS: &str = "foreignDataProviders";
    pub const COUPLING_INTENSITY: &str = "couplingIntensity";
    pub const COUPLING_DISPERSION: &str = "couplingDispersion";
    pub const CHANGING_METHODS: &str = "changingMethods";
    pub const CHANGING_CLASSES: &str = "changingClasses";

    // Shared by methods and types
    pub const ACCESS_TO_FOREIGN_DATA: &str = "accessToForeignData";

    // Type metrics
    pub const CLASS_LOC: &str = "classLoc";
    pub const WEIGHTED_METHOD_COUNT: &str = "weightedMethodCount";
    pub const NUMBER_OF_METHODS: &str = "numberOfMethods";
    pub const TIGHT_CLASS_COHESION: &str = "tightClassCohesion";
    pub const WEIGHT_OF_CLASS: &str = "weightOfClass";
    pub const NUMBER_OF_PUBLIC_ATTRIBUTES: &str = "numberOfPublicAttributes";
    pub const NUMBER_OF_ACCESSOR_METHODS: &str = "numberOfAccessorMethods";
    pub const BASE_CLASS_USAGE_RATIO: &str = "baseClassUsageRatio";
    pub const BASE_CLASS_OVERRIDING_RATIO: &str = "baseClassOverridingRatio";
    pub const IS_ABSTRACT: &str = "isAbstract";
    pub const NUMBER_OF_CHILDREN: &str = "numberOfChildren";
    /// Read when supplied, else derived as WMC / method count
    pub const AVERAGE_METHOD_WEIGHT: &str = "averageMethodWeight";
}

/// Shared cutoffs from the metric-based detection strategies literature
pub mod cutoffs {
    pub const ONE_QUARTER: f64 = 0.25;
    pub const ONE_THIRD: f64 = 1.0 / 3.0;
    pub const HALF: f64 = 0.5;
    pub const FEW: f64 = 3.0;
    pub const MANY: f64 = 5.0;
    pub const SHORT_MEMORY_CAP: f64 = 7.0;
    pub const SHALLOW: f64 = 1.0;
    pub const DEEP: f64 = 5.0;
}

/// Read-only metric lookups for a type, falling back to values derived
/// from its methods when the provider left an aggregate out
pub struct TypeMetrics<'a> {
    ty: &'a Type,
}

impl<'a> TypeMetrics<'a> {
    pub fn new(ty: &'a Type) -> Self {
        Self { ty }
    }

    /// Supplied type metric, no fallback
    pub fn get(&self, name: &str) -> Option<f64> {
        self.ty.metric(name)
    }

    /// Weighted method count: supplied value, else sum of method complexities.
    ///
    /// Returns `None` when neither the type nor any method has the inputs.
    pub fn weighted_method_count(&self) -> Option<f64> {
        if let Some(wmc) = self.ty.metric(names::WEIGHTED_METHOD_COUNT) {
            return Some(wmc);
        }
        let complexities: Vec<f64> = self
            .ty
            .methods()
            .iter()
            .filter_map(|m| m.metric(names::CYCLOMATIC_COMPLEXITY))
            .collect();
        if complexities.is_empty() {
            None
        } else {
            Some(complexities.iter().sum())
        }
    }

    /// Method count: supplied value, else the number of declared methods
    pub fn method_count(&self) -> f64 {
        self.ty
            .metric(names::NUMBER_OF_METHODS)
            .unwrap_or(self.ty.methods().len() as f64)
    }

    /// Average method weight: supplied value, else WMC / method count
    pub fn average_method_weight(&self) -> Option<f64> {
        if let Some(amw) = self.ty.metric(names::AVERAGE_METHOD_WEIGHT) {
            return Some(amw);
        }
        let count = self.method_count();
        if count <= 0.0 {
            return None;
        }
        self.weighted_method_count().map(|wmc| wmc / count)
    }

    /// Sum of two supplied metrics; `None` when either is missing
    pub fn sum(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.get(a)? + self.get(b)?)
    }
}
