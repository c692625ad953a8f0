//! Coupling rules
//!
//! Feature envy, dispersed coupling, intensive coupling and shotgun
//! surgery all combine several metrics. Every metric a rule reads must be
//! present for the rule to apply.

use crate::detectors::base::{DetectorConfig, MethodRule};
use crate::metrics::{cutoffs, names};
use crate::models::{Entity, Method, Severity, Smell, SmellKind};

/// Thresholds for feature envy detection
#[derive(Debug, Clone)]
pub struct FeatureEnvyThresholds {
    /// Foreign attribute accesses above which a method is suspicious
    pub min_foreign_accesses: f64,
    /// Locality ratio below which a method prefers foreign data
    pub max_locality: f64,
    /// Maximum distinct classes the foreign data may come from
    pub max_providers: f64,
}

impl Default for FeatureEnvyThresholds {
    fn default() -> Self {
        Self {
            min_foreign_accesses: cutoffs::FEW,
            max_locality: cutoffs::ONE_THIRD,
            max_providers: cutoffs::FEW,
        }
    }
}

/// Methods more interested in other classes' data than their own
pub struct FeatureEnvyRule {
    thresholds: FeatureEnvyThresholds,
}

impl FeatureEnvyRule {
    pub fn new() -> Self {
        Self::with_thresholds(FeatureEnvyThresholds::default())
    }

    pub fn with_thresholds(thresholds: FeatureEnvyThresholds) -> Self {
        Self { thresholds }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        let defaults = FeatureEnvyThresholds::default();
        Self::with_thresholds(FeatureEnvyThresholds {
            min_foreign_accesses: config
                .get_option_or("min_foreign_accesses", defaults.min_foreign_accesses),
            max_locality: config.get_option_or("max_locality", defaults.max_locality),
            max_providers: config.get_option_or("max_providers", defaults.max_providers),
        })
    }
}

impl Default for FeatureEnvyRule {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodRule for FeatureEnvyRule {
    fn name(&self) -> &'static str {
        "feature-envy"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::FeatureEnvy
    }

    fn description(&self) -> &'static str {
        "Detects methods that use other classes' data more than their own"
    }

    fn detect(&self, method: &Method) -> Option<Smell> {
        let t = &self.thresholds;
        let atfd = method.metric(names::ACCESS_TO_FOREIGN_DATA)?;
        let laa = method.metric(names::LOCALITY_OF_ATTRIBUTE_ACCESSES)?;
        let fdp = method.metric(names::FOREIGN_DATA_PROVIDERS)?;

        if atfd > t.min_foreign_accesses && laa < t.max_locality && fdp <= t.max_providers {
            let severity = if atfd > 2.0 * t.min_foreign_accesses {
                Severity::High
            } else {
                Severity::Medium
            };
            Some(
                Smell::new(
                    SmellKind::FeatureEnvy,
                    format!(
                        "accesses {} foreign attributes from {} classes, locality {:.2}",
                        atfd, fdp, laa
                    ),
                )
                .with_reading(names::ACCESS_TO_FOREIGN_DATA, atfd, t.min_foreign_accesses)
                .with_reading(names::LOCALITY_OF_ATTRIBUTE_ACCESSES, laa, t.max_locality)
                .with_reading(names::FOREIGN_DATA_PROVIDERS, fdp, t.max_providers)
                .with_severity(severity),
            )
        } else {
            None
        }
    }
}

/// Thresholds shared by the two coupling-intensity rules
#[derive(Debug, Clone)]
pub struct CouplingThresholds {
    /// Called-operation count above which coupling is intensive
    pub short_memory_cap: f64,
    /// Lower called-operation bound for the concentrated case
    pub few: f64,
    /// Dispersion ratio separating dispersed from concentrated coupling
    pub half: f64,
    /// Dispersion ratio for the strongly concentrated case
    pub one_quarter: f64,
    /// Nesting depth above which a method is not trivial
    pub shallow: f64,
}

impl Default for CouplingThresholds {
    fn default() -> Self {
        Self {
            short_memory_cap: cutoffs::SHORT_MEMORY_CAP,
            few: cutoffs::FEW,
            half: cutoffs::HALF,
            one_quarter: cutoffs::ONE_QUARTER,
            shallow: cutoffs::SHALLOW,
        }
    }
}

impl CouplingThresholds {
    fn from_config(config: &DetectorConfig) -> Self {
        let defaults = Self::default();
        Self {
            short_memory_cap: config.get_option_or("short_memory_cap", defaults.short_memory_cap),
            few: config.get_option_or("few", defaults.few),
            half: config.get_option_or("half", defaults.half),
            one_quarter: config.get_option_or("one_quarter", defaults.one_quarter),
            shallow: config.get_option_or("shallow", defaults.shallow),
        }
    }
}

/// The three metrics both coupling rules read
struct CouplingReadings {
    cint: f64,
    cdisp: f64,
    nesting: f64,
}

impl CouplingReadings {
    fn of(method: &Method) -> Option<Self> {
        Some(Self {
            cint: method.metric(names::COUPLING_INTENSITY)?,
            cdisp: method.metric(names::COUPLING_DISPERSION)?,
            nesting: method.metric(names::MAX_NESTING)?,
        })
    }

    fn smell(
        &self,
        kind: SmellKind,
        reason: String,
        t: &CouplingThresholds,
        cint_bound: f64,
        cdisp_bound: f64,
    ) -> Smell {
        Smell::new(kind, reason)
            .with_reading(names::COUPLING_INTENSITY, self.cint, cint_bound)
            .with_reading(names::COUPLING_DISPERSION, self.cdisp, cdisp_bound)
            .with_reading(names::MAX_NESTING, self.nesting, t.shallow)
    }
}

/// Methods calling many operations spread across many classes
pub struct DispersedCouplingRule {
    thresholds: CouplingThresholds,
}

impl DispersedCouplingRule {
    pub fn new() -> Self {
        Self {
            thresholds: CouplingThresholds::default(),
        }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        Self {
            thresholds: CouplingThresholds::from_config(config),
        }
    }
}

impl Default for DispersedCouplingRule {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodRule for DispersedCouplingRule {
    fn name(&self) -> &'static str {
        "dispersed-coupling"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::DispersedCoupling
    }

    fn description(&self) -> &'static str {
        "Detects methods coupled to many operations dispersed over many classes"
    }

    fn detect(&self, method: &Method) -> Option<Smell> {
        let t = &self.thresholds;
        let r = CouplingReadings::of(method)?;

        if r.cint > t.short_memory_cap && r.cdisp >= t.half && r.nesting > t.shallow {
            let reason = format!(
                "calls {} operations with dispersion {:.2}",
                r.cint, r.cdisp
            );
            Some(
                r.smell(SmellKind::DispersedCoupling, reason, t, t.short_memory_cap, t.half)
                    .with_severity(Severity::Medium),
            )
        } else {
            None
        }
    }
}

/// Methods calling many operations concentrated in a few classes
pub struct IntensiveCouplingRule {
    thresholds: CouplingThresholds,
}

impl IntensiveCouplingRule {
    pub fn new() -> Self {
        Self {
            thresholds: CouplingThresholds::default(),
        }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        Self {
            thresholds: CouplingThresholds::from_config(config),
        }
    }
}

impl Default for IntensiveCouplingRule {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodRule for IntensiveCouplingRule {
    fn name(&self) -> &'static str {
        "intensive-coupling"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::IntensiveCoupling
    }

    fn description(&self) -> &'static str {
        "Detects methods coupled to many operations in only a few classes"
    }

    fn detect(&self, method: &Method) -> Option<Smell> {
        let t = &self.thresholds;
        let r = CouplingReadings::of(method)?;
        if r.nesting <= t.shallow {
            return None;
        }

        let (cint_bound, cdisp_bound) = if r.cint > t.short_memory_cap && r.cdisp < t.half {
            (t.short_memory_cap, t.half)
        } else if r.cint > t.few && r.cdisp < t.one_quarter {
            (t.few, t.one_quarter)
        } else {
            return None;
        };

        let reason = format!(
            "calls {} operations concentrated in few classes (dispersion {:.2})",
            r.cint, r.cdisp
        );
        Some(
            r.smell(SmellKind::IntensiveCoupling, reason, t, cint_bound, cdisp_bound)
                .with_severity(Severity::Medium),
        )
    }
}

/// Thresholds for shotgun surgery detection
#[derive(Debug, Clone)]
pub struct ShotgunSurgeryThresholds {
    /// Calling methods above which a change ripples widely
    pub max_changing_methods: f64,
    /// Calling classes above which a change ripples widely
    pub max_changing_classes: f64,
}

impl Default for ShotgunSurgeryThresholds {
    fn default() -> Self {
        Self {
            max_changing_methods: cutoffs::SHORT_MEMORY_CAP,
            max_changing_classes: cutoffs::MANY,
        }
    }
}

/// Methods whose change forces edits in many other methods and classes
pub struct ShotgunSurgeryRule {
    thresholds: ShotgunSurgeryThresholds,
}

impl ShotgunSurgeryRule {
    pub fn new() -> Self {
        Self {
            thresholds: ShotgunSurgeryThresholds::default(),
        }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        let defaults = ShotgunSurgeryThresholds::default();
        Self {
            thresholds: ShotgunSurgeryThresholds {
                max_changing_methods: config
                    .get_option_or("max_changing_methods", defaults.max_changing_methods),
                max_changing_classes: config
                    .get_option_or("max_changing_classes", defaults.max_changing_classes),
            },
        }
    }
}

impl Default for ShotgunSurgeryRule {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodRule for ShotgunSurgeryRule {
    fn name(&self) -> &'static str {
        "shotgun-surgery"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::ShotgunSurgery
    }

    fn description(&self) -> &'static str {
        "Detects methods called from many methods across many classes"
    }

    fn detect(&self, method: &Method) -> Option<Smell> {
        let t = &self.thresholds;
        let cm = method.metric(names::CHANGING_METHODS)?;
        let cc = method.metric(names::CHANGING_CLASSES)?;

        if cm > t.max_changing_methods && cc > t.max_changing_classes {
            let severity = if cc > 2.0 * t.max_changing_classes {
                Severity::High
            } else {
                Severity::Medium
            };
            Some(
                Smell::new(
                    SmellKind::ShotgunSurgery,
                    format!("called from {} methods in {} classes", cm, cc),
                )
                .with_reading(names::CHANGING_METHODS, cm, t.max_changing_methods)
                .with_reading(names::CHANGING_CLASSES, cc, t.max_changing_classes)
                .with_severity(severity),
            )
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MethodSpec, Type};

    fn method(metrics: &[(&str, f64)]) -> Method {
        let spec = metrics
            .iter()
            .fold(MethodSpec::new("f()"), |spec, (name, value)| {
                spec.with_metric(name, *value)
            });
        Type::new("T").with_method(spec).methods()[0].clone()
    }

    #[test]
    fn test_feature_envy() {
        let m = method(&[
            (names::ACCESS_TO_FOREIGN_DATA, 8.0),
            (names::LOCALITY_OF_ATTRIBUTE_ACCESSES, 0.1),
            (names::FOREIGN_DATA_PROVIDERS, 2.0),
        ]);
        let smell = FeatureEnvyRule::new().detect(&m).expect("feature envy");
        assert_eq!(smell.readings.len(), 3);
        assert_eq!(smell.severity, Severity::High);
    }

    #[test]
    fn test_feature_envy_needs_all_metrics() {
        let m = method(&[
            (names::ACCESS_TO_FOREIGN_DATA, 8.0),
            (names::LOCALITY_OF_ATTRIBUTE_ACCESSES, 0.1),
        ]);
        assert!(FeatureEnvyRule::new().detect(&m).is_none());
    }

    #[test]
    fn test_feature_envy_local_method() {
        let m = method(&[
            (names::ACCESS_TO_FOREIGN_DATA, 8.0),
            (names::LOCALITY_OF_ATTRIBUTE_ACCESSES, 0.9),
            (names::FOREIGN_DATA_PROVIDERS, 1.0),
        ]);
        assert!(FeatureEnvyRule::new().detect(&m).is_none());
    }

    #[test]
    fn test_dispersed_vs_intensive() {
        let dispersed = method(&[
            (names::COUPLING_INTENSITY, 10.0),
            (names::COUPLING_DISPERSION, 0.8),
            (names::MAX_NESTING, 3.0),
        ]);
        assert!(DispersedCouplingRule::new().detect(&dispersed).is_some());
        assert!(IntensiveCouplingRule::new().detect(&dispersed).is_none());

        let intensive = method(&[
            (names::COUPLING_INTENSITY, 10.0),
            (names::COUPLING_DISPERSION, 0.2),
            (names::MAX_NESTING, 3.0),
        ]);
        assert!(DispersedCouplingRule::new().detect(&intensive).is_none());
        assert!(IntensiveCouplingRule::new().detect(&intensive).is_some());
    }

    #[test]
    fn test_intensive_coupling_concentrated_branch() {
        let m = method(&[
            (names::COUPLING_INTENSITY, 5.0),
            (names::COUPLING_DISPERSION, 0.2),
            (names::MAX_NESTING, 2.0),
        ]);
        let smell = IntensiveCouplingRule::new().detect(&m).expect("intensive");
        assert_eq!(smell.readings[0].threshold, cutoffs::FEW);
        assert_eq!(smell.readings[1].threshold, cutoffs::ONE_QUARTER);
    }

    #[test]
    fn test_shallow_methods_not_coupling_smells() {
        let m = method(&[
            (names::COUPLING_INTENSITY, 12.0),
            (names::COUPLING_DISPERSION, 0.9),
            (names::MAX_NESTING, 1.0),
        ]);
        assert!(DispersedCouplingRule::new().detect(&m).is_none());
        assert!(IntensiveCouplingRule::new().detect(&m).is_none());
    }

    #[test]
    fn test_shotgun_surgery() {
        let m = method(&[(names::CHANGING_METHODS, 12.0), (names::CHANGING_CLASSES, 6.0)]);
        let smell = ShotgunSurgeryRule::new().detect(&m).expect("shotgun surgery");
        assert_eq!(smell.severity, Severity::Medium);

        let few_classes = method(&[
            (names::CHANGING_METHODS, 12.0),
            (names::CHANGING_CLASSES, 2.0),
        ]);
        assert!(ShotgunSurgeryRule::new().detect(&few_classes).is_none());
    }
}
