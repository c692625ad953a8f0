//! Method-level smell detection
//!
//! Runs a fixed list of independent [`MethodRule`]s over every method of a
//! type. Detection only reads metrics; smells are attached in one step
//! when the type is turned into a [`MethodsDetected`], the value the
//! class-level detector requires as input.

mod brain_method;
mod coupling;
mod size;

pub use brain_method::{BrainMethodRule, BrainMethodThresholds};
pub use coupling::{
    CouplingThresholds, DispersedCouplingRule, FeatureEnvyRule, FeatureEnvyThresholds,
    IntensiveCouplingRule, ShotgunSurgeryRule, ShotgunSurgeryThresholds,
};
pub use size::{HighComplexityRule, LongMethodRule, LongParameterListRule, MessageChainRule};

use crate::config::ProjectConfig;
use crate::detectors::base::{rule_enabled, DetectorConfig, MethodRule};
use crate::models::{Method, Smell, Type};
use std::sync::Arc;
use tracing::debug;

/// All method rules with default thresholds, in evaluation order
pub fn default_method_rules() -> Vec<Arc<dyn MethodRule>> {
    vec![
        Arc::new(LongMethodRule::new()),
        Arc::new(HighComplexityRule::new()),
        Arc::new(LongParameterListRule::new()),
        Arc::new(FeatureEnvyRule::new()),
        Arc::new(DispersedCouplingRule::new()),
        Arc::new(IntensiveCouplingRule::new()),
        Arc::new(ShotgunSurgeryRule::new()),
        Arc::new(MessageChainRule::new()),
        Arc::new(BrainMethodRule::new()),
    ]
}

/// Method rules configured from the project config, disabled rules left out
pub fn configured_method_rules(project: &ProjectConfig) -> Vec<Arc<dyn MethodRule>> {
    let cfg = |name: &str| DetectorConfig::from_project(name, project);
    let rules: Vec<Arc<dyn MethodRule>> = vec![
        Arc::new(LongMethodRule::with_config(&cfg("long-method"))),
        Arc::new(HighComplexityRule::with_config(&cfg("high-complexity"))),
        Arc::new(LongParameterListRule::with_config(&cfg("long-parameter-list"))),
        Arc::new(FeatureEnvyRule::with_config(&cfg("feature-envy"))),
        Arc::new(DispersedCouplingRule::with_config(&cfg("dispersed-coupling"))),
        Arc::new(IntensiveCouplingRule::with_config(&cfg("intensive-coupling"))),
        Arc::new(ShotgunSurgeryRule::with_config(&cfg("shotgun-surgery"))),
        Arc::new(MessageChainRule::with_config(&cfg("message-chain"))),
        Arc::new(BrainMethodRule::with_config(&cfg("brain-method"))),
    ];
    rules
        .into_iter()
        .filter(|rule| rule_enabled(project, rule.name()))
        .collect()
}

/// A type whose methods have all been through method-level detection.
///
/// Only [`MethodLevelSmellDetector::apply`] constructs this value.
#[derive(Debug, Clone)]
pub struct MethodsDetected {
    ty: Type,
}

impl MethodsDetected {
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub(crate) fn into_type(self) -> Type {
        self.ty
    }
}

/// Applies method rules to methods. Stateless and reentrant.
#[derive(Clone)]
pub struct MethodLevelSmellDetector {
    rules: Vec<Arc<dyn MethodRule>>,
}

impl MethodLevelSmellDetector {
    /// Detector with every rule at its default thresholds
    pub fn new() -> Self {
        Self::with_rules(default_method_rules())
    }

    pub fn with_rules(rules: Vec<Arc<dyn MethodRule>>) -> Self {
        Self { rules }
    }

    pub fn from_config(project: &ProjectConfig) -> Self {
        Self::with_rules(configured_method_rules(project))
    }

    /// Active rules in evaluation order
    pub fn rules(&self) -> &[Arc<dyn MethodRule>] {
        &self.rules
    }

    /// Smells for one method. Reads metrics only; calling it twice on the
    /// same method gives the same result.
    pub fn detect(&self, method: &Method) -> Vec<Smell> {
        self.rules
            .iter()
            .filter_map(|rule| rule.detect(method))
            .collect()
    }

    /// Detect and attach smells for every method of `ty`
    pub fn apply(&self, mut ty: Type) -> MethodsDetected {
        for method in ty.methods_mut() {
            let smells = self.detect(method);
            if !smells.is_empty() {
                debug!("{} smells on {}", smells.len(), method.signature());
            }
            method.add_smells(smells);
        }
        MethodsDetected { ty }
    }
}

impl Default for MethodLevelSmellDetector {
    fn default() -> Self {
        Self::new()
    }
}
