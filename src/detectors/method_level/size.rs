//! Size rules: long methods, complex methods, long parameter lists and
//! message chains
//!
//! Each rule compares a single metric against an upper bound. The
//! emitted smell carries the observed value and the bound it crossed.

use crate::detectors::base::{overshoot_severity, DetectorConfig, MethodRule};
use crate::metrics::names;
use crate::models::{Entity, Method, Smell, SmellKind};

/// Observed value of `metric` when it is strictly above `threshold`
pub(super) fn above(method: &Method, metric: &str, threshold: f64) -> Option<f64> {
    method.metric(metric).filter(|&value| value > threshold)
}

/// Methods with too many lines of code
pub struct LongMethodRule {
    max_loc: f64,
}

impl LongMethodRule {
    pub fn new() -> Self {
        Self { max_loc: 30.0 }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        Self {
            max_loc: config.get_option_or("max_loc", 30.0),
        }
    }
}

impl Default for LongMethodRule {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodRule for LongMethodRule {
    fn name(&self) -> &'static str {
        "long-method"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::LongMethod
    }

    fn description(&self) -> &'static str {
        "Detects methods with too many lines of code"
    }

    fn detect(&self, method: &Method) -> Option<Smell> {
        let loc = above(method, names::METHOD_LOC, self.max_loc)?;
        Some(
            Smell::new(
                SmellKind::LongMethod,
                format!("{} lines (threshold: {})", loc, self.max_loc),
            )
            .with_reading(names::METHOD_LOC, loc, self.max_loc)
            .with_severity(overshoot_severity(loc, self.max_loc)),
        )
    }
}

/// Methods with high cyclomatic complexity
pub struct HighComplexityRule {
    max_complexity: f64,
}

impl HighComplexityRule {
    pub fn new() -> Self {
        Self {
            max_complexity: 10.0,
        }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        Self {
            max_complexity: config.get_option_or("max_complexity", 10.0),
        }
    }
}

impl Default for HighComplexityRule {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodRule for HighComplexityRule {
    fn name(&self) -> &'static str {
        "high-complexity"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::HighComplexity
    }

    fn description(&self) -> &'static str {
        "Detects methods whose cyclomatic complexity is too high"
    }

    fn detect(&self, method: &Method) -> Option<Smell> {
        let cc = above(method, names::CYCLOMATIC_COMPLEXITY, self.max_complexity)?;
        Some(
            Smell::new(
                SmellKind::HighComplexity,
                format!(
                    "cyclomatic complexity {} (threshold: {})",
                    cc, self.max_complexity
                ),
            )
            .with_reading(names::CYCLOMATIC_COMPLEXITY, cc, self.max_complexity)
            .with_severity(overshoot_severity(cc, self.max_complexity)),
        )
    }
}

/// Methods taking too many parameters
pub struct LongParameterListRule {
    max_params: f64,
}

impl LongParameterListRule {
    pub fn new() -> Self {
        Self { max_params: 5.0 }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        Self {
            max_params: config.get_option_or("max_params", 5.0),
        }
    }
}

impl Default for LongParameterListRule {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodRule for LongParameterListRule {
    fn name(&self) -> &'static str {
        "long-parameter-list"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::LongParameterList
    }

    fn description(&self) -> &'static str {
        "Detects methods with too many parameters"
    }

    fn detect(&self, method: &Method) -> Option<Smell> {
        let params = above(method, names::PARAMETER_COUNT, self.max_params)?;
        Some(
            Smell::new(
                SmellKind::LongParameterList,
                format!("{} parameters (threshold: {})", params, self.max_params),
            )
            .with_reading(names::PARAMETER_COUNT, params, self.max_params)
            .with_severity(overshoot_severity(params, self.max_params)),
        )
    }
}

/// Methods navigating long `a.b().c().d()` chains
pub struct MessageChainRule {
    max_chain: f64,
}

impl MessageChainRule {
    pub fn new() -> Self {
        Self { max_chain: 3.0 }
    }

    pub fn with_config(config: &DetectorConfig) -> Self {
        Self {
            max_chain: config.get_option_or("max_chain", 3.0),
        }
    }
}

impl Default for MessageChainRule {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodRule for MessageChainRule {
    fn name(&self) -> &'static str {
        "message-chain"
    }

    fn kind(&self) -> SmellKind {
        SmellKind::MessageChain
    }

    fn description(&self) -> &'static str {
        "Detects methods that navigate long chains of calls"
    }

    fn detect(&self, method: &Method) -> Option<Smell> {
        let chain = above(method, names::MAX_CALL_CHAIN, self.max_chain)?;
        Some(
            Smell::new(
                SmellKind::MessageChain,
                format!("call chain of length {} (threshold: {})", chain, self.max_chain),
            )
            .with_reading(names::MAX_CALL_CHAIN, chain, self.max_chain)
            .with_severity(overshoot_severity(chain, self.max_chain)),
        )
    }
}
