//! Project-level configuration support
//!
//! Loads per-project configuration from `smellgraph.toml` or
//! `.smellgraphrc.json` in the working directory, or from an explicit path.
//!
//! # Configuration Format
//!
//! ```toml
//! # smellgraph.toml
//!
//! [detectors.god-class]
//! enabled = true
//! thresholds = { min_long_methods = 3 }
//!
//! [detectors.lazy-class]
//! enabled = false
//!
//! [agglomeration]
//! min_size = 2
//! inheritance_edges = true
//!
//! [output]
//! only_smelly = true
//! collect_agglomerations = true
//!
//! [defaults]
//! workers = 8
//! log_level = "info"
//! ```

use crate::errors::{SmellError, SmellResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// File names searched by [`load_project_config`], in order
pub const CONFIG_FILE_NAMES: &[&str] = &["smellgraph.toml", ".smellgraphrc.json"];

/// Smallest agglomeration reported unless configured otherwise
pub const DEFAULT_MIN_AGGLOMERATION_SIZE: usize = 2;

/// Project-level configuration loaded from smellgraph.toml or similar
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// Per-rule configuration overrides, keyed by rule name
    #[serde(default)]
    pub detectors: HashMap<String, DetectorConfigOverride>,

    /// Clustering settings
    #[serde(default)]
    pub agglomeration: AgglomerationConfig,

    /// What gets written
    #[serde(default)]
    pub output: OutputConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Configuration override for a specific rule
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DetectorConfigOverride {
    /// Whether the rule is enabled (default: true)
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Rule-specific threshold overrides
    /// Keys depend on the rule (e.g., max_loc, min_long_methods)
    #[serde(default)]
    pub thresholds: HashMap<String, ThresholdValue>,
}

/// A threshold value can be an integer, float, boolean or string
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ThresholdValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
}

impl ThresholdValue {
    /// Get as f64 (returns None for non-numeric types)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ThresholdValue::Integer(v) => Some(*v as f64),
            ThresholdValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// Agglomeration settings
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AgglomerationConfig {
    /// Smallest agglomeration to report (default: 2)
    #[serde(default)]
    pub min_size: Option<usize>,

    /// Connect subclasses to their super-types in the smelly graph
    #[serde(default)]
    pub inheritance_edges: Option<bool>,
}

/// Output settings
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OutputConfig {
    /// Keep only smelly types and hide non-smelly methods
    #[serde(default)]
    pub only_smelly: Option<bool>,

    /// Compute and write agglomerations
    #[serde(default)]
    pub collect_agglomerations: Option<bool>,
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Default number of workers (0 = auto)
    #[serde(default)]
    pub workers: Option<usize>,

    /// Default log level when RUST_LOG is not set
    #[serde(default)]
    pub log_level: Option<String>,

    /// Rules to skip by default
    #[serde(default)]
    pub skip_detectors: Vec<String>,
}

/// Load project configuration from a directory.
///
/// Searches for `smellgraph.toml`, then `.smellgraphrc.json`.
/// Returns default configuration if no config file is found or the file
/// cannot be loaded.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match load_config_file(&path) {
            Ok(config) => {
                debug!("Loaded project config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load and validate configuration from an explicit file.
///
/// `.json` files are read as JSON, everything else as TOML.
pub fn load_config_file(path: &Path) -> SmellResult<ProjectConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| SmellError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let config: ProjectConfig = if is_json {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };
    config.validate()?;
    Ok(config)
}

impl ProjectConfig {
    /// Reject values no component can work with
    pub fn validate(&self) -> SmellResult<()> {
        if self.agglomeration.min_size == Some(0) {
            return Err(SmellError::InvalidConfig(
                "agglomeration.min_size must be at least 1".to_string(),
            ));
        }
        for (name, detector) in &self.detectors {
            if let Some((key, _)) = detector
                .thresholds
                .iter()
                .find(|(_, v)| v.as_f64().map(|f| !f.is_finite() || f < 0.0).unwrap_or(false))
            {
                return Err(SmellError::InvalidConfig(format!(
                    "detectors.{}.thresholds.{} must be a non-negative number",
                    name, key
                )));
            }
        }
        Ok(())
    }

    /// Override block for a rule, matching keys in any naming style
    fn detector(&self, name: &str) -> Option<&DetectorConfigOverride> {
        let normalized = normalize_detector_name(name);
        self.detectors
            .get(&normalized)
            .or_else(|| self.detectors.get(name))
            .or_else(|| {
                self.detectors
                    .iter()
                    .find(|(key, _)| normalize_detector_name(key) == normalized)
                    .map(|(_, config)| config)
            })
    }

    /// Check if a rule is enabled (defaults to true if not specified)
    pub fn is_detector_enabled(&self, name: &str) -> bool {
        let normalized = normalize_detector_name(name);
        if self
            .defaults
            .skip_detectors
            .iter()
            .any(|skipped| normalize_detector_name(skipped) == normalized)
        {
            return false;
        }
        self.detector(name)
            .and_then(|c| c.enabled)
            .unwrap_or(true)
    }

    /// Threshold overrides for a rule (if any)
    pub fn thresholds_for(&self, name: &str) -> Option<&HashMap<String, ThresholdValue>> {
        self.detector(name)
            .map(|c| &c.thresholds)
            .filter(|t| !t.is_empty())
    }

    /// Configured rule names that match none of `known`
    pub fn unknown_detectors(&self, known: &[&str]) -> Vec<String> {
        let mut unknown: Vec<String> = self
            .detectors
            .keys()
            .chain(self.defaults.skip_detectors.iter())
            .filter(|name| {
                let normalized = normalize_detector_name(name);
                !known.iter().any(|k| normalize_detector_name(k) == normalized)
            })
            .cloned()
            .collect();
        unknown.sort();
        unknown.dedup();
        unknown
    }

    /// Effective minimum agglomeration size
    pub fn min_agglomeration_size(&self) -> usize {
        self.agglomeration
            .min_size
            .unwrap_or(DEFAULT_MIN_AGGLOMERATION_SIZE)
    }
}

/// Normalize a rule name for config lookup
/// Converts various formats to kebab-case for matching
pub fn normalize_detector_name(name: &str) -> String {
    // GodClassRule -> god-class
    // HighComplexity -> high-complexity
    // god_class -> god-class
    // god-class -> god-class

    let mut result = String::new();
    let chars: Vec<char> = name.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            // Hyphen before a word start: godClass -> god-class, DTOClass -> dto-class
            let prev_is_lower = i > 0 && chars[i - 1].is_lowercase();
            let is_acronym_end = i > 0
                && chars[i - 1].is_uppercase()
                && i + 1 < chars.len()
                && chars[i + 1].is_lowercase();

            if prev_is_lower || is_acronym_end {
                result.push('-');
            }
            result.extend(c.to_lowercase());
        } else if *c == '_' {
            result.push('-');
        } else {
            result.push(*c);
        }
    }

    result
        .trim_end_matches("-detector")
        .trim_end_matches("-rule")
        .to_string()
}
