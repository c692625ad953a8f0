//! Configuration module for smellgraph
//!
//! This module handles:
//! - Project-level configuration (smellgraph.toml)
//! - Rule enable flags and threshold overrides
//! - Output and clustering defaults

mod project_config;

pub use project_config::{
    load_config_file, load_project_config, normalize_detector_name, AgglomerationConfig,
    CliDefaults, DetectorConfigOverride, OutputConfig, ProjectConfig, ThresholdValue,
    CONFIG_FILE_NAMES, DEFAULT_MIN_AGGLOMERATION_SIZE,
};
