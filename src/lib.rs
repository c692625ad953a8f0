//! smellgraph - metric-driven code smell detection and smell agglomeration
//!
//! Reads per-type and per-method metrics, flags smells with threshold
//! rules at method and class level, then links smelly entities through
//! containment and coupling into a graph whose connected components are
//! reported as agglomerations.

pub mod agglomeration;
pub mod cli;
pub mod config;
pub mod detectors;
pub mod errors;
pub mod graph;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod reporters;

pub use errors::{SmellError, SmellResult};
pub use pipeline::{Pipeline, RunResult};
