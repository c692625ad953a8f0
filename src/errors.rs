//! Error types for smell analysis
//!
//! Missing metrics and dangling relations are not errors: rules skip and
//! the graph builder discards. Everything here aborts the run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or analyzing a metrics document
#[derive(Error, Debug)]
pub enum SmellError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid metrics document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Duplicate type '{0}' in metrics document")]
    DuplicateType(String),

    #[error("Duplicate method '{signature}' in type '{owner}'")]
    DuplicateMethod { owner: String, signature: String },

    #[error("Entity id '{0}' is used by more than one type or method")]
    DuplicateEntity(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

pub type SmellResult<T> = Result<T, SmellError>;
