//! Output reporters for smell analysis results
//!
//! - `json` - the smells file and the agglomerations file
//! - `text` - a short terminal summary

pub mod json;
pub mod text;

use crate::pipeline::RunResult;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where and what to write
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub smells_file: PathBuf,
    pub agglomerations_file: PathBuf,
    /// Keep only smelly types and hide non-smelly methods
    pub only_smelly: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            smells_file: PathBuf::from("smells.json"),
            agglomerations_file: PathBuf::from("agglomerations.json"),
            only_smelly: false,
        }
    }
}

/// Files written by [`write_outputs`]
#[derive(Debug, Clone, Default)]
pub struct WrittenFiles {
    pub smells: Option<PathBuf>,
    pub agglomerations: Option<PathBuf>,
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write the smells file and, when collected, the agglomerations file.
///
/// Everything is rendered before the first file is touched.
pub fn write_outputs(result: &RunResult, options: &OutputOptions) -> Result<WrittenFiles> {
    let smells = json::render_smells(&result.types, options.only_smelly)?;
    let agglomerations = result
        .agglomerations
        .as_ref()
        .map(json::render_agglomerations)
        .transpose()?;

    let mut written = WrittenFiles::default();
    write_file(&options.smells_file, &smells)?;
    info!("Wrote smells to {}", options.smells_file.display());
    written.smells = Some(options.smells_file.clone());

    if let Some(content) = agglomerations {
        write_file(&options.agglomerations_file, &content)?;
        info!(
            "Wrote agglomerations to {}",
            options.agglomerations_file.display()
        );
        written.agglomerations = Some(options.agglomerations_file.clone());
    }
    Ok(written)
}
