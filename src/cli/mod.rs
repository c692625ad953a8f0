//! CLI definition and handler

use crate::agglomeration::AgglomerationPolicy;
use crate::config::{load_config_file, load_project_config, ProjectConfig};
use crate::pipeline::Pipeline;
use crate::reporters::{self, OutputOptions};
use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Parse and validate workers count (0 = auto, at most 64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Parse and validate the minimum agglomeration size (at least 1)
fn parse_min_size(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("min size must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// smellgraph - find code smells and the clusters they form
///
/// Reads a metrics document, flags method- and class-level smells with
/// threshold rules, and groups related smelly entities into agglomerations.
#[derive(Parser, Debug)]
#[command(name = "smellgraph")]
#[command(
    version,
    about = "Detect code smells from metrics and cluster them into agglomerations",
    after_help = "\
Examples:
  smellgraph metrics.json                          Write smells.json and agglomerations.json
  smellgraph metrics.json --only-smelly            Keep only smelly types and methods
  smellgraph metrics.json --no-agglomerations      Skip graph construction
  smellgraph metrics.json --min-size 3 -w 4        Larger clusters, four workers
  smellgraph metrics.json --config ci.toml         Use an explicit config file"
)]
pub struct Cli {
    /// Metrics document (JSON) produced by the metric collector
    pub metrics: PathBuf,

    /// Where to write detected smells
    #[arg(long, default_value = "smells.json")]
    pub smells_file: PathBuf,

    /// Where to write agglomerations
    #[arg(long, default_value = "agglomerations.json")]
    pub agglomerations_file: PathBuf,

    /// Keep only smelly types, hiding non-smelly methods
    #[arg(long)]
    pub only_smelly: bool,

    /// Compute agglomerations (default unless disabled in config)
    #[arg(long, overrides_with = "no_agglomerations")]
    pub agglomerations: bool,

    /// Skip graph construction and agglomerations
    #[arg(long, overrides_with = "agglomerations")]
    pub no_agglomerations: bool,

    /// Connect subclasses to their super-types in the smelly graph
    #[arg(long)]
    pub inheritance_edges: bool,

    /// Smallest agglomeration to report
    #[arg(long, value_parser = parse_min_size)]
    pub min_size: Option<usize>,

    /// Number of parallel workers (0 = auto)
    #[arg(long, short = 'w', value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: Option<String>,

    /// Config file (default: smellgraph.toml or .smellgraphrc.json in the working directory)
    #[arg(long, env = "SMELLGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress the progress bar and summary
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Effective settings after merging CLI flags over project config
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub only_smelly: bool,
    pub collect_agglomerations: bool,
    pub inheritance_edges: bool,
    pub min_size: usize,
    pub workers: usize,
    pub log_level: String,
}

impl Settings {
    pub fn resolve(cli: &Cli, project: &ProjectConfig) -> Self {
        let collect_agglomerations = if cli.no_agglomerations {
            false
        } else if cli.agglomerations {
            true
        } else {
            project.output.collect_agglomerations.unwrap_or(true)
        };
        Self {
            only_smelly: cli.only_smelly || project.output.only_smelly.unwrap_or(false),
            collect_agglomerations,
            inheritance_edges: cli.inheritance_edges
                || project.agglomeration.inheritance_edges.unwrap_or(false),
            min_size: cli
                .min_size
                .unwrap_or_else(|| project.min_agglomeration_size()),
            workers: cli.workers.or(project.defaults.workers).unwrap_or(0),
            log_level: cli
                .log_level
                .clone()
                .or_else(|| project.defaults.log_level.clone())
                .unwrap_or_else(|| "info".to_string()),
        }
    }
}

/// Load the explicit config file, or search the working directory
pub fn load_config(cli: &Cli) -> Result<ProjectConfig> {
    match &cli.config {
        Some(path) => load_config_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("Failed to read working directory")?;
            Ok(load_project_config(&cwd))
        }
    }
}

/// Run one analysis with the given CLI arguments and config
pub fn run(cli: Cli, project: ProjectConfig) -> Result<()> {
    let settings = Settings::resolve(&cli, &project);
    info!(
        "smellgraph {} analyzing {}",
        env!("CARGO_PKG_VERSION"),
        cli.metrics.display()
    );

    let bar = progress_bar(cli.quiet);
    let on_progress = {
        let bar = bar.clone();
        Arc::new(move |name: &str, done: usize, total: usize| {
            bar.set_length(total as u64);
            bar.set_position(done as u64);
            bar.set_message(name.to_string());
        })
    };

    let pipeline = Pipeline::from_config(&project)
        .with_workers(settings.workers)
        .with_policy(AgglomerationPolicy::new(settings.min_size))
        .with_agglomerations(settings.collect_agglomerations)
        .with_inheritance_edges(settings.inheritance_edges)
        .with_progress_callback(on_progress);
    let result = pipeline.run_path(&cli.metrics);
    bar.finish_and_clear();
    let result = result?;

    let options = OutputOptions {
        smells_file: cli.smells_file,
        agglomerations_file: cli.agglomerations_file,
        only_smelly: settings.only_smelly,
    };
    let written = reporters::write_outputs(&result, &options)?;

    if cli.quiet {
        return Ok(());
    }
    print!(
        "{}",
        reporters::text::render_summary(&result, console::colors_enabled())
    );
    if let Some(path) = written.smells {
        println!("Smells written to {}", style(path.display()).cyan());
    }
    if let Some(path) = written.agglomerations {
        println!("Agglomerations written to {}", style(path.display()).cyan());
    }
    Ok(())
}

/// Detection progress on stderr; hidden when quiet or not a terminal
fn progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
    let bar_style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(bar_style.progress_chars("=> "));
    bar
}
