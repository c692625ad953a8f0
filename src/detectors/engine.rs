//! Detection engine with parallel support
//!
//! Runs the two detection phases over every type:
//!
//! ```text
//! Type ──method rules──▶ MethodsDetected ──class rules──▶ Type (with smells)
//! ```
//!
//! Types are independent of each other, so they are fanned out over a
//! rayon pool. Within one type the phases always run in order.

use crate::config::ProjectConfig;
use crate::detectors::base::DetectionSummary;
use crate::detectors::class_level::ClassLevelSmellDetector;
use crate::detectors::method_level::MethodLevelSmellDetector;
use crate::errors::SmellResult;
use crate::models::Type;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Progress callback: (type name, types done, total types)
pub type ProgressCallback = Arc<dyn Fn(&str, usize, usize) + Send + Sync>;

/// Upper bound for auto-detected worker threads
const MAX_AUTO_WORKERS: usize = 16;

/// Resolve a configured worker count (0 = auto-detect)
pub fn resolve_workers(workers: usize) -> usize {
    if workers == 0 {
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4)
            .min(MAX_AUTO_WORKERS)
    } else {
        workers
    }
}

/// Orchestrates method-level then class-level detection over many types
pub struct DetectionEngine {
    method_detector: MethodLevelSmellDetector,
    class_detector: ClassLevelSmellDetector,
    /// Number of worker threads for parallel execution
    workers: usize,
    progress_callback: Option<ProgressCallback>,
}

impl DetectionEngine {
    /// Create an engine with default rules
    ///
    /// # Arguments
    /// * `workers` - Number of worker threads (0 = auto-detect)
    pub fn new(workers: usize) -> Self {
        Self {
            method_detector: MethodLevelSmellDetector::new(),
            class_detector: ClassLevelSmellDetector::new(),
            workers: resolve_workers(workers),
            progress_callback: None,
        }
    }

    /// Create an engine whose rules and worker count come from project config
    pub fn from_config(project: &ProjectConfig) -> Self {
        Self {
            method_detector: MethodLevelSmellDetector::from_config(project),
            class_detector: ClassLevelSmellDetector::from_config(project),
            workers: resolve_workers(project.defaults.workers.unwrap_or(0)),
            progress_callback: None,
        }
    }

    /// Override the worker count (0 = auto-detect)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = resolve_workers(workers);
        self
    }

    /// Set a progress callback
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Detection for a single type, both phases
    pub fn detect_type(&self, ty: Type) -> Type {
        let detected = self.method_detector.apply(ty);
        self.class_detector.apply(detected)
    }

    /// Run detection on all types. Output order matches input order.
    pub fn run(&self, types: Vec<Type>) -> SmellResult<(Vec<Type>, DetectionSummary)> {
        let start = Instant::now();
        let total = types.len();
        info!(
            "Starting detection on {} types with {} method rules, {} class rules, {} workers",
            total,
            self.method_detector.rules().len(),
            self.class_detector.rules().len(),
            self.workers
        );

        for rule in self.method_detector.rules() {
            debug!("Method rule {} ({}): {}", rule.name(), rule.kind(), rule.description());
        }
        for rule in self.class_detector.rules() {
            debug!("Class rule {} ({}): {}", rule.name(), rule.kind(), rule.description());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()?;

        let completed = AtomicUsize::new(0);
        let detected: Vec<Type> = pool.install(|| {
            types
                .into_par_iter()
                .map(|ty| {
                    let ty = self.detect_type(ty);
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(ref callback) = self.progress_callback {
                        callback(ty.name(), done, total);
                    }
                    ty
                })
                .collect()
        });

        let mut summary = DetectionSummary::default();
        for ty in &detected {
            summary.add_type(ty);
        }
        summary.duration_ms = start.elapsed().as_millis() as u64;

        for (kind, count) in &summary.by_kind {
            debug!("{}: {}", kind, count);
        }
        info!(
            "Detection complete: {} smells, {}/{} smelly types, {}/{} smelly methods in {}ms",
            summary.total_smells,
            summary.smelly_types,
            summary.types,
            summary.smelly_methods,
            summary.methods,
            summary.duration_ms
        );

        Ok((detected, summary))
    }
}

impl Default for DetectionEngine {
    fn default() -> Self {
        Self::new(0)
    }
}
