//! Analysis pipeline
//!
//! Orchestrates one run:
//! 1. Load types and relations from a metrics document
//! 2. Detect method-level, then class-level smells
//! 3. Build the smelly graph
//! 4. Partition it into agglomerations
//!
//! Every stage consumes the finished output of the previous one.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::agglomeration::{AgglomerationFinder, AgglomerationPolicy, AgglomerationReport};
use crate::config::ProjectConfig;
use crate::detectors::{
    default_class_rules, default_method_rules, DetectionEngine, DetectionSummary,
    ProgressCallback,
};
use crate::graph::{BuildStats, InheritanceRelations, Relation, SmellyGraphBuilder};
use crate::metrics::provider::MetricsDocument;
use crate::models::Type;

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Types in provider order, with all smells attached
    pub types: Vec<Type>,
    pub detection: DetectionSummary,
    /// Present when agglomerations were collected
    pub graph: Option<BuildStats>,
    pub agglomerations: Option<AgglomerationReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunResult {
    pub fn smelly_types(&self) -> impl Iterator<Item = &Type> {
        use crate::models::Entity;
        self.types.iter().filter(|t| t.is_smelly())
    }
}

/// Full analysis pipeline
pub struct Pipeline {
    engine: DetectionEngine,
    policy: AgglomerationPolicy,
    collect_agglomerations: bool,
    inheritance_edges: bool,
}

impl Pipeline {
    /// Pipeline with default rules and settings
    pub fn new() -> Self {
        Self {
            engine: DetectionEngine::default(),
            policy: AgglomerationPolicy::default(),
            collect_agglomerations: true,
            inheritance_edges: false,
        }
    }

    /// Pipeline configured from project config
    pub fn from_config(project: &ProjectConfig) -> Self {
        let known: Vec<&str> = default_method_rules()
            .iter()
            .map(|r| r.name())
            .chain(default_class_rules().iter().map(|r| r.name()))
            .collect();
        for name in project.unknown_detectors(&known) {
            warn!("Unknown rule '{}' in config, ignoring", name);
        }

        Self {
            engine: DetectionEngine::from_config(project),
            policy: AgglomerationPolicy::from_config(project),
            collect_agglomerations: project.output.collect_agglomerations.unwrap_or(true),
            inheritance_edges: project.agglomeration.inheritance_edges.unwrap_or(false),
        }
    }

    /// Set worker count (0 = auto)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.engine = self.engine.with_workers(workers);
        self
    }

    /// Report per-type detection progress
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.engine = self.engine.with_progress_callback(callback);
        self
    }

    pub fn with_policy(mut self, policy: AgglomerationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable graph construction and clustering
    pub fn with_agglomerations(mut self, enabled: bool) -> Self {
        self.collect_agglomerations = enabled;
        self
    }

    /// Add `Inherits` edges derived from super-types
    pub fn with_inheritance_edges(mut self, enabled: bool) -> Self {
        self.inheritance_edges = enabled;
        self
    }

    /// Run on a metrics document file
    pub fn run_path(&self, path: &Path) -> Result<RunResult> {
        let document = MetricsDocument::from_path(path)
            .with_context(|| format!("Failed to load metrics from {}", path.display()))?;
        self.run_document(document)
    }

    /// Run on a parsed metrics document
    pub fn run_document(&self, document: MetricsDocument) -> Result<RunResult> {
        let (types, relations) = document
            .into_entities()
            .context("Malformed metrics document")?;
        self.run(types, relations)
    }

    /// Run on entities directly
    pub fn run(&self, types: Vec<Type>, relations: Vec<Relation>) -> Result<RunResult> {
        let started_at = Utc::now();
        info!(
            "Analyzing {} types ({} relations) started at {}",
            types.len(),
            relations.len(),
            started_at.to_rfc3339()
        );

        let (types, detection) = self.engine.run(types).context("Smell detection failed")?;

        let (graph, agglomerations) = if self.collect_agglomerations {
            let inheritance = InheritanceRelations::new(&types);
            let mut builder = SmellyGraphBuilder::new(&types).with_relations(&relations);
            if self.inheritance_edges {
                builder = builder.with_relations(&inheritance);
            }
            let (graph, stats) = builder.build();
            let all = AgglomerationFinder::new().find_all(&graph);
            let report = AgglomerationReport::new(all, self.policy);
            debug!(
                "{} of {} agglomerations reach size {}",
                report.len(),
                report.coverage.total_components,
                self.policy.min_size
            );
            (Some(stats), Some(report))
        } else {
            debug!("Agglomerations disabled, skipping graph construction");
            (None, None)
        };

        let finished_at = Utc::now();
        info!(
            "Analysis complete at {}: {} smells on {} types, {} agglomerations",
            finished_at.to_rfc3339(),
            detection.total_smells,
            detection.smelly_types,
            agglomerations.as_ref().map(|a| a.len()).unwrap_or(0)
        );

        Ok(RunResult {
            types,
            detection,
            graph,
            agglomerations,
            started_at,
            finished_at,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RelationKind;
    use crate::metrics::names;
    use crate::models::{Entity, MethodSpec};

    fn long(sig: &str) -> MethodSpec {
        MethodSpec::new(sig).with_metric(names::METHOD_LOC, 80.0)
    }

    fn types() -> Vec<Type> {
        vec![
            Type::new("A")
                .with_metric(names::NUMBER_OF_PUBLIC_ATTRIBUTES, 3.0)
                .with_method(long("m1()"))
                .with_method(long("m2()")),
            Type::new("B").with_method(long("m3()")),
            Type::new("Leaf")
                .with_super_type("A")
                .with_metric(names::NUMBER_OF_PUBLIC_ATTRIBUTES, 2.0),
        ]
    }

    #[test]
    fn test_run_end_to_end() {
        let result = Pipeline::new()
            .with_workers(2)
            .run(types(), Vec::new())
            .expect("run");

        assert_eq!(result.types.len(), 3);
        assert_eq!(result.smelly_types().count(), 3);
        let report = result.agglomerations.expect("agglomerations collected");
        assert_eq!(report.len(), 2);
        assert_eq!(report.agglomerations[0].members, vec!["A", "A::m1()", "A::m2()"]);
        assert_eq!(report.agglomerations[1].members, vec!["B", "B::m3()"]);
        assert!(result.finished_at >= result.started_at);
    }

    #[test]
    fn test_inheritance_edges_join_clusters() {
        let result = Pipeline::new()
            .with_inheritance_edges(true)
            .run(types(), Vec::new())
            .expect("run");
        let report = result.agglomerations.expect("agglomerations collected");
        assert!(report.agglomerations[0].contains("Leaf"));
        assert_eq!(report.agglomerations[0].size, 4);
    }

    #[test]
    fn test_relations_from_document() {
        let relations = vec![Relation::new("A::m1()", "B::m3()", RelationKind::Calls)];
        let result = Pipeline::new().run(types(), relations).expect("run");
        let report = result.agglomerations.expect("agglomerations collected");
        assert_eq!(report.agglomerations[0].size, 5);
    }

    #[test]
    fn test_agglomerations_disabled() {
        let result = Pipeline::new()
            .with_agglomerations(false)
            .run(types(), Vec::new())
            .expect("run");
        assert!(result.agglomerations.is_none());
        assert!(result.graph.is_none());
        assert!(result.types[0].is_smelly());
    }

    #[test]
    fn test_empty_input() {
        let result = Pipeline::new().run(Vec::new(), Vec::new()).expect("run");
        assert!(result.types.is_empty());
        assert!(result.agglomerations.expect("collected").is_empty());
    }

    #[test]
    fn test_from_config() {
        let project: ProjectConfig = toml::from_str(
            r#"
            [detectors.long-method]
            enabled = false

            [agglomeration]
            min_size = 1

            [output]
            collect_agglomerations = true
            "#,
        )
        .expect("parse config");
        let result = Pipeline::from_config(&project)
            .run(types(), Vec::new())
            .expect("run");

        // without long methods only the two types with public fields remain
        let report = result.agglomerations.expect("collected");
        assert_eq!(report.len(), 2);
        assert!(report.agglomerations.iter().all(|a| a.size == 1));
    }

    #[test]
    fn test_duplicate_type_is_an_error() {
        let document = MetricsDocument::from_json(
            r#"{"types": [{"name": "A"}, {"name": "A"}]}"#,
        )
        .expect("parse");
        assert!(Pipeline::new().run_document(document).is_err());
    }
}
