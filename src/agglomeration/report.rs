use crate::agglomeration::Agglomeration;
use crate::config::{ProjectConfig, DEFAULT_MIN_AGGLOMERATION_SIZE};
use serde::Serialize;

/// Which agglomerations get reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgglomerationPolicy {
    /// Smallest reported cluster; a size-one cluster is a lone smell
    pub min_size: usize,
}

impl Default for AgglomerationPolicy {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_AGGLOMERATION_SIZE,
        }
    }
}

impl AgglomerationPolicy {
    pub fn new(min_size: usize) -> Self {
        Self {
            min_size: min_size.max(1),
        }
    }

    pub fn from_config(project: &ProjectConfig) -> Self {
        Self::new(project.min_agglomeration_size())
    }

    pub fn admits(&self, agglomeration: &Agglomeration) -> bool {
        agglomeration.size >= self.min_size
    }
}

/// Statistics over the full partition, before the size policy
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub total_components: usize,
    pub reported_components: usize,
    pub total_nodes: usize,
    /// Nodes inside a reported agglomeration
    pub covered_nodes: usize,
    pub smelly_nodes: usize,
    pub covered_smelly_nodes: usize,
    /// Share of smelly nodes that sit in a reported agglomeration
    pub smelly_coverage: Option<f64>,
    pub largest_size: usize,
}

/// Agglomerations that pass the policy, plus coverage of the whole partition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgglomerationReport {
    pub min_size: usize,
    pub coverage: Coverage,
    pub agglomerations: Vec<Agglomeration>,
}

impl AgglomerationReport {
    /// Apply `policy` to a full partition, keeping its order
    pub fn new(all: Vec<Agglomeration>, policy: AgglomerationPolicy) -> Self {
        let mut coverage = Coverage {
            total_components: all.len(),
            largest_size: all.iter().map(|a| a.size).max().unwrap_or(0),
            ..Coverage::default()
        };
        let mut reported = Vec::new();
        for agglomeration in all {
            coverage.total_nodes += agglomeration.size;
            coverage.smelly_nodes += agglomeration.smelly_members;
            if policy.admits(&agglomeration) {
                coverage.covered_nodes += agglomeration.size;
                coverage.covered_smelly_nodes += agglomeration.smelly_members;
                reported.push(agglomeration);
            }
        }
        coverage.reported_components = reported.len();
        if coverage.smelly_nodes > 0 {
            coverage.smelly_coverage =
                Some(coverage.covered_smelly_nodes as f64 / coverage.smelly_nodes as f64);
        }

        Self {
            min_size: policy.min_size,
            coverage,
            agglomerations: reported,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.agglomerations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.agglomerations.len()
    }
}
