//! Health scoring and recommendations

use crate::config::{AlertLevel, AnalysisConfig, CriticalComponent};
use crate::detect::ConflictSet;
use crate::graph::DependencyGraph;
use crate::model::ConflictType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts folded into the health score and written to the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub conflicts_detected: usize,
    pub conflicts_resolved: usize,
    pub circular_dependencies: usize,
    pub missing_dependencies: usize,
    /// Nodes per `component` tag; untagged nodes are not counted.
    pub component_types: BTreeMap<String, usize>,
    /// Resolutions per strategy name.
    pub resolution_strategies: BTreeMap<String, usize>,
}

impl Statistics {
    pub fn collect(graph: &DependencyGraph, conflicts: &ConflictSet) -> Self {
        let mut component_types = BTreeMap::new();
        for component in graph.nodes().filter_map(|n| n.component()) {
            *component_types.entry(component.to_string()).or_insert(0) += 1;
        }

        let mut resolution_strategies = BTreeMap::new();
        for resolution in conflicts.resolutions() {
            *resolution_strategies
                .entry(resolution.strategy.as_str().to_string())
                .or_insert(0) += 1;
        }

        Statistics {
            total_nodes: graph.node_count(),
            total_edges: graph.edge_count(),
            conflicts_detected: conflicts.len(),
            conflicts_resolved: conflicts.resolved_count(),
            circular_dependencies: conflicts.count_of(ConflictType::Circular),
            missing_dependencies: conflicts.count_of(ConflictType::Missing),
            component_types,
            resolution_strategies,
        }
    }

    /// Conflicts left without a proposal.
    pub fn conflicts_unresolved(&self) -> usize {
        self.conflicts_detected.saturating_sub(self.conflicts_resolved)
    }
}

/// Score, statistics and recommendations for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub statistics: Statistics,
    pub recommendations: Vec<String>,
    pub health_score: f64,
}

pub struct HealthScorer {
    critical_components: Vec<CriticalComponent>,
    modularize_threshold: usize,
}

impl HealthScorer {
    pub fn new(critical_components: Vec<CriticalComponent>, modularize_threshold: usize) -> Self {
        HealthScorer {
            critical_components,
            modularize_threshold,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.critical_components.clone(), config.modularize_threshold)
    }

    pub fn evaluate(&self, graph: &DependencyGraph, conflicts: &ConflictSet) -> HealthReport {
        let statistics = Statistics::collect(graph, conflicts);
        let missing_components: Vec<&str> = conflicts
            .of_type(ConflictType::CriticalComponentMissing)
            .filter_map(|c| c.metadata.get("component"))
            .map(String::as_str)
            .collect();

        HealthReport {
            health_score: Self::score(&statistics),
            recommendations: self.recommendations(&statistics, &missing_components),
            statistics,
        }
    }

    /// Fold statistics into a score in `0.0..=100.0`.
    pub fn score(stats: &Statistics) -> f64 {
        let mut score = 100.0;
        score -= (stats.conflicts_detected as f64 / stats.total_nodes.max(1) as f64) * 50.0;
        score -= stats.circular_dependencies as f64 * 10.0;
        score -= stats.missing_dependencies as f64 * 5.0;
        if stats.conflicts_detected > 0 {
            score += (stats.conflicts_resolved as f64 / stats.conflicts_detected as f64) * 20.0;
        }
        score.clamp(0.0, 100.0)
    }

    /// Ordered recommendation lines; same input always gives the same list.
    pub fn recommendations(&self, stats: &Statistics, missing_components: &[&str]) -> Vec<String> {
        let mut lines = Vec::new();

        if stats.circular_dependencies > 0 {
            lines.push(format!(
                "Break {} circular dependencies by removing the weakest edge in each cycle",
                stats.circular_dependencies
            ));
        }
        if stats.missing_dependencies > 0 {
            lines.push(format!(
                "Resolve {} missing dependencies: fix the references or add the missing files",
                stats.missing_dependencies
            ));
        }
        if stats.conflicts_unresolved() > stats.conflicts_resolved {
            lines.push(format!(
                "Manual review required: {} conflicts have no automatic resolution",
                stats.conflicts_unresolved()
            ));
        }
        for critical in &self.critical_components {
            if !missing_components.contains(&critical.label.as_str()) {
                continue;
            }
            lines.push(match critical.level {
                AlertLevel::Critical => format!(
                    "CRITICAL: {} component not found; core functionality is unavailable",
                    critical.label
                ),
                AlertLevel::Warning => format!(
                    "WARNING: {} component not found; related features may be incomplete",
                    critical.label
                ),
            });
        }
        if stats.total_nodes > self.modularize_threshold {
            lines.push(format!(
                "Consider modularizing the project: {} files analyzed",
                stats.total_nodes
            ));
        }

        lines
    }
}

impl Default for HealthScorer {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}
