//! JSON report for a finished run

use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::model::{Conflict, Edge, Node, NodeId, Resolution};
use crate::pipeline::Analysis;
use crate::scoring::Statistics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Report file written when no output path is given.
pub const DEFAULT_REPORT_FILE: &str = "dependency_resolution_results.json";

/// Serializable view of the graph: nodes keyed by id, edges in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: BTreeMap<NodeId, Node>,
    pub edges: Vec<Edge>,
}

impl From<&DependencyGraph> for GraphSnapshot {
    fn from(graph: &DependencyGraph) -> Self {
        GraphSnapshot {
            nodes: graph.nodes().map(|n| (n.id.clone(), n.clone())).collect(),
            edges: graph.edges().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub project_path: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Seconds.
    pub execution_time: f64,
    pub graph: GraphSnapshot,
    pub conflicts: Vec<Conflict>,
    pub resolutions: Vec<Resolution>,
    pub statistics: Statistics,
    pub recommendations: Vec<String>,
    pub health_score: f64,
}

impl AnalysisReport {
    pub fn new(
        project_path: &Path,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        analysis: &Analysis,
    ) -> Self {
        let execution_time = (end_time - start_time)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();

        AnalysisReport {
            project_path: project_path.display().to_string(),
            start_time,
            end_time,
            execution_time,
            graph: GraphSnapshot::from(&analysis.graph),
            conflicts: analysis.conflicts.iter().cloned().collect(),
            resolutions: analysis.conflicts.resolutions().cloned().collect(),
            statistics: analysis.health.statistics.clone(),
            recommendations: analysis.health.recommendations.clone(),
            health_score: analysis.health.health_score,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        tracing::debug!("Report written: {}", path.display());
        Ok(())
    }
}
