//! Phase pipeline: build -> detect -> synthesize -> optimize -> score
//!
//! Each phase consumes the value produced by the previous one and returns a new one;
//! no phase reaches back into an earlier stage.

use crate::builder::GraphBuilder;
use crate::config::AnalysisConfig;
use crate::deadline::Deadline;
use crate::detect::{ConflictDetector, ConflictSet};
use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::model::Node;
use crate::optimize::GraphOptimizer;
use crate::scoring::{HealthReport, HealthScorer};
use crate::synthesize::ResolutionSynthesizer;
use tracing::info;

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub graph: DependencyGraph,
    pub conflicts: ConflictSet,
    pub health: HealthReport,
}

impl Analysis {
    pub fn health_score(&self) -> f64 {
        self.health.health_score
    }
}

/// Run every phase over the extracted nodes, checking the deadline between phases.
pub fn analyze(nodes: Vec<Node>, config: &AnalysisConfig, deadline: &Deadline) -> Result<Analysis> {
    deadline.check("graph construction")?;
    let graph = GraphBuilder::from_config(config).build(nodes);

    deadline.check("conflict detection")?;
    let conflicts = ConflictDetector::from_config(config).detect(&graph);

    deadline.check("resolution synthesis")?;
    let conflicts = ResolutionSynthesizer::new(&graph).synthesize(conflicts);

    deadline.check("graph optimization")?;
    let graph = GraphOptimizer::new().optimize(graph, &conflicts);

    deadline.check("health scoring")?;
    let health = HealthScorer::from_config(config).evaluate(&graph, &conflicts);

    info!(
        "Analysis complete: {} nodes, {} edges, {} conflicts, health {:.1}",
        graph.node_count(),
        graph.edge_count(),
        conflicts.len(),
        health.health_score
    );

    Ok(Analysis {
        graph,
        conflicts,
        health,
    })
}
