//! Relationship builder: resolved references -> typed, weighted edges

use crate::config::AnalysisConfig;
use crate::graph::DependencyGraph;
use crate::model::*;
use crate::resolve::TargetResolver;
use tracing::{debug, info};

const BASE_STRENGTH: f64 = 0.5;
const CORE_COMPONENT_BONUS: f64 = 0.3;
const HIGH_PRIORITY_BONUS: f64 = 0.2;
const OPTIONAL_PENALTY: f64 = 0.3;
const HIGH_PRIORITY: i32 = 7;

/// Builds the registry from extracted nodes and links every resolvable reference.
pub struct GraphBuilder {
    core_component: String,
}

impl GraphBuilder {
    pub fn new(core_component: impl Into<String>) -> Self {
        GraphBuilder {
            core_component: core_component.into(),
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.core_component.clone())
    }

    /// Register all nodes, then add one edge per resolved reference. Unresolved
    /// references produce no edge.
    pub fn build(&self, nodes: impl IntoIterator<Item = Node>) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for node in nodes {
            graph.add_node(node);
        }

        let mut edges = Vec::new();
        let mut unresolved = 0usize;
        {
            let resolver = TargetResolver::new(&graph);
            for source in graph.nodes() {
                for reference in &source.dependencies {
                    if reference.trim().is_empty() {
                        continue;
                    }
                    match resolver.resolve(reference, source) {
                        Some(target) => edges.push(self.link(reference, source, target)),
                        None => {
                            debug!("Unresolved reference '{}' in {}", reference, source.id);
                            unresolved += 1;
                        }
                    }
                }
            }
        }

        for edge in edges {
            graph.add_edge(edge);
        }

        info!(
            "Built graph: {} nodes, {} edges, {} unresolved references",
            graph.node_count(),
            graph.edge_count(),
            unresolved
        );
        graph
    }

    fn link(&self, reference: &str, source: &Node, target: &Node) -> Edge {
        Edge {
            source: source.id.clone(),
            target: target.id.clone(),
            edge_type: self.edge_type(reference, source, target),
            strength: self.edge_strength(reference, source, target),
            constraint: Some(format!("references {}", reference)),
        }
    }

    pub fn edge_type(&self, reference: &str, source: &Node, target: &Node) -> EdgeType {
        let core_target = target.component() == Some(self.core_component.as_str());
        if core_target || same_script_kind(source, target) {
            EdgeType::Hard
        } else if reference.contains("optional") || reference.contains("dev") {
            EdgeType::Optional
        } else {
            EdgeType::Soft
        }
    }

    pub fn edge_strength(&self, reference: &str, source: &Node, target: &Node) -> f64 {
        let mut strength = BASE_STRENGTH;
        if target.component() == Some(self.core_component.as_str()) {
            strength += CORE_COMPONENT_BONUS;
        }
        if source.priority > HIGH_PRIORITY || target.priority > HIGH_PRIORITY {
            strength += HIGH_PRIORITY_BONUS;
        }
        if reference.contains("optional") {
            strength -= OPTIONAL_PENALTY;
        }
        strength.clamp(MIN_STRENGTH, MAX_STRENGTH)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

/// Both scripts written in the same shell dialect (same extension).
fn same_script_kind(source: &Node, target: &Node) -> bool {
    source.node_type == NodeType::Script
        && target.node_type == NodeType::Script
        && source.extension().is_some()
        && source.extension() == target.extension()
}
