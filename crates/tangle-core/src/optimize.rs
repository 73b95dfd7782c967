//! Graph optimization: redundant edge removal and node status propagation

use crate::detect::ConflictSet;
use crate::graph::DependencyGraph;
use crate::model::{NodeId, NodeStatus};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct GraphOptimizer;

impl GraphOptimizer {
    pub fn new() -> Self {
        GraphOptimizer
    }

    pub fn optimize(&self, mut graph: DependencyGraph, conflicts: &ConflictSet) -> DependencyGraph {
        let removed = self.remove_redundant_edges(&mut graph);
        self.consolidate_similar_nodes(&mut graph);
        self.propagate_status(&mut graph, conflicts);

        info!("Optimized graph: removed {} redundant edges", removed);
        graph
    }

    /// Keep only the strongest edge per (source, target) pair. On equal strength the
    /// earliest edge survives.
    pub fn remove_redundant_edges(&self, graph: &mut DependencyGraph) -> usize {
        let mut redundant = BTreeSet::new();
        {
            let mut strongest: BTreeMap<(&NodeId, &NodeId), (usize, f64)> = BTreeMap::new();
            for (position, edge) in graph.indexed_edges() {
                match strongest.get_mut(&(&edge.source, &edge.target)) {
                    Some(best) if edge.strength > best.1 => {
                        redundant.insert(best.0);
                        *best = (position, edge.strength);
                    }
                    Some(_) => {
                        redundant.insert(position);
                    }
                    None => {
                        strongest.insert((&edge.source, &edge.target), (position, edge.strength));
                    }
                }
            }
        }

        graph.remove_edges(&redundant)
    }

    /// Merging near-duplicate nodes is not performed; nodes are left untouched.
    pub fn consolidate_similar_nodes(&self, _graph: &mut DependencyGraph) {
        debug!("Node consolidation is not enabled");
    }

    /// `conflict` for every node named by a conflict, `resolved` for all others. Nodes
    /// are marked resolved without any positive verification.
    pub fn propagate_status(&self, graph: &mut DependencyGraph, conflicts: &ConflictSet) {
        let flagged: BTreeSet<&NodeId> = conflicts.iter().flat_map(|c| c.nodes.iter()).collect();
        let ids: Vec<NodeId> = graph.node_ids().cloned().collect();

        for id in ids {
            if let Some(node) = graph.node_mut(&id) {
                node.status = if flagged.contains(&id) {
                    NodeStatus::Conflict
                } else {
                    NodeStatus::Resolved
                };
            }
        }
    }
}
