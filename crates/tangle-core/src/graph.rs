//! Graph registry using petgraph::StableDiGraph keyed by path-derived NodeId

use crate::model::*;
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, BTreeSet};

/// The dependency graph for one analysis run.
///
/// Nodes are addressed by [`NodeId`]; iteration over nodes is always in id order and
/// iteration over edges is in insertion order, so every consumer sees the same
/// sequence for the same input.
#[derive(Clone)]
pub struct DependencyGraph {
    inner: StableDiGraph<Node, Edge>,
    index: BTreeMap<NodeId, NodeIndex>,
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl DependencyGraph {
    pub fn new() -> Self {
        DependencyGraph {
            inner: StableDiGraph::new(),
            index: BTreeMap::new(),
        }
    }

    /// Add a node. Re-adding an existing id replaces the node but keeps its dependents,
    /// so inserting the same path twice is idempotent.
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        let id = node.id.clone();
        match self.index.get(&id).copied() {
            Some(idx) => {
                if let Some(existing) = self.inner.node_weight_mut(idx) {
                    node.dependents = std::mem::take(&mut existing.dependents);
                    *existing = node;
                }
            }
            None => {
                let idx = self.inner.add_node(node);
                self.index.insert(id.clone(), idx);
            }
        }
        id
    }

    /// Add an edge between two registered nodes and record the source as a dependent of
    /// the target. Returns `false` without touching the graph if either end is unknown.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        let (Some(&source), Some(&target)) =
            (self.index.get(&edge.source), self.index.get(&edge.target))
        else {
            tracing::debug!(
                "Rejecting edge {} -> {}: endpoint not registered",
                edge.source,
                edge.target
            );
            return false;
        };

        let dependent = edge.source.clone();
        self.inner.add_edge(source, target, edge);
        if let Some(target_node) = self.inner.node_weight_mut(target) {
            target_node.dependents.insert(dependent);
        }
        true
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).and_then(|&idx| self.inner.node_weight(idx))
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        let idx = *self.index.get(id)?;
        self.inner.node_weight_mut(idx)
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.index
            .values()
            .filter_map(move |&idx| self.inner.node_weight(idx))
    }

    /// Ids of all nodes in order.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.index.keys()
    }

    /// Iterate over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.indexed_edges().map(|(_, edge)| edge)
    }

    /// Edges paired with their insertion position, used to select edges for removal.
    pub fn indexed_edges(&self) -> impl Iterator<Item = (usize, &Edge)> {
        self.inner
            .edge_indices()
            .filter_map(move |idx| self.inner.edge_weight(idx).map(|edge| (idx.index(), edge)))
    }

    /// All outgoing edges of a node in insertion order.
    pub fn edges_from(&self, source: &NodeId) -> Vec<&Edge> {
        let Some(&idx) = self.index.get(source) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self
            .inner
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge_ref| (edge_ref.id(), edge_ref.weight()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, edge)| edge).collect()
    }

    /// Distinct targets of a node's outgoing edges, in order of first edge.
    pub fn successors(&self, source: &NodeId) -> Vec<&NodeId> {
        let mut seen = BTreeSet::new();
        self.edges_from(source)
            .into_iter()
            .map(|edge| &edge.target)
            .filter(|target| seen.insert(*target))
            .collect()
    }

    /// Every edge from `source` to `target`. Before optimization there may be several.
    pub fn edges_between(&self, source: &NodeId, target: &NodeId) -> Vec<&Edge> {
        self.edges_from(source)
            .into_iter()
            .filter(|edge| &edge.target == target)
            .collect()
    }

    /// Remove the edges at the given insertion positions. A source stays in its target's
    /// dependents only while at least one edge between them survives.
    pub fn remove_edges(&mut self, positions: &BTreeSet<usize>) -> usize {
        let mut removed = 0;
        for &position in positions {
            let idx = EdgeIndex::new(position);
            let Some(edge) = self.inner.remove_edge(idx) else {
                continue;
            };
            removed += 1;

            let still_linked = !self.edges_between(&edge.source, &edge.target).is_empty();
            if !still_linked {
                if let Some(target) = self.node_mut(&edge.target) {
                    target.dependents.remove(&edge.source);
                }
            }
        }
        removed
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
