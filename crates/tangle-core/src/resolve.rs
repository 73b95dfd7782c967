//! Target resolution: raw reference string -> registered node

use crate::graph::DependencyGraph;
use crate::model::Node;

/// Maps raw reference strings onto nodes of a graph.
///
/// Two phases, first match wins:
/// 1. exact: `name == reference` or `path` ends with `reference`
/// 2. fallback: `name` contains `reference` or `reference` contains `name`
///
/// Candidates are visited in id order, so ties always go to the smallest id. The
/// referencing node itself is never a candidate.
pub struct TargetResolver<'g> {
    graph: &'g DependencyGraph,
}

impl<'g> TargetResolver<'g> {
    pub fn new(graph: &'g DependencyGraph) -> Self {
        TargetResolver { graph }
    }

    pub fn resolve(&self, reference: &str, source: &Node) -> Option<&'g Node> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }

        self.candidates(source)
            .find(|node| node.name == reference || node.path.ends_with(reference))
            .or_else(|| {
                self.candidates(source).find(|node| {
                    !node.name.is_empty()
                        && (node.name.contains(reference) || reference.contains(node.name.as_str()))
                })
            })
    }

    /// Whether the reference resolves to any node.
    pub fn is_resolvable(&self, reference: &str, source: &Node) -> bool {
        self.resolve(reference, source).is_some()
    }

    fn candidates<'s>(&self, source: &'s Node) -> impl Iterator<Item = &'g Node> + use<'g, 's> {
        self.graph.nodes().filter(move |node| node.id != source.id)
    }
}
