//! Resolution synthesis: one advisory proposal per conflict, by conflict type

use crate::detect::ConflictSet;
use crate::graph::DependencyGraph;
use crate::model::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Names scoring above this are offered as alternatives for a missing reference.
const SUGGESTION_THRESHOLD: f64 = 0.6;

/// Attaches resolutions to detected conflicts. Never mutates the graph.
pub struct ResolutionSynthesizer<'g> {
    graph: &'g DependencyGraph,
}

impl<'g> ResolutionSynthesizer<'g> {
    pub fn new(graph: &'g DependencyGraph) -> Self {
        ResolutionSynthesizer { graph }
    }

    pub fn synthesize(&self, conflicts: ConflictSet) -> ConflictSet {
        let resolved: ConflictSet = conflicts
            .into_iter()
            .map(|mut conflict| {
                conflict.resolution = self.propose(&conflict);
                match &conflict.resolution {
                    Some(resolution) => debug!("{} -> {}", conflict.id, resolution.strategy),
                    None => debug!("{} needs manual intervention", conflict.id),
                }
                conflict
            })
            .collect();

        info!(
            "Synthesized {} resolutions for {} conflicts",
            resolved.resolved_count(),
            resolved.len()
        );
        resolved
    }

    /// Proposal for a single conflict. Critical-component conflicts get none.
    pub fn propose(&self, conflict: &Conflict) -> Option<Resolution> {
        match conflict.conflict_type {
            ConflictType::Circular => Some(self.break_cycle(conflict)),
            ConflictType::Missing => Some(self.replace_missing(conflict)),
            ConflictType::Version => Some(self.pick_version(conflict)),
            ConflictType::CriticalComponentMissing => None,
        }
    }

    fn break_cycle(&self, conflict: &Conflict) -> Resolution {
        let mut weakest: Option<&Edge> = None;
        let mut all_located = true;

        for pair in conflict.nodes.windows(2) {
            let Some(edge) = self
                .graph
                .edges_between(&pair[0], &pair[1])
                .into_iter()
                .min_by(|a, b| a.strength.total_cmp(&b.strength))
            else {
                all_located = false;
                continue;
            };
            if weakest.is_none_or(|w| edge.strength < w.strength) {
                weakest = Some(edge);
            }
        }

        match weakest {
            Some(edge) if all_located => Resolution {
                strategy: Strategy::BreakWeakestEdge,
                action: "remove_dependency".to_string(),
                parameters: params([
                    ("source", edge.source.to_string()),
                    ("target", edge.target.to_string()),
                    ("reason", "weakest_edge_in_cycle".to_string()),
                ]),
                confidence: 0.8,
                impact: Impact::Low,
                reversible: true,
            },
            _ => manual_review(conflict, "cycle_edges_not_found"),
        }
    }

    fn replace_missing(&self, conflict: &Conflict) -> Resolution {
        let Some(reference) = conflict.metadata.get("reference") else {
            return manual_review(conflict, "reference_unknown");
        };

        let mut candidates: Vec<(f64, &str)> = Vec::new();
        for node in self.graph.nodes() {
            // Never suggest the file that holds the broken reference.
            let seen = candidates.iter().any(|(_, name)| *name == node.name);
            if conflict.nodes.contains(&node.id) || seen {
                continue;
            }
            let score = similarity(reference, &node.name);
            if score > SUGGESTION_THRESHOLD {
                candidates.push((score, node.name.as_str()));
            }
        }
        // Stable: equal scores keep id order.
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

        match candidates.split_first() {
            Some(((_, best), rest)) => Resolution {
                strategy: Strategy::SuggestAlternative,
                action: "update_reference".to_string(),
                parameters: params([
                    ("original", reference.clone()),
                    ("suggestion", best.to_string()),
                    (
                        "alternatives",
                        rest.iter().map(|(_, name)| *name).collect::<Vec<_>>().join(","),
                    ),
                ]),
                confidence: 0.6,
                impact: Impact::Low,
                reversible: true,
            },
            None => Resolution {
                strategy: Strategy::CreatePlaceholder,
                action: "create_placeholder".to_string(),
                parameters: params([
                    ("original", reference.clone()),
                    ("referenced_by", joined(&conflict.nodes)),
                ]),
                confidence: 0.4,
                impact: Impact::Medium,
                reversible: true,
            },
        }
    }

    fn pick_version(&self, conflict: &Conflict) -> Resolution {
        let preferred = conflict
            .nodes
            .iter()
            .filter_map(|id| self.graph.node(id))
            .max_by(|a, b| a.priority.cmp(&b.priority).then_with(|| b.id.cmp(&a.id)));

        let Some(preferred) = preferred else {
            return manual_review(conflict, "versions_not_found");
        };

        let others: Vec<NodeId> = conflict
            .nodes
            .iter()
            .filter(|id| **id != preferred.id)
            .cloned()
            .collect();
        Resolution {
            strategy: Strategy::PreferHighestPriority,
            action: "consolidate_versions".to_string(),
            parameters: params([
                ("preferred", preferred.id.to_string()),
                ("priority", preferred.priority.to_string()),
                ("deprecate", joined(&others)),
            ]),
            confidence: 0.7,
            impact: Impact::Medium,
            reversible: true,
        }
    }
}

/// Case-insensitive naive similarity: 1.0 equal, 0.8 containment, else 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a.is_empty() || b.is_empty() {
        0.0
    } else if a == b {
        1.0
    } else if a.contains(&b) || b.contains(&a) {
        0.8
    } else {
        0.0
    }
}

fn manual_review(conflict: &Conflict, reason: &str) -> Resolution {
    Resolution {
        strategy: Strategy::ManualReview,
        action: "review".to_string(),
        parameters: params([
            ("nodes", joined(&conflict.nodes)),
            ("reason", reason.to_string()),
        ]),
        confidence: 0.3,
        impact: Impact::Medium,
        reversible: true,
    }
}

fn params<const N: usize>(entries: [(&str, String); N]) -> BTreeMap<String, String> {
    entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn joined(ids: &[NodeId]) -> String {
    ids.iter().map(NodeId::as_str).collect::<Vec<_>>().join(",")
}
