//! Conflict detection: circular, missing, version and critical-component passes

use crate::config::{AnalysisConfig, CriticalComponent};
use crate::graph::DependencyGraph;
use crate::model::*;
use crate::resolve::TargetResolver;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Trailing `-v1`, `_2`, `.v1.2` style suffixes on a file stem.
static VERSION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]v?\d+(?:\.\d+)?$").unwrap());

/// The flat, ordered list of conflicts found in one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConflictSet {
    conflicts: Vec<Conflict>,
}

impl ConflictSet {
    pub fn new(conflicts: Vec<Conflict>) -> Self {
        ConflictSet { conflicts }
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Conflict> {
        self.conflicts.iter()
    }

    pub fn of_type(&self, conflict_type: ConflictType) -> impl Iterator<Item = &Conflict> {
        self.conflicts.iter().filter(move |c| c.conflict_type == conflict_type)
    }

    pub fn count_of(&self, conflict_type: ConflictType) -> usize {
        self.of_type(conflict_type).count()
    }

    /// Conflicts that received a resolution proposal.
    pub fn resolved_count(&self) -> usize {
        self.conflicts.iter().filter(|c| c.resolution.is_some()).count()
    }

    /// Every attached resolution, in conflict order.
    pub fn resolutions(&self) -> impl Iterator<Item = &Resolution> {
        self.conflicts.iter().filter_map(|c| c.resolution.as_ref())
    }
}

impl IntoIterator for ConflictSet {
    type Item = Conflict;
    type IntoIter = std::vec::IntoIter<Conflict>;

    fn into_iter(self) -> Self::IntoIter {
        self.conflicts.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConflictSet {
    type Item = &'a Conflict;
    type IntoIter = std::slice::Iter<'a, Conflict>;

    fn into_iter(self) -> Self::IntoIter {
        self.conflicts.iter()
    }
}

impl FromIterator<Conflict> for ConflictSet {
    fn from_iter<I: IntoIterator<Item = Conflict>>(iter: I) -> Self {
        ConflictSet::new(iter.into_iter().collect())
    }
}

/// Runs the four independent detection passes over a finished graph.
pub struct ConflictDetector {
    critical_components: Vec<CriticalComponent>,
}

impl ConflictDetector {
    pub fn new(critical_components: Vec<CriticalComponent>) -> Self {
        ConflictDetector { critical_components }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.critical_components.clone())
    }

    pub fn detect(&self, graph: &DependencyGraph) -> ConflictSet {
        let mut ids = ConflictIds::default();
        let mut conflicts = Vec::new();

        conflicts.extend(self.circular(graph, &mut ids));
        conflicts.extend(self.missing(graph, &mut ids));
        conflicts.extend(self.versions(graph, &mut ids));
        conflicts.extend(self.critical_components(graph, &mut ids));

        info!("Detected {} conflicts", conflicts.len());
        ConflictSet::new(conflicts)
    }

    /// One conflict per back edge met during a DFS over the whole graph.
    ///
    /// Nodes are visited once globally, so a node that sits on several cycles only
    /// reports the ones found on the first walk through it.
    fn circular(&self, graph: &DependencyGraph, ids: &mut ConflictIds) -> Vec<Conflict> {
        find_cycles(graph)
            .into_iter()
            .map(|cycle| {
                let length = cycle_length(&cycle);
                let severity = match length {
                    0..=3 => Severity::High,
                    4 => Severity::Medium,
                    _ => Severity::Low,
                };
                let chain = cycle.iter().map(NodeId::as_str).collect::<Vec<_>>().join(" -> ");
                debug!("Cycle found: {}", chain);

                let mut metadata = BTreeMap::new();
                metadata.insert("cycle_length".to_string(), length.to_string());
                Conflict {
                    id: ids.next(ConflictType::Circular),
                    conflict_type: ConflictType::Circular,
                    severity,
                    description: format!("Circular dependency: {}", chain),
                    nodes: cycle,
                    metadata,
                    resolution: None,
                }
            })
            .collect()
    }

    /// One conflict per reference that no node resolves.
    fn missing(&self, graph: &DependencyGraph, ids: &mut ConflictIds) -> Vec<Conflict> {
        let resolver = TargetResolver::new(graph);
        let mut conflicts = Vec::new();

        for node in graph.nodes() {
            for reference in &node.dependencies {
                if reference.trim().is_empty() || resolver.is_resolvable(reference, node) {
                    continue;
                }
                let severity = match node.priority {
                    p if p > 7 => Severity::High,
                    p if p > 5 => Severity::Medium,
                    _ => Severity::Low,
                };

                let mut metadata = BTreeMap::new();
                metadata.insert("reference".to_string(), reference.clone());
                metadata.insert("source_priority".to_string(), node.priority.to_string());
                conflicts.push(Conflict {
                    id: ids.next(ConflictType::Missing),
                    conflict_type: ConflictType::Missing,
                    severity,
                    nodes: vec![node.id.clone()],
                    description: format!(
                        "{} references '{}' which matches no analyzed file",
                        node.path, reference
                    ),
                    metadata,
                    resolution: None,
                });
            }
        }
        conflicts
    }

    /// One conflict per group of differently-pathed nodes sharing a versionless base name.
    fn versions(&self, graph: &DependencyGraph, ids: &mut ConflictIds) -> Vec<Conflict> {
        let mut groups: BTreeMap<String, Vec<&Node>> = BTreeMap::new();
        for node in graph.nodes() {
            groups.entry(base_name(&node.path)).or_default().push(node);
        }

        groups
            .into_iter()
            .filter(|(_, members)| members.len() >= 2)
            .filter(|(_, members)| members.iter().any(|n| n.path != members[0].path))
            .map(|(base, members)| {
                let mut metadata = BTreeMap::new();
                metadata.insert("base_name".to_string(), base.clone());
                metadata.insert("variants".to_string(), members.len().to_string());
                Conflict {
                    id: ids.next(ConflictType::Version),
                    conflict_type: ConflictType::Version,
                    severity: Severity::Medium,
                    nodes: members.iter().map(|n| n.id.clone()).collect(),
                    description: format!("{} files share the base name '{}'", members.len(), base),
                    metadata,
                    resolution: None,
                }
            })
            .collect()
    }

    /// One project-wide conflict per critical component no node carries.
    fn critical_components(&self, graph: &DependencyGraph, ids: &mut ConflictIds) -> Vec<Conflict> {
        let present: HashSet<&str> = graph.nodes().filter_map(Node::component).collect();

        self.critical_components
            .iter()
            .filter(|critical| !present.contains(critical.label.as_str()))
            .map(|critical| {
                let mut metadata = BTreeMap::new();
                metadata.insert("component".to_string(), critical.label.clone());
                Conflict {
                    id: ids.next(ConflictType::CriticalComponentMissing),
                    conflict_type: ConflictType::CriticalComponentMissing,
                    severity: Severity::Critical,
                    nodes: Vec::new(),
                    description: format!(
                        "Critical component '{}' not found in project",
                        critical.label
                    ),
                    metadata,
                    resolution: None,
                }
            })
            .collect()
    }
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

/// Sequential conflict ids, unique within a run.
#[derive(Default)]
struct ConflictIds {
    next: usize,
}

impl ConflictIds {
    fn next(&mut self, conflict_type: ConflictType) -> String {
        self.next += 1;
        format!("{}-{:04}", conflict_type.as_str(), self.next)
    }
}

/// Iterative DFS with an explicit recursion stack. Each cycle is returned as the path
/// suffix starting at the re-entered node plus that node again, e.g. `[a, b, c, a]`.
fn find_cycles(graph: &DependencyGraph) -> Vec<Vec<NodeId>> {
    struct Frame<'g> {
        successors: Vec<&'g NodeId>,
        cursor: usize,
    }

    let mut visited: HashSet<&NodeId> = HashSet::new();
    let mut cycles = Vec::new();

    for start in graph.node_ids() {
        if visited.contains(start) {
            continue;
        }

        let mut path: Vec<&NodeId> = vec![start];
        let mut on_path: HashSet<&NodeId> = HashSet::from([start]);
        let mut stack = vec![Frame {
            successors: graph.successors(start),
            cursor: 0,
        }];
        visited.insert(start);

        while let Some(frame) = stack.last_mut() {
            let Some(&next) = frame.successors.get(frame.cursor) else {
                stack.pop();
                if let Some(done) = path.pop() {
                    on_path.remove(done);
                }
                continue;
            };
            frame.cursor += 1;

            if on_path.contains(next) {
                if let Some(pos) = path.iter().position(|id| *id == next) {
                    let mut cycle: Vec<NodeId> =
                        path[pos..].iter().map(|id| (*id).clone()).collect();
                    cycle.push(next.clone());
                    cycles.push(cycle);
                }
            } else if visited.insert(next) {
                path.push(next);
                on_path.insert(next);
                stack.push(Frame {
                    successors: graph.successors(next),
                    cursor: 0,
                });
            }
        }
    }

    cycles
}

/// Number of distinct nodes on a closed cycle path.
fn cycle_length(cycle: &[NodeId]) -> usize {
    match cycle {
        [first, .., last] if first == last => cycle.len() - 1,
        _ => cycle.len(),
    }
}

/// File name without extension and without a trailing version suffix.
pub fn base_name(path: &str) -> String {
    let stem = Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string());
    let stripped = VERSION_SUFFIX.replace(&stem, "");
    if stripped.is_empty() { stem } else { stripped.into_owned() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;

    fn module(path: &str, deps: &[&str]) -> Node {
        Node::new(path, NodeType::Module).with_dependencies(deps.iter().copied())
    }

    fn tagged(node: Node) -> Node {
        node.with_metadata("component", "RAG_Engine")
    }

    #[test]
    fn test_base_name_strips_versions() {
        assert_eq!(base_name("lib/parser_v2.py"), "parser");
        assert_eq!(base_name("parser-1.3.js"), "parser");
        assert_eq!(base_name("parser.v4.ts"), "parser");
        assert_eq!(base_name("parser.py"), "parser");
        assert_eq!(base_name("python3.py"), "python3");
        assert_eq!(base_name("2024.md"), "2024");
    }

    #[test]
    fn test_three_node_cycle() {
        let graph = GraphBuilder::default().build(vec![
            tagged(module("a.py", &["b"])),
            module("b.py", &["c"]),
            module("c.py", &["a"]),
        ]);

        let conflicts = ConflictDetector::default().detect(&graph);
        let circular: Vec<_> = conflicts.of_type(ConflictType::Circular).collect();

        assert_eq!(circular.len(), 1);
        assert_eq!(circular[0].severity, Severity::High);
        assert_eq!(circular[0].metadata["cycle_length"], "3");
        let ids: Vec<_> = circular[0].nodes.iter().map(NodeId::as_str).collect();
        assert_eq!(ids, vec!["a.py", "b.py", "c.py", "a.py"]);
    }

    fn ring(len: usize) -> Vec<Node> {
        (1..=len)
            .map(|i| {
                let next = format!("ring{}", i % len + 1);
                let node = module(&format!("ring{}.py", i), &[next.as_str()]);
                if i == 1 { tagged(node) } else { node }
            })
            .collect()
    }

    #[test]
    fn test_cycle_severity_by_length() {
        let cases = [
            (2, Severity::High),
            (3, Severity::High),
            (4, Severity::Medium),
            (5, Severity::Low),
            (6, Severity::Low),
        ];

        for (len, expected) in cases {
            let graph = GraphBuilder::default().build(ring(len));
            let conflicts = ConflictDetector::default().detect(&graph);
            let circular: Vec<_> = conflicts.of_type(ConflictType::Circular).collect();

            assert_eq!(circular.len(), 1, "ring of {}", len);
            assert_eq!(circular[0].nodes.len(), len + 1);
            assert_eq!(circular[0].metadata["cycle_length"], len.to_string());
            assert_eq!(circular[0].severity, expected, "ring of {}", len);
        }
    }

    #[test]
    fn test_independent_cycles_each_reported() {
        let graph = GraphBuilder::default().build(vec![
            tagged(module("a.py", &["b"])),
            module("b.py", &["a"]),
            module("left.py", &["right"]),
            module("right.py", &["left"]),
        ]);

        let conflicts = ConflictDetector::default().detect(&graph);
        assert_eq!(conflicts.count_of(ConflictType::Circular), 2);
    }

    #[test]
    fn test_acyclic_graph_has_no_cycles() {
        let graph = GraphBuilder::default().build(vec![
            tagged(module("a.py", &["b", "c"])),
            module("b.py", &["c"]),
            module("c.py", &[]),
        ]);

        assert!(find_cycles(&graph).is_empty());
    }

    #[test]
    fn test_missing_reference_scoped_to_node() {
        let graph = GraphBuilder::default().build(vec![
            tagged(module("app.py", &["nonexistent_mod"])).with_priority(8),
            module("util.py", &[]),
        ]);

        let conflicts = ConflictDetector::default().detect(&graph);
        let missing: Vec<_> = conflicts.of_type(ConflictType::Missing).collect();

        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].nodes, vec![NodeId::from("app.py")]);
        assert_eq!(missing[0].severity, Severity::High);
        assert_eq!(missing[0].metadata["reference"], "nonexistent_mod");
    }

    #[test]
    fn test_version_conflict_groups_variants() {
        let graph = GraphBuilder::default().build(vec![
            tagged(module("core/loader_v1.py", &[])),
            module("core/loader_v2.py", &[]),
            module("other.py", &[]),
        ]);

        let conflicts = ConflictDetector::default().detect(&graph);
        let versions: Vec<_> = conflicts.of_type(ConflictType::Version).collect();

        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].severity, Severity::Medium);
        assert_eq!(versions[0].nodes.len(), 2);
        assert_eq!(versions[0].metadata["base_name"], "loader");
    }

    #[test]
    fn test_missing_critical_component() {
        let graph = GraphBuilder::default().build(vec![module("main.py", &[])]);

        let conflicts = ConflictDetector::default().detect(&graph);
        let critical: Vec<_> = conflicts.of_type(ConflictType::CriticalComponentMissing).collect();

        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].severity, Severity::Critical);
        assert!(critical[0].nodes.is_empty());
        assert!(critical[0].resolution.is_none());
    }

    #[test]
    fn test_conflict_ids_are_unique() {
        let graph = GraphBuilder::default().build(vec![
            module("a.py", &["b", "ghost"]),
            module("b.py", &["a", "phantom"]),
        ]);

        let conflicts = ConflictDetector::default().detect(&graph);
        let ids: HashSet<_> = conflicts.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), conflicts.len());
    }
}
