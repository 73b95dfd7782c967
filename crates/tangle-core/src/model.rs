//! Core data structures for the dependency graph

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

/// Lowest strength an edge may carry.
pub const MIN_STRENGTH: f64 = 0.1;

/// Highest strength an edge may carry.
pub const MAX_STRENGTH: f64 = 1.0;

/// Unique, stable identifier for a node: the project-relative path with `/` separators.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Derive the id from a project-relative path. Only normal components are kept,
    /// so `./src/a.py` and `src/a.py` map to the same id on every platform.
    pub fn from_path(relative: &Path) -> Self {
        let parts: Vec<_> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect();
        NodeId(parts.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId(value.to_string())
    }
}

/// What kind of unit a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Script,
    Module,
    Workflow,
    Api,
    Config,
    Documentation,
    Unknown,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Script => "script",
            NodeType::Module => "module",
            NodeType::Workflow => "workflow",
            NodeType::Api => "api",
            NodeType::Config => "config",
            NodeType::Documentation => "documentation",
            NodeType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived status, written only by the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Unresolved,
    Resolved,
    Conflict,
}

/// A single analyzable file in the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Raw reference strings in order of appearance, not yet resolved.
    pub dependencies: Vec<String>,
    /// Ids of nodes holding an edge to this one.
    pub dependents: BTreeSet<NodeId>,
    pub metadata: BTreeMap<String, String>,
    pub priority: i32,
    pub status: NodeStatus,
}

impl Node {
    /// Create a node for a project-relative path. The name is the file stem.
    pub fn new(relative_path: impl AsRef<Path>, node_type: NodeType) -> Self {
        let relative_path = relative_path.as_ref();
        let id = NodeId::from_path(relative_path);
        let name = relative_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| id.0.clone());

        Node {
            path: id.0.clone(),
            id,
            name,
            node_type,
            dependencies: Vec::new(),
            dependents: BTreeSet::new(),
            metadata: BTreeMap::new(),
            priority: 0,
            status: NodeStatus::default(),
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The `component` classification tag, if any.
    pub fn component(&self) -> Option<&str> {
        self.metadata.get("component").map(String::as_str)
    }

    /// Lowercased file extension of the node's path.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.path)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }
}

/// How binding a relationship is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    Hard,
    Soft,
    Optional,
}

/// A directed, typed, weighted relationship between two registered nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    /// Always within `MIN_STRENGTH..=MAX_STRENGTH`.
    pub strength: f64,
    pub constraint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictType {
    Circular,
    Missing,
    Version,
    CriticalComponentMissing,
}

impl ConflictType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictType::Circular => "circular",
            ConflictType::Missing => "missing",
            ConflictType::Version => "version",
            ConflictType::CriticalComponentMissing => "critical-component-missing",
        }
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// A detected structural problem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conflict {
    pub id: String,
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    pub severity: Severity,
    /// Involved nodes; empty for project-wide conflicts.
    pub nodes: Vec<NodeId>,
    pub description: String,
    pub metadata: BTreeMap<String, String>,
    /// `None` means the conflict needs manual intervention. Serialized as `null`.
    pub resolution: Option<Resolution>,
}

impl Conflict {
    pub fn requires_manual_intervention(&self) -> bool {
        self.resolution.is_none()
    }
}

/// Remediation strategies the synthesizer can propose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    BreakWeakestEdge,
    ManualReview,
    SuggestAlternative,
    CreatePlaceholder,
    PreferHighestPriority,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::BreakWeakestEdge => "break_weakest_edge",
            Strategy::ManualReview => "manual_review",
            Strategy::SuggestAlternative => "suggest_alternative",
            Strategy::CreatePlaceholder => "create_placeholder",
            Strategy::PreferHighestPriority => "prefer_highest_priority",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

/// An advisory remediation. Never applied to the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resolution {
    pub strategy: Strategy,
    pub action: String,
    pub parameters: BTreeMap<String, String>,
    /// In `0.0..=1.0`.
    pub confidence: f64,
    pub impact: Impact,
    pub reversible: bool,
}
