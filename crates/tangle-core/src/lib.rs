//! Tangle Core: dependency graph model, conflict detection and resolution synthesis

pub mod graph;
pub mod model;
pub mod resolve;
pub mod builder;
pub mod detect;
pub mod synthesize;
pub mod optimize;
pub mod scoring;
pub mod pipeline;
pub mod report;
pub mod config;
pub mod deadline;
pub mod error;

#[cfg(test)]
pub mod tests;

#[cfg(test)]
pub mod test_utils;

pub use model::{
    Conflict, ConflictType, Edge, EdgeType, Impact, Node, NodeId, NodeStatus, NodeType, Resolution,
    Severity, Strategy,
};
pub use graph::DependencyGraph;
pub use resolve::TargetResolver;
pub use builder::GraphBuilder;
pub use detect::{ConflictDetector, ConflictSet};
pub use synthesize::ResolutionSynthesizer;
pub use optimize::GraphOptimizer;
pub use scoring::{HealthReport, HealthScorer, Statistics};
pub use pipeline::{Analysis, analyze};
pub use report::{AnalysisReport, GraphSnapshot, DEFAULT_REPORT_FILE};
pub use config::{AlertLevel, AnalysisConfig, ComponentPattern, CriticalComponent, load_config};
pub use deadline::Deadline;
pub use error::{ResolverError, Result};
