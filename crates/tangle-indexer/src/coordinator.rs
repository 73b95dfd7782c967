//! Orchestrates parallel indexing

use crate::classify::Classifier;
use crate::discovery::{SourceFile, discover_files};
use crate::extractor::normalize_references;
use crate::file_type::{classify_file_type, language_for};
use crate::languages::get_extractor;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rayon::prelude::*;
use std::path::Path;
use tangle_core::{AnalysisConfig, Deadline, Node, NodeId};
use tracing::{debug, info, warn};

pub struct Coordinator<'c> {
    config: &'c AnalysisConfig,
    classifier: Classifier,
}

impl<'c> Coordinator<'c> {
    pub fn new(config: &'c AnalysisConfig) -> Self {
        Coordinator {
            config,
            classifier: Classifier::from_config(config),
        }
    }

    /// Discover and extract every file under `root`. Nodes come back sorted by id
    /// regardless of how the pool scheduled the work.
    pub fn run_full_index(
        &self,
        root: &Path,
        deadline: &Deadline,
    ) -> tangle_core::Result<Vec<Node>> {
        let files = discover_files(root, self.config)?;
        deadline.check("file discovery")?;

        let merged: DashMap<NodeId, Node> = DashMap::with_capacity(files.len());
        let extract_all = || {
            files.par_iter().for_each(|file| {
                if deadline.is_expired() {
                    return;
                }
                if let Some(node) = self.index_file(file) {
                    merged.insert(node.id.clone(), node);
                }
            })
        };

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()
        {
            Ok(pool) => pool.install(extract_all),
            Err(e) => {
                warn!("Falling back to the global thread pool: {}", e);
                extract_all();
            }
        }
        deadline.check("reference extraction")?;

        let mut nodes: Vec<Node> = merged.into_iter().map(|(_, node)| node).collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let references: usize = nodes.iter().map(|n| n.dependencies.len()).sum();
        info!("Indexed {} files with {} references", nodes.len(), references);
        Ok(nodes)
    }

    /// Build the node for one file. Unreadable files are skipped; a failed extraction
    /// keeps the node with no references.
    pub fn index_file(&self, file: &SourceFile) -> Option<Node> {
        let bytes = match std::fs::read(&file.absolute) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Cannot read {}: {}", file.absolute.display(), e);
                return None;
            }
        };
        let content = String::from_utf8_lossy(&bytes);

        let node_type = classify_file_type(&file.relative, &content);
        let references = match get_extractor(&file.relative, node_type) {
            Some(extractor) => extractor
                .extract(&file.relative, &content)
                .unwrap_or_else(|e| {
                    warn!("Extraction failed for {}: {:#}", file.relative.display(), e);
                    Vec::new()
                }),
            None => Vec::new(),
        };

        let id = NodeId::from_path(&file.relative);
        let component = self.classifier.component(id.as_str(), &content).map(str::to_string);
        let priority = self.classifier.priority(node_type, component.as_deref());

        let mut node = Node::new(&file.relative, node_type)
            .with_dependencies(normalize_references(references))
            .with_priority(priority)
            .with_metadata("language", language_for(&file.relative))
            .with_metadata("size", file.size.to_string());
        if let Some(modified) = file.modified {
            node = node.with_metadata("modified", DateTime::<Utc>::from(modified).to_rfc3339());
        }
        if let Some(component) = component {
            node = node.with_metadata("component", component);
        }

        debug!(
            "{} [{}] priority {} with {} references",
            node.id,
            node.node_type,
            node.priority,
            node.dependencies.len()
        );
        Some(node)
    }
}

/// Index a project with the given configuration.
pub fn index_project(
    root: &Path,
    config: &AnalysisConfig,
    deadline: &Deadline,
) -> tangle_core::Result<Vec<Node>> {
    Coordinator::new(config).run_full_index(root, deadline)
}
