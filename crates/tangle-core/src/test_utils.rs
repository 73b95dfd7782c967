//! Test utilities for Tangle

use crate::model::{Node, NodeType};
use std::fs;
use tempfile::TempDir;

/// Create a temporary project with the given (relative path, content) files
pub fn create_repo_with_structure(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for (path, content) in files {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }

    temp_dir
}

/// A module node with the given references and priority
pub fn module(path: &str, references: &[&str], priority: i32) -> Node {
    Node::new(path, NodeType::Module)
        .with_dependencies(references.iter().copied())
        .with_priority(priority)
}

/// A node tagged with a component label
pub fn component_node(path: &str, node_type: NodeType, component: &str) -> Node {
    Node::new(path, node_type).with_metadata("component", component)
}

/// Three python modules referencing each other in a ring: a -> b -> c -> a
pub fn three_cycle() -> Vec<Node> {
    vec![
        module("a.py", &["b"], 5),
        module("b.py", &["c"], 5),
        module("c.py", &["a"], 5),
    ]
}
