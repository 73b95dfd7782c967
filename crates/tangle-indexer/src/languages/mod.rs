//! Reference extractors for each source family

pub mod config;
pub mod javascript;
pub mod markdown;
pub mod powershell;
pub mod python;
pub mod shell;
pub mod workflow;

use crate::extractor::ReferenceExtractor;
use std::path::Path;
use tangle_core::NodeType;

/// Get the extractor for a file based on its type and extension
pub fn get_extractor(path: &Path, node_type: NodeType) -> Option<Box<dyn ReferenceExtractor>> {
    if node_type == NodeType::Workflow && has_extension(path, &["json"]) {
        return Some(Box::new(workflow::WorkflowExtractor));
    }

    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "py" => Some(Box::new(python::PythonExtractor)),
        "js" | "mjs" | "cjs" | "jsx" | "ts" | "tsx" => {
            Some(Box::new(javascript::JavaScriptExtractor))
        }
        "ps1" | "psm1" => Some(Box::new(powershell::PowerShellExtractor)),
        "sh" | "bash" | "zsh" => Some(Box::new(shell::ShellExtractor)),
        "md" => Some(Box::new(markdown::MarkdownExtractor)),
        "json" | "yaml" | "yml" | "toml" | "ini" | "cfg" | "conf" => {
            Some(Box::new(config::ConfigExtractor))
        }
        _ => None,
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
}
