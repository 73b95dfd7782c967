//! Analysis configuration
//!
//! Looked up in the project root in this order:
//! 1. `tangle.toml`
//! 2. `.tangle.yaml` / `.tangle.yml`
//!
//! Every field has a default, so a missing or partial file is fine.

use crate::error::{ResolverError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Config file names probed in the project root.
pub const CONFIG_FILES: &[&str] = &["tangle.toml", ".tangle.yaml", ".tangle.yml"];

/// How loudly the absence of a critical component is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    #[default]
    Critical,
    Warning,
}

/// A component label whose total absence from the graph is a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalComponent {
    pub label: String,
    #[serde(default)]
    pub level: AlertLevel,
}

impl CriticalComponent {
    pub fn new(label: impl Into<String>, level: AlertLevel) -> Self {
        CriticalComponent {
            label: label.into(),
            level,
        }
    }
}

/// A regular expression that tags matching files with a component label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentPattern {
    pub label: String,
    pub pattern: String,
}

impl ComponentPattern {
    fn new(label: &str, pattern: &str) -> Self {
        ComponentPattern {
            label: label.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Component whose incoming edges are always hard and strengthened.
    pub core_component: String,
    pub critical_components: Vec<CriticalComponent>,
    /// Checked in order; the first match labels the file.
    pub component_patterns: Vec<ComponentPattern>,
    pub skip_directories: Vec<String>,
    pub skip_globs: Vec<String>,
    /// Files larger than this many bytes are not analyzed.
    pub max_file_size: u64,
    /// Extraction threads; 0 means one per CPU.
    pub workers: usize,
    pub timeout_secs: u64,
    /// Minimum health score for a successful exit.
    pub health_threshold: f64,
    /// Node count above which modularization is recommended.
    pub modularize_threshold: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            core_component: "RAG_Engine".to_string(),
            critical_components: vec![CriticalComponent::new("RAG_Engine", AlertLevel::Critical)],
            component_patterns: vec![
                ComponentPattern::new(
                    "RAG_Engine",
                    r"\brag\b|rag[_-]|retriev|embedding|vector[_-]?store",
                ),
                ComponentPattern::new("Workflow_Engine", r"workflow|n8n|orchestrat"),
                ComponentPattern::new(
                    "API_Gateway",
                    r"\bapi\b|api[_/-]|gateway|endpoint|routes?\b",
                ),
                ComponentPattern::new("Memory_System", r"memory|cache|session[_-]?store"),
                ComponentPattern::new("Automation_Script", r"\.(ps1|psm1|sh|bash)$"),
                ComponentPattern::new("Configuration", r"\.(ya?ml|toml|ini|cfg|conf|env)$|config"),
                ComponentPattern::new("Documentation", r"\.(md|rst|adoc)$|docs?/"),
            ],
            skip_directories: [
                ".git",
                "node_modules",
                "__pycache__",
                "target",
                "venv",
                ".venv",
                "dist",
                "build",
                ".idea",
                ".vscode",
                ".pytest_cache",
                ".mypy_cache",
                "coverage",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            skip_globs: vec!["*.min.js".to_string(), "*.lock".to_string(), "*.map".to_string()],
            max_file_size: 1024 * 1024,
            workers: 0,
            timeout_secs: 600,
            health_threshold: 70.0,
            modularize_threshold: 100,
        }
    }
}

impl AnalysisConfig {
    /// Whether a directory with this name is never descended into.
    pub fn should_skip_directory(&self, name: &str) -> bool {
        self.skip_directories.iter().any(|skip| skip == name)
    }

    pub fn is_critical(&self, label: &str) -> bool {
        self.critical_components.iter().any(|c| c.label == label)
    }

    pub fn alert_level(&self, label: &str) -> AlertLevel {
        self.critical_components
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.level)
            .unwrap_or_default()
    }

    /// Parse a config file, choosing the format by extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ResolverError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let parsed = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| ResolverError::Config {
            path: path.to_path_buf(),
            message,
        })
    }
}

/// Load configuration for a project.
///
/// An explicit path must parse. Auto-discovered files that fail to parse are logged
/// and skipped; with no usable file the defaults apply.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<AnalysisConfig> {
    if let Some(path) = explicit {
        let config = AnalysisConfig::from_file(path)?;
        debug!("Loaded config from {}", path.display());
        return Ok(config);
    }

    for name in CONFIG_FILES {
        let path = project_root.join(name);
        if !path.exists() {
            continue;
        }
        match AnalysisConfig::from_file(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                return Ok(config);
            }
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
            }
        }
    }

    debug!("No config found, using defaults");
    Ok(AnalysisConfig::default())
}
