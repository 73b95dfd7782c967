//! Component tagging and priority assignment

use regex::{Regex, RegexBuilder};
use tangle_core::{AnalysisConfig, NodeType};
use tracing::warn;

/// Priority bonus for files belonging to a critical component.
const CRITICAL_BONUS: i32 = 2;
const MAX_PRIORITY: i32 = 10;

/// Compiled component patterns plus the critical component set.
pub struct Classifier {
    patterns: Vec<(String, Regex)>,
    critical: Vec<String>,
}

impl Classifier {
    /// Invalid patterns are logged and left out.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        let patterns = config
            .component_patterns
            .iter()
            .filter_map(|p| {
                match RegexBuilder::new(&p.pattern).case_insensitive(true).build() {
                    Ok(re) => Some((p.label.clone(), re)),
                    Err(e) => {
                        warn!("Ignoring component pattern for {}: {}", p.label, e);
                        None
                    }
                }
            })
            .collect();

        Classifier {
            patterns,
            critical: config.critical_components.iter().map(|c| c.label.clone()).collect(),
        }
    }

    /// First pattern matching the path, else first pattern matching the content.
    pub fn component(&self, relative_path: &str, content: &str) -> Option<&str> {
        self.first_match(relative_path)
            .or_else(|| self.first_match(content))
    }

    pub fn priority(&self, node_type: NodeType, component: Option<&str>) -> i32 {
        let base = match node_type {
            NodeType::Api => 8,
            NodeType::Workflow => 7,
            NodeType::Script => 6,
            NodeType::Module => 5,
            NodeType::Config => 4,
            NodeType::Documentation => 2,
            NodeType::Unknown => 1,
        };
        let bonus = match component {
            Some(label) if self.critical.iter().any(|c| c == label) => CRITICAL_BONUS,
            _ => 0,
        };
        (base + bonus).min(MAX_PRIORITY)
    }

    fn first_match(&self, haystack: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(haystack))
            .map(|(label, _)| label.as_str())
    }
}
