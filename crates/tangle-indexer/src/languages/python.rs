//! Python import extraction

use crate::extractor::{ReferenceExtractor, captures};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*import[ \t]+([^\n#]+)").unwrap());
static FROM_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*from[ \t]+([.\w]+)[ \t]+import\b").unwrap());

pub struct PythonExtractor;

impl ReferenceExtractor for PythonExtractor {
    fn extract(&self, _path: &Path, content: &str) -> anyhow::Result<Vec<String>> {
        let mut references = Vec::new();
        for clause in captures(&[&*IMPORT, &*FROM_IMPORT], content) {
            // `import a as b, c` names two modules
            for module in clause.split(',') {
                let Some(module) = module.split_whitespace().next() else {
                    continue;
                };
                let module = module.trim_start_matches('.');
                if !module.is_empty() {
                    references.push(module.to_string());
                }
            }
        }
        Ok(references)
    }
}
