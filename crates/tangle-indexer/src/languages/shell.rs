//! Shell `source` and script invocation extraction

use crate::extractor::{ReferenceExtractor, captures};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static SOURCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^[ \t]*(?:source|\.)[ \t]+['"]?([^\s'";|&]+)"#).unwrap());
static INVOKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(?:bash|sh|zsh)[ \t]+['"]?([^\s'";|&]+\.sh)\b"#).unwrap());

pub struct ShellExtractor;

impl ReferenceExtractor for ShellExtractor {
    fn extract(&self, _path: &Path, content: &str) -> anyhow::Result<Vec<String>> {
        Ok(captures(&[&*SOURCE, &*INVOKE], content))
    }
}
