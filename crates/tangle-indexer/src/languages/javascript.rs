//! JavaScript / TypeScript import extraction

use crate::extractor::{ReferenceExtractor, captures};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static STATIC_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*(?:import|export)\s+(?:[\w*{}\s,$]+?\s+from\s+)?['"]([^'"]+)['"]"#)
        .unwrap()
});
static REQUIRE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\brequire\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());
static DYNAMIC_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bimport\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

pub struct JavaScriptExtractor;

impl ReferenceExtractor for JavaScriptExtractor {
    fn extract(&self, _path: &Path, content: &str) -> anyhow::Result<Vec<String>> {
        Ok(captures(&[&*STATIC_IMPORT, &*REQUIRE, &*DYNAMIC_IMPORT], content))
    }
}
