//! PowerShell module and dot-source extraction

use crate::extractor::{ReferenceExtractor, captures};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static IMPORT_MODULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?im)^[ \t]*Import-Module\s+(?:-Name\s+)?['"]?([^\s'";]+)"#).unwrap()
});
static DOT_SOURCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^[ \t]*\.[ \t]+['"]?([^\s'";]+\.ps1)"#).unwrap());
static USING_MODULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?im)^[ \t]*using\s+module\s+['"]?([^\s'";]+)"#).unwrap());

pub struct PowerShellExtractor;

impl ReferenceExtractor for PowerShellExtractor {
    fn extract(&self, _path: &Path, content: &str) -> anyhow::Result<Vec<String>> {
        Ok(captures(&[&*IMPORT_MODULE, &*DOT_SOURCE, &*USING_MODULE], content)
            .into_iter()
            .map(|reference| strip_script_root(&reference).to_string())
            .collect())
    }
}

/// `$PSScriptRoot\x.ps1` refers to a sibling file.
fn strip_script_root(reference: &str) -> &str {
    let Some(rest) = reference.strip_prefix("$PSScriptRoot") else {
        return reference;
    };
    rest.trim_start_matches(['\\', '/'])
}
