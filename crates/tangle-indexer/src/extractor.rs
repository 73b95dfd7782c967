//! Reference extractor trait definition

use regex::Regex;
use std::path::Path;

/// Pulls raw reference strings out of one file's content.
pub trait ReferenceExtractor: Send + Sync {
    fn extract(&self, path: &Path, content: &str) -> anyhow::Result<Vec<String>>;
}

/// Collect the first capture group of every match, in order of appearance.
pub(crate) fn captures(patterns: &[&Regex], content: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = patterns
        .iter()
        .flat_map(|re| re.captures_iter(content))
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.start(), m.as_str().to_string()))
        .collect();
    found.sort_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, reference)| reference).collect()
}

/// Trim, strip quotes, use `/` separators, drop a leading `./`, then remove empties
/// and duplicates. First appearance wins.
pub fn normalize_references<I>(references: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut normalized: Vec<String> = Vec::new();
    for reference in references {
        let mut cleaned = reference
            .trim()
            .trim_matches(|c| c == '"' || c == '\'' || c == '`')
            .trim()
            .replace('\\', "/");
        while let Some(rest) = cleaned.strip_prefix("./") {
            cleaned = rest.to_string();
        }
        if cleaned.is_empty() || normalized.contains(&cleaned) {
            continue;
        }
        normalized.push(cleaned);
    }
    normalized
}
