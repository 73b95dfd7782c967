//! Relative link extraction from Markdown

use crate::extractor::{ReferenceExtractor, captures};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]\(\s*<?([^)\s>#]+)").unwrap());

pub struct MarkdownExtractor;

impl ReferenceExtractor for MarkdownExtractor {
    fn extract(&self, _path: &Path, content: &str) -> anyhow::Result<Vec<String>> {
        Ok(captures(&[&*LINK], content)
            .into_iter()
            .filter(|target| is_relative(target))
            .collect())
    }
}

fn is_relative(target: &str) -> bool {
    !(target.contains("://") || target.starts_with("mailto:") || target.starts_with('/'))
}
