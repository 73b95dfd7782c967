//! Config file extraction: `include` / `extends` / `import` keys naming files

use crate::extractor::{ReferenceExtractor, captures};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static FILE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?im)(?:^|[\s{,])[ \t-]*["']?(?:include|includes|extends|import|imports)["']?"#,
        r#"[ \t]*[:=][ \t]*\[?[ \t]*["']?([^\s"',\]\}]+)"#,
    ))
    .unwrap()
});

pub struct ConfigExtractor;

impl ReferenceExtractor for ConfigExtractor {
    fn extract(&self, _path: &Path, content: &str) -> anyhow::Result<Vec<String>> {
        Ok(captures(&[&*FILE_KEY], content)
            .into_iter()
            .filter(|value| looks_like_file(value))
            .collect())
    }
}

fn looks_like_file(value: &str) -> bool {
    value.contains('/') || value.contains('\\') || Path::new(value).extension().is_some()
}
