//! File type classification by extension, location and content

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tangle_core::NodeType;

const SCRIPT_EXTENSIONS: &[&str] = &["sh", "bash", "zsh", "ps1", "bat", "cmd"];
const MODULE_EXTENSIONS: &[&str] = &[
    "py", "js", "mjs", "cjs", "ts", "tsx", "jsx", "psm1", "rs", "go", "rb",
];
const CONFIG_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "toml", "ini", "cfg", "env", "conf"];
const DOC_EXTENSIONS: &[&str] = &["md", "rst", "txt", "adoc"];

static API_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[/_.-])(api|routes|endpoints)([/_.-]|$)").unwrap());

/// Decide the [`NodeType`] of a project-relative file.
pub fn classify_file_type(relative: &Path, content: &str) -> NodeType {
    let ext = extension(relative);
    let path = relative.to_string_lossy().replace('\\', "/").to_lowercase();
    let file_name = relative
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if SCRIPT_EXTENSIONS.contains(&ext.as_str()) {
        return NodeType::Script;
    }
    if MODULE_EXTENSIONS.contains(&ext.as_str()) {
        return if API_PATH.is_match(&path) {
            NodeType::Api
        } else {
            NodeType::Module
        };
    }

    let structured = matches!(ext.as_str(), "json" | "yaml" | "yml");
    if structured && (file_name.starts_with("openapi") || file_name.starts_with("swagger")) {
        return NodeType::Api;
    }
    if ext == "json" && content.contains("\"nodes\"") && content.contains("\"connections\"") {
        return NodeType::Workflow;
    }
    if matches!(ext.as_str(), "yaml" | "yml") && path.contains(".github/workflows/") {
        return NodeType::Workflow;
    }
    if CONFIG_EXTENSIONS.contains(&ext.as_str()) || file_name == ".env" {
        return NodeType::Config;
    }
    if DOC_EXTENSIONS.contains(&ext.as_str()) {
        return NodeType::Documentation;
    }

    NodeType::Unknown
}

/// Language label recorded in node metadata.
pub fn language_for(relative: &Path) -> &'static str {
    match extension(relative).as_str() {
        "py" => "python",
        "js" | "mjs" | "cjs" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "ps1" | "psm1" => "powershell",
        "sh" | "bash" | "zsh" => "shell",
        "bat" | "cmd" => "batch",
        "rs" => "rust",
        "go" => "go",
        "rb" => "ruby",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "ini" | "cfg" | "conf" | "env" => "ini",
        "md" => "markdown",
        "rst" => "restructuredtext",
        "adoc" => "asciidoc",
        "txt" => "text",
        _ => "unknown",
    }
}

fn extension(relative: &Path) -> String {
    relative
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
