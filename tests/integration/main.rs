//! Integration tests for the resolver
//!
//! These tests run indexing, analysis and report writing together over fixture projects.

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;
use tangle_core::{AnalysisConfig, ConflictType, Deadline, Strategy, analyze};
use tangle_indexer::index_project;
use tempfile::TempDir;

fn create_repo_with_structure(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (path, content) in files {
        let full_path = temp_dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }
    temp_dir
}

/// Three-module cycle, a tagged retrieval module and one dangling import.
fn cyclic_project() -> TempDir {
    create_repo_with_structure(&[
        ("flow/a.py", "import b\n"),
        ("flow/b.py", "import c\n"),
        ("flow/c.py", "import a\n"),
        ("rag/retriever.py", "def search(query):\n    return []\n"),
        ("app.py", "import retriever\nimport missing_module_xyz\n"),
        ("node_modules/dep/index.js", "require('./flow/a')\n"),
    ])
}

fn run_resolver(project: &Path, output: &Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_resolver"))
        .arg(project)
        .arg(output)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute resolver")
}

#[test]
fn test_index_and_analyze_end_to_end() {
    let project = cyclic_project();
    let config = AnalysisConfig::default();
    let deadline = Deadline::from_secs(600);

    let nodes = index_project(project.path(), &config, &deadline).unwrap();
    let analysis = analyze(nodes, &config, &deadline).unwrap();

    assert_eq!(analysis.graph.node_count(), 5);
    assert_eq!(analysis.graph.edge_count(), 4);

    let cycles: Vec<_> = analysis.conflicts.of_type(ConflictType::Circular).collect();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].nodes.len(), 4);
    assert_eq!(
        cycles[0].resolution.as_ref().map(|r| r.strategy),
        Some(Strategy::BreakWeakestEdge)
    );

    let missing: Vec<_> = analysis.conflicts.of_type(ConflictType::Missing).collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].metadata["reference"], "missing_module_xyz");
    assert_eq!(
        missing[0].resolution.as_ref().map(|r| r.strategy),
        Some(Strategy::CreatePlaceholder)
    );

    assert_eq!(analysis.conflicts.count_of(ConflictType::CriticalComponentMissing), 0);
    // 100 - 2/5*50 - 10 - 5 + 20
    assert!((analysis.health_score() - 85.0).abs() < 1e-9);
}

#[test]
fn test_cli_writes_report_and_passes() {
    let project = cyclic_project();
    let out_dir = TempDir::new().unwrap();
    let report_path = out_dir.path().join("report.json");

    let output = run_resolver(project.path(), &report_path);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Health score: 85.0/100"));

    let report: Value = serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["health_score"], 85.0);
    assert_eq!(report["statistics"]["total_nodes"], 5);
    assert_eq!(report["statistics"]["conflicts_detected"], 2);
    assert_eq!(report["statistics"]["conflicts_resolved"], 2);
    assert_eq!(report["statistics"]["component_types"]["RAG_Engine"], 2);
    assert_eq!(report["graph"]["nodes"]["flow/a.py"]["status"], "conflict");
    assert_eq!(report["graph"]["nodes"]["rag/retriever.py"]["status"], "resolved");
    assert_eq!(report["graph"]["edges"].as_array().unwrap().len(), 4);
    assert_eq!(report["resolutions"].as_array().unwrap().len(), 2);
    assert!(report["execution_time"].as_f64().unwrap() >= 0.0);
}

#[test]
fn test_cli_fails_below_threshold() {
    let project = create_repo_with_structure(&[(
        "x.py",
        "import nope_one\nimport nope_two\nimport nope_three\n",
    )]);
    let out_dir = TempDir::new().unwrap();
    let report_path = out_dir.path().join("report.json");

    let output = run_resolver(project.path(), &report_path);

    assert_eq!(output.status.code(), Some(1));
    let report: Value = serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["health_score"], 0.0);
    let conflicts = report["conflicts"].as_array().unwrap();
    let critical = conflicts
        .iter()
        .find(|c| c["type"] == "critical-component-missing")
        .unwrap();
    assert!(critical["resolution"].is_null());
    assert!(
        report["recommendations"]
            .as_array()
            .unwrap()
            .iter()
            .any(|r| r.as_str().unwrap().starts_with("CRITICAL: RAG_Engine"))
    );
}

#[test]
fn test_cli_missing_root_writes_nothing() {
    let out_dir = TempDir::new().unwrap();
    let report_path = out_dir.path().join("report.json");

    let output = run_resolver(&out_dir.path().join("no-such-project"), &report_path);

    assert_eq!(output.status.code(), Some(1));
    assert!(!report_path.exists());
}

#[test]
fn test_cli_reads_project_config() {
    let project = create_repo_with_structure(&[
        ("x.py", "import nope_one\n"),
        ("tangle.toml", "health_threshold = 0.0\ncritical_components = []\n"),
    ]);
    let out_dir = TempDir::new().unwrap();
    let report_path = out_dir.path().join("report.json");

    let output = run_resolver(project.path(), &report_path);

    assert!(output.status.success());
    let report: Value = serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["statistics"]["total_nodes"], 2);
    assert!(
        report["conflicts"]
            .as_array()
            .unwrap()
            .iter()
            .all(|c| c["type"] != "critical-component-missing")
    );
}

#[test]
fn test_cli_timeout_exits_without_report() {
    let project = create_repo_with_structure(&[
        ("a.py", "import b\n"),
        ("b.py", "import a\n"),
        ("tangle.toml", "timeout_secs = 0\n"),
    ]);
    let out_dir = TempDir::new().unwrap();
    let report_path = out_dir.path().join("report.json");

    let output = run_resolver(project.path(), &report_path);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("timed out"));
    assert!(!report_path.exists());
}
