//! Analysis command: index, analyze, report

use anyhow::Context;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tangle_core::{Analysis, AnalysisReport, Deadline, ResolverError, analyze, load_config};
use tangle_indexer::index_project;

/// Run a full analysis and write the report. Returns whether the health score met the
/// configured threshold.
pub async fn resolve(
    project_path: PathBuf,
    output_file: PathBuf,
    config_path: Option<PathBuf>,
) -> anyhow::Result<bool> {
    let config = load_config(&project_path, config_path.as_deref())?;
    let deadline = Deadline::from_secs(config.timeout_secs);
    let start_time = Utc::now();
    tracing::info!("Analyzing project: {}", project_path.display());

    let task = {
        let root = project_path.clone();
        let config = config.clone();
        tokio::task::spawn_blocking(move || -> tangle_core::Result<Analysis> {
            let nodes = index_project(&root, &config, &deadline)?;
            analyze(nodes, &config, &deadline)
        })
    };

    // No report is written once the limit passes
    let analysis = match tokio::time::timeout(deadline.limit(), task).await {
        Ok(joined) => joined.context("analysis task panicked")??,
        Err(_) => {
            return Err(ResolverError::Timeout {
                limit: deadline.limit(),
                phase: "analysis".to_string(),
            }
            .into());
        }
    };

    let report = AnalysisReport::new(&project_path, start_time, Utc::now(), &analysis);
    report
        .write_to(&output_file)
        .with_context(|| format!("cannot write report to {}", output_file.display()))?;
    tracing::info!("Report written to {}", output_file.display());

    print_summary(&report, &output_file);
    Ok(report.health_score >= config.health_threshold)
}

fn print_summary(report: &AnalysisReport, output_file: &Path) {
    let stats = &report.statistics;
    println!("Health score: {:.1}/100", report.health_score);
    println!("Files analyzed: {}", stats.total_nodes);
    println!("Dependencies: {}", stats.total_edges);
    println!(
        "Conflicts: {} detected, {} with a proposed resolution",
        stats.conflicts_detected, stats.conflicts_resolved
    );
    println!(
        "  circular: {}, missing: {}",
        stats.circular_dependencies, stats.missing_dependencies
    );
    if !report.recommendations.is_empty() {
        println!("Recommendations:");
        for line in &report.recommendations {
            println!("  - {}", line);
        }
    }
    println!("Execution time: {:.2}s", report.execution_time);
    println!("Report: {}", output_file.display());
}
