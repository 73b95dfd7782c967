//! Whole-pipeline tests for tangle-core

use crate::test_utils::{component_node, module, three_cycle};
use crate::*;
use std::collections::BTreeSet;

fn run(nodes: Vec<Node>) -> Analysis {
    analyze(nodes, &AnalysisConfig::default(), &Deadline::from_secs(600)).unwrap()
}

#[test]
fn test_three_cycle_reports_one_high_severity_conflict() {
    let analysis = run(three_cycle());

    let cycles: Vec<&Conflict> = analysis.conflicts.of_type(ConflictType::Circular).collect();
    assert_eq!(cycles.len(), 1);
    let cycle = cycles[0];
    assert_eq!(cycle.severity, Severity::High);
    assert_eq!(
        cycle.nodes,
        vec![NodeId::from("a.py"), "b.py".into(), "c.py".into(), "a.py".into()]
    );

    let resolution = cycle.resolution.as_ref().unwrap();
    assert_eq!(resolution.strategy, Strategy::BreakWeakestEdge);
    assert_eq!(resolution.confidence, 0.8);
    assert_eq!(resolution.parameters["source"], "a.py");
    assert_eq!(resolution.parameters["target"], "b.py");
}

#[test]
fn test_missing_reference_with_similar_name_gets_suggestion() {
    let analysis = run(vec![
        module("app.py", &["Data_Loader"], 5),
        module("data_loader.py", &[], 5),
    ]);

    let missing: Vec<&Conflict> = analysis.conflicts.of_type(ConflictType::Missing).collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].nodes, vec![NodeId::from("app.py")]);

    let resolution = missing[0].resolution.as_ref().unwrap();
    assert_eq!(resolution.strategy, Strategy::SuggestAlternative);
    assert_eq!(resolution.parameters["suggestion"], "data_loader");
}

#[test]
fn test_missing_reference_without_match_gets_placeholder() {
    let analysis = run(vec![module("app.py", &["nonexistent_xyz"], 8)]);

    let missing: Vec<&Conflict> = analysis.conflicts.of_type(ConflictType::Missing).collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].severity, Severity::High);

    let resolution = missing[0].resolution.as_ref().unwrap();
    assert_eq!(resolution.strategy, Strategy::CreatePlaceholder);
    assert_eq!(resolution.confidence, 0.4);
    assert_eq!(resolution.impact, Impact::Medium);
}

#[test]
fn test_absent_core_component_is_unresolved_critical_conflict() {
    let analysis = run(vec![module("util.py", &[], 3)]);

    let critical: Vec<&Conflict> = analysis
        .conflicts
        .of_type(ConflictType::CriticalComponentMissing)
        .collect();
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].severity, Severity::Critical);
    assert!(critical[0].nodes.is_empty());
    assert!(critical[0].resolution.is_none());
    assert!(critical[0].requires_manual_intervention());
    assert!(analysis.health.recommendations.iter().any(|r| r.starts_with("CRITICAL: RAG_Engine")));
}

#[test]
fn test_present_core_component_raises_no_critical_conflict() {
    let analysis = run(vec![
        component_node("rag/retriever.py", NodeType::Module, "RAG_Engine"),
        module("app.py", &["retriever"], 5),
    ]);

    assert_eq!(analysis.conflicts.count_of(ConflictType::CriticalComponentMissing), 0);
    let edge = analysis.graph.edges().next().unwrap();
    assert_eq!(edge.edge_type, EdgeType::Hard);
    assert!((edge.strength - 0.8).abs() < 1e-9);
}

#[test]
fn test_empty_project_scores_zero_nodes_without_panicking() {
    let analysis = run(Vec::new());

    assert_eq!(analysis.health.statistics.total_nodes, 0);
    assert_eq!(analysis.graph.edge_count(), 0);
    assert!((0.0..=100.0).contains(&analysis.health_score()));
}

#[test]
fn test_edges_and_dependents_agree() {
    let analysis = run(vec![
        module("a.py", &["b", "c"], 5),
        module("b.py", &["c"], 9),
        module("c.py", &["a", "missing_thing"], 2),
        component_node("api/search.js", NodeType::Api, "API_Gateway").with_dependencies(["a"]),
    ]);
    let graph = &analysis.graph;

    for edge in graph.edges() {
        assert!(graph.contains(&edge.source));
        assert!(graph.contains(&edge.target));
        assert!(graph.node(&edge.target).unwrap().dependents.contains(&edge.source));
        assert!((0.1..=1.0).contains(&edge.strength));
    }
    for node in graph.nodes() {
        for dependent in &node.dependents {
            assert!(!graph.edges_between(dependent, &node.id).is_empty());
        }
    }
}

#[test]
fn test_resolution_confidence_within_bounds() {
    let analysis = run(vec![
        module("a.py", &["b"], 5),
        module("b.py", &["a", "Helpers"], 5),
        module("helpers.py", &[], 4),
        module("tools/helpers_v2.py", &[], 6),
    ]);

    assert!(analysis.conflicts.resolved_count() > 0);
    for resolution in analysis.conflicts.resolutions() {
        assert!((0.0..=1.0).contains(&resolution.confidence));
    }
}

#[test]
fn test_status_follows_conflicts() {
    let mut nodes = three_cycle();
    nodes.push(module("standalone.py", &[], 5));

    let analysis = run(nodes);

    let flagged: BTreeSet<&NodeId> =
        analysis.conflicts.iter().flat_map(|c| c.nodes.iter()).collect();
    for node in analysis.graph.nodes() {
        if flagged.contains(&node.id) {
            assert_eq!(node.status, NodeStatus::Conflict);
        } else {
            assert_eq!(node.status, NodeStatus::Resolved);
        }
    }
    assert_eq!(
        analysis.graph.node(&"standalone.py".into()).unwrap().status,
        NodeStatus::Resolved
    );
}

#[test]
fn test_rerun_is_identical() {
    let input = vec![
        module("a.py", &["b"], 5),
        module("b.py", &["a", "ghost"], 8),
        module("lib/b_v2.py", &[], 3),
    ];

    let first = run(input.clone());
    let second = run(input);

    let first_ids: Vec<&str> = first.conflicts.iter().map(|c| c.id.as_str()).collect();
    let second_ids: Vec<&str> = second.conflicts.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(first_ids, second_ids);
    assert_eq!(first.health, second.health);
    assert_eq!(
        first.graph.edges().collect::<Vec<_>>(),
        second.graph.edges().collect::<Vec<_>>()
    );
}

#[test]
fn test_expired_deadline_aborts() {
    let deadline = Deadline::new(std::time::Duration::ZERO);
    std::thread::sleep(std::time::Duration::from_millis(5));

    let result = analyze(three_cycle(), &AnalysisConfig::default(), &deadline);

    assert!(matches!(result, Err(ResolverError::Timeout { .. })));
}

#[test]
fn test_report_shape() {
    let analysis = run(three_cycle());
    let now = chrono::Utc::now();
    let report = AnalysisReport::new(std::path::Path::new("/tmp/project"), now, now, &analysis);

    let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    for key in [
        "project_path",
        "start_time",
        "end_time",
        "execution_time",
        "graph",
        "conflicts",
        "resolutions",
        "statistics",
        "recommendations",
        "health_score",
    ] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(value["graph"]["nodes"]["a.py"]["type"], "module");
    assert_eq!(value["conflicts"][0]["type"], "circular");
    assert_eq!(value["resolutions"][0]["strategy"], "break_weakest_edge");
    assert_eq!(value["statistics"]["circular_dependencies"], 1);
    assert_eq!(value["execution_time"], 0.0);
}
