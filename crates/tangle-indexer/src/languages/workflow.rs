//! Workflow export extraction: sub-workflow ids and credential ids

use crate::extractor::ReferenceExtractor;
use anyhow::Context;
use serde_json::Value;
use std::path::Path;

pub struct WorkflowExtractor;

impl ReferenceExtractor for WorkflowExtractor {
    fn extract(&self, path: &Path, content: &str) -> anyhow::Result<Vec<String>> {
        let document: Value = serde_json::from_str(content)
            .with_context(|| format!("invalid workflow JSON in {}", path.display()))?;

        let mut references = Vec::new();
        collect(&document, &mut references);
        Ok(references)
    }
}

/// Depth-first over the parsed document.
fn collect(value: &Value, references: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match key.as_str() {
                    "workflowId" => references.extend(workflow_id(child)),
                    "credentials" => references.extend(credential_ids(child)),
                    _ => collect(child, references),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect(item, references);
            }
        }
        _ => {}
    }
}

/// Plain string or `{ "value": "..." }` resource locator.
fn workflow_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        Value::Object(map) => map.get("value").and_then(workflow_id),
        _ => None,
    }
}

fn credential_ids(value: &Value) -> Vec<String> {
    let Value::Object(credentials) = value else {
        return Vec::new();
    };
    credentials
        .values()
        .filter_map(|credential| credential.get("id"))
        .filter_map(workflow_id)
        .collect()
}
