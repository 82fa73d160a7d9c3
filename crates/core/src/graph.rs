//! Pure functions over the resource dependency graph.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use thiserror::Error;

/// Resources that could not be ordered because they depend on each other.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}", .0.join(", "))]
pub struct DependencyCycle(pub Vec<String>);

/// Orders nodes so that every node comes after the nodes it depends on.
///
/// `edges` maps a node to its dependencies. Dependencies that are not keys of
/// `edges` (pseudo parameters, resources outside the graph) are ignored.
/// Ties are broken by node name, which keeps the order stable across runs.
pub fn topological_order(
    edges: &BTreeMap<String, BTreeSet<String>>,
) -> Result<Vec<String>, DependencyCycle> {
    let mut pending: BTreeMap<&str, BTreeSet<&str>> = edges
        .iter()
        .map(|(node, deps)| {
            let deps = deps
                .iter()
                .map(String::as_str)
                .filter(|dep| edges.contains_key(*dep) && *dep != node.as_str())
                .collect();
            (node.as_str(), deps)
        })
        .collect();

    let mut order = Vec::with_capacity(edges.len());

    loop {
        let ready: Vec<&str> = pending
            .iter()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(node, _)| *node)
            .collect();

        if ready.is_empty() {
            break;
        }

        for node in ready {
            pending.remove(node);
            for deps in pending.values_mut() {
                deps.remove(node);
            }
            order.push(node.to_string());
        }
    }

    if pending.is_empty() {
        Ok(order)
    } else {
        Err(DependencyCycle(
            pending.keys().map(|node| node.to_string()).collect(),
        ))
    }
}

/// Collects the targets of every `Ref` and `Fn::GetAtt` inside a JSON value.
pub fn json_references(value: &Value) -> BTreeSet<String> {
    let mut refs = BTreeSet::new();
    collect_json_references(value, &mut refs);
    refs
}

fn collect_json_references(value: &Value, refs: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(target)) = map.get("Ref") {
                refs.insert(target.clone());
            }
            if let Some(Value::Array(args)) = map.get("Fn::GetAtt") {
                if let Some(Value::String(target)) = args.first() {
                    refs.insert(target.clone());
                }
            }
            for nested in map.values() {
                collect_json_references(nested, refs);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_json_references(item, refs);
            }
        }
        _ => {}
    }
}
