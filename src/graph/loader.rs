//! Ontology document loading
//!
//! A document is a JSON object with `nodes` and `edges` arrays and an
//! optional `clusters` array, possibly nested under a root key. Missing
//! files and malformed documents are reported as distinct errors; there is
//! no placeholder graph.

use super::cluster::Cluster;
use super::edge::Relationship;
use super::node::ActorNode;
use super::store::{OntologyError, OntologyGraph, OntologyResult};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load an ontology from a JSON file
pub fn load_ontology_file(path: &Path, root_key: Option<&str>) -> OntologyResult<OntologyGraph> {
    if !path.exists() {
        warn!(path = %path.display(), "Ontology file not found");
        return Err(OntologyError::NotFound(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path).map_err(|source| OntologyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: Value = serde_json::from_str(&raw)?;
    let graph = load_ontology_value(&doc, root_key)?;
    info!(
        path = %path.display(),
        actors = graph.node_count(),
        relationships = graph.relationship_count(),
        clusters = graph.cluster_count(),
        "Loaded ontology"
    );
    Ok(graph)
}

/// Build the graph from an already parsed document
pub fn load_ontology_value(doc: &Value, root_key: Option<&str>) -> OntologyResult<OntologyGraph> {
    let doc = match root_key {
        Some(key) => doc
            .get(key)
            .ok_or_else(|| OntologyError::MissingKey(key.to_string()))?,
        None => doc,
    };
    if !doc.is_object() {
        return Err(OntologyError::InvalidShape {
            context: "ontology document".to_string(),
            reason: "expected a JSON object".to_string(),
        });
    }

    let nodes = required_array(doc, "nodes")?;
    let edges = required_array(doc, "edges")?;

    let mut graph = OntologyGraph::new();
    for (idx, raw) in nodes.iter().enumerate() {
        let node: ActorNode = serde_json::from_value(raw.clone()).map_err(|e| OntologyError::InvalidShape {
            context: format!("nodes[{}]", idx),
            reason: e.to_string(),
        })?;
        graph.add_actor(node)?;
    }

    for (idx, raw) in edges.iter().enumerate() {
        let rel: Relationship = serde_json::from_value(raw.clone()).map_err(|e| OntologyError::InvalidShape {
            context: format!("edges[{}]", idx),
            reason: e.to_string(),
        })?;
        graph.add_relationship(rel);
    }

    // Clusters are optional and never fail the load.
    match doc.get("clusters") {
        None | Some(Value::Null) => debug!("Ontology has no clusters"),
        Some(Value::Array(clusters)) => {
            for (idx, raw) in clusters.iter().enumerate() {
                match serde_json::from_value::<Cluster>(raw.clone()) {
                    Ok(cluster) => graph.add_cluster(cluster),
                    Err(e) => {
                        warn!(index = idx, error = %e, "Skipping malformed cluster");
                        graph.record_skipped_cluster(format!("clusters[{}]: {}", idx, e));
                    }
                }
            }
        }
        Some(_) => {
            warn!("Ignoring `clusters`: expected an array");
            graph.record_skipped_cluster("clusters: expected an array".to_string());
        }
    }

    Ok(graph)
}

fn required_array<'a>(doc: &'a Value, key: &str) -> OntologyResult<&'a Vec<Value>> {
    match doc.get(key) {
        None => Err(OntologyError::MissingKey(key.to_string())),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(OntologyError::InvalidShape {
            context: format!("`{}`", key),
            reason: "expected an array".to_string(),
        }),
    }
}
