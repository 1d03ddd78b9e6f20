//! In-memory ontology graph
//!
//! Holds actors, relationships and clusters in document order. Built fresh
//! every time the ontology is loaded; there is no mutation path back to the
//! source document.

use super::cluster::Cluster;
use super::edge::Relationship;
use super::node::ActorNode;
use super::types::{ActorId, ClusterId, RelationshipId};
use agreste_layout::{GraphView, NodeId};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur while loading an ontology
#[derive(Error, Debug)]
pub enum OntologyError {
    #[error("ontology file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read ontology file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ontology is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ontology document is missing the `{0}` key")]
    MissingKey(String),

    #[error("malformed {context}: {reason}")]
    InvalidShape { context: String, reason: String },

    #[error("actor id `{0}` appears more than once")]
    DuplicateNode(ActorId),
}

impl OntologyError {
    /// Missing input, as opposed to a malformed document
    pub fn is_not_found(&self) -> bool {
        matches!(self, OntologyError::NotFound(_))
    }
}

pub type OntologyResult<T> = Result<T, OntologyError>;

/// An edge dropped because an endpoint is not an actor in the document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEdge {
    pub id: RelationshipId,
    pub source: ActorId,
    pub target: ActorId,
}

/// What the loader left out
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub skipped_edges: Vec<SkippedEdge>,
    /// Cluster entries that could not be read
    pub skipped_clusters: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped_edges.is_empty() && self.skipped_clusters.is_empty()
    }
}

/// The actor network
#[derive(Debug, Clone, Default)]
pub struct OntologyGraph {
    nodes: IndexMap<ActorId, ActorNode>,
    relationships: Vec<Relationship>,
    clusters: IndexMap<ClusterId, Cluster>,
    report: LoadReport,
}

impl OntologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an actor; ids must be unique
    pub fn add_actor(&mut self, node: ActorNode) -> OntologyResult<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(OntologyError::DuplicateNode(node.id));
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Add a relationship. Returns false, and records it in the load report,
    /// when either endpoint is unknown.
    pub fn add_relationship(&mut self, rel: Relationship) -> bool {
        if self.nodes.contains_key(&rel.source) && self.nodes.contains_key(&rel.target) {
            self.relationships.push(rel);
            return true;
        }
        warn!(
            edge = %rel.id,
            source = %rel.source,
            target = %rel.target,
            "Skipping relationship with unknown endpoint"
        );
        self.report.skipped_edges.push(SkippedEdge {
            id: rel.id,
            source: rel.source,
            target: rel.target,
        });
        false
    }

    pub fn add_cluster(&mut self, cluster: Cluster) {
        self.clusters.insert(cluster.id.clone(), cluster);
    }

    pub(crate) fn record_skipped_cluster(&mut self, context: String) {
        self.report.skipped_clusters.push(context);
    }

    pub fn node(&self, id: &str) -> Option<&ActorNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &ActorNode> {
        self.nodes.values()
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.values()
    }

    pub fn cluster(&self, id: &str) -> Option<&Cluster> {
        self.clusters.get(id)
    }

    /// (id, display name) pairs for the cluster filter control
    pub fn cluster_options(&self) -> Vec<(ClusterId, String)> {
        self.clusters
            .values()
            .map(|c| (c.id.clone(), c.label().to_string()))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Actors in scope for a render, in document order.
    ///
    /// With a known cluster only its existing members are returned; unknown
    /// member ids are ignored. An unknown cluster id means the whole graph.
    pub fn scope(&self, cluster: Option<&str>) -> Vec<&ActorNode> {
        match cluster.and_then(|c| self.clusters.get(c)) {
            Some(cluster) => {
                let members: HashSet<&ActorId> = cluster.members.iter().collect();
                self.nodes.values().filter(|n| members.contains(&n.id)).collect()
            }
            None => self.nodes.values().collect(),
        }
    }

    /// Relationships with both ends in `scope`, one per actor pair (the
    /// first in document order wins), self-loops excluded
    pub fn relationships_within(&self, scope: &[&ActorNode]) -> Vec<&Relationship> {
        let ids: HashSet<&ActorId> = scope.iter().map(|n| &n.id).collect();
        let mut seen: HashSet<(&ActorId, &ActorId)> = HashSet::new();
        self.relationships
            .iter()
            .filter(|r| r.source != r.target && ids.contains(&r.source) && ids.contains(&r.target))
            .filter(|r| {
                let pair = if r.source <= r.target {
                    (&r.source, &r.target)
                } else {
                    (&r.target, &r.source)
                };
                seen.insert(pair)
            })
            .collect()
    }

    /// Dense id of an actor, stable for the lifetime of this graph
    pub fn dense_id(&self, id: &ActorId) -> Option<NodeId> {
        self.nodes.get_index_of(id).map(|idx| idx as NodeId)
    }

    pub fn actor_by_dense(&self, id: NodeId) -> Option<&ActorNode> {
        self.nodes.get_index(id as usize).map(|(_, node)| node)
    }

    /// Topology view over the given actors
    pub fn graph_view(&self, scope: &[&ActorNode]) -> GraphView {
        let nodes: Vec<NodeId> = scope.iter().filter_map(|n| self.dense_id(&n.id)).collect();
        let edges: Vec<(NodeId, NodeId)> = self
            .relationships_within(scope)
            .into_iter()
            .filter_map(|r| Some((self.dense_id(&r.source)?, self.dense_id(&r.target)?)))
            .collect();
        GraphView::from_edges(&nodes, &edges)
    }

    /// Case-insensitive name search, highest relevance first
    pub fn search(&self, term: &str) -> Vec<&ActorNode> {
        let needle = term.trim().to_lowercase();
        let mut found: Vec<&ActorNode> = self
            .nodes
            .values()
            .filter(|n| n.name.to_lowercase().contains(&needle))
            .collect();
        sort_by_relevance(&mut found);
        found
    }

    /// The `n` most relevant actors
    pub fn top_by_relevance(&self, n: usize) -> Vec<&ActorNode> {
        let mut all: Vec<&ActorNode> = self.nodes.values().collect();
        sort_by_relevance(&mut all);
        all.truncate(n);
        all
    }
}

/// Descending relevance, missing scores as 0; stable for ties
fn sort_by_relevance(actors: &mut [&ActorNode]) {
    actors.sort_by(|a, b| {
        let ra = a.relevance().unwrap_or(0.0);
        let rb = b.relevance().unwrap_or(0.0);
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: &str, name: &str, relevance: Option<f64>) -> ActorNode {
        let mut node = ActorNode::new(id, name);
        node.attributes.relevance_degree = relevance;
        node
    }

    fn sample() -> OntologyGraph {
        let mut graph = OntologyGraph::new();
        graph.add_actor(actor("p1", "Ana Souza", Some(5.0))).unwrap();
        graph.add_actor(actor("p2", "Bruno Lima", Some(9.0))).unwrap();
        graph.add_actor(actor("p3", "Carla Souza", None)).unwrap();
        graph.add_relationship(Relationship::new("e1", "p1", "p2", "parceria"));
        graph.add_relationship(Relationship::new("e2", "p2", "p1", "mentoria"));
        graph.add_relationship(Relationship::new("e3", "p2", "p3", "parceria"));
        graph.add_cluster(Cluster {
            id: ClusterId::new("c1"),
            name: "Núcleo".to_string(),
            description: String::new(),
            members: vec![ActorId::new("p1"), ActorId::new("p2"), ActorId::new("ghost")],
        });
        graph
    }

    #[test]
    fn test_duplicate_actor_rejected() {
        let mut graph = sample();
        let result = graph.add_actor(actor("p1", "Outra", None));
        assert!(matches!(result, Err(OntologyError::DuplicateNode(id)) if id.as_str() == "p1"));
    }

    #[test]
    fn test_unknown_endpoint_is_skipped_and_reported() {
        let mut graph = sample();
        assert!(!graph.add_relationship(Relationship::new("e9", "p1", "nobody", "x")));
        assert_eq!(graph.relationship_count(), 3);
        assert_eq!(graph.report().skipped_edges.len(), 1);
        assert_eq!(graph.report().skipped_edges[0].target.as_str(), "nobody");
    }

    #[test]
    fn test_cluster_scope_ignores_unknown_members() {
        let graph = sample();
        let scope = graph.scope(Some("c1"));
        let ids: Vec<&str> = scope.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);

        assert_eq!(graph.scope(Some("missing")).len(), 3);
        assert_eq!(graph.scope(None).len(), 3);
    }

    #[test]
    fn test_relationships_within_dedups_pairs() {
        let graph = sample();
        let scope = graph.scope(Some("c1"));
        let rels = graph.relationships_within(&scope);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].id.as_str(), "e1");

        let view = graph.graph_view(&scope);
        assert_eq!(view.node_count, 2);
        assert_eq!(view.edge_count(), 1);
    }

    #[test]
    fn test_search_and_top() {
        let graph = sample();
        let found: Vec<&str> = graph.search("souza").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(found, vec!["p1", "p3"]);

        let top: Vec<&str> = graph.top_by_relevance(2).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(top, vec!["p2", "p1"]);
    }
}
