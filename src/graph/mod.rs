//! Ecosystem ontology graph
//!
//! This module implements the actor-network data model:
//! - Actors with typed known attributes and a free-form escape hatch
//! - Undirected, typed relationships between actors
//! - Clusters as overlapping display filters
//! - Loading from a JSON ontology document, optionally namespaced

pub mod cluster;
pub mod edge;
pub mod loader;
pub mod node;
pub mod property;
pub mod store;
pub mod summary;
pub mod types;

// Re-export main types
pub use cluster::Cluster;
pub use edge::{Relationship, RelationshipAttributes};
pub use loader::{load_ontology_file, load_ontology_value};
pub use node::{ActorAttributes, ActorNode, KNOWN_ATTRIBUTES};
pub use property::{is_placeholder_text, PropertyMap, PropertyValue};
pub use store::{LoadReport, OntologyError, OntologyGraph, OntologyResult, SkippedEdge};
pub use summary::{distribution_by, relevance_summary, relevance_values, RelevanceSummary};
pub use types::{ActorId, ClusterId, RelationshipId};
