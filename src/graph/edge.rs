//! Relationships between actors
//!
//! Relationships are undirected for display: `source` and `target` only
//! record the order used in the document.

use super::property::{lenient, PropertyMap, PropertyValue};
use super::types::{ActorId, RelationshipId};
use serde::{Deserialize, Serialize};

/// A typed relationship between two actors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub source: ActorId,
    pub target: ActorId,
    /// Relationship type label (e.g. "parceria institucional")
    #[serde(default, rename = "type")]
    pub relationship_type: String,
    #[serde(default)]
    pub attributes: RelationshipAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipAttributes {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub intensity: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub relationship_nature: Option<String>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

impl Relationship {
    pub fn new(
        id: impl Into<RelationshipId>,
        source: impl Into<ActorId>,
        target: impl Into<ActorId>,
        relationship_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            relationship_type: relationship_type.into(),
            attributes: RelationshipAttributes::default(),
        }
    }

    /// True when this relationship joins `a` and `b` in either order
    pub fn connects(&self, a: &ActorId, b: &ActorId) -> bool {
        (&self.source == a && &self.target == b) || (&self.source == b && &self.target == a)
    }

    /// The endpoint opposite `actor`, if `actor` is an endpoint
    pub fn other_end(&self, actor: &ActorId) -> Option<&ActorId> {
        if &self.source == actor {
            Some(&self.target)
        } else if &self.target == actor {
            Some(&self.source)
        } else {
            None
        }
    }

    pub fn attribute(&self, key: &str) -> Option<PropertyValue> {
        let text = |v: &Option<String>| v.clone().map(PropertyValue::String);
        match key {
            "type" => Some(PropertyValue::String(self.relationship_type.clone())),
            "intensity" => text(&self.attributes.intensity),
            "context" => text(&self.attributes.context),
            "relationship_nature" => text(&self.attributes.relationship_nature),
            other => self.attributes.extra.get(other).cloned(),
        }
    }
}
