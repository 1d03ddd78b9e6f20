//! Named actor groupings
//!
//! Clusters are a display filter only. Membership may overlap and is not
//! checked against an actor's own attributes.

use super::types::{ActorId, ClusterId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Member actor ids, in curated order
    #[serde(default, rename = "nodes")]
    pub members: Vec<ActorId>,
}

impl Cluster {
    pub fn contains(&self, actor: &ActorId) -> bool {
        self.members.iter().any(|m| m == actor)
    }

    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}
