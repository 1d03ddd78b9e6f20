//! Actor nodes
//!
//! An actor is a person or institution in the ecosystem. The attributes the
//! dashboard reads by name are typed fields; everything else in the
//! document's `attributes` object is kept in `extra`.

use super::property::{lenient, PropertyMap, PropertyValue};
use super::types::ActorId;
use serde::{Deserialize, Serialize};

/// Attribute keys with a typed field on [`ActorAttributes`]
pub const KNOWN_ATTRIBUTES: [&str; 18] = [
    "main_city",
    "state",
    "country",
    "leadership_type",
    "activity_area",
    "relevance_degree",
    "impact_scale",
    "company",
    "institution",
    "education",
    "professional_history",
    "other_positions",
    "main_contribution",
    "relevant_quote",
    "profile_linkedin",
    "profile_instagram",
    "profile_photo",
    "geolocation",
];

/// An actor in the ecosystem network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorNode {
    pub id: ActorId,
    #[serde(default)]
    pub name: String,
    /// Job title or role
    #[serde(default, deserialize_with = "lenient::text")]
    pub position: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient::text")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub attributes: ActorAttributes,
}

/// Typed view over an actor's attribute map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorAttributes {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub main_city: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub leadership_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub activity_area: Option<String>,
    /// Relevance score, 0 to 10
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub relevance_degree: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub impact_scale: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub professional_history: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub other_positions: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub main_contribution: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub relevant_quote: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub profile_linkedin: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub profile_instagram: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geolocation: Option<PropertyValue>,
    /// Everything else
    #[serde(flatten)]
    pub extra: PropertyMap,
}

impl ActorAttributes {
    /// Look up a known or extra attribute by its document key
    pub fn get(&self, key: &str) -> Option<PropertyValue> {
        let text = |v: &Option<String>| v.clone().map(PropertyValue::String);
        match key {
            "main_city" => text(&self.main_city),
            "state" => text(&self.state),
            "country" => text(&self.country),
            "leadership_type" => text(&self.leadership_type),
            "activity_area" => text(&self.activity_area),
            "relevance_degree" => self.relevance_degree.map(PropertyValue::Number),
            "impact_scale" => text(&self.impact_scale),
            "company" => text(&self.company),
            "institution" => text(&self.institution),
            "education" => text(&self.education),
            "professional_history" => text(&self.professional_history),
            "other_positions" => text(&self.other_positions),
            "main_contribution" => text(&self.main_contribution),
            "relevant_quote" => text(&self.relevant_quote),
            "profile_linkedin" => text(&self.profile_linkedin),
            "profile_instagram" => text(&self.profile_instagram),
            "profile_photo" => text(&self.profile_photo),
            "geolocation" => self.geolocation.clone(),
            other => self.extra.get(other).cloned(),
        }
    }
}

impl ActorNode {
    pub fn new(id: impl Into<ActorId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: None,
            node_type: None,
            attributes: ActorAttributes::default(),
        }
    }

    /// Attribute lookup that also answers `name`, `position` and `type`
    pub fn attribute(&self, key: &str) -> Option<PropertyValue> {
        match key {
            "name" => Some(PropertyValue::String(self.name.clone())),
            "position" => self.position.clone().map(PropertyValue::String),
            "type" => self.node_type.clone().map(PropertyValue::String),
            other => self.attributes.get(other),
        }
    }

    /// Attribute text, or `None` when absent or a placeholder sentinel
    pub fn display_attribute(&self, key: &str) -> Option<String> {
        self.attribute(key)
            .filter(|v| !v.is_placeholder())
            .map(|v| v.to_text())
    }

    pub fn relevance(&self) -> Option<f64> {
        self.attributes.relevance_degree
    }

    pub fn city(&self) -> Option<&str> {
        self.attributes.main_city.as_deref()
    }

    /// Display name, falling back to the id for unnamed actors
    pub fn label(&self) -> &str {
        if self.name.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_known_and_extra() {
        let node: ActorNode = serde_json::from_value(json!({
            "id": "p001",
            "name": "Maria",
            "position": "Presidente",
            "type": "person",
            "attributes": {
                "main_city": "Caruaru",
                "relevance_degree": 9,
                "profile_linkedin": "not identified",
                "awards": ["Prêmio A"]
            }
        }))
        .unwrap();

        assert_eq!(node.city(), Some("Caruaru"));
        assert_eq!(node.relevance(), Some(9.0));
        assert_eq!(node.attribute("awards").unwrap().to_text(), "Prêmio A");
        assert_eq!(node.attribute("type").unwrap().to_text(), "person");
        assert!(node.attributes.extra.get("main_city").is_none());
        assert_eq!(node.display_attribute("profile_linkedin"), None);
        assert_eq!(node.label(), "Maria");
    }

    #[test]
    fn test_lenient_fields() {
        let node: ActorNode = serde_json::from_value(json!({
            "id": "p2",
            "attributes": {"relevance_degree": "7,5", "main_city": 42, "state": null}
        }))
        .unwrap();

        assert_eq!(node.relevance(), Some(7.5));
        assert_eq!(node.city(), Some("42"));
        assert_eq!(node.attributes.state, None);
        assert_eq!(node.label(), "p2");
    }
}
