//! Attribute values for actors and relationships
//!
//! Ontology documents carry free-form attribute maps. Values keep their JSON
//! shape but expose typed accessors and the text form used for display and
//! categorical encoding.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Values that the ontology uses to mean "we do not know"
pub const PLACEHOLDER_TEXTS: [&str; 4] = [
    "not identified",
    "não identificado",
    "not available in open sources",
    "não disponível em fontes abertas",
];

/// True for empty strings and the placeholder sentinels
pub fn is_placeholder_text(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || PLACEHOLDER_TEXTS.iter().any(|p| trimmed.eq_ignore_ascii_case(p))
}

/// Attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum PropertyValue {
    String(String),
    Number(f64),
    Boolean(bool),
    List(Vec<PropertyValue>),
    Map(IndexMap<String, PropertyValue>),
    Null,
}

impl PropertyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value. Strings are not coerced.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, PropertyValue>> {
        match self {
            PropertyValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Text form used in hover labels and as a categorical key
    pub fn to_text(&self) -> String {
        match self {
            PropertyValue::String(s) => s.clone(),
            PropertyValue::Number(n) => format_number(*n),
            PropertyValue::Boolean(b) => b.to_string(),
            PropertyValue::List(items) => items.iter().map(|v| v.to_text()).collect::<Vec<_>>().join(", "),
            PropertyValue::Map(map) => map
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v.to_text()))
                .collect::<Vec<_>>()
                .join("; "),
            PropertyValue::Null => String::new(),
        }
    }

    /// Null, blank, or one of the placeholder sentinels
    pub fn is_placeholder(&self) -> bool {
        match self {
            PropertyValue::Null => true,
            PropertyValue::String(s) => is_placeholder_text(s),
            PropertyValue::List(items) => items.is_empty(),
            PropertyValue::Map(map) => map.is_empty(),
            _ => false,
        }
    }
}

/// Integers print without a fractional part
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PropertyValue::Null,
            serde_json::Value::Bool(b) => PropertyValue::Boolean(b),
            serde_json::Value::Number(n) => n.as_f64().map(PropertyValue::Number).unwrap_or(PropertyValue::Null),
            serde_json::Value::String(s) => PropertyValue::String(s),
            serde_json::Value::Array(items) => PropertyValue::List(items.into_iter().map(PropertyValue::from).collect()),
            serde_json::Value::Object(map) => {
                PropertyValue::Map(map.into_iter().map(|(k, v)| (k, PropertyValue::from(v))).collect())
            }
        }
    }
}

impl From<PropertyValue> for serde_json::Value {
    fn from(value: PropertyValue) -> Self {
        match value {
            PropertyValue::Null => serde_json::Value::Null,
            PropertyValue::Boolean(b) => serde_json::Value::Bool(b),
            PropertyValue::Number(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            PropertyValue::String(s) => serde_json::Value::String(s),
            PropertyValue::List(items) => serde_json::Value::Array(items.into_iter().map(Into::into).collect()),
            PropertyValue::Map(map) => {
                serde_json::Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Number(n as f64)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

/// Attribute map preserving document order
pub type PropertyMap = IndexMap<String, PropertyValue>;

/// Tolerant field deserializers for hand-edited ontology files
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};

    /// Scalars become text; null, blank, arrays and objects become `None`
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        })
    }

    /// Numbers and numeric strings; anything else is `None`
    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(serde_json::Value::Number(n)) => n.as_f64(),
            Some(serde_json::Value::String(s)) => s.trim().replace(',', ".").parse().ok(),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_shapes() {
        let value = PropertyValue::from(json!({"a": [1, "x"], "b": null, "c": true}));
        let map = value.as_map().unwrap();
        assert_eq!(map["a"].as_list().unwrap()[0], PropertyValue::Number(1.0));
        assert!(map["b"].is_null());
        assert_eq!(map["c"], PropertyValue::Boolean(true));
    }

    #[test]
    fn test_text_form() {
        assert_eq!(PropertyValue::Number(5.0).to_text(), "5");
        assert_eq!(PropertyValue::Number(7.5).to_text(), "7.5");
        assert_eq!(PropertyValue::from(json!(["a", "b"])).to_text(), "a, b");
        assert_eq!(PropertyValue::Null.to_text(), "");
    }

    #[test]
    fn test_placeholders() {
        assert!(PropertyValue::from("not identified").is_placeholder());
        assert!(PropertyValue::from("Não identificado").is_placeholder());
        assert!(PropertyValue::from("  ").is_placeholder());
        assert!(PropertyValue::Null.is_placeholder());
        assert!(!PropertyValue::from("Caruaru").is_placeholder());
        assert!(!PropertyValue::Number(0.0).is_placeholder());
    }
}
