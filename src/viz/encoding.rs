//! Visual encodings: categorical colors and marker sizes
//!
//! Colors are assigned to the sorted set of distinct attribute values, so
//! the same input always yields the same mapping and the legend can never
//! disagree with the markers. Beyond the combined palette size colors
//! repeat (palette cycling), which makes them ambiguous.

use crate::graph::ActorNode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Category used when an actor lacks the attribute
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Marker color for values outside the mapping
pub const UNMAPPED_COLOR: &str = "#999999";

/// Base qualitative palette (ColorBrewer Set3)
pub const SET3: [&str; 12] = [
    "rgb(141,211,199)",
    "rgb(255,255,179)",
    "rgb(190,186,218)",
    "rgb(251,128,114)",
    "rgb(128,177,211)",
    "rgb(253,180,98)",
    "rgb(179,222,105)",
    "rgb(252,205,229)",
    "rgb(217,217,217)",
    "rgb(188,128,189)",
    "rgb(204,235,197)",
    "rgb(255,237,111)",
];

/// Plotly default qualitative palette
pub const PLOTLY: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880", "#FF97FF",
    "#FECB52",
];

pub const DARK24: [&str; 24] = [
    "#2E91E5", "#E15F99", "#1CA71C", "#FB0D0D", "#DA16FF", "#222A2A", "#B68100", "#750D86", "#EB663B",
    "#511CFB", "#00A08B", "#FB00D1", "#FC0080", "#B2828D", "#6C7C32", "#778AAE", "#862A16", "#A777F1",
    "#620042", "#1616A7", "#DA60CA", "#6C4516", "#0D2A63", "#AF0038",
];

/// Palette for `n` categories: Set3 alone when it suffices, otherwise
/// Set3 + Plotly + Dark24
pub fn palette_for(n: usize) -> Vec<&'static str> {
    if n <= SET3.len() {
        SET3.to_vec()
    } else {
        SET3.iter().chain(PLOTLY.iter()).chain(DARK24.iter()).copied().collect()
    }
}

/// Category key of an actor for `attribute`: the value's text, or
/// [`UNKNOWN_CATEGORY`] when absent
pub fn category_of(actor: &ActorNode, attribute: &str) -> String {
    actor
        .attribute(attribute)
        .map(|v| v.to_text())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
}

/// Value -> color mapping, in sorted value order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorMap {
    entries: IndexMap<String, String>,
    /// True when values outnumber the combined palette and colors repeat
    pub cycled: bool,
}

impl ColorMap {
    /// Map each distinct value to a palette color
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let unique: BTreeSet<String> = values.into_iter().collect();
        let palette = palette_for(unique.len());
        let cycled = unique.len() > palette.len();
        let entries = unique
            .into_iter()
            .enumerate()
            .map(|(i, value)| (value, palette[i % palette.len()].to_string()))
            .collect();
        Self { entries, cycled }
    }

    /// Mapping for `attribute` over the given actors
    pub fn for_attribute(actors: &[&ActorNode], attribute: &str) -> Self {
        Self::from_values(actors.iter().map(|a| category_of(a, attribute)))
    }

    /// Color for a value, [`UNMAPPED_COLOR`] when not in the mapping
    pub fn color_of(&self, value: &str) -> &str {
        self.entries.get(value).map(String::as_str).unwrap_or(UNMAPPED_COLOR)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Linear marker-size scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeScale {
    pub min: f64,
    pub max: f64,
    /// Size for non-numeric or missing values
    pub default: f64,
}

impl Default for SizeScale {
    fn default() -> Self {
        Self {
            min: 10.0,
            max: 50.0,
            default: 20.0,
        }
    }
}

impl SizeScale {
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Scale numeric values linearly over their observed range.
    ///
    /// When every numeric value is the same, they all get the midpoint.
    pub fn sizes(&self, values: &[Option<f64>]) -> Vec<f64> {
        let numeric = values.iter().flatten().copied().filter(|v| v.is_finite());
        let (lo, hi) = numeric.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let span = hi - lo;

        values
            .iter()
            .map(|value| match value {
                Some(v) if v.is_finite() => {
                    if span.abs() < f64::EPSILON {
                        self.midpoint()
                    } else {
                        self.min + (v - lo) / span * (self.max - self.min)
                    }
                }
                _ => self.default,
            })
            .collect()
    }

    /// Sizes for `attribute` over the given actors
    pub fn for_attribute(&self, actors: &[&ActorNode], attribute: &str) -> Vec<f64> {
        let values: Vec<Option<f64>> = actors
            .iter()
            .map(|a| a.attribute(attribute).and_then(|v| v.as_number()))
            .collect();
        self.sizes(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: &str, city: Option<&str>) -> ActorNode {
        let mut node = ActorNode::new(id, id);
        node.attributes.main_city = city.map(str::to_string);
        node
    }

    #[test]
    fn test_color_map_is_deterministic_and_sorted() {
        let a = actor("a", Some("Toritama"));
        let b = actor("b", Some("Caruaru"));
        let c = actor("c", None);
        let actors = vec![&a, &b, &c];

        let first = ColorMap::for_attribute(&actors, "main_city");
        let second = ColorMap::for_attribute(&actors, "main_city");
        assert_eq!(first, second);

        let keys: Vec<&str> = first.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Caruaru", "Toritama", "Unknown"]);
        assert_eq!(first.color_of("Caruaru"), SET3[0]);
        assert_eq!(first.color_of("Recife"), UNMAPPED_COLOR);
    }

    #[test]
    fn test_large_universe_extends_then_cycles() {
        let values: Vec<String> = (0..13).map(|i| format!("v{:02}", i)).collect();
        let map = ColorMap::from_values(values);
        assert!(!map.cycled);
        assert_eq!(map.color_of("v12"), PLOTLY[0]);

        let combined = SET3.len() + PLOTLY.len() + DARK24.len();
        let values: Vec<String> = (0..combined + 1).map(|i| format!("v{:03}", i)).collect();
        let map = ColorMap::from_values(values);
        assert!(map.cycled);
        assert_eq!(map.color_of(&format!("v{:03}", combined)), SET3[0]);
    }

    #[test]
    fn test_sizes_scale_linearly() {
        let scale = SizeScale::default();
        let sizes = scale.sizes(&[Some(5.0), Some(9.0), None, Some(7.0)]);
        assert_eq!(sizes, vec![10.0, 50.0, 20.0, 30.0]);
    }

    #[test]
    fn test_identical_values_use_midpoint() {
        let scale = SizeScale::default();
        let sizes = scale.sizes(&[Some(3.0), Some(3.0)]);
        assert_eq!(sizes, vec![30.0, 30.0]);
        assert!(sizes.iter().all(|s| s.is_finite()));

        assert_eq!(scale.sizes(&[None, Some(f64::NAN)]), vec![20.0, 20.0]);
    }
}
