//! Relevance analysis over a set of actors

use super::node::ActorNode;
use serde::Serialize;
use std::collections::HashMap;

/// Label for actors without a leadership type
pub const UNSPECIFIED_LEADERSHIP: &str = "Não especificado";
/// Label for actors without an impact scale
pub const UNSPECIFIED_IMPACT: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelevanceSummary {
    pub count: usize,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

/// Numeric relevance scores, actors without one skipped
pub fn relevance_values<'a>(actors: impl IntoIterator<Item = &'a ActorNode>) -> Vec<f64> {
    actors.into_iter().filter_map(ActorNode::relevance).collect()
}

pub fn relevance_summary(values: &[f64]) -> Option<RelevanceSummary> {
    if values.is_empty() {
        return None;
    }
    Some(RelevanceSummary {
        count: values.len(),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        mean: values.iter().sum::<f64>() / values.len() as f64,
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    })
}

/// Actor count per attribute value, largest group first, ties by name
pub fn distribution_by<'a>(
    actors: impl IntoIterator<Item = &'a ActorNode>,
    attribute: &str,
    missing: &str,
) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for actor in actors {
        let key = actor
            .display_attribute(attribute)
            .unwrap_or_else(|| missing.to_string());
        *counts.entry(key).or_default() += 1;
    }
    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::load_ontology_value;
    use serde_json::json;

    #[test]
    fn test_summary_and_distribution() {
        let graph = load_ontology_value(
            &json!({
                "nodes": [
                    {"id": "a", "name": "A", "attributes": {"relevance_degree": 4, "leadership_type": "Empresarial"}},
                    {"id": "b", "name": "B", "attributes": {"relevance_degree": "8", "leadership_type": "Empresarial"}},
                    {"id": "c", "name": "C", "attributes": {"leadership_type": "não identificado"}}
                ],
                "edges": []
            }),
            None,
        )
        .unwrap();

        let values = relevance_values(graph.actors());
        assert_eq!(values, vec![4.0, 8.0]);
        let summary = relevance_summary(&values).unwrap();
        assert_eq!((summary.min, summary.mean, summary.max), (4.0, 6.0, 8.0));
        assert!(relevance_summary(&[]).is_none());

        let dist = distribution_by(graph.actors(), "leadership_type", UNSPECIFIED_LEADERSHIP);
        assert_eq!(
            dist,
            vec![("Empresarial".to_string(), 2), (UNSPECIFIED_LEADERSHIP.to_string(), 1)]
        );
    }
}
