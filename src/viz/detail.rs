//! Actor detail panel
//!
//! The panel has two states: nothing selected, which shows the fallback
//! actor, and an actor selected from the figure. Optional fields (photo,
//! social links, placeholder values) are left out instead of failing.

use crate::graph::{ActorId, ActorNode, OntologyGraph, PropertyValue, KNOWN_ATTRIBUTES};
use serde::Serialize;

/// Panel state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "actor", rename_all = "snake_case")]
pub enum Selection {
    None,
    Selected(ActorId),
}

impl Selection {
    pub fn from_option(selected: Option<&ActorId>) -> Self {
        match selected {
            Some(id) => Selection::Selected(id.clone()),
            None => Selection::None,
        }
    }
}

/// A labelled value in the panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// Extra attribute shown under "additional information"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtraField {
    pub label: String,
    pub value: String,
    /// Grouped lists (`{"group": ["item", ...]}`) keep their structure
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<(String, Vec<String>)>,
}

/// Rendered panel content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub actor_id: ActorId,
    pub name: String,
    pub position: String,
    /// True when showing the fallback actor because nothing is selected
    pub is_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    /// Summary table (attribute, value)
    pub info: Vec<Field>,
    pub professional: Vec<Field>,
    pub leadership: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contribution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    pub additional: Vec<ExtraField>,
}

/// Builds detail views, falling back to a designated actor
#[derive(Debug, Clone)]
pub struct DetailPanel {
    fallback: ActorId,
}

impl DetailPanel {
    pub fn new(fallback: impl Into<ActorId>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }

    pub fn fallback(&self) -> &ActorId {
        &self.fallback
    }

    /// Render for the given state. `None` when the actor to show does not
    /// exist in the graph.
    pub fn render(&self, graph: &OntologyGraph, selection: &Selection) -> Option<DetailView> {
        let (id, is_fallback) = match selection {
            Selection::Selected(id) => (id, false),
            Selection::None => (&self.fallback, true),
        };
        let actor = graph.node(id.as_str())?;
        Some(detail_view(actor, is_fallback))
    }
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| "N/A".to_string())
}

fn detail_view(actor: &ActorNode, is_fallback: bool) -> DetailView {
    let shown = |key: &str| actor.display_attribute(key);

    let info = vec![
        Field::new("Cidade Principal", or_na(shown("main_city"))),
        Field::new("Estado", or_na(shown("state"))),
        Field::new("Tipo de Liderança", or_na(shown("leadership_type"))),
        Field::new("Área de Atuação", or_na(shown("activity_area"))),
        Field::new("Grau de Relevância", format!("{}/10", or_na(shown("relevance_degree")))),
        Field::new("Escala de Impacto", or_na(shown("impact_scale"))),
    ];

    let professional = [
        ("Empresas", "company"),
        ("Instituição", "institution"),
        ("Educação", "education"),
        ("Área de atividade", "activity_area"),
        ("Histórico Profissional", "professional_history"),
    ]
    .iter()
    .filter_map(|&(label, key)| shown(key).map(|v| Field::new(label, v)))
    .collect();

    let mut leadership = Vec::new();
    if let Some(relevance) = shown("relevance_degree") {
        leadership.push(Field::new("Score de Relevância", format!("{}/10", relevance)));
    }
    for (label, key) in [
        ("Tipo de liderança", "leadership_type"),
        ("Escala de impacto", "impact_scale"),
        ("Outras Posições", "other_positions"),
    ] {
        if let Some(value) = shown(key) {
            leadership.push(Field::new(label, value));
        }
    }

    let additional = actor
        .attributes
        .extra
        .iter()
        .filter(|(key, value)| !KNOWN_ATTRIBUTES.contains(&key.as_str()) && !value.is_placeholder())
        .map(|(key, value)| extra_field(key, value))
        .collect();

    DetailView {
        actor_id: actor.id.clone(),
        name: actor.label().to_string(),
        position: actor.position.clone().unwrap_or_else(|| "N/A".to_string()),
        is_fallback,
        photo_url: shown("profile_photo"),
        linkedin: shown("profile_linkedin"),
        instagram: shown("profile_instagram"),
        info,
        professional,
        leadership,
        contribution: shown("main_contribution"),
        quote: shown("relevant_quote"),
        additional,
    }
}

fn extra_field(key: &str, value: &PropertyValue) -> ExtraField {
    let groups: Vec<(String, Vec<String>)> = value
        .as_map()
        .map(|map| {
            map.iter()
                .map(|(group, items)| {
                    let items = match items.as_list() {
                        Some(list) => list.iter().map(PropertyValue::to_text).collect(),
                        None => vec![items.to_text()],
                    };
                    (group.clone(), items)
                })
                .collect()
        })
        .unwrap_or_default();

    ExtraField {
        label: title_case(key),
        value: if groups.is_empty() { value.to_text() } else { String::new() },
        groups,
    }
}

/// `snake_case_key` -> `Snake Case Key`
pub fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::load_ontology_value;
    use serde_json::json;

    fn graph() -> OntologyGraph {
        load_ontology_value(
            &json!({
                "nodes": [
                    {"id": "p001", "name": "Fallback", "position": "Diretora",
                     "attributes": {"main_city": "Caruaru", "relevance_degree": 8,
                                    "profile_photo": "não disponível em fontes abertas",
                                    "profile_linkedin": "https://linkedin.com/in/x",
                                    "awards_received": {"2020": ["Prêmio A", "Prêmio B"]},
                                    "notes": "not identified"}},
                    {"id": "p002", "name": "Outra", "attributes": {}}
                ],
                "edges": []
            }),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_no_selection_shows_fallback() {
        let panel = DetailPanel::new("p001");
        let view = panel.render(&graph(), &Selection::None).unwrap();
        assert!(view.is_fallback);
        assert_eq!(view.name, "Fallback");
        assert_eq!(view.photo_url, None);
        assert_eq!(view.linkedin.as_deref(), Some("https://linkedin.com/in/x"));
        assert_eq!(view.info[4].value, "8/10");
    }

    #[test]
    fn test_selected_actor_tolerates_missing_fields() {
        let panel = DetailPanel::new("p001");
        let view = panel
            .render(&graph(), &Selection::Selected(ActorId::new("p002")))
            .unwrap();
        assert!(!view.is_fallback);
        assert_eq!(view.position, "N/A");
        assert_eq!(view.info[0].value, "N/A");
        assert_eq!(view.info[4].value, "N/A/10");
        assert!(view.professional.is_empty());
        assert!(view.leadership.is_empty());
        assert!(view.contribution.is_none());
    }

    #[test]
    fn test_additional_info_skips_placeholders_and_keeps_groups() {
        let view = DetailPanel::new("p001").render(&graph(), &Selection::None).unwrap();
        assert_eq!(view.additional.len(), 1);
        assert_eq!(view.additional[0].label, "Awards Received");
        assert_eq!(view.additional[0].groups[0].1, vec!["Prêmio A", "Prêmio B"]);
    }

    #[test]
    fn test_unknown_selection_renders_nothing() {
        let panel = DetailPanel::new("p001");
        assert!(panel.render(&graph(), &Selection::Selected(ActorId::new("zzz"))).is_none());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("awards_received"), "Awards Received");
        assert_eq!(title_case("ÁREA_x"), "Área X");
    }
}
