//! Actor-network figure
//!
//! Builds the three-layer network figure: connection lines, invisible
//! midpoint markers that carry per-edge hover text, and actor markers.
//! Layout, colors and sizes are recomputed on every render over the
//! in-scope actors; the same color map feeds both the markers and the
//! legend.

use super::encoding::{category_of, ColorMap, SizeScale};
use super::figure::{Annotation, Axis, Figure, Layout, Line, Marker, OneOrMany, Trace};
use crate::graph::{ActorId, ActorNode, OntologyGraph, Relationship};
use agreste_layout::{compute_layout, LayoutAlgorithm, LayoutConfig, Point};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

pub const EDGE_LINE_COLOR: &str = "rgba(136,136,136,0.5)";
pub const NODE_OUTLINE_COLOR: &str = "DarkSlateGrey";
pub const FIGURE_CAPTION: &str = "Visualização iterativa da rede dos atores-chave no ecossistema";

/// Attributes offered by the color-by control
pub const COLOR_BY_OPTIONS: [&str; 4] = ["main_city", "impact_scale", "leadership_type", "relevance_degree"];
/// Attributes offered by the size-by control
pub const SIZE_BY_OPTIONS: [&str; 2] = ["relevance_degree", "impact_scale"];

const CONTRIBUTION_PREVIEW_CHARS: usize = 100;

/// User-selected rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkOptions {
    pub layout: LayoutAlgorithm,
    pub color_by: String,
    pub size_by: String,
    /// Cluster filter; `None` shows every actor
    pub cluster: Option<String>,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            layout: LayoutAlgorithm::KamadaKawai,
            color_by: COLOR_BY_OPTIONS[0].to_string(),
            size_by: SIZE_BY_OPTIONS[0].to_string(),
            cluster: None,
        }
    }
}

/// One legend row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub value: String,
    pub color: String,
    pub count: usize,
}

/// Output of one render pass
#[derive(Debug, Clone, Serialize)]
pub struct NetworkView {
    pub figure: Figure,
    pub legend: Vec<LegendEntry>,
    pub color_map: ColorMap,
    pub positions: IndexMap<ActorId, Point>,
}

impl NetworkView {
    /// Actor ids on the node layer, in plotting order
    pub fn node_ids(&self) -> impl Iterator<Item = &ActorId> {
        self.positions.keys()
    }
}

/// Renders the network figure with fixed layout parameters and size scale
#[derive(Debug, Clone)]
pub struct NetworkRenderer {
    seed: u64,
    iterations: usize,
    optimal_distance: Option<f64>,
    size_scale: SizeScale,
}

impl Default for NetworkRenderer {
    fn default() -> Self {
        Self {
            seed: 42,
            iterations: 50,
            optimal_distance: Some(3.0),
            size_scale: SizeScale::default(),
        }
    }
}

impl NetworkRenderer {
    pub fn new(seed: u64, iterations: usize, optimal_distance: Option<f64>, size_scale: SizeScale) -> Self {
        Self {
            seed,
            iterations,
            optimal_distance,
            size_scale,
        }
    }

    pub fn size_scale(&self) -> SizeScale {
        self.size_scale
    }

    pub fn render(&self, graph: &OntologyGraph, options: &NetworkOptions) -> NetworkView {
        let scope = graph.scope(options.cluster.as_deref());
        let view = graph.graph_view(&scope);
        let layout = compute_layout(
            &view,
            &LayoutConfig {
                algorithm: options.layout,
                seed: self.seed,
                iterations: self.iterations,
                optimal_distance: self.optimal_distance,
            },
        );

        let positions: IndexMap<ActorId, Point> = scope
            .iter()
            .filter_map(|actor| {
                let dense = graph.dense_id(&actor.id)?;
                Some((actor.id.clone(), layout.position(dense)?))
            })
            .collect();

        let color_map = ColorMap::for_attribute(&scope, &options.color_by);
        let categories: Vec<String> = scope.iter().map(|a| category_of(a, &options.color_by)).collect();
        let colors: Vec<String> = categories.iter().map(|c| color_map.color_of(c).to_string()).collect();
        let sizes = self.size_scale.for_attribute(&scope, &options.size_by);

        let legend = color_map
            .entries()
            .map(|(value, color)| LegendEntry {
                value: value.to_string(),
                color: color.to_string(),
                count: categories.iter().filter(|c| c.as_str() == value).count(),
            })
            .collect();

        let relationships = graph.relationships_within(&scope);
        let mut figure = Figure::new(network_layout());
        figure.add_trace(edge_line_trace(&relationships, &positions));
        if !relationships.is_empty() {
            figure.add_trace(edge_hover_trace(graph, &relationships, &positions));
        }
        figure.add_trace(node_trace(&scope, &positions, colors, sizes));

        debug!(
            actors = positions.len(),
            relationships = relationships.len(),
            layout = %options.layout,
            color_by = %options.color_by,
            "Rendered network"
        );

        NetworkView {
            figure,
            legend,
            color_map,
            positions,
        }
    }
}

fn network_layout() -> Layout {
    Layout {
        showlegend: Some(true),
        hovermode: Some("closest".to_string()),
        margin: Some(json!({"b": 20, "l": 5, "r": 5, "t": 40})),
        annotations: vec![Annotation::paper(FIGURE_CAPTION, 0.005, -0.002)],
        xaxis: Some(Axis::hidden()),
        yaxis: Some(Axis::hidden()),
        plot_bgcolor: Some("white".to_string()),
        height: Some(800),
        ..Layout::default()
    }
}

fn edge_line_trace(relationships: &[&Relationship], positions: &IndexMap<ActorId, Point>) -> Trace {
    let mut xs = Vec::with_capacity(relationships.len() * 3);
    let mut ys = Vec::with_capacity(relationships.len() * 3);
    for rel in relationships {
        if let (Some(a), Some(b)) = (positions.get(&rel.source), positions.get(&rel.target)) {
            xs.extend([Some(a.x), Some(b.x), None]);
            ys.extend([Some(a.y), Some(b.y), None]);
        }
    }

    let mut trace = Trace::scatter()
        .name("Connections")
        .mode("lines")
        .xy(xs, ys)
        .hide_legend();
    trace.line = Some(Line::new(1.0, EDGE_LINE_COLOR));
    trace.hoverinfo = Some("none".to_string());
    trace
}

fn edge_hover_trace(
    graph: &OntologyGraph,
    relationships: &[&Relationship],
    positions: &IndexMap<ActorId, Point>,
) -> Trace {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut hover = Vec::new();
    for rel in relationships {
        let (Some(a), Some(b)) = (positions.get(&rel.source), positions.get(&rel.target)) else {
            continue;
        };
        xs.push((a.x + b.x) / 2.0);
        ys.push((a.y + b.y) / 2.0);

        let source = graph.node(rel.source.as_str()).map(ActorNode::label).unwrap_or(rel.source.as_str());
        let target = graph.node(rel.target.as_str()).map(ActorNode::label).unwrap_or(rel.target.as_str());
        hover.push(format!("<b>{} ↔ {}</b><br>{}", source, target, edge_hover_text(rel)));
    }

    Trace::scatter()
        .name("Edge Info")
        .mode("markers")
        .xy(xs, ys)
        .hovertext(hover)
        .marker(Marker {
            size: Some(OneOrMany::One(8.0)),
            color: Some(OneOrMany::One("rgba(0,0,0,0)".to_string())),
            ..Marker::default()
        })
        .hide_legend()
}

fn node_trace(
    scope: &[&ActorNode],
    positions: &IndexMap<ActorId, Point>,
    colors: Vec<String>,
    sizes: Vec<f64>,
) -> Trace {
    let mut xs = Vec::with_capacity(scope.len());
    let mut ys = Vec::with_capacity(scope.len());
    for actor in scope {
        let p = positions.get(&actor.id).copied().unwrap_or_default();
        xs.push(p.x);
        ys.push(p.y);
    }

    let mut trace = Trace::scatter()
        .name("Actors")
        .mode("markers+text")
        .xy(xs, ys)
        .text(scope.iter().map(|a| a.label().to_string()).collect())
        .hovertext(scope.iter().map(|a| node_hover_text(a)).collect())
        .marker(Marker {
            color: Some(OneOrMany::Many(colors)),
            size: Some(OneOrMany::Many(sizes)),
            line: Some(Line::new(2.0, NODE_OUTLINE_COLOR)),
            ..Marker::default()
        });
    trace.textposition = Some("middle center".to_string());
    trace.customdata = Some(scope.iter().map(|a| a.id.to_string()).collect());
    trace
}

/// Hover text for an actor marker
pub fn node_hover_text(actor: &ActorNode) -> String {
    let attrs = &actor.attributes;
    let mut text = format!("<b>{}</b><br>", actor.label());
    text.push_str(&format!("Posição: {}<br>", actor.position.as_deref().unwrap_or("N/A")));
    text.push_str(&format!("Tipo: {}<br>", actor.node_type.as_deref().unwrap_or("N/A")));
    if let Some(city) = &attrs.main_city {
        text.push_str(&format!("Cidade: {}<br>", city));
    }
    if let Some(relevance) = actor.attribute("relevance_degree") {
        text.push_str(&format!("Relevância: {}/10<br>", relevance));
    }
    if let Some(scale) = &attrs.impact_scale {
        text.push_str(&format!("Escala de impacto: {}<br>", scale));
    }
    if let Some(leadership) = &attrs.leadership_type {
        text.push_str(&format!("Liderança: {}<br>", leadership));
    }
    if let Some(contribution) = &attrs.main_contribution {
        let preview: String = contribution.chars().take(CONTRIBUTION_PREVIEW_CHARS).collect();
        text.push_str(&format!("Contribuição: {}...<br>", preview));
    }
    text
}

/// Hover text for a relationship, without the endpoint header
pub fn edge_hover_text(rel: &Relationship) -> String {
    let attrs = &rel.attributes;
    let mut text = format!("<b>{}</b><br>", rel.relationship_type);
    if let Some(nature) = &attrs.relationship_nature {
        text.push_str(&format!("Natureza: {}<br>", nature));
    }
    if let Some(intensity) = &attrs.intensity {
        text.push_str(&format!("Intensidade: {}<br>", intensity));
    }
    if let Some(context) = &attrs.context {
        text.push_str(&format!("Contexto: {}<br>", context));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{load_ontology_value, Cluster, ClusterId};
    use serde_json::json;

    fn two_actor_graph() -> OntologyGraph {
        load_ontology_value(
            &json!({
                "nodes": [
                    {"id": "p1", "name": "P1", "attributes": {"main_city": "A", "relevance_degree": 5}},
                    {"id": "p2", "name": "P2", "attributes": {"main_city": "B", "relevance_degree": 9}}
                ],
                "edges": [
                    {"id": "e1", "source": "p1", "target": "p2", "type": "parceria",
                     "attributes": {"intensity": "alta"}}
                ]
            }),
            None,
        )
        .unwrap()
    }

    fn options(color_by: &str, size_by: &str) -> NetworkOptions {
        NetworkOptions {
            layout: LayoutAlgorithm::Spring,
            color_by: color_by.to_string(),
            size_by: size_by.to_string(),
            cluster: None,
        }
    }

    #[test]
    fn test_three_layers() {
        let view = NetworkRenderer::default().render(&two_actor_graph(), &options("main_city", "relevance_degree"));
        let names: Vec<&str> = view.figure.data.iter().filter_map(|t| t.name.as_deref()).collect();
        assert_eq!(names, vec!["Connections", "Edge Info", "Actors"]);

        let edge_info = &view.figure.data[1];
        match &edge_info.hovertext {
            Some(OneOrMany::Many(texts)) => {
                assert_eq!(texts.len(), 1);
                assert!(texts[0].starts_with("<b>P1 ↔ P2</b><br><b>parceria</b><br>"));
                assert!(texts[0].contains("Intensidade: alta"));
            }
            other => panic!("unexpected hovertext: {:?}", other),
        }
    }

    #[test]
    fn test_legend_matches_marker_colors() {
        let view = NetworkRenderer::default().render(&two_actor_graph(), &options("main_city", "relevance_degree"));
        assert_eq!(view.legend.len(), 2);

        let actors = view.figure.traces_named("Actors").next().unwrap();
        let Some(Marker { color: Some(OneOrMany::Many(colors)), .. }) = &actors.marker else {
            panic!("node colors missing");
        };
        for entry in &view.legend {
            assert!(colors.contains(&entry.color));
        }
    }

    #[test]
    fn test_no_edges_skips_hover_layer() {
        let mut graph = OntologyGraph::new();
        graph.add_actor(ActorNode::new("solo", "Solo")).unwrap();
        let view = NetworkRenderer::default().render(&graph, &options("main_city", "relevance_degree"));
        assert!(view.figure.traces_named("Edge Info").next().is_none());
        assert_eq!(view.legend[0].value, "Unknown");
    }

    #[test]
    fn test_cluster_filter_limits_nodes() {
        let mut graph = two_actor_graph();
        graph.add_cluster(Cluster {
            id: ClusterId::new("c"),
            name: "C".to_string(),
            description: String::new(),
            members: vec![ActorId::new("p2")],
        });
        let mut opts = options("main_city", "relevance_degree");
        opts.cluster = Some("c".to_string());

        let view = NetworkRenderer::default().render(&graph, &opts);
        let ids: Vec<&str> = view.node_ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["p2"]);
        assert_eq!(view.figure.traces_named("Actors").next().unwrap().customdata, Some(vec!["p2".to_string()]));
    }

    #[test]
    fn test_hover_text_truncates_contribution() {
        let mut actor = ActorNode::new("p", "Pessoa");
        actor.attributes.main_contribution = Some("x".repeat(150));
        actor.attributes.relevance_degree = Some(8.0);
        let text = node_hover_text(&actor);
        assert!(text.contains("Posição: N/A<br>"));
        assert!(text.contains("Relevância: 8/10<br>"));
        assert!(text.contains(&format!("Contribuição: {}...<br>", "x".repeat(100))));
    }
}
