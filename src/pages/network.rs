//! Actor network page
//!
//! Statistics, rendering controls, the network figure with its legend, the
//! detail panel for the selected actor, the cluster panel and the relevance
//! analysis. The layout is recomputed on every render.

use super::{Control, ControlOption, Metric, Page, PageId, PageView, Section, Table};
use crate::config::NetworkConfig;
use crate::data::Dataset;
use crate::graph::property::format_number;
use crate::graph::summary::{UNSPECIFIED_IMPACT, UNSPECIFIED_LEADERSHIP};
use crate::graph::{distribution_by, relevance_summary, relevance_values, ActorNode, OntologyGraph};
use crate::notice::Notice;
use crate::session::SessionContext;
use crate::viz::charts::{bar_chart, histogram, pie_chart, NamedSeries};
use crate::viz::detail::title_case;
use crate::viz::network::{COLOR_BY_OPTIONS, SIZE_BY_OPTIONS};
use crate::viz::{DetailPanel, NetworkRenderer, Selection, SizeScale};
use agreste_layout::{network_stats, LayoutAlgorithm};
use serde_json::{json, Value};

const RELEVANCE_BINS: usize = 10;
const TOP_ACTORS: usize = 5;

pub struct NetworkPage {
    renderer: NetworkRenderer,
    panel: DetailPanel,
}

impl NetworkPage {
    pub fn new(config: &NetworkConfig) -> Self {
        let scale = SizeScale {
            min: config.min_marker_size,
            max: config.max_marker_size,
            default: config.default_marker_size,
        };
        Self {
            renderer: NetworkRenderer::new(config.seed, config.spring_iterations, config.spring_distance, scale),
            panel: DetailPanel::new(config.fallback_node.as_str()),
        }
    }
}

impl Page for NetworkPage {
    fn render(&self, ctx: &mut SessionContext, data: &Dataset) -> PageView {
        let mut view = PageView::new(PageId::Network);
        let Some(graph) = data.ontology() else {
            view.notice(Notice::warning("Dados da ontologia não estão disponíveis."));
            view.markdown("A visualização da rede de atores requer dados da ontologia do ecossistema.");
            return view;
        };

        let filters = &ctx.filters.network;
        let options = &filters.options;

        view.metrics(network_metrics(graph));
        view.controls(controls(graph, ctx));

        let network = self.renderer.render(graph, options);
        if network.positions.is_empty() {
            view.notice(Notice::warning("Nenhum nó disponível para visualização."));
        }
        view.push(Section::Legend {
            title: format!("Legenda: {}", title_case(&options.color_by)),
            entries: network.legend,
        });
        view.chart("network", network.figure);
        view.markdown("💡 **Dica:** Clique em qualquer nó da rede para visualizar as informações detalhadas do mesmo!");

        let selection = Selection::from_option(ctx.selected_node.as_ref());
        match self.panel.render(graph, &selection) {
            Some(detail) => view.push(Section::Detail { view: Box::new(detail) }),
            None => view.notice(Notice::warning(format!(
                "Ator {} não encontrado",
                match &selection {
                    Selection::Selected(id) => id,
                    Selection::None => self.panel.fallback(),
                }
            ))),
        }

        if let Some(cluster) = options.cluster.as_deref().and_then(|id| graph.cluster(id)) {
            view.markdown(format!("### 📋 Cluster: {}\n\n{}", cluster.label(), cluster.description));
            let members: Vec<&ActorNode> = cluster.members.iter().filter_map(|id| graph.node(id.as_str())).collect();
            view.table(actor_table(&members).titled("Membros do cluster"));
        }

        if !filters.search.trim().is_empty() {
            let found = graph.search(&filters.search);
            if found.is_empty() {
                view.notice(Notice::warning("Nenhum ator encontrado."));
            } else {
                view.table(actor_table(&found).titled("Resultados da busca"));
            }
        }

        relevance_analysis(&mut view, graph);
        view
    }
}

fn network_metrics(graph: &OntologyGraph) -> Vec<Metric> {
    let scope = graph.scope(None);
    let stats = network_stats(&graph.graph_view(&scope));
    let name_of = |dense: Option<agreste_layout::NodeId>| {
        dense
            .and_then(|id| graph.actor_by_dense(id))
            .map(|a| a.label().to_string())
            .unwrap_or_else(|| "N/A".to_string())
    };

    vec![
        Metric::new("Total de pessoas", stats.node_count.to_string()),
        Metric::new("Total de conexões", stats.edge_count.to_string()),
        Metric::new("Densidade da rede", format!("{:.3}", stats.density)),
        Metric::new("Coeficiente de clusterização", format!("{:.3}", stats.average_clustering)),
        Metric::new("Quantidade de clusters", graph.cluster_count().to_string()),
        Metric::new("Ator mais central", name_of(stats.most_central)).help("Maior centralidade de intermediação"),
        Metric::new("Ator mais conectado", name_of(stats.most_connected)).help("Maior centralidade de grau"),
    ]
}

fn controls(graph: &OntologyGraph, ctx: &SessionContext) -> Vec<Control> {
    let filters = &ctx.filters.network;
    let options = &filters.options;
    let mut clusters = vec![ControlOption::new("", "Todos atores")];
    clusters.extend(
        graph
            .cluster_options()
            .into_iter()
            .map(|(id, name)| ControlOption::new(id.as_str(), name)),
    );
    let plain = |values: &[&str]| -> Vec<ControlOption> { values.iter().map(|v| ControlOption::plain(*v)).collect() };

    vec![
        Control::select(
            "layout",
            "Layout",
            [
                LayoutAlgorithm::KamadaKawai,
                LayoutAlgorithm::Spring,
                LayoutAlgorithm::Circular,
                LayoutAlgorithm::Random,
            ]
            .iter()
            .map(|l| ControlOption::plain(l.as_str()))
            .collect(),
            options.layout.as_str(),
        ),
        Control::select("color_by", "Colorir por", plain(&COLOR_BY_OPTIONS), &options.color_by),
        Control::select("size_by", "Tamanho por", plain(&SIZE_BY_OPTIONS), &options.size_by),
        Control::select(
            "cluster",
            "Filtrar por cluster",
            clusters,
            options.cluster.clone().unwrap_or_default(),
        ),
        Control::text("search", "Buscar ator", &filters.search),
    ]
}

fn relevance_cell(actor: &ActorNode) -> Value {
    actor.relevance().map(|r| json!(r)).unwrap_or_else(|| json!("N/A"))
}

/// Name, position, city and relevance per actor
fn actor_table(actors: &[&ActorNode]) -> Table {
    let mut table = Table::new(["Nome", "Posição", "Cidade", "Relevância"]).sortable();
    for actor in actors {
        table.push(vec![
            json!(actor.label()),
            json!(actor.position.clone().unwrap_or_else(|| "N/A".to_string())),
            json!(actor.city().unwrap_or("N/A")),
            relevance_cell(actor),
        ]);
    }
    table
}

fn relevance_analysis(view: &mut PageView, graph: &OntologyGraph) {
    view.markdown("### 🎯 Análise de Relevância");
    let values = relevance_values(graph.actors());
    if let Some(summary) = relevance_summary(&values) {
        view.chart(
            "relevance_histogram",
            histogram(
                "Distribuição de Relevância dos Atores",
                &values,
                RELEVANCE_BINS,
                "Grau de Relevância",
                "Número de Atores",
            ),
        );
        view.metrics(vec![
            Metric::new("Mínimo", format!("{}/10", format_number(summary.min))),
            Metric::new("Média", format!("{:.1}/10", summary.mean)),
            Metric::new("Máximo", format!("{}/10", format_number(summary.max))),
        ]);
    }

    let (labels, counts) = split(distribution_by(graph.actors(), "leadership_type", UNSPECIFIED_LEADERSHIP));
    view.chart(
        "leadership_distribution",
        pie_chart("Distribuição por Tipo de Liderança", &labels, &counts, None),
    );

    let (cities, counts) = split(distribution_by(graph.actors(), "main_city", "N/A"));
    view.chart(
        "city_distribution",
        bar_chart(
            "Atores por Cidade",
            &cities,
            &[NamedSeries::new("Atores", counts)],
            "Cidade",
            "Número de Atores",
        ),
    );

    let (scales, counts) = split(distribution_by(graph.actors(), "impact_scale", UNSPECIFIED_IMPACT));
    view.chart(
        "impact_distribution",
        pie_chart("Distribuição por Escala de Impacto", &scales, &counts, Some(0.4)),
    );

    let top = graph.top_by_relevance(TOP_ACTORS);
    if !top.is_empty() {
        view.table(actor_table(&top).titled("🏆 Atores mais relevantes"));
    }
}

fn split(distribution: Vec<(String, usize)>) -> (Vec<String>, Vec<f64>) {
    distribution.into_iter().map(|(label, n)| (label, n as f64)).unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{load_ontology_value, ActorId};
    use serde_json::json;

    fn dataset() -> Dataset {
        let graph = load_ontology_value(
            &json!({
                "nodes": [
                    {"id": "p001", "name": "Ana", "position": "Presidente",
                     "attributes": {"main_city": "Caruaru", "relevance_degree": 9, "leadership_type": "Empresarial"}},
                    {"id": "p002", "name": "Bruno",
                     "attributes": {"main_city": "Toritama", "relevance_degree": 6}},
                    {"id": "p003", "name": "Carla", "attributes": {"main_city": "Caruaru"}}
                ],
                "edges": [
                    {"id": "e1", "source": "p001", "target": "p002", "type": "parceria"},
                    {"id": "e2", "source": "p002", "target": "p003", "type": "parceria"}
                ],
                "clusters": [{"id": "c1", "name": "Caruaru", "description": "Atores de Caruaru", "nodes": ["p001", "p003"]}]
            }),
            None,
        )
        .unwrap();
        Dataset::placeholder().with_ontology(graph)
    }

    fn page() -> NetworkPage {
        NetworkPage::new(&NetworkConfig::default())
    }

    #[test]
    fn test_without_ontology() {
        let view = page().render(&mut SessionContext::new("s"), &Dataset::placeholder());
        assert_eq!(view.notices.len(), 1);
        assert!(view.find_chart("network").is_none());
    }

    #[test]
    fn test_metrics_and_fallback_detail() {
        let view = page().render(&mut SessionContext::new("s"), &dataset());
        assert_eq!(view.metric("Total de pessoas").unwrap().value, "3");
        assert_eq!(view.metric("Total de conexões").unwrap().value, "2");
        assert_eq!(view.metric("Ator mais central").unwrap().value, "Bruno");
        assert_eq!(view.metric("Média").unwrap().value, "7.5/10");

        let detail = view
            .sections
            .iter()
            .find_map(|s| match s {
                Section::Detail { view } => Some(view),
                _ => None,
            })
            .unwrap();
        assert!(detail.is_fallback);
        assert_eq!(detail.name, "Ana");
    }

    #[test]
    fn test_selection_and_cluster_panel() {
        let mut ctx = SessionContext::new("s");
        ctx.select_node(Some(ActorId::new("p002")));
        ctx.filters.network.options.cluster = Some("c1".to_string());
        let view = page().render(&mut ctx, &dataset());

        let detail = view
            .sections
            .iter()
            .find_map(|s| match s {
                Section::Detail { view } => Some(view),
                _ => None,
            })
            .unwrap();
        assert!(!detail.is_fallback);
        assert_eq!(detail.name, "Bruno");

        let members = view
            .tables()
            .find(|t| t.title.as_deref() == Some("Membros do cluster"))
            .unwrap();
        assert_eq!(members.rows.len(), 2);
    }

    #[test]
    fn test_search() {
        let mut ctx = SessionContext::new("s");
        ctx.filters.network.search = "RUN".to_string();
        let view = page().render(&mut ctx, &dataset());
        let results = view
            .tables()
            .find(|t| t.title.as_deref() == Some("Resultados da busca"))
            .unwrap();
        assert_eq!(results.rows[0][0], json!("Bruno"));

        ctx.filters.network.search = "zzz".to_string();
        let view = page().render(&mut ctx, &dataset());
        assert!(view.notices.iter().any(|n| n.message == "Nenhum ator encontrado."));
    }
}
