//! Strategic opportunity portfolio page

use super::{Control, ControlOption, Metric, Page, PageId, PageView, Section, Table};
use crate::data::{opportunity_portfolio, Dataset, Opportunity, DEFAULT_CITIES};
use crate::notice::Notice;
use crate::session::{OpportunityFilters, SessionContext};
use crate::viz::charts::{bar_chart, grouped_scatter, pie_chart, reference_line, NamedSeries, ScatterPoint};
use crate::viz::encoding::SET3;
use crate::viz::figure::{Annotation, Figure, OneOrMany};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::warn;

const TOP_OPPORTUNITIES: usize = 5;

/// Sorted distinct values of one portfolio field
fn distinct<F>(field: F) -> Vec<String>
where
    F: Fn(&Opportunity) -> Vec<&'static str>,
{
    let mut values: Vec<String> = opportunity_portfolio()
        .iter()
        .flat_map(|o| field(o))
        .map(str::to_string)
        .collect();
    values.sort();
    values.dedup();
    values
}

/// Opportunities passing the filters; empty selections keep everything
pub fn filter_opportunities(filters: &OpportunityFilters) -> Vec<&'static Opportunity> {
    opportunity_portfolio()
        .iter()
        .filter(|o| filters.categories.is_empty() || filters.categories.iter().any(|c| c == o.category))
        .filter(|o| filters.cities.is_empty() || o.cities.iter().any(|c| filters.cities.iter().any(|f| f == c)))
        .filter(|o| filters.horizons.is_empty() || filters.horizons.iter().any(|h| h == o.horizon))
        .filter(|o| o.priority >= filters.min_priority)
        .collect()
}

/// Impact x viability matrix, one colored group per category
pub fn priority_matrix(opportunities: &[&Opportunity]) -> Figure {
    let categories = distinct(|o| vec![o.category]);
    let groups: Vec<(String, Vec<ScatterPoint>)> = categories
        .iter()
        .map(|category| {
            let points = opportunities
                .iter()
                .filter(|o| o.category == category)
                .map(|o| ScatterPoint {
                    x: o.viability_value as f64,
                    y: o.impact_value as f64,
                    label: o.name.to_string(),
                    hover: format!(
                        "<b>{}</b><br>Impacto: {}<br>Viabilidade: {}<br>Prioridade: {}<br>Horizonte: {}",
                        o.name, o.impact, o.viability, o.priority, o.horizon
                    ),
                    size: o.priority as f64 * 2.0,
                })
                .collect();
            (category.clone(), points)
        })
        .collect();

    let mut figure = grouped_scatter(
        "Matriz de Priorização: Impacto vs Viabilidade",
        &groups,
        "Viabilidade",
        "Impacto",
        Some([0.5, 5.5]),
    );
    for trace in figure.data.iter_mut() {
        let index = categories
            .iter()
            .position(|c| Some(c.as_str()) == trace.name.as_deref())
            .unwrap_or(0);
        if let Some(marker) = trace.marker.as_mut() {
            marker.color = Some(OneOrMany::One(SET3[index % SET3.len()].to_string()));
        }
        trace.textposition = Some("top center".to_string());
    }
    figure.layout.height = Some(600);
    figure.layout.shapes = vec![reference_line(true, 2.5), reference_line(false, 2.5)];
    figure.layout.annotations = vec![
        Annotation::data("Alto Impacto<br>Alta Viabilidade", 4.25, 5.2),
        Annotation::data("Alto Impacto<br>Baixa Viabilidade", 1.25, 5.2),
    ];
    figure
}

fn category_charts(view: &mut PageView, opportunities: &[&Opportunity]) {
    let mut by_category: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for o in opportunities {
        by_category.entry(o.category).or_default().push(o.priority as f64);
    }
    let categories: Vec<String> = by_category.keys().map(|c| c.to_string()).collect();
    let counts: Vec<f64> = by_category.values().map(|v| v.len() as f64).collect();
    let means: Vec<f64> = by_category
        .values()
        .map(|v| v.iter().sum::<f64>() / v.len() as f64)
        .collect();
    view.chart(
        "opportunities_by_category",
        bar_chart(
            "Oportunidades por Categoria",
            &categories,
            &[NamedSeries::new("Quantidade", counts), NamedSeries::new("Prioridade Média", means)],
            "Categoria",
            "Valor",
        ),
    );

    let mut by_horizon: BTreeMap<&str, usize> = BTreeMap::new();
    for o in opportunities {
        *by_horizon.entry(o.horizon).or_insert(0) += 1;
    }
    let (horizons, counts): (Vec<String>, Vec<f64>) = by_horizon
        .into_iter()
        .map(|(h, n)| (h.to_string(), n as f64))
        .unzip();
    view.chart(
        "horizon_distribution",
        pie_chart("Distribuição por Horizonte Temporal", &horizons, &counts, None),
    );
}

fn describe(o: &Opportunity) -> String {
    format!(
        "#### {} (Prioridade: {})\n**Categoria:** {}  \n**Descrição:** {}  \n**Cidades:** {}  \n\
**Segmento:** {}  \n**Impacto:** {} | **Viabilidade:** {}  \n**Horizonte:** {}  \n**Investimento Estimado:** {}\n\n",
        o.name,
        o.priority,
        o.category,
        o.description,
        o.cities.join(", "),
        o.segment,
        o.impact,
        o.viability,
        o.horizon,
        o.estimated_investment
    )
}

fn stakeholder_panel(view: &mut PageView, selected: &Opportunity, data: &Dataset) {
    let mut text = format!("### 🤝 Stakeholders Recomendados: {}\n\n", selected.name);
    match data.ontology() {
        Some(graph) => {
            for (name, actor) in selected.resolve_stakeholders(graph) {
                match actor {
                    Some(actor) => text.push_str(&format!(
                        "- **{}** ({}, {}). Relevância: {}. _Justificativa: {}_\n",
                        actor.label(),
                        actor.position.as_deref().unwrap_or("N/A"),
                        actor.city().unwrap_or("N/A"),
                        actor
                            .relevance()
                            .map(|r| format!("{}/10", r))
                            .unwrap_or_else(|| "N/A".to_string()),
                        selected.justification(actor)
                    )),
                    None => text.push_str(&format!("- **{}** (não encontrado na ontologia)\n", name)),
                }
            }
        }
        None => {
            for name in selected.recommended_stakeholders {
                text.push_str(&format!("- **{}**\n", name));
            }
        }
    }
    text.push_str("\n**Próximos Passos:**\n");
    for (i, step) in selected.next_steps().iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, step));
    }
    view.markdown(text);
}

fn opportunity_table(opportunities: &[&Opportunity]) -> Table {
    let mut table = Table::new([
        "Oportunidade",
        "Categoria",
        "Cidades",
        "Impacto",
        "Viabilidade",
        "Prioridade",
        "Horizonte",
        "Investimento",
    ])
    .titled("Portfólio de Oportunidades")
    .sortable();
    for o in opportunities {
        table.push(vec![
            json!(o.name),
            json!(o.category),
            json!(o.cities.join(", ")),
            json!(o.impact),
            json!(o.viability),
            json!(o.priority),
            json!(o.horizon),
            json!(o.estimated_investment),
        ]);
    }
    table
}

pub struct OpportunitiesPage;

impl Page for OpportunitiesPage {
    fn render(&self, ctx: &mut SessionContext, data: &Dataset) -> PageView {
        let mut view = PageView::new(PageId::Opportunities);
        let filters = &ctx.filters.opportunities;
        let plain = |values: Vec<String>| -> Vec<ControlOption> { values.into_iter().map(ControlOption::plain).collect() };

        view.controls(vec![
            Control::multi_select(
                "categories",
                "Categorias:",
                plain(distinct(|o| vec![o.category])),
                &filters.categories,
            ),
            Control::multi_select(
                "cities",
                "Cidades:",
                plain(DEFAULT_CITIES.iter().map(|c| c.to_string()).collect()),
                &filters.cities,
            ),
            Control::multi_select(
                "horizons",
                "Horizonte Temporal:",
                plain(distinct(|o| vec![o.horizon])),
                &filters.horizons,
            ),
            Control::slider("min_priority", "Prioridade Mínima:", 1.0, 25.0, 1.0, filters.min_priority),
        ]);

        let opportunities = filter_opportunities(filters);
        if opportunities.is_empty() {
            view.notice(Notice::warning("Nenhuma oportunidade atende aos critérios selecionados."));
            return view;
        }

        let mean_priority =
            opportunities.iter().map(|o| o.priority as f64).sum::<f64>() / opportunities.len() as f64;
        view.metrics(vec![
            Metric::new("Oportunidades", opportunities.len().to_string()),
            Metric::new("Prioridade média", format!("{:.1}", mean_priority)),
            Metric::new(
                "Alto impacto",
                opportunities.iter().filter(|o| o.impact_value >= 4).count().to_string(),
            ),
            Metric::new(
                "Curto prazo",
                opportunities
                    .iter()
                    .filter(|o| o.horizon.starts_with("Curto"))
                    .count()
                    .to_string(),
            ),
        ]);

        view.chart("priority_matrix", priority_matrix(&opportunities));
        category_charts(&mut view, &opportunities);

        let mut ranked = opportunities.clone();
        ranked.sort_by(|a, b| b.priority.cmp(&a.priority));
        let top: String = ranked.iter().take(TOP_OPPORTUNITIES).map(|o| describe(o)).collect();
        view.markdown(format!("### 🏆 Oportunidades Prioritárias\n\n{}", top));

        let selected = filters
            .selected
            .as_deref()
            .and_then(|id| ranked.iter().find(|o| o.id == id))
            .or_else(|| ranked.first())
            .copied();
        view.controls(vec![Control::select(
            "selected",
            "Oportunidade:",
            ranked.iter().map(|o| ControlOption::new(o.id, o.name)).collect(),
            selected.map(|o| o.id),
        )]);
        if let Some(selected) = selected {
            stakeholder_panel(&mut view, selected, data);
        }

        let table = opportunity_table(&ranked);
        match table.to_csv() {
            Ok(content) => {
                view.table(table);
                view.push(Section::Download {
                    label: "📥 Exportar Oportunidades (CSV)".to_string(),
                    file_name: "oportunidades_filtradas.csv".to_string(),
                    mime: "text/csv".to_string(),
                    content,
                });
            }
            Err(e) => {
                warn!(error = %e, "Failed to build opportunity export");
                view.table(table);
            }
        }
        view
    }
}
