//! Value-chain risk analysis page

use super::{Control, ControlOption, Metric, Page, PageId, PageView, Section, Table};
use crate::data::risks::{CITY_RISK_INTENSITY, CITY_RISK_TYPES};
use crate::data::{risk_register, Dataset, Risk, RiskPriority};
use crate::notice::Notice;
use crate::session::{RiskFilters, SessionContext};
use crate::viz::charts::heatmap;
use crate::viz::figure::{Annotation, Axis, Figure, Layout, Line, Marker, OneOrMany, Trace};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::warn;

const TOP_RISKS: usize = 10;
const LEVELS: [&str; 5] = ["Muito Baixa", "Baixa", "Média", "Alta", "Muito Alta"];

const CLUSTERS: &str = "### Clusters de Riscos Interconectados\n\n\
**Cluster Socioambiental.** Escassez hídrica → Poluição de recursos hídricos → Pressão regulatória ambiental → \
Custos de adequação → Inviabilização de negócios → Desemprego → Pobreza → Trabalho infantil\n\n\
**Cluster Digital-Competitivo.** Exclusão digital → Limitado acesso a mercados → Dependência de intermediários → \
Margens reduzidas → Limitada capacidade de investimento → Obsolescência tecnológica";

const ABOUT: &str = "### Sobre a Análise de Riscos\n\n\
**Metodologia:**\n\
- **Severidade**: Impacto potencial do risco (1-5)\n\
- **Probabilidade**: Chance de ocorrência do risco (1-5)\n\
- **Valor de Risco**: Severidade × Probabilidade\n\
- **Prioridade**: Classificação baseada no valor de risco\n\n\
**Fonte:** Baseado no \"Mapeamento de Riscos da Cadeia de Valor do Ecossistema Têxtil em Pernambuco\"";

/// Risks passing the filters, in register order
pub fn filter_risks<'a>(register: &'a [Risk], filters: &RiskFilters) -> Vec<&'a Risk> {
    register
        .iter()
        .filter(|r| filters.categories.is_empty() || filters.categories.iter().any(|c| c == r.category))
        .filter(|r| filters.priorities.is_empty() || filters.priorities.contains(&r.priority))
        .filter(|r| r.value() >= filters.min_value)
        .collect()
}

/// Mean risk value and count per category
pub fn category_summary(risks: &[&Risk]) -> BTreeMap<&'static str, (f64, usize)> {
    let mut grouped: BTreeMap<&'static str, Vec<f64>> = BTreeMap::new();
    for risk in risks {
        grouped.entry(risk.category).or_default().push(risk.value() as f64);
    }
    grouped
        .into_iter()
        .map(|(category, values)| (category, (values.iter().sum::<f64>() / values.len() as f64, values.len())))
        .collect()
}

fn level_axis(title: &str) -> Axis {
    Axis {
        range: Some([0.5, 5.5]),
        tickvals: Some(vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        ticktext: Some(LEVELS.iter().map(|l| l.to_string()).collect()),
        ..Axis::titled(title)
    }
}

/// Probability x severity matrix, one trace per priority
pub fn risk_matrix(risks: &[&Risk]) -> Figure {
    let dashed = |x0: f64, y0: f64, x1: f64, y1: f64| {
        json!({"type": "line", "x0": x0, "y0": y0, "x1": x1, "y1": y1,
               "line": {"color": "gray", "width": 1, "dash": "dash"}})
    };
    let mut figure = Figure::new(Layout {
        xaxis: Some(level_axis("Probabilidade")),
        yaxis: Some(level_axis("Severidade")),
        height: Some(600),
        showlegend: Some(true),
        shapes: vec![dashed(0.5, 3.0, 5.5, 3.0), dashed(3.0, 0.5, 3.0, 5.5)],
        annotations: vec![
            Annotation::data("Alta Severidade<br>Baixa Probabilidade", 1.5, 4.5),
            Annotation::data("Alta Severidade<br>Alta Probabilidade", 4.5, 4.5),
            Annotation::data("Baixa Severidade<br>Baixa Probabilidade", 1.5, 1.5),
            Annotation::data("Baixa Severidade<br>Alta Probabilidade", 4.5, 1.5),
        ],
        ..Layout::titled("Matriz de Riscos - Probabilidade vs Severidade")
    });

    for priority in RiskPriority::ALL {
        let group: Vec<&&Risk> = risks.iter().filter(|r| r.priority == priority).collect();
        if group.is_empty() {
            continue;
        }
        let trace = Trace::scatter()
            .name(format!("Prioridade {}", priority))
            .mode("markers")
            .xy(
                group.iter().map(|r| r.probability as f64).collect::<Vec<f64>>(),
                group.iter().map(|r| r.severity as f64).collect::<Vec<f64>>(),
            )
            .text(group.iter().map(|r| r.name.to_string()).collect())
            .hovertext(
                group
                    .iter()
                    .map(|r| {
                        format!(
                            "<b>{}</b><br>Severidade: {}<br>Probabilidade: {}<br>Valor de Risco: {}",
                            r.name,
                            r.severity,
                            r.probability,
                            r.value()
                        )
                    })
                    .collect(),
            )
            .marker(Marker {
                size: Some(OneOrMany::Many(group.iter().map(|r| r.value() as f64 * 3.0).collect())),
                color: Some(OneOrMany::One(priority.color().to_string())),
                line: Some(Line::new(2.0, "white")),
                opacity: Some(0.8),
                ..Marker::default()
            });
        figure.add_trace(trace);
    }
    figure
}

fn category_chart(summary: &BTreeMap<&'static str, (f64, usize)>) -> Figure {
    let categories: Vec<String> = summary.keys().map(|c| c.to_string()).collect();
    let means: Vec<f64> = summary.values().map(|(mean, _)| *mean).collect();
    let mut trace = Trace::bar()
        .name("Risco Médio")
        .xy(categories, means)
        .text(summary.values().map(|(_, n)| format!("{} riscos", n)).collect())
        .marker_color("#e53e3e");
    trace.textposition = Some("outside".to_string());
    Figure::new(Layout {
        xaxis: Some(Axis::titled("Categoria")),
        yaxis: Some(Axis::titled("Risco Médio")),
        showlegend: Some(false),
        ..Layout::titled("Risco Médio por Categoria")
    })
    .with_trace(trace)
}

fn city_heatmap() -> Figure {
    let risk_types: Vec<String> = CITY_RISK_TYPES.iter().map(|r| r.to_string()).collect();
    let cities: Vec<String> = CITY_RISK_INTENSITY.iter().map(|(c, _)| c.to_string()).collect();
    let z = CITY_RISK_INTENSITY
        .iter()
        .map(|(_, values)| values.iter().map(|v| Some(*v)).collect())
        .collect();
    let mut figure = heatmap("Intensidade dos Riscos por Cidade", &risk_types, &cities, z, "Reds");
    figure.layout.height = Some(400);
    figure
}

fn risk_table(risks: &[&Risk]) -> Table {
    let mut sorted = risks.to_vec();
    sorted.sort_by(|a, b| b.value().cmp(&a.value()));
    let mut table = Table::new(["Risco", "Categoria", "Prioridade", "Severidade", "Probabilidade", "Valor de Risco"])
        .titled("Tabela Detalhada de Riscos")
        .sortable();
    for risk in sorted {
        table.push(vec![
            json!(risk.name),
            json!(risk.category),
            json!(risk.priority.label()),
            json!(risk.severity),
            json!(risk.probability),
            json!(risk.value()),
        ]);
    }
    table
}

fn export_table(risks: &[&Risk]) -> Table {
    let mut table = Table::new([
        "categoria",
        "risco",
        "severidade",
        "probabilidade",
        "prioridade",
        "descricao",
        "stakeholders",
        "mitigacao",
        "valor_risco",
    ]);
    for r in risks {
        table.push(vec![
            json!(r.category),
            json!(r.name),
            json!(r.severity),
            json!(r.probability),
            json!(r.priority.label()),
            json!(r.description),
            json!(r.stakeholders),
            json!(r.mitigation),
            json!(r.value()),
        ]);
    }
    table
}

fn mean_value(risks: &[&Risk]) -> f64 {
    if risks.is_empty() {
        0.0
    } else {
        risks.iter().map(|r| r.value() as f64).sum::<f64>() / risks.len() as f64
    }
}

/// Markdown report of the filtered risks
pub fn risk_report(risks: &[&Risk], filters: &RiskFilters, categories: &[String]) -> String {
    let count = |p: RiskPriority| risks.iter().filter(|r| r.priority == p).count();
    let shown_categories = if filters.categories.is_empty() {
        categories.join(", ")
    } else {
        filters.categories.join(", ")
    };
    let shown_priorities = if filters.priorities.is_empty() {
        RiskPriority::ALL.iter().map(|p| p.label()).collect::<Vec<_>>().join(", ")
    } else {
        filters.priorities.iter().map(|p| p.label()).collect::<Vec<_>>().join(", ")
    };
    let by_category: String = category_summary(risks)
        .iter()
        .map(|(category, (mean, n))| format!("- {}: {} riscos, valor médio {:.2}\n", category, n, mean))
        .collect();
    let top = risks
        .iter()
        .min_by_key(|r| std::cmp::Reverse(r.value()))
        .map(|r| r.name)
        .unwrap_or("N/A");

    format!(
        "# Relatório de Análise de Riscos - Ecossistema Têxtil de Pernambuco\n\n\
## Filtros Aplicados\n\
- Categorias: {}\n\
- Prioridades: {}\n\
- Valor Mínimo de Risco: {}\n\n\
## Resumo Executivo\n\
- Total de riscos analisados: {}\n\
- Riscos críticos: {}\n\
- Riscos significativos: {}\n\
- Valor médio de risco: {:.2}\n\n\
## Riscos por Categoria\n\
{}\n\
## Recomendações Prioritárias\n\
Com base na análise, recomenda-se focar inicialmente nos riscos críticos, especialmente:\n\
1. {}\n\
2. Implementar estratégias de mitigação integradas\n\
3. Monitoramento contínuo dos indicadores de risco\n",
        shown_categories,
        shown_priorities,
        filters.min_value,
        risks.len(),
        count(RiskPriority::Critical),
        count(RiskPriority::Significant),
        mean_value(risks),
        by_category,
        top
    )
}

pub struct RisksPage;

impl Page for RisksPage {
    fn render(&self, ctx: &mut SessionContext, _data: &Dataset) -> PageView {
        let mut view = PageView::new(PageId::Risks);
        let filters = &ctx.filters.risks;
        let register = risk_register();

        let mut categories: Vec<String> = register.iter().map(|r| r.category.to_string()).collect();
        categories.sort();
        categories.dedup();

        view.controls(vec![
            Control::multi_select(
                "categories",
                "Categorias de Risco:",
                categories.iter().map(|c| ControlOption::plain(c.clone())).collect(),
                &filters.categories,
            ),
            Control::multi_select(
                "priorities",
                "Níveis de Prioridade:",
                RiskPriority::ALL.iter().map(|p| ControlOption::plain(p.label())).collect(),
                &filters.priorities,
            ),
            Control::slider("min_value", "Valor Mínimo de Risco:", 1.0, 25.0, 1.0, filters.min_value),
        ]);

        let risks = filter_risks(register, filters);
        if risks.is_empty() {
            view.notice(Notice::info("Nenhum risco atende aos filtros selecionados."));
        }

        view.metrics(vec![
            Metric::new("Total de riscos", risks.len().to_string()),
            Metric::new(
                "Riscos críticos",
                risks.iter().filter(|r| r.priority == RiskPriority::Critical).count().to_string(),
            ),
            Metric::new(
                "Riscos significativos",
                risks.iter().filter(|r| r.priority == RiskPriority::Significant).count().to_string(),
            ),
            Metric::new("Valor médio de risco", format!("{:.2}", mean_value(&risks))),
        ]);

        view.chart("risk_matrix", risk_matrix(&risks));
        let summary = category_summary(&risks);
        if !summary.is_empty() {
            view.chart("risk_by_category", category_chart(&summary));
        }

        let mut top = risks.clone();
        top.sort_by(|a, b| b.value().cmp(&a.value()));
        top.truncate(TOP_RISKS);
        if !top.is_empty() {
            let details: String = top
                .iter()
                .map(|r| {
                    format!(
                        "#### {} (Risco: {})\n**Categoria:** {}  \n**Prioridade:** {}  \n**Severidade:** {}/5  \n\
**Probabilidade:** {}/5  \n**Descrição:** {}  \n**Stakeholders Afetados:** {}  \n**Estratégias de Mitigação:** {}\n\n",
                        r.name,
                        r.value(),
                        r.category,
                        r.priority,
                        r.severity,
                        r.probability,
                        r.description,
                        r.stakeholders,
                        r.mitigation
                    )
                })
                .collect();
            view.markdown(format!("### Riscos Prioritários\n\n{}", details));
        }

        view.markdown(CLUSTERS);
        view.chart("risk_heatmap", city_heatmap());
        view.table(risk_table(&risks));

        match export_table(&risks).to_csv() {
            Ok(content) => view.push(Section::Download {
                label: "📥 Exportar Riscos (CSV)".to_string(),
                file_name: "analise_riscos_filtrados.csv".to_string(),
                mime: "text/csv".to_string(),
                content,
            }),
            Err(e) => warn!(error = %e, "Failed to build risk export"),
        }
        view.push(Section::Download {
            label: "📥 Exportar Relatório (MD)".to_string(),
            file_name: "relatorio_analise_riscos.md".to_string(),
            mime: "text/markdown".to_string(),
            content: risk_report(&risks, filters, &categories),
        });
        view.markdown(ABOUT);
        view
    }
}
