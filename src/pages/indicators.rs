//! Indicator comparison page
//!
//! Per-domain comparison across the selected cities, the domain's
//! correlation matrix, a two-metric quadrant scatter and the composite
//! development index.

use super::{Control, ControlOption, Metric, Page, PageId, PageView, Section, Table};
use crate::analysis::{composite_index, correlation_matrix, matrix_cells, median, normalize_table, strong_pairs};
use crate::data::{Dataset, Domain, IndicatorTable, CITY_COLUMN};
use crate::notice::Notice;
use crate::session::SessionContext;
use crate::viz::charts::{
    bar_chart, grouped_scatter, heatmap, radar_chart, ranking_chart, reference_line, NamedSeries, ScatterPoint,
};
use crate::viz::Figure;
use serde_json::{json, Value};
use tracing::warn;

const STRONG_CORRELATION: f64 = 0.7;

/// Indicators compared when the user picked none
pub fn default_metrics(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Economic => &["empresas_formais", "empresas_informais", "empregos_diretos"],
        Domain::Social => &["taxa_pobreza", "evasao_escolar", "trabalho_infantil"],
        Domain::Environmental => &[
            "consumo_agua_m3_dia",
            "efluentes_tratados_percentual",
            "reuso_agua_percentual",
        ],
        Domain::Innovation => &[
            "investimento_inovacao_percentual",
            "adocao_tecnologias_digitais",
            "empresas_com_ecommerce",
        ],
    }
}

fn domain_value(domain: Domain) -> String {
    serde_json::to_value(domain)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Readable form of a column name
pub fn metric_label(column: &str) -> String {
    let mut label = column.replace('_', " ");
    if let Some(first) = label.get(0..1) {
        label = first.to_uppercase() + &label[1..];
    }
    label
}

fn series(table: &IndicatorTable, columns: &[&str]) -> Vec<NamedSeries> {
    columns
        .iter()
        .filter_map(|column| {
            let values = table.column(column)?;
            Some(NamedSeries::new(
                metric_label(column),
                values.into_iter().map(|v| v.unwrap_or(0.0)).collect(),
            ))
        })
        .collect()
}

fn city_names(table: &IndicatorTable) -> Vec<String> {
    table.rows().iter().map(|r| r.city.clone()).collect()
}

/// Scatter of two columns, one point per city
fn city_scatter(table: &IndicatorTable, title: &str, x: &str, y: &str) -> Option<Figure> {
    let points: Vec<ScatterPoint> = table
        .rows()
        .iter()
        .filter_map(|row| {
            let vx = table.value(&row.city, x)?;
            let vy = table.value(&row.city, y)?;
            Some(ScatterPoint {
                x: vx,
                y: vy,
                label: row.city.clone(),
                hover: format!("<b>{}</b><br>{}: {}<br>{}: {}", row.city, metric_label(x), vx, metric_label(y), vy),
                size: 20.0,
            })
        })
        .collect();
    if points.is_empty() {
        return None;
    }
    Some(grouped_scatter(
        title,
        &[("Cidades".to_string(), points)],
        &metric_label(x),
        &metric_label(y),
        None,
    ))
}

fn domain_charts(view: &mut PageView, domain: Domain, table: &IndicatorTable) {
    let cities = city_names(table);
    match domain {
        Domain::Economic => {
            if let Some(figure) = city_scatter(
                table,
                "PIB per capita x Empregos Diretos",
                "pib_per_capita",
                "empregos_diretos",
            ) {
                view.chart("economic_scatter", figure);
            }
        }
        Domain::Social => {
            let axes = ["idh", "acesso_internet", "mulheres_empreendedoras", "jovens_empreendedores"];
            // IDH is on a 0..1 scale, the others are percentages
            let radar: Vec<NamedSeries> = table
                .rows()
                .iter()
                .map(|row| {
                    let values = axes
                        .iter()
                        .map(|column| {
                            let v = table.value(&row.city, column).unwrap_or(0.0);
                            if *column == "idh" {
                                v * 100.0
                            } else {
                                v
                            }
                        })
                        .collect();
                    NamedSeries::new(row.city.clone(), values)
                })
                .collect();
            let labels: Vec<String> = axes.iter().map(|c| metric_label(c)).collect();
            view.chart("social_radar", radar_chart("Perfil Social por Cidade", &labels, &radar));
        }
        Domain::Environmental => {
            if let Some(figure) = city_scatter(
                table,
                "Lavanderias x Efluentes Tratados",
                "lavanderias_quantidade",
                "efluentes_tratados_percentual",
            ) {
                view.chart("laundry_scatter", figure);
            }
        }
        Domain::Innovation => {
            let columns = ["marcas_proprias_percentual", "design_proprio_percentual", "startups_relacionadas"];
            view.chart(
                "value_added",
                bar_chart(
                    "Agregação de Valor e Empreendedorismo",
                    &cities,
                    &series(table, &columns),
                    "Cidade",
                    "Valor",
                ),
            );
        }
    }
}

fn correlation_section(view: &mut PageView, domain: Domain, table: &IndicatorTable) {
    let columns = table.numeric_columns();
    if columns.len() < 2 {
        view.notice(Notice::info("Dados insuficientes para a matriz de correlação."));
        return;
    }
    let matrix = correlation_matrix(table, &columns);
    let labels: Vec<String> = columns.iter().map(|c| metric_label(c)).collect();
    view.chart(
        "correlation",
        heatmap(
            &format!("Matriz de Correlação - {}", domain.label()),
            &labels,
            &labels,
            matrix_cells(&matrix),
            "RdBu",
        ),
    );
    let pairs = strong_pairs(&matrix, &columns, STRONG_CORRELATION);
    if !pairs.is_empty() {
        let lines: String = pairs
            .iter()
            .map(|p| {
                format!(
                    "- {} ↔ {}: {:.2}\n",
                    metric_label(&p.first),
                    metric_label(&p.second),
                    p.correlation
                )
            })
            .collect();
        view.markdown(format!("**Correlações fortes (|r| ≥ {}):**\n\n{}", STRONG_CORRELATION, lines));
    }
}

/// Quadrant labels for a city relative to the medians
fn quadrant(x: f64, y: f64, mx: f64, my: f64) -> &'static str {
    match (x >= mx, y >= my) {
        (true, true) => "Alto / Alto",
        (false, true) => "Baixo / Alto",
        (true, false) => "Alto / Baixo",
        (false, false) => "Baixo / Baixo",
    }
}

/// Quadrant scatter of two combined-table columns split at their medians
pub fn quadrant_chart(table: &IndicatorTable, x: &str, y: &str) -> Option<Figure> {
    let mx = median(&table.present_values(x))?;
    let my = median(&table.present_values(y))?;
    let mut groups: Vec<(String, Vec<ScatterPoint>)> = ["Alto / Alto", "Baixo / Alto", "Alto / Baixo", "Baixo / Baixo"]
        .iter()
        .map(|q| (q.to_string(), Vec::new()))
        .collect();
    for row in table.rows() {
        let (Some(vx), Some(vy)) = (table.value(&row.city, x), table.value(&row.city, y)) else {
            continue;
        };
        let name = quadrant(vx, vy, mx, my);
        if let Some((_, points)) = groups.iter_mut().find(|(q, _)| q == name) {
            points.push(ScatterPoint {
                x: vx,
                y: vy,
                label: row.city.clone(),
                hover: format!("<b>{}</b><br>{}: {}<br>{}: {}", row.city, metric_label(x), vx, metric_label(y), vy),
                size: 25.0,
            });
        }
    }
    let mut figure = grouped_scatter(
        &format!("Análise de Quadrantes: {} x {}", metric_label(x), metric_label(y)),
        &groups,
        &metric_label(x),
        &metric_label(y),
        None,
    );
    figure.layout.shapes = vec![reference_line(true, mx), reference_line(false, my)];
    Some(figure)
}

fn data_table(domain: Domain, table: &IndicatorTable) -> Table {
    let mut out = Table::new(std::iter::once(CITY_COLUMN.to_string()).chain(table.columns().iter().cloned()))
        .titled(format!("Dados - Indicadores {}", domain.label()))
        .sortable();
    for row in table.rows() {
        let mut cells = vec![json!(row.city)];
        cells.extend(row.values.iter().map(|v| v.map(|n| json!(n)).unwrap_or(Value::Null)));
        out.push(cells);
    }
    out
}

pub struct IndicatorsPage;

impl Page for IndicatorsPage {
    fn render(&self, ctx: &mut SessionContext, data: &Dataset) -> PageView {
        let mut view = PageView::new(PageId::Indicators);
        let filters = &ctx.filters.indicators;
        let domain = filters.domain;
        let table = data.table(domain).filter_cities(&ctx.selected_cities);
        let combined = data.combined().filter_cities(&ctx.selected_cities);

        let combined_options: Vec<ControlOption> = combined
            .numeric_columns()
            .into_iter()
            .map(|c| ControlOption::new(c, metric_label(c)))
            .collect();
        view.controls(vec![
            Control::select(
                "domain",
                "Dimensão:",
                Domain::ALL
                    .iter()
                    .map(|d| ControlOption::new(domain_value(*d), d.label()))
                    .collect(),
                domain,
            ),
            Control::multi_select(
                "metrics",
                "Indicadores:",
                table
                    .numeric_columns()
                    .into_iter()
                    .map(|c| ControlOption::new(c, metric_label(c)))
                    .collect(),
                &filters.metrics,
            ),
            Control::checkbox("normalize", "Normalizar (0-100)", filters.normalize),
            Control::checkbox("show_correlation", "Mostrar correlações", filters.show_correlation),
            Control::select("x_metric", "Eixo X:", combined_options.clone(), &filters.x_metric),
            Control::select("y_metric", "Eixo Y:", combined_options, &filters.y_metric),
        ]);

        if data.is_placeholder(domain) {
            view.notice(Notice::info(format!(
                "Exibindo dados de exemplo para indicadores {}.",
                domain.label().to_lowercase()
            )));
        }
        if table.is_empty() {
            view.notice(Notice::warning("Nenhuma cidade selecionada possui dados."));
            return view;
        }

        let metrics: Vec<&str> = if filters.metrics.is_empty() {
            default_metrics(domain).iter().copied().filter(|c| table.has_column(c)).collect()
        } else {
            filters
                .metrics
                .iter()
                .map(String::as_str)
                .filter(|c| table.has_column(c))
                .collect()
        };

        view.metrics(
            metrics
                .iter()
                .filter_map(|column| {
                    table
                        .mean(column)
                        .map(|mean| Metric::new(format!("Média - {}", metric_label(column)), format!("{:.1}", mean)))
                })
                .collect(),
        );

        if !metrics.is_empty() {
            let (shown, y_title) = if filters.normalize {
                (normalize_table(&table, &metrics), "Valor normalizado (0-100)")
            } else {
                (table.clone(), "Valor")
            };
            view.chart(
                "comparison",
                bar_chart(
                    &format!("Comparação de Indicadores {}", domain.label()),
                    &city_names(&shown),
                    &series(&shown, &metrics),
                    "Cidade",
                    y_title,
                ),
            );
        }
        domain_charts(&mut view, domain, &table);

        if filters.show_correlation {
            correlation_section(&mut view, domain, &table);
        }

        match quadrant_chart(&combined, &filters.x_metric, &filters.y_metric) {
            Some(figure) => view.chart("quadrant", figure),
            None => view.notice(Notice::info("Indicadores selecionados para o quadrante não estão disponíveis.")),
        }

        let scores = composite_index(data, &city_names(&combined));
        if !scores.is_empty() {
            let labels: Vec<String> = scores.iter().map(|s| s.city.clone()).collect();
            let values: Vec<f64> = scores.iter().map(|s| s.score).collect();
            view.chart(
                "composite_index",
                ranking_chart("Índice Composto de Desenvolvimento", &labels, &values, "Pontuação (0-100)"),
            );
            let breakdown: String = scores
                .iter()
                .map(|s| format!("- **{}**: {:.1} ({} indicadores válidos)\n", s.city, s.score, s.valid_indicators))
                .collect();
            view.markdown(format!(
                "**Composição do índice:** PIB per capita (+), informalidade (−), IDH (+), evasão escolar (−), \
investimento em inovação (+).\n\n{}",
                breakdown
            ));
        }

        let table_section = data_table(domain, &table);
        match table_section.to_csv() {
            Ok(content) => {
                view.table(table_section);
                view.push(Section::Download {
                    label: "📥 Exportar Dados (CSV)".to_string(),
                    file_name: format!("indicadores_{}.csv", domain.key()),
                    mime: "text/csv".to_string(),
                    content,
                });
            }
            Err(e) => {
                warn!(error = %e, "Failed to build indicator export");
                view.table(table_section);
            }
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_label() {
        assert_eq!(metric_label("pib_per_capita"), "Pib per capita");
        assert_eq!(metric_label(""), "");
    }

    #[test]
    fn test_quadrants_split_at_medians() {
        let data = Dataset::placeholder();
        let figure = quadrant_chart(&data.combined(), "pib_per_capita", "idh").unwrap();
        // Caruaru leads on both axes
        let top = figure.traces_named("Alto / Alto").next().unwrap();
        assert!(matches!(&top.text, Some(crate::viz::figure::OneOrMany::Many(names)) if names.contains(&"Caruaru".to_string())));
        assert_eq!(figure.layout.shapes.len(), 2);
        assert!(quadrant_chart(&data.combined(), "missing", "idh").is_none());
    }

    #[test]
    fn test_default_render() {
        let mut ctx = SessionContext::new("s");
        let view = IndicatorsPage.render(&mut ctx, &Dataset::placeholder());
        assert!(view.find_chart("comparison").is_some());
        assert!(view.find_chart("correlation").is_some());
        assert!(view.find_chart("composite_index").is_some());
        assert_eq!(view.notices.len(), 1);
    }

    #[test]
    fn test_normalized_comparison() {
        let mut ctx = SessionContext::new("s");
        ctx.filters.indicators.normalize = true;
        ctx.filters.indicators.metrics = vec!["empregos_diretos".to_string()];
        let view = IndicatorsPage.render(&mut ctx, &Dataset::placeholder());
        let figure = view.find_chart("comparison").unwrap();
        assert_eq!(figure.data.len(), 1);
        let json = figure.to_json();
        assert_eq!(json["data"][0]["y"][1], 100.0);
        assert_eq!(json["data"][0]["y"][2], 0.0);
    }

    #[test]
    fn test_unknown_cities_warn() {
        let mut ctx = SessionContext::new("s");
        ctx.set_cities(vec!["Recife".to_string()]);
        let view = IndicatorsPage.render(&mut ctx, &Dataset::placeholder());
        assert!(view.notices.iter().any(|n| n.message == "Nenhuma cidade selecionada possui dados."));
    }
}
