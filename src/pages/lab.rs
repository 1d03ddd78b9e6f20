//! Interactive analysis lab
//!
//! Four modes share the combined indicator table: dimension comparison,
//! scenario simulation, correlation explorer and trend projection. The
//! simulations are deterministic so the same filters always give the same
//! figures.

use super::{Control, ControlOption, Metric, Page, PageId, PageView, Section, Table};
use crate::analysis::{compound_growth, correlation_matrix, matrix_cells, strong_pairs};
use crate::data::{format_thousands, Dataset, IndicatorTable};
use crate::notice::Notice;
use crate::pages::geography::scale_between;
use crate::pages::indicators::metric_label;
use crate::session::{ComparisonChart, LabFilters, LabMode, Scenario, SessionContext};
use crate::viz::charts::{bar_chart, heatmap, line_chart, radar_chart, NamedSeries};
use crate::viz::figure::{Axis, Figure, Layout, Line, Trace};
use serde_json::json;
use tracing::warn;

/// First simulated year
pub const BASE_YEAR: i32 = 2024;
pub const HORIZONS: [u32; 4] = [1, 3, 5, 10];
/// Yearly growth of the trend projection
pub const TREND_GROWTH: f64 = 0.05;
const HISTORY_YEARS: i32 = 5;
const MAX_INSIGHTS: usize = 3;

pub const DIMENSIONS: [(&str, &[&str]); 4] = [
    (
        "Econômica",
        &["faturamento_anual_milhoes", "pib_per_capita", "empresas_totais"],
    ),
    ("Social", &["idh", "taxa_pobreza", "acesso_internet"]),
    (
        "Ambiental",
        &["efluentes_tratados_percentual", "energia_renovavel_percentual"],
    ),
    (
        "Inovação",
        &["investimento_inovacao_percentual", "empresas_com_ecommerce"],
    ),
];

/// Metrics charted by the scenario simulator
pub const SCENARIO_METRICS: [&str; 4] = [
    "faturamento_anual_milhoes",
    "empresas_totais",
    "empregos_diretos",
    "idh",
];

/// Yearly parameters of a scenario
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioParameters {
    /// Percent per year
    pub economic_growth: f64,
    /// Multiplier; 1.0 is no change
    pub innovation_factor: f64,
    /// Percent per year
    pub sustainability_improvement: f64,
    /// Percent per year
    pub social_development: f64,
}

impl ScenarioParameters {
    /// Yearly growth rate applied to a column, chosen by its name
    pub fn growth_rate(&self, column: &str) -> f64 {
        let has = |parts: &[&str]| parts.iter().any(|p| column.contains(p));
        if has(&["faturamento", "pib"]) {
            self.economic_growth / 100.0
        } else if has(&["inovacao", "ecommerce"]) {
            self.innovation_factor - 1.0
        } else if has(&["ambiental", "energia"]) {
            self.sustainability_improvement / 100.0
        } else if has(&["idh", "pobreza"]) {
            self.social_development / 100.0
        } else {
            self.economic_growth / 200.0
        }
    }
}

fn scenario_parameters(scenario: Scenario) -> ScenarioParameters {
    let (economic_growth, innovation_factor, sustainability_improvement, social_development) = match scenario {
        Scenario::Accelerated => (15.0, 2.0, 8.0, 10.0),
        Scenario::Moderate => (5.0, 1.2, 3.0, 4.0),
        Scenario::Conservative => (2.0, 1.0, 1.0, 2.0),
        Scenario::Crisis => (-5.0, 0.8, -2.0, -1.0),
    };
    ScenarioParameters {
        economic_growth,
        innovation_factor,
        sustainability_improvement,
        social_development,
    }
}

fn scenario_label(scenario: Scenario) -> &'static str {
    match scenario {
        Scenario::Accelerated => "🚀 Crescimento Acelerado",
        Scenario::Moderate => "📊 Crescimento Moderado",
        Scenario::Conservative => "⚖️ Cenário Conservador",
        Scenario::Crisis => "⚠️ Cenário de Crise",
    }
}

fn enum_value<T: serde::Serialize>(value: T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Year-by-year projection of every numeric column of one city, from
/// `BASE_YEAR` to `BASE_YEAR + years`
pub fn simulate(table: &IndicatorTable, city: &str, params: &ScenarioParameters, years: u32) -> Option<IndicatorTable> {
    let row = table.row(city)?;
    let columns: Vec<(usize, &String)> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(idx, _)| row.values[*idx].is_some())
        .collect();
    let mut projection = IndicatorTable::new(columns.iter().map(|(_, name)| (*name).clone()));
    for year in 0..=years {
        let values = columns
            .iter()
            .map(|(idx, name)| row.values[*idx].map(|v| compound_growth(v, params.growth_rate(name), year)))
            .collect();
        projection.push_row((BASE_YEAR + year as i32).to_string(), values);
    }
    Some(projection)
}

/// Simulated history (`0.85 + 0.05 i` of the current value) and the 5%/year
/// projection from `BASE_YEAR`
pub fn trend(current: f64, years: u32) -> (Vec<(i32, f64)>, Vec<(i32, f64)>) {
    let history = (0..HISTORY_YEARS)
        .map(|i| (BASE_YEAR - HISTORY_YEARS + i, current * (0.85 + i as f64 * 0.05)))
        .collect();
    let projection = (0..=years)
        .map(|i| (BASE_YEAR + i as i32, compound_growth(current, TREND_GROWTH, i)))
        .collect();
    (history, projection)
}

fn insight_value(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format_thousands(v)
    } else {
        format!("{:.2}", v)
    }
}

/// Leader-versus-laggard statements, at most three
pub fn insights(table: &IndicatorTable, metrics: &[&str]) -> Vec<String> {
    metrics
        .iter()
        .filter_map(|metric| {
            let rows: Vec<(&str, f64)> = table
                .rows()
                .iter()
                .filter_map(|r| Some((r.city.as_str(), table.value(&r.city, metric)?)))
                .collect();
            let (max_city, max) = rows.iter().copied().reduce(|a, b| if b.1 > a.1 { b } else { a })?;
            let (min_city, min) = rows.iter().copied().reduce(|a, b| if b.1 < a.1 { b } else { a })?;
            if max == min || min == 0.0 {
                return None;
            }
            Some(format!(
                "📊 **{}**: {} lidera com {}, {:.1}% superior a {}",
                metric_label(metric),
                max_city,
                insight_value(max),
                (max - min) / min * 100.0,
                min_city
            ))
        })
        .take(MAX_INSIGHTS)
        .collect()
}

fn comparison(view: &mut PageView, filters: &LabFilters, table: &IndicatorTable) {
    view.controls(vec![
        Control::select(
            "dimension",
            "Dimensão de análise:",
            DIMENSIONS.iter().map(|(name, _)| ControlOption::plain(*name)).collect(),
            &filters.dimension,
        ),
        Control::select(
            "chart",
            "Tipo de visualização:",
            vec![
                ControlOption::new("bar", "📊 Barras"),
                ControlOption::new("radar", "🕸️ Radar"),
            ],
            filters.chart,
        ),
    ]);
    let metrics: Vec<&str> = DIMENSIONS
        .iter()
        .find(|(name, _)| *name == filters.dimension)
        .map(|(_, columns)| *columns)
        .unwrap_or(DIMENSIONS[0].1)
        .iter()
        .copied()
        .filter(|c| table.has_column(c))
        .collect();
    if metrics.is_empty() {
        view.notice(Notice::warning("Nenhum indicador disponível para esta dimensão."));
        return;
    }

    let normalized: Vec<(String, Vec<f64>)> = metrics
        .iter()
        .filter_map(|m| Some((metric_label(m), scale_between(&table.column(m)?, 0.0, 1.0))))
        .collect();
    let cities: Vec<String> = table.rows().iter().map(|r| r.city.clone()).collect();
    let title = format!("Comparação {} (normalizada)", filters.dimension);
    let figure = match filters.chart {
        ComparisonChart::Bar => bar_chart(
            &title,
            &cities,
            &normalized
                .iter()
                .map(|(name, values)| NamedSeries::new(name.clone(), values.clone()))
                .collect::<Vec<_>>(),
            "Cidade",
            "Valor normalizado (0-1)",
        ),
        ComparisonChart::Radar => {
            let axes: Vec<String> = normalized.iter().map(|(name, _)| name.clone()).collect();
            let series: Vec<NamedSeries> = cities
                .iter()
                .enumerate()
                .map(|(i, city)| NamedSeries::new(city.clone(), normalized.iter().map(|(_, v)| v[i]).collect()))
                .collect();
            radar_chart(&title, &axes, &series)
        }
    };
    view.chart("comparison", figure);

    let found = insights(table, &metrics);
    if !found.is_empty() {
        let lines: String = found.iter().map(|i| format!("• {}\n\n", i)).collect();
        view.markdown(format!("#### 🧠 Insights Automáticos\n\n{}", lines));
    }
}

fn city_control(cities: &[String], city: &str) -> Control {
    Control::select(
        "city",
        "🏘️ Cidade Base:",
        cities.iter().map(|c| ControlOption::plain(c.clone())).collect(),
        city,
    )
}

fn horizon_control(filters: &LabFilters) -> Control {
    Control::select(
        "horizon_years",
        "⏰ Horizonte:",
        HORIZONS
            .iter()
            .map(|h| ControlOption::new(h.to_string(), format!("📅 {} {}", h, if *h == 1 { "ano" } else { "anos" })))
            .collect(),
        filters.horizon_years,
    )
}

fn scenarios(view: &mut PageView, filters: &LabFilters, table: &IndicatorTable, city: &str) {
    let cities: Vec<String> = table.rows().iter().map(|r| r.city.clone()).collect();
    view.controls(vec![
        city_control(&cities, city),
        horizon_control(filters),
        Control::select(
            "scenario",
            "📈 Tipo de Cenário:",
            [
                Scenario::Accelerated,
                Scenario::Moderate,
                Scenario::Conservative,
                Scenario::Crisis,
            ]
            .into_iter()
            .map(|s| ControlOption::new(enum_value(s), scenario_label(s)))
            .collect(),
            filters.scenario,
        ),
    ]);

    let params = scenario_parameters(filters.scenario);
    view.metrics(vec![
        Metric::new("💰 Crescimento Econômico", format!("{}%/ano", params.economic_growth)),
        Metric::new("🚀 Fator Inovação", format!("{}", params.innovation_factor)),
        Metric::new("🌱 Melhoria Ambiental", format!("{}%/ano", params.sustainability_improvement)),
        Metric::new("👥 Desenvolvimento Social", format!("{}%/ano", params.social_development)),
    ]);

    let Some(projection) = simulate(table, city, &params, filters.horizon_years) else {
        view.notice(Notice::warning(format!("Cidade {} não encontrada nos dados.", city)));
        return;
    };
    let years: Vec<String> = projection.rows().iter().map(|r| r.city.clone()).collect();
    for metric in SCENARIO_METRICS {
        if let Some(values) = projection.column(metric) {
            view.chart(
                &format!("scenario_{}", metric),
                line_chart(
                    &format!("🔮 Projeção para {}: {}", city, metric_label(metric)),
                    &years,
                    &[NamedSeries::new(
                        metric_label(metric),
                        values.into_iter().map(|v| v.unwrap_or(0.0)).collect(),
                    )],
                    &metric_label(metric),
                ),
            );
        }
    }

    let mut details = Table::new(std::iter::once("year".to_string()).chain(projection.columns().iter().cloned()))
        .titled("📋 Dados Detalhados da Simulação");
    for row in projection.rows() {
        let mut cells = vec![json!(row.city)];
        cells.extend(row.values.iter().map(|v| json!(v.map(|v| (v * 100.0).round() / 100.0))));
        details.push(cells);
    }
    match details.to_csv() {
        Ok(content) => view.push(Section::Download {
            label: "📥 Download Resultados CSV".to_string(),
            file_name: format!("simulacao_{}.csv", city),
            mime: "text/csv".to_string(),
            content,
        }),
        Err(e) => warn!(error = %e, "Failed to build simulation export"),
    }
    view.table(details);
}

fn correlations(view: &mut PageView, filters: &LabFilters, table: &IndicatorTable) {
    view.controls(vec![Control::slider(
        "correlation_threshold",
        "Correlação mínima:",
        0.1,
        0.9,
        0.05,
        filters.correlation_threshold,
    )]);
    let columns = table.numeric_columns();
    if columns.len() < 2 || table.len() < 2 {
        view.notice(Notice::info("Dados insuficientes para calcular correlações."));
        return;
    }
    let matrix = correlation_matrix(table, &columns);
    let labels: Vec<String> = columns.iter().map(|c| metric_label(c)).collect();
    view.chart(
        "correlation_matrix",
        heatmap("🔥 Matriz de Correlação Interativa", &labels, &labels, matrix_cells(&matrix), "RdBu"),
    );

    let pairs = strong_pairs(&matrix, &columns, filters.correlation_threshold);
    if pairs.is_empty() {
        view.notice(Notice::info("Nenhuma correlação acima do limite selecionado."));
        return;
    }
    let mut found = Table::new(["Indicador 1", "Indicador 2", "Correlação", "Intensidade", "Direção"])
        .titled("🔗 Correlações Significativas")
        .sortable();
    for pair in pairs {
        let strength = match pair.correlation.abs() {
            r if r >= 0.7 => "Forte",
            r if r >= 0.5 => "Moderada",
            _ => "Fraca",
        };
        found.push(vec![
            json!(metric_label(&pair.first)),
            json!(metric_label(&pair.second)),
            json!((pair.correlation * 1000.0).round() / 1000.0),
            json!(strength),
            json!(if pair.correlation > 0.0 { "Positiva" } else { "Negativa" }),
        ]);
    }
    view.table(found);
}

/// History and projection lines for one metric
pub fn trend_chart(metric: &str, city: &str, history: &[(i32, f64)], projection: &[(i32, f64)]) -> Figure {
    let line = |points: &[(i32, f64)], name: &str, style: Line| {
        let mut trace = Trace::scatter()
            .name(name)
            .mode("lines+markers")
            .xy(
                points.iter().map(|(y, _)| *y as f64).collect::<Vec<f64>>(),
                points.iter().map(|(_, v)| *v).collect::<Vec<f64>>(),
            );
        trace.line = Some(style);
        trace
    };
    Figure::new(Layout {
        xaxis: Some(Axis::titled("Ano")),
        yaxis: Some(Axis::titled(metric_label(metric))),
        height: Some(500),
        ..Layout::titled(format!("📊 Tendência e Previsão: {} - {}", metric_label(metric), city))
    })
    .with_trace(line(history, "Dados Históricos", Line::new(3.0, "blue")))
    .with_trace(line(
        projection,
        "Previsão",
        Line {
            dash: Some("dash".to_string()),
            ..Line::new(3.0, "red")
        },
    ))
}

fn trend_mode(view: &mut PageView, filters: &LabFilters, table: &IndicatorTable, city: &str) {
    let cities: Vec<String> = table.rows().iter().map(|r| r.city.clone()).collect();
    view.controls(vec![
        city_control(&cities, city),
        Control::select(
            "trend_metric",
            "📊 Métrica:",
            table
                .numeric_columns()
                .into_iter()
                .map(|c| ControlOption::new(c, metric_label(c)))
                .collect(),
            &filters.trend_metric,
        ),
        horizon_control(filters),
    ]);

    let Some(current) = table.value(city, &filters.trend_metric) else {
        view.notice(Notice::warning(format!(
            "{} não disponível para {}.",
            metric_label(&filters.trend_metric),
            city
        )));
        return;
    };
    let (history, projection) = trend(current, filters.horizon_years);
    view.chart("trend", trend_chart(&filters.trend_metric, city, &history, &projection));

    let projected = projection.last().map_or(current, |(_, v)| *v);
    let growth = if current != 0.0 {
        (projected - current) / current * 100.0
    } else {
        0.0
    };
    view.metrics(vec![
        Metric::new("📊 Valor Atual", format!("{:.2}", current)),
        Metric::new("🔮 Valor Projetado", format!("{:.2}", projected)).help(format!("{:+.1}%", growth)),
        Metric::new("📈 Crescimento Médio/Ano", format!("{:.1}%", TREND_GROWTH * 100.0)),
    ]);
}

pub struct LabPage;

impl Page for LabPage {
    fn render(&self, ctx: &mut SessionContext, data: &Dataset) -> PageView {
        let mut view = PageView::new(PageId::Lab);
        let filters = &ctx.filters.lab;
        let table = data.combined().filter_cities(&ctx.selected_cities);

        view.controls(vec![Control::select(
            "mode",
            "Tipo de análise:",
            vec![
                ControlOption::new(enum_value(LabMode::Comparison), "🔍 Análise Comparativa Dinâmica"),
                ControlOption::new(enum_value(LabMode::Scenarios), "🔮 Simulador de Cenários"),
                ControlOption::new(enum_value(LabMode::Correlations), "🔥 Explorador de Correlações"),
                ControlOption::new(enum_value(LabMode::Trend), "📈 Preditor de Tendências"),
            ],
            filters.mode,
        )]);

        if table.is_empty() {
            view.notice(Notice::warning("Nenhuma cidade selecionada possui dados."));
            return view;
        }
        let city = filters
            .city
            .clone()
            .filter(|c| table.row(c).is_some())
            .or_else(|| table.rows().first().map(|r| r.city.clone()))
            .unwrap_or_default();

        match filters.mode {
            LabMode::Comparison => comparison(&mut view, filters, &table),
            LabMode::Scenarios => scenarios(&mut view, filters, &table, &city),
            LabMode::Correlations => correlations(&mut view, filters, &table),
            LabMode::Trend => trend_mode(&mut view, filters, &table, &city),
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_rules() {
        let params = scenario_parameters(Scenario::Accelerated);
        assert_eq!(params.growth_rate("faturamento_anual_milhoes"), 0.15);
        assert!((params.growth_rate("investimento_inovacao_percentual") - 1.0).abs() < 1e-12);
        assert_eq!(params.growth_rate("energia_renovavel_percentual"), 0.08);
        assert_eq!(params.growth_rate("taxa_pobreza"), 0.10);
        assert_eq!(params.growth_rate("empregos_diretos"), 0.075);
    }

    #[test]
    fn test_simulation_is_deterministic() {
        let table = Dataset::placeholder().combined();
        let params = scenario_parameters(Scenario::Moderate);
        let a = simulate(&table, "Caruaru", &params, 3).unwrap();
        let b = simulate(&table, "Caruaru", &params, 3).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
        assert_eq!(a.rows()[0].city, "2024");
        let revenue = a.value("2026", "faturamento_anual_milhoes").unwrap();
        assert!((revenue - 2200.0 * 1.05f64.powi(2)).abs() < 1e-9);
        assert!(simulate(&table, "Recife", &params, 3).is_none());
    }

    #[test]
    fn test_trend() {
        let (history, projection) = trend(100.0, 2);
        assert_eq!(history.first(), Some(&(2019, 85.0)));
        assert_eq!(history.len(), 5);
        assert_eq!(projection.len(), 3);
        assert!((projection[2].1 - 110.25).abs() < 1e-9);
    }

    #[test]
    fn test_insights() {
        let table = Dataset::placeholder().combined();
        let found = insights(&table, &["faturamento_anual_milhoes", "pib_per_capita"]);
        assert_eq!(found.len(), 2);
        assert_eq!(
            found[0],
            "📊 **Faturamento anual milhoes**: Caruaru lidera com 2,200, 37.5% superior a Toritama"
        );
    }

    #[test]
    fn test_every_mode_renders() {
        let data = Dataset::placeholder();
        for mode in [LabMode::Comparison, LabMode::Scenarios, LabMode::Correlations, LabMode::Trend] {
            let mut ctx = SessionContext::new("s");
            ctx.filters.lab.mode = mode;
            ctx.filters.lab.chart = ComparisonChart::Radar;
            let view = LabPage.render(&mut ctx, &data);
            assert!(view.sections.iter().any(|s| matches!(s, Section::Chart { .. })), "{:?}", mode);
        }
    }
}
