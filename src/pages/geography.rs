//! Geographic analysis page

use super::{Control, ControlOption, Metric, Page, PageId, PageView, Table};
use crate::analysis::{correlation_matrix, matrix_cells};
use crate::data::{Dataset, IndicatorTable};
use crate::notice::Notice;
use crate::pages::indicators::metric_label;
use crate::session::SessionContext;
use crate::viz::charts::{city_map, heatmap, ranking_chart, MapPoint};
use crate::viz::figure::{Figure, OneOrMany};
use serde_json::json;

/// Map centre (lat, lon)
pub const MAP_CENTER: (f64, f64) = (-8.1, -36.0);
const MAP_ZOOM: f64 = 8.0;
const MIN_MARKER: f64 = 15.0;
const MAX_MARKER: f64 = 60.0;

/// Known city coordinates (lat, lon)
pub const CITY_COORDINATES: [(&str, f64, f64); 5] = [
    ("Santa Cruz do Capibaribe", -7.9557, -36.2085),
    ("Caruaru", -8.2837, -35.9761),
    ("Toritama", -8.0108, -36.0564),
    ("Surubim", -7.8312, -35.7642),
    ("Vertentes", -7.9033, -35.9789),
];

pub const SIZE_METRICS: [&str; 5] = [
    "faturamento_anual_milhoes",
    "empresas_totais",
    "empregos_diretos",
    "populacao",
    "pib_per_capita",
];

pub const COLOR_METRICS: [&str; 6] = [
    "taxa_informalidade",
    "idh",
    "taxa_pobreza",
    "acesso_internet",
    "investimento_inovacao_percentual",
    "exportacao_percentual",
];

/// Ranking dimensions and the columns averaged for each
pub const RANKING_CRITERIA: [(&str, &[&str]); 4] = [
    (
        "Econômica",
        &["faturamento_anual_milhoes", "pib_per_capita", "empresas_totais"],
    ),
    ("Social", &["idh", "acesso_internet"]),
    (
        "Ambiental",
        &["efluentes_tratados_percentual", "energia_renovavel_percentual"],
    ),
    (
        "Inovação",
        &["investimento_inovacao_percentual", "empresas_com_ecommerce"],
    ),
];

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

pub fn coordinates(city: &str) -> Option<(f64, f64)> {
    CITY_COORDINATES
        .iter()
        .find(|(name, _, _)| *name == city)
        .map(|(_, lat, lon)| (*lat, *lon))
}

/// Linear rescale into `lo..=hi`; the midpoint for gaps or a column
/// without spread
pub fn scale_between(values: &[Option<f64>], lo: f64, hi: f64) -> Vec<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let min = present.iter().copied().fold(f64::INFINITY, f64::min);
    let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mid = (lo + hi) / 2.0;
    values
        .iter()
        .map(|v| match v {
            Some(v) if max > min => lo + (v - min) / (max - min) * (hi - lo),
            _ => mid,
        })
        .collect()
}

/// Green to red ramp for `t` in 0..=1
fn ramp_color(t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    let r = (56.0 + t * (229.0 - 56.0)).round() as u8;
    let g = (161.0 + t * (62.0 - 161.0)).round() as u8;
    let b = (105.0 + t * (62.0 - 105.0)).round() as u8;
    format!("rgb({},{},{})", r, g, b)
}

fn city_points(table: &IndicatorTable, size_metric: &str, color_metric: &str) -> (Vec<MapPoint>, Vec<String>, Vec<String>) {
    let located: Vec<_> = table
        .rows()
        .iter()
        .filter_map(|row| coordinates(&row.city).map(|c| (row, c)))
        .collect();
    let missing = table
        .rows()
        .iter()
        .filter(|row| coordinates(&row.city).is_none())
        .map(|row| row.city.clone())
        .collect();

    let sizes = scale_between(
        &located.iter().map(|(row, _)| table.value(&row.city, size_metric)).collect::<Vec<_>>(),
        MIN_MARKER,
        MAX_MARKER,
    );
    let shades = scale_between(
        &located.iter().map(|(row, _)| table.value(&row.city, color_metric)).collect::<Vec<_>>(),
        0.0,
        1.0,
    );
    let fmt = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "N/A".to_string());

    let points = located
        .iter()
        .zip(&sizes)
        .map(|((row, (lat, lon)), size)| MapPoint {
            name: row.city.clone(),
            lat: *lat,
            lon: *lon,
            size: *size,
            hover: format!(
                "<b>{}</b><br>{}: {}<br>{}: {}",
                row.city,
                metric_label(size_metric),
                fmt(table.value(&row.city, size_metric)),
                metric_label(color_metric),
                fmt(table.value(&row.city, color_metric))
            ),
        })
        .collect();
    (points, shades.into_iter().map(ramp_color).collect(), missing)
}

/// Geographic map sized by one metric and shaded by another
pub fn geography_map(table: &IndicatorTable, size_metric: &str, color_metric: &str) -> (Figure, Vec<String>) {
    let (points, colors, missing) = city_points(table, size_metric, color_metric);
    let mut figure = city_map(
        &format!("{} por Cidade", metric_label(size_metric)),
        &points,
        MAP_CENTER,
        MAP_ZOOM,
    );
    if let Some(marker) = figure.data.first_mut().and_then(|t| t.marker.as_mut()) {
        marker.color = Some(OneOrMany::Many(colors));
    }
    (figure, missing)
}

/// Mean of the 0..=1 rescaled criteria per city, best first
pub fn rank_cities(table: &IndicatorTable, criteria: &[&str]) -> Vec<(String, f64)> {
    let columns: Vec<Vec<f64>> = criteria
        .iter()
        .filter_map(|c| table.column(c))
        .map(|values| scale_between(&values, 0.0, 1.0))
        .collect();
    if columns.is_empty() {
        return Vec::new();
    }
    let mut ranking: Vec<(String, f64)> = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let score = columns.iter().map(|c| c[i]).sum::<f64>() / columns.len() as f64;
            (row.city.clone(), score)
        })
        .collect();
    ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranking
}

pub struct GeographyPage;

impl Page for GeographyPage {
    fn render(&self, ctx: &mut SessionContext, data: &Dataset) -> PageView {
        let mut view = PageView::new(PageId::Geography);
        let filters = &ctx.filters.geography;
        let table = data.combined().filter_cities(&ctx.selected_cities);
        let options = |values: &[&str]| -> Vec<ControlOption> {
            values.iter().map(|v| ControlOption::new(*v, metric_label(v))).collect()
        };

        view.controls(vec![
            Control::select("size_metric", "Tamanho dos marcadores:", options(&SIZE_METRICS), &filters.size_metric),
            Control::select("color_metric", "Cor dos marcadores:", options(&COLOR_METRICS), &filters.color_metric),
            Control::select(
                "ranking",
                "Critério de ranking:",
                RANKING_CRITERIA.iter().map(|(name, _)| ControlOption::plain(*name)).collect(),
                &filters.ranking,
            ),
        ]);

        if table.is_empty() {
            view.notice(Notice::warning("Nenhuma cidade selecionada possui dados."));
            return view;
        }

        let (map, missing) = geography_map(&table, &filters.size_metric, &filters.color_metric);
        if !missing.is_empty() {
            view.notice(Notice::info(format!("Coordenadas não disponíveis para: {}", missing.join(", "))));
        }
        view.chart("city_map", map);

        view.metrics(vec![
            Metric::new("Cidades analisadas", table.len().to_string()),
            Metric::new("Área de cobertura", "Agreste Pernambucano"),
        ]);

        let criteria = RANKING_CRITERIA
            .iter()
            .find(|(name, _)| *name == filters.ranking)
            .map(|(_, columns)| *columns)
            .unwrap_or(RANKING_CRITERIA[0].1);
        let ranking = rank_cities(&table, criteria);
        if !ranking.is_empty() {
            let labels: Vec<String> = ranking.iter().map(|(c, _)| c.clone()).collect();
            let scores: Vec<f64> = ranking.iter().map(|(_, s)| *s).collect();
            view.chart(
                "city_ranking",
                ranking_chart(
                    &format!("Ranking {} das Cidades", filters.ranking),
                    &labels,
                    &scores,
                    "Score",
                ),
            );
            let podium: String = ranking
                .iter()
                .zip(MEDALS)
                .map(|((city, score), medal)| format!("{} **{}** - Score: {:.3}\n\n", medal, city, score))
                .collect();
            view.markdown(format!("### 🏆 Top Cidades\n\n{}", podium));
        }

        let columns = table.numeric_columns();
        if columns.len() >= 2 {
            let labels: Vec<String> = columns.iter().map(|c| metric_label(c)).collect();
            view.chart(
                "geography_correlation",
                heatmap(
                    "Matriz de Correlação dos Indicadores",
                    &labels,
                    &labels,
                    matrix_cells(&correlation_matrix(&table, &columns)),
                    "RdBu",
                ),
            );
        }

        let mut summary = Table::new(["Cidade", "Latitude", "Longitude", filters.size_metric.as_str(), filters.color_metric.as_str()])
            .titled("Dados Geográficos")
            .sortable();
        for row in table.rows() {
            let (lat, lon) = coordinates(&row.city).map_or((json!(null), json!(null)), |(a, b)| (json!(a), json!(b)));
            summary.push(vec![
                json!(row.city),
                lat,
                lon,
                json!(table.value(&row.city, &filters.size_metric)),
                json!(table.value(&row.city, &filters.color_metric)),
            ]);
        }
        view.table(summary);
        view
    }
}
