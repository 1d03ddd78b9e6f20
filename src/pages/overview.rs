//! Ecosystem overview page

use super::{Control, ControlOption, Metric, Page, PageId, PageView};
use crate::data::{format_currency, format_percentage, format_thousands, Dataset, IndicatorTable};
use crate::notice::Notice;
use crate::pages::geography::geography_map;
use crate::pages::indicators::metric_label;
use crate::session::SessionContext;
use crate::viz::charts::{bar_chart, pie_chart, radar_chart, ranking_chart, NamedSeries};

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

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

/// Population, firms, revenue and jobs summed over the table
pub fn key_metrics(table: &IndicatorTable) -> Vec<Metric> {
    vec![
        Metric::new("População Total", format_thousands(table.sum("populacao"))),
        Metric::new("Total de Empresas", format_thousands(table.sum("empresas_totais"))),
        Metric::new(
            "Faturamento Anual (M)",
            format_currency(table.sum("faturamento_anual_milhoes")),
        ),
        Metric::new("Empregos Diretos", format_thousands(table.sum("empregos_diretos"))),
    ]
}

pub struct OverviewPage;

impl Page for OverviewPage {
    fn render(&self, ctx: &mut SessionContext, data: &Dataset) -> PageView {
        let mut view = PageView::new(PageId::Overview);
        view.markdown(
            "Painel de monitoramento do ecossistema têxtil do Agreste Pernambucano: indicadores econômicos, \
sociais, ambientais e de inovação dos principais polos de confecção.",
        );
        for notice in &data.notices {
            view.notice(notice.clone());
        }

        let all_cities = data.cities();
        view.controls(vec![Control::multi_select(
            "cities",
            "Cidades:",
            all_cities.iter().map(|c| ControlOption::plain(c.clone())).collect(),
            &ctx.selected_cities,
        )]);

        let table = data.combined().filter_cities(&ctx.selected_cities);
        if table.is_empty() {
            view.notice(Notice::warning("Nenhuma cidade selecionada possui dados."));
            return view;
        }
        let cities: Vec<String> = table.rows().iter().map(|r| r.city.clone()).collect();

        view.metrics(key_metrics(&table));

        let (map, _) = geography_map(&table, "faturamento_anual_milhoes", "taxa_informalidade");
        view.chart("overview_map", map);

        view.markdown("### 💰 Dimensão Econômica");
        view.chart(
            "economic_bars",
            bar_chart(
                "Empresas e Empregos por Cidade",
                &cities,
                &series(&table, &["empresas_formais", "empresas_informais", "empregos_diretos"]),
                "Cidade",
                "Quantidade",
            ),
        );
        let revenue: Vec<f64> = table
            .column("faturamento_anual_milhoes")
            .unwrap_or_default()
            .into_iter()
            .map(|v| v.unwrap_or(0.0))
            .collect();
        view.chart(
            "revenue_share",
            pie_chart("Participação no Faturamento Total", &cities, &revenue, None),
        );

        view.markdown("### 👥 Dimensão Social");
        let social_axes = ["idh", "acesso_internet", "mulheres_empreendedoras"];
        let radar: Vec<NamedSeries> = cities
            .iter()
            .map(|city| {
                let values = social_axes
                    .iter()
                    .map(|column| {
                        let v = table.value(city, column).unwrap_or(0.0);
                        if *column == "idh" {
                            v * 100.0
                        } else {
                            v
                        }
                    })
                    .collect();
                NamedSeries::new(city.clone(), values)
            })
            .collect();
        let axes: Vec<String> = social_axes.iter().map(|c| metric_label(c)).collect();
        view.chart("social_radar", radar_chart("Indicadores Sociais", &axes, &radar));
        view.chart(
            "social_challenges",
            bar_chart(
                "Desafios Sociais (%)",
                &cities,
                &series(&table, &["taxa_pobreza", "evasao_escolar", "trabalho_infantil"]),
                "Cidade",
                "Percentual",
            ),
        );

        view.markdown("### 🌱 Dimensão Ambiental e 🚀 Inovação");
        view.chart(
            "environmental_bars",
            bar_chart(
                "Água e Efluentes",
                &cities,
                &series(&table, &["consumo_agua_m3_dia", "efluentes_tratados_percentual"]),
                "Cidade",
                "Valor",
            ),
        );
        view.chart(
            "innovation_bars",
            bar_chart(
                "Inovação e Digitalização (%)",
                &cities,
                &series(
                    &table,
                    &["investimento_inovacao_percentual", "empresas_com_ecommerce", "adocao_tecnologias_digitais"],
                ),
                "Cidade",
                "Percentual",
            ),
        );

        let mut insights = Vec::new();
        if let Some(informality) = table.mean("taxa_informalidade") {
            insights.push(format!(
                "- Taxa média de informalidade: **{}**",
                format_percentage(informality)
            ));
        }
        if let Some(women) = table.mean("mulheres_empreendedoras") {
            insights.push(format!(
                "- Participação média de mulheres empreendedoras: **{}**",
                format_percentage(women)
            ));
        }
        if !insights.is_empty() {
            view.markdown(format!("### 💡 Principais Insights\n\n{}", insights.join("\n")));
        }

        let mut ranking: Vec<(String, f64)> = cities
            .iter()
            .filter_map(|c| Some((c.clone(), table.value(c, "faturamento_anual_milhoes")?)))
            .collect();
        ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
        if !ranking.is_empty() {
            let labels: Vec<String> = ranking.iter().map(|(c, _)| c.clone()).collect();
            let values: Vec<f64> = ranking.iter().map(|(_, v)| *v).collect();
            view.chart(
                "revenue_ranking",
                ranking_chart("Ranking por Faturamento", &labels, &values, "Faturamento (R$ milhões)"),
            );
            let podium: String = ranking
                .iter()
                .zip(MEDALS)
                .map(|((city, value), medal)| format!("{} **{}**: {}\n\n", medal, city, format_currency(*value)))
                .collect();
            view.markdown(podium);
        }
        view
    }
}
