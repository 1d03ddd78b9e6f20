//! Built-in placeholder tables for the three default cities

use super::indicators::{Domain, IndicatorTable, DEFAULT_CITIES};

type Column = (&'static str, [f64; 3]);

const ECONOMIC: [Column; 8] = [
    ("populacao", [107500.0, 365000.0, 44000.0]),
    ("empresas_formais", [1200.0, 2500.0, 450.0]),
    ("empresas_informais", [4800.0, 7500.0, 1550.0]),
    ("taxa_informalidade", [39.8, 23.9, 57.3]),
    ("empregos_diretos", [45000.0, 85000.0, 25000.0]),
    ("faturamento_anual_milhoes", [1800.0, 2200.0, 1600.0]),
    ("exportacao_percentual", [5.0, 8.0, 3.0]),
    ("pib_per_capita", [12500.0, 18700.0, 14300.0]),
];

const SOCIAL: [Column; 8] = [
    ("idh", [0.648, 0.677, 0.618]),
    ("taxa_pobreza", [28.5, 22.1, 35.2]),
    ("taxa_extrema_pobreza", [12.3, 8.7, 15.8]),
    ("evasao_escolar", [32.5, 24.8, 38.7]),
    ("trabalho_infantil", [18.7, 12.5, 24.3]),
    ("acesso_internet", [65.3, 72.8, 58.7]),
    ("mulheres_empreendedoras", [58.2, 52.4, 62.5]),
    ("jovens_empreendedores", [42.5, 38.2, 48.7]),
];

const ENVIRONMENTAL: [Column; 8] = [
    ("consumo_agua_m3_dia", [3200.0, 4500.0, 2800.0]),
    ("efluentes_tratados_percentual", [35.2, 58.7, 22.5]),
    ("residuos_solidos_ton_mes", [450.0, 780.0, 320.0]),
    ("energia_renovavel_percentual", [15.3, 22.1, 8.7]),
    ("reuso_agua_percentual", [12.5, 18.3, 8.2]),
    ("poluicao_rios_indice", [7.8, 6.2, 8.9]),
    ("lavanderias_quantidade", [25.0, 35.0, 70.0]),
    ("lavanderias_licenciadas_percentual", [45.2, 62.8, 28.6]),
];

const INNOVATION: [Column; 8] = [
    ("investimento_inovacao_percentual", [2.8, 4.2, 1.5]),
    ("empresas_com_ecommerce", [18.5, 27.3, 12.4]),
    ("adocao_tecnologias_digitais", [35.2, 48.6, 28.7]),
    ("marcas_proprias_percentual", [22.4, 35.8, 18.2]),
    ("design_proprio_percentual", [15.7, 28.4, 12.1]),
    ("capacitacao_digital_percentual", [28.5, 42.1, 19.3]),
    ("acesso_credito_inovacao", [6.2, 8.7, 4.1]),
    ("startups_relacionadas", [8.0, 28.0, 3.0]),
];

/// Placeholder table used when a domain's file is missing
pub fn placeholder_table(domain: Domain) -> IndicatorTable {
    let columns: &[Column] = match domain {
        Domain::Economic => &ECONOMIC,
        Domain::Social => &SOCIAL,
        Domain::Environmental => &ENVIRONMENTAL,
        Domain::Innovation => &INNOVATION,
    };
    let mut table = IndicatorTable::new(columns.iter().map(|(name, _)| *name));
    for (i, city) in DEFAULT_CITIES.iter().enumerate() {
        table.push_row(*city, columns.iter().map(|(_, values)| Some(values[i])).collect());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_domain_covers_default_cities() {
        for domain in Domain::ALL {
            let table = placeholder_table(domain);
            assert_eq!(table.len(), 3);
            assert_eq!(table.columns().len(), 8);
            assert!(table.rows().iter().all(|r| r.values.iter().all(Option::is_some)));
        }
    }

    #[test]
    fn test_economic_values() {
        let table = placeholder_table(Domain::Economic);
        assert_eq!(table.value("Caruaru", "populacao"), Some(365000.0));
        assert_eq!(table.value("Toritama", "taxa_informalidade"), Some(57.3));
    }
}
