//! Numeric helpers shared by the indicator, geography and lab pages
//!
//! Correlations are computed pairwise over the rows where both columns are
//! present, so a gap in one indicator does not drop the whole city.

use crate::data::{Dataset, Domain, IndicatorTable};
use ndarray::Array2;

/// Pearson correlation; `None` for fewer than two points or no spread
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= f64::EPSILON || var_y <= f64::EPSILON {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Symmetric correlation matrix over `columns`; undefined cells are NaN
pub fn correlation_matrix(table: &IndicatorTable, columns: &[&str]) -> Array2<f64> {
    let data: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|c| table.column(c).unwrap_or_default())
        .collect();
    let n = columns.len();
    let mut matrix = Array2::from_elem((n, n), f64::NAN);

    for i in 0..n {
        for j in i..n {
            let (xs, ys): (Vec<f64>, Vec<f64>) = data[i]
                .iter()
                .zip(&data[j])
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .unzip();
            let r = if i == j && xs.len() >= 2 {
                pearson(&xs, &ys).map(|_| 1.0)
            } else {
                pearson(&xs, &ys)
            };
            let value = r.unwrap_or(f64::NAN);
            matrix[[i, j]] = value;
            matrix[[j, i]] = value;
        }
    }
    matrix
}

/// Matrix rows as heat-map cells, NaN as gaps
pub fn matrix_cells(matrix: &Array2<f64>) -> Vec<Vec<Option<f64>>> {
    matrix
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|v| if v.is_finite() { Some(*v) } else { None }).collect())
        .collect()
}

/// A pair of indicators and their correlation
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CorrelatedPair {
    pub first: String,
    pub second: String,
    pub correlation: f64,
}

/// Off-diagonal pairs with |r| at or above `threshold`, strongest first
pub fn strong_pairs(matrix: &Array2<f64>, columns: &[&str], threshold: f64) -> Vec<CorrelatedPair> {
    let mut pairs = Vec::new();
    for i in 0..columns.len() {
        for j in (i + 1)..columns.len() {
            let r = matrix[[i, j]];
            if r.is_finite() && r.abs() >= threshold {
                pairs.push(CorrelatedPair {
                    first: columns[i].to_string(),
                    second: columns[j].to_string(),
                    correlation: r,
                });
            }
        }
    }
    pairs.sort_by(|a, b| b.correlation.abs().total_cmp(&a.correlation.abs()));
    pairs
}

/// Rescale present values to `0..=scale`. Values are left untouched when
/// the column has no spread.
pub fn normalize_min_max(values: &[Option<f64>], scale: f64) -> Vec<Option<f64>> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let (Some(min), Some(max)) = (
        present.iter().copied().reduce(f64::min),
        present.iter().copied().reduce(f64::max),
    ) else {
        return values.to_vec();
    };
    if max <= min {
        return values.to_vec();
    }
    values
        .iter()
        .map(|v| v.map(|v| (v - min) / (max - min) * scale))
        .collect()
}

/// Copy of `table` with the given columns rescaled to 0..=100
pub fn normalize_table(table: &IndicatorTable, columns: &[&str]) -> IndicatorTable {
    let mut normalized = IndicatorTable::new(table.columns().iter().cloned());
    let scaled: Vec<(usize, Vec<Option<f64>>)> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, name)| columns.contains(&name.as_str()))
        .filter_map(|(idx, name)| Some((idx, normalize_min_max(&table.column(name)?, 100.0))))
        .collect();
    for (row_idx, row) in table.rows().iter().enumerate() {
        let mut values = row.values.clone();
        for (col_idx, column) in &scaled {
            values[*col_idx] = column[row_idx];
        }
        normalized.push_row(row.city.clone(), values);
    }
    normalized
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// `current * (1 + rate)^years`
pub fn compound_growth(current: f64, rate: f64, years: u32) -> f64 {
    current * (1.0 + rate).powi(years as i32)
}

/// Indicators of the composite development index: domain, column and
/// whether higher is better
pub const COMPOSITE_INDICATORS: [(Domain, &str, bool); 5] = [
    (Domain::Economic, "pib_per_capita", true),
    (Domain::Economic, "taxa_informalidade", false),
    (Domain::Social, "idh", true),
    (Domain::Social, "evasao_escolar", false),
    (Domain::Innovation, "investimento_inovacao_percentual", true),
];

/// A city's composite score
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CompositeScore {
    pub city: String,
    /// 0 to 100
    pub score: f64,
    pub valid_indicators: usize,
}

/// Score one value against its column; 50 when the column has no spread
fn indicator_score(column: &[f64], value: f64, higher_is_better: bool) -> f64 {
    let min = column.iter().copied().fold(f64::INFINITY, f64::min);
    let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(max > min) {
        return 50.0;
    }
    let normalized = (value - min) / (max - min) * 100.0;
    if higher_is_better {
        normalized
    } else {
        100.0 - normalized
    }
}

/// Composite development index per city, best first. Cities without any
/// of the indicators are left out.
pub fn composite_index(data: &Dataset, cities: &[String]) -> Vec<CompositeScore> {
    let mut scores: Vec<CompositeScore> = cities
        .iter()
        .filter_map(|city| {
            let mut total = 0.0;
            let mut valid = 0;
            for (domain, column, higher_is_better) in COMPOSITE_INDICATORS {
                let table = data.table(domain);
                if let Some(value) = table.value(city, column) {
                    total += indicator_score(&table.present_values(column), value, higher_is_better);
                    valid += 1;
                }
            }
            (valid > 0).then(|| CompositeScore {
                city: city.clone(),
                score: total / valid as f64,
                valid_indicators: valid,
            })
        })
        .collect();
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores
}
