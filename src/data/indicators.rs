//! City indicator tables
//!
//! One row per city, one numeric column per indicator. Cells that do not
//! parse as numbers are kept as gaps (`None`) so a stray text column never
//! aborts a load.

use super::{DataError, DataResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Key column of every indicator file
pub const CITY_COLUMN: &str = "cidade";

/// Cities covered when no data is available
pub const DEFAULT_CITIES: [&str; 3] = ["Santa Cruz do Capibaribe", "Caruaru", "Toritama"];

/// Indicator domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Economic,
    Social,
    Environmental,
    Innovation,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Economic,
        Domain::Social,
        Domain::Environmental,
        Domain::Innovation,
    ];

    /// Short key used in file names and analytics payloads
    pub fn key(&self) -> &'static str {
        match self {
            Domain::Economic => "economicos",
            Domain::Social => "sociais",
            Domain::Environmental => "ambientais",
            Domain::Innovation => "inovacao",
        }
    }

    pub fn file_name(&self) -> String {
        format!("indicadores_{}.csv", self.key())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Domain::Economic => "Econômicos",
            Domain::Social => "Sociais",
            Domain::Environmental => "Ambientais",
            Domain::Innovation => "Inovação",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One city's indicator values, aligned with the table's columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRow {
    pub city: String,
    pub values: Vec<Option<f64>>,
}

/// Indicator table keyed by city
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorTable {
    columns: Vec<String>,
    rows: Vec<CityRow>,
}

impl IndicatorTable {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; values are padded or truncated to the column count
    pub fn push_row(&mut self, city: impl Into<String>, mut values: Vec<Option<f64>>) {
        values.resize(self.columns.len(), None);
        self.rows.push(CityRow {
            city: city.into(),
            values,
        });
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[CityRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn row(&self, city: &str) -> Option<&CityRow> {
        self.rows.iter().find(|r| r.city == city)
    }

    /// Column values in row order
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    /// Column values with gaps dropped
    pub fn present_values(&self, name: &str) -> Vec<f64> {
        self.column(name)
            .map(|values| values.into_iter().flatten().collect())
            .unwrap_or_default()
    }

    pub fn value(&self, city: &str, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.row(city).and_then(|r| r.values[idx])
    }

    /// Columns holding at least one number
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(idx, _)| self.rows.iter().any(|r| r.values[*idx].is_some()))
            .map(|(_, name)| name.as_str())
            .collect()
    }

    /// Sorted, de-duplicated city names; the default cities when empty
    pub fn cities(&self) -> Vec<String> {
        if self.rows.is_empty() {
            return DEFAULT_CITIES.iter().map(|c| c.to_string()).collect();
        }
        self.rows
            .iter()
            .map(|r| r.city.clone())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }

    /// Rows for the selected cities; an empty selection keeps every row
    pub fn filter_cities(&self, selected: &[String]) -> IndicatorTable {
        if selected.is_empty() {
            return self.clone();
        }
        IndicatorTable {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| selected.iter().any(|c| c == &r.city))
                .cloned()
                .collect(),
        }
    }

    pub fn sum(&self, column: &str) -> f64 {
        self.present_values(column).iter().sum()
    }

    pub fn mean(&self, column: &str) -> Option<f64> {
        let values = self.present_values(column);
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }

    /// Add a computed column; the closure sees the row's current values
    pub fn with_derived<F>(mut self, name: &str, derive: F) -> Self
    where
        F: Fn(&IndicatorTable, &CityRow) -> Option<f64>,
    {
        let derived: Vec<Option<f64>> = self.rows.iter().map(|r| derive(&self, r)).collect();
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(derived) {
            row.values.push(value);
        }
        self
    }

    /// Left join on the city column. Columns already present are kept from
    /// `self`.
    pub fn left_join(&self, other: &IndicatorTable) -> IndicatorTable {
        let added: Vec<(usize, &String)> = other
            .columns
            .iter()
            .enumerate()
            .filter(|(_, name)| !self.has_column(name))
            .collect();

        let mut joined = IndicatorTable::new(
            self.columns
                .iter()
                .cloned()
                .chain(added.iter().map(|(_, name)| (*name).clone())),
        );
        for row in &self.rows {
            let matched = other.row(&row.city);
            let mut values = row.values.clone();
            values.extend(added.iter().map(|(idx, _)| matched.and_then(|m| m.values[*idx])));
            joined.push_row(row.city.clone(), values);
        }
        joined
    }

    /// Economic table plus `empresas_totais`, joined with the other domains
    pub fn combined(
        economic: &IndicatorTable,
        social: &IndicatorTable,
        environmental: &IndicatorTable,
        innovation: &IndicatorTable,
    ) -> IndicatorTable {
        let mut base = economic.clone();
        if base.has_column("empresas_formais") && base.has_column("empresas_informais") && !base.has_column("empresas_totais") {
            base = base.with_derived("empresas_totais", |table, row| {
                let formal = table.value(&row.city, "empresas_formais")?;
                let informal = table.value(&row.city, "empresas_informais")?;
                Some(formal + informal)
            });
        }
        base.left_join(social).left_join(environmental).left_join(innovation)
    }
}

/// Parse a numeric cell; accepts a decimal comma
fn parse_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .or_else(|_| trimmed.replace(',', ".").parse::<f64>())
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse CSV content with a `cidade` key column
pub fn parse_indicator_csv<R: Read>(reader: R, source: &Path) -> DataResult<IndicatorTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let key_idx = headers
        .iter()
        .position(|h| h == CITY_COLUMN)
        .ok_or_else(|| DataError::MissingKeyColumn {
            path: source.to_path_buf(),
            column: CITY_COLUMN.to_string(),
        })?;

    let value_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != key_idx)
        .map(|(idx, name)| (idx, name.to_string()))
        .collect();

    let mut table = IndicatorTable::new(value_columns.iter().map(|(_, name)| name.clone()));
    for record in csv_reader.records() {
        let record = record?;
        let city = record.get(key_idx).unwrap_or_default();
        if city.is_empty() {
            continue;
        }
        let values = value_columns
            .iter()
            .map(|(idx, _)| record.get(*idx).and_then(parse_cell))
            .collect();
        table.push_row(city, values);
    }
    debug!(path = %source.display(), rows = table.len(), columns = table.columns().len(), "Parsed indicator CSV");
    Ok(table)
}

/// Read an indicator CSV file
pub fn read_indicator_csv(path: &Path) -> DataResult<IndicatorTable> {
    let file = std::fs::File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DataError::NotFound(path.to_path_buf())
        } else {
            DataError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse_indicator_csv(file, path)
}
