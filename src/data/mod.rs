//! Indicator data, built-in registers and the loaded dataset
//!
//! Indicator tables come from CSV files keyed by the `cidade` column. A
//! missing file is not fatal: the loader substitutes a placeholder table
//! for the three default cities and records a notice for the page.

pub mod format;
pub mod indicators;
pub mod loader;
pub mod opportunities;
pub mod placeholder;
pub mod risks;

pub use format::{format_currency, format_percentage, format_thousands, NumberFormat};
pub use indicators::{read_indicator_csv, CityRow, Domain, IndicatorTable, CITY_COLUMN, DEFAULT_CITIES};
pub use loader::Dataset;
pub use opportunities::{opportunity_portfolio, Opportunity};
pub use placeholder::placeholder_table;
pub use risks::{risk_register, Risk, RiskPriority};

use std::path::PathBuf;
use thiserror::Error;

/// Data loading errors
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Arquivo {} não encontrado", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{} has no `{column}` column", .path.display())]
    MissingKeyColumn { path: PathBuf, column: String },
}

impl DataError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::NotFound(_))
    }
}

pub type DataResult<T> = Result<T, DataError>;
