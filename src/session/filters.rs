//! Per-page filter records
//!
//! Each record deserializes with defaults for absent fields, so a client may
//! send only the fields it shows.

use crate::data::{Domain, RiskPriority};
use crate::viz::NetworkOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorFilters {
    pub domain: Domain,
    /// Indicators to compare; empty means the domain's default set
    pub metrics: Vec<String>,
    /// Rescale compared indicators to 0..=100
    pub normalize: bool,
    pub show_correlation: bool,
    /// Quadrant axes, indicator column names
    pub x_metric: String,
    pub y_metric: String,
}

impl Default for IndicatorFilters {
    fn default() -> Self {
        Self {
            domain: Domain::Economic,
            metrics: Vec::new(),
            normalize: false,
            show_correlation: true,
            x_metric: "pib_per_capita".to_string(),
            y_metric: "idh".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkFilters {
    #[serde(flatten)]
    pub options: NetworkOptions,
    /// Actor name search
    pub search: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskFilters {
    /// Empty keeps every category
    pub categories: Vec<String>,
    /// Empty keeps every priority
    pub priorities: Vec<RiskPriority>,
    pub min_value: u8,
}

impl Default for RiskFilters {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            priorities: Vec::new(),
            min_value: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpportunityFilters {
    pub categories: Vec<String>,
    pub cities: Vec<String>,
    pub horizons: Vec<String>,
    pub min_priority: u8,
    /// Opportunity shown in the stakeholder panel; defaults to the top one
    pub selected: Option<String>,
}

impl Default for OpportunityFilters {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            cities: Vec::new(),
            horizons: Vec::new(),
            min_priority: 10,
            selected: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeographyFilters {
    pub size_metric: String,
    pub color_metric: String,
    /// Ranking dimension label
    pub ranking: String,
}

impl Default for GeographyFilters {
    fn default() -> Self {
        Self {
            size_metric: "faturamento_anual_milhoes".to_string(),
            color_metric: "taxa_informalidade".to_string(),
            ranking: "Econômica".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabMode {
    #[default]
    Comparison,
    Scenarios,
    Correlations,
    Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonChart {
    #[default]
    Bar,
    Radar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Accelerated,
    #[default]
    Moderate,
    Conservative,
    Crisis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabFilters {
    pub mode: LabMode,
    /// Comparison dimension label
    pub dimension: String,
    pub chart: ComparisonChart,
    pub scenario: Scenario,
    /// Base city for scenarios and trends; the first selected city when unset
    pub city: Option<String>,
    pub horizon_years: u32,
    pub correlation_threshold: f64,
    pub trend_metric: String,
}

impl Default for LabFilters {
    fn default() -> Self {
        Self {
            mode: LabMode::Comparison,
            dimension: "Econômica".to_string(),
            chart: ComparisonChart::Bar,
            scenario: Scenario::Moderate,
            city: None,
            horizon_years: 5,
            correlation_threshold: 0.3,
            trend_metric: "faturamento_anual_milhoes".to_string(),
        }
    }
}

/// Filter records of every page that has filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFilters {
    pub indicators: IndicatorFilters,
    pub network: NetworkFilters,
    pub risks: RiskFilters,
    pub opportunities: OpportunityFilters,
    pub geography: GeographyFilters,
    pub lab: LabFilters,
}

#[cfg(test)]
mod tests {
    use super::*;
    use agreste_layout::LayoutAlgorithm;
    use serde_json::json;

    #[test]
    fn test_partial_records_keep_defaults() {
        let risks: RiskFilters = serde_json::from_value(json!({"priorities": ["Crítica"]})).unwrap();
        assert_eq!(risks.priorities, vec![RiskPriority::Critical]);
        assert_eq!(risks.min_value, 5);

        let network: NetworkFilters =
            serde_json::from_value(json!({"layout": "spring", "cluster": "c1", "search": "ana"})).unwrap();
        assert_eq!(network.options.layout, LayoutAlgorithm::Spring);
        assert_eq!(network.options.color_by, "main_city");
        assert_eq!(network.options.cluster.as_deref(), Some("c1"));
        assert_eq!(network.search, "ana");
    }

    #[test]
    fn test_lab_defaults() {
        let lab: LabFilters = serde_json::from_value(json!({"mode": "scenarios"})).unwrap();
        assert_eq!(lab.mode, LabMode::Scenarios);
        assert_eq!(lab.scenario, Scenario::Moderate);
        assert_eq!(lab.horizon_years, 5);
    }
}
