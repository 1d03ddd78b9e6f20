//! Per-session dashboard state

use super::filters::PageFilters;
use super::{SessionError, SessionResult};
use crate::data::DEFAULT_CITIES;
use crate::graph::ActorId;
use crate::pages::PageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// State of one browser session, passed explicitly to every page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: String,
    /// Authenticated user, if any
    pub user_id: Option<String>,
    pub current_page: PageId,
    /// Global city filter
    pub selected_cities: Vec<String>,
    pub show_details: bool,
    pub chart_theme: String,
    /// Views per page key
    pub page_views: BTreeMap<String, u64>,
    pub session_start: DateTime<Utc>,
    /// Set once the login event has been logged
    pub logged_in: bool,
    pub filters: PageFilters,
    /// Network node picked in the figure
    pub selected_node: Option<ActorId>,
}

/// Portable subset of the context
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ExportedState {
    selected_cities: Option<Vec<String>>,
    show_details: Option<bool>,
    chart_theme: Option<String>,
    filters: Option<PageFilters>,
    selected_node: Option<ActorId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub duration_minutes: f64,
    pub pages_visited: usize,
    pub total_page_views: u64,
    pub most_visited_page: Option<String>,
    pub current_page: PageId,
}

fn default_cities() -> Vec<String> {
    DEFAULT_CITIES.iter().map(|c| c.to_string()).collect()
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self::with_filters(session_id, PageFilters::default())
    }

    /// New context starting from the given filter records
    pub fn with_filters(session_id: impl Into<String>, filters: PageFilters) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: None,
            current_page: PageId::Overview,
            selected_cities: default_cities(),
            show_details: true,
            chart_theme: "plotly".to_string(),
            page_views: BTreeMap::new(),
            session_start: Utc::now(),
            logged_in: false,
            filters,
            selected_node: None,
        }
    }

    pub fn set_page(&mut self, page: PageId) {
        self.current_page = page;
    }

    pub fn increment_page_view(&mut self, page: PageId) {
        *self.page_views.entry(page.key().to_string()).or_insert(0) += 1;
    }

    /// Replace one page's filter record. Returns whether it changed.
    pub fn update_filters(&mut self, page: PageId, value: Value) -> SessionResult<bool> {
        let filters = &mut self.filters;
        match page {
            PageId::Indicators => replace(&mut filters.indicators, value),
            PageId::Network => replace(&mut filters.network, value),
            PageId::Risks => replace(&mut filters.risks, value),
            PageId::Opportunities => replace(&mut filters.opportunities, value),
            PageId::Geography => replace(&mut filters.geography, value),
            PageId::Lab => replace(&mut filters.lab, value),
            other => Err(SessionError::NoFilters(other)),
        }
    }

    /// Global city selection; an empty selection means every city
    pub fn set_cities(&mut self, cities: Vec<String>) {
        self.selected_cities = cities;
    }

    /// Detail panel transition; `None` returns to the fallback actor
    pub fn select_node(&mut self, node: Option<ActorId>) {
        self.selected_node = node;
    }

    /// Restore `defaults` and clear the selection. Identity, counters and
    /// start time stay.
    pub fn reset(&mut self, defaults: &PageFilters) {
        self.filters = defaults.clone();
        self.selected_node = None;
        self.selected_cities = default_cities();
        self.show_details = true;
        self.chart_theme = "plotly".to_string();
    }

    pub fn export_json(&self) -> SessionResult<String> {
        let exported = ExportedState {
            selected_cities: Some(self.selected_cities.clone()),
            show_details: Some(self.show_details),
            chart_theme: Some(self.chart_theme.clone()),
            filters: Some(self.filters.clone()),
            selected_node: self.selected_node.clone(),
        };
        serde_json::to_string_pretty(&exported).map_err(SessionError::State)
    }

    /// Merge an exported state; absent parts are left as they are
    pub fn import_json(&mut self, json: &str) -> SessionResult<()> {
        let imported: ExportedState = serde_json::from_str(json).map_err(SessionError::State)?;
        if let Some(cities) = imported.selected_cities {
            self.selected_cities = cities;
        }
        if let Some(show) = imported.show_details {
            self.show_details = show;
        }
        if let Some(theme) = imported.chart_theme {
            self.chart_theme = theme;
        }
        if let Some(filters) = imported.filters {
            self.filters = filters;
        }
        if imported.selected_node.is_some() {
            self.selected_node = imported.selected_node;
        }
        Ok(())
    }

    pub fn duration_minutes(&self) -> f64 {
        (Utc::now() - self.session_start).num_seconds().max(0) as f64 / 60.0
    }

    pub fn summary(&self) -> SessionSummary {
        let most_visited_page = self
            .page_views
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(page, _)| page.clone());
        SessionSummary {
            session_id: self.session_id.clone(),
            duration_minutes: self.duration_minutes(),
            pages_visited: self.page_views.len(),
            total_page_views: self.page_views.values().sum(),
            most_visited_page,
            current_page: self.current_page,
        }
    }
}

fn replace<T>(slot: &mut T, value: Value) -> SessionResult<bool>
where
    T: serde::de::DeserializeOwned + PartialEq,
{
    let updated: T = serde_json::from_value(value).map_err(SessionError::InvalidFilters)?;
    let changed = *slot != updated;
    *slot = updated;
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_views_and_summary() {
        let mut ctx = SessionContext::new("abc");
        ctx.increment_page_view(PageId::Network);
        ctx.increment_page_view(PageId::Network);
        ctx.increment_page_view(PageId::Risks);
        let summary = ctx.summary();
        assert_eq!(summary.pages_visited, 2);
        assert_eq!(summary.total_page_views, 3);
        assert_eq!(summary.most_visited_page.as_deref(), Some("network"));
    }

    #[test]
    fn test_update_filters() {
        let mut ctx = SessionContext::new("abc");
        assert!(ctx.update_filters(PageId::Risks, json!({"min_value": 12})).unwrap());
        assert_eq!(ctx.filters.risks.min_value, 12);
        assert!(!ctx.update_filters(PageId::Risks, json!({"min_value": 12})).unwrap());
        assert!(matches!(
            ctx.update_filters(PageId::Overview, json!({})),
            Err(SessionError::NoFilters(PageId::Overview))
        ));
        assert!(matches!(
            ctx.update_filters(PageId::Risks, json!({"min_value": "high"})),
            Err(SessionError::InvalidFilters(_))
        ));
    }

    #[test]
    fn test_reset_keeps_identity() {
        let mut ctx = SessionContext::new("abc");
        ctx.user_id = Some("ana@example.org".to_string());
        ctx.increment_page_view(PageId::Lab);
        ctx.select_node(Some(ActorId::new("p002")));
        ctx.set_cities(vec!["Caruaru".to_string()]);
        ctx.filters.lab.horizon_years = 10;

        ctx.reset(&PageFilters::default());
        assert_eq!(ctx.selected_node, None);
        assert_eq!(ctx.filters, PageFilters::default());
        assert_eq!(ctx.selected_cities.len(), 3);
        assert_eq!(ctx.user_id.as_deref(), Some("ana@example.org"));
        assert_eq!(ctx.page_views.get("lab"), Some(&1));
    }

    #[test]
    fn test_export_import() {
        let mut source = SessionContext::new("a");
        source.filters.risks.min_value = 20;
        source.set_cities(vec!["Toritama".to_string()]);
        let exported = source.export_json().unwrap();

        let mut target = SessionContext::new("b");
        target.import_json(&exported).unwrap();
        assert_eq!(target.session_id, "b");
        assert_eq!(target.filters.risks.min_value, 20);
        assert_eq!(target.selected_cities, vec!["Toritama".to_string()]);

        target.import_json(r#"{"chart_theme": "seaborn"}"#).unwrap();
        assert_eq!(target.chart_theme, "seaborn");
        assert_eq!(target.filters.risks.min_value, 20);
        assert!(target.import_json("not json").is_err());
    }
}
