//! Dashboard pages
//!
//! Every page is a [`Page`] implementation: a pure function of the caller's
//! [`SessionContext`] and the loaded [`Dataset`] that produces a
//! [`PageView`]. The set of pages is closed ([`PageId`]) and registered once
//! in a [`PageRegistry`].

pub mod card_demo;
pub mod geography;
pub mod indicators;
pub mod lab;
pub mod methodology;
pub mod network;
pub mod opportunities;
pub mod overview;
pub mod risks;
pub mod view;

use crate::config::DashboardConfig;
use crate::data::Dataset;
use crate::session::SessionContext;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

pub use view::{Card, Control, ControlKind, ControlOption, Metric, PageView, Section, Table};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("unknown page: {0}")]
    UnknownPage(String),
}

pub type PageResult<T> = Result<T, PageError>;

/// Identifier of a dashboard page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageId {
    #[default]
    #[serde(alias = "visao_geral")]
    Overview,
    Methodology,
    #[serde(alias = "rede_agentes")]
    Network,
    #[serde(alias = "analise_riscos")]
    Risks,
    #[serde(alias = "oportunidades")]
    Opportunities,
    #[serde(alias = "indicadores")]
    Indicators,
    #[serde(alias = "geografica")]
    Geography,
    #[serde(alias = "laboratorio")]
    Lab,
    CardDemo,
}

impl PageId {
    /// Navigation order
    pub const ALL: [PageId; 9] = [
        PageId::Overview,
        PageId::Methodology,
        PageId::Network,
        PageId::Risks,
        PageId::Opportunities,
        PageId::Indicators,
        PageId::Geography,
        PageId::Lab,
        PageId::CardDemo,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PageId::Overview => "overview",
            PageId::Methodology => "methodology",
            PageId::Network => "network",
            PageId::Risks => "risks",
            PageId::Opportunities => "opportunities",
            PageId::Indicators => "indicators",
            PageId::Geography => "geography",
            PageId::Lab => "lab",
            PageId::CardDemo => "card_demo",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PageId::Overview => "Visão Geral",
            PageId::Methodology => "Methodology",
            PageId::Network => "Rede de Agentes-chave",
            PageId::Risks => "Análise de Riscos",
            PageId::Opportunities => "Identificação de Oportunidades",
            PageId::Indicators => "Análise de Indicadores",
            PageId::Geography => "Análise Geográfica",
            PageId::Lab => "Laboratório Interativo",
            PageId::CardDemo => "Demo Cards",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PageId::Overview => "🏠",
            PageId::Methodology => "📋",
            PageId::Network => "🕸️",
            PageId::Risks => "⚠️",
            PageId::Opportunities => "💡",
            PageId::Indicators => "📊",
            PageId::Geography => "🗺️",
            PageId::Lab => "🚀",
            PageId::CardDemo => "🃏",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PageId::Overview => "Panorama geral do ecossistema têxtil",
            PageId::Methodology => "Framework AIM aplicado à pesquisa do ecossistema",
            PageId::Network => "Rede de agentes-chave e suas relações",
            PageId::Risks => "Análise de riscos da cadeia de valor",
            PageId::Opportunities => "Oportunidades priorizadas e stakeholders recomendados",
            PageId::Indicators => "Indicadores econômicos, sociais, ambientais e de inovação",
            PageId::Geography => "Distribuição territorial dos indicadores",
            PageId::Lab => "Comparações, simulações e explorações interativas",
            PageId::CardDemo => "Cartões interativos com comentários",
        }
    }

    /// Page label with icon, as shown in the navigation
    pub fn label(&self) -> String {
        format!("{} {}", self.icon(), self.title())
    }

    pub fn descriptor(&self) -> PageDescriptor {
        PageDescriptor {
            id: *self,
            title: self.title(),
            icon: self.icon(),
            description: self.description(),
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PageId {
    type Err = PageError;

    fn from_str(s: &str) -> PageResult<Self> {
        let key = s.trim().to_lowercase();
        PageId::ALL
            .into_iter()
            .find(|p| p.key() == key)
            .or(match key.as_str() {
                "visao_geral" => Some(PageId::Overview),
                "rede_agentes" => Some(PageId::Network),
                "analise_riscos" => Some(PageId::Risks),
                "oportunidades" => Some(PageId::Opportunities),
                "indicadores" => Some(PageId::Indicators),
                "geografica" => Some(PageId::Geography),
                "laboratorio" => Some(PageId::Lab),
                _ => None,
            })
            .ok_or_else(|| PageError::UnknownPage(s.to_string()))
    }
}

/// Navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    pub id: PageId,
    pub title: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

/// A dashboard page
pub trait Page: Send + Sync {
    /// Render for one session. Filter records are read from, and selection
    /// defaults written back to, `ctx`.
    fn render(&self, ctx: &mut SessionContext, data: &Dataset) -> PageView;
}

/// The closed set of pages, keyed by id
pub struct PageRegistry {
    pages: HashMap<PageId, Box<dyn Page>>,
}

impl PageRegistry {
    /// Register every page
    pub fn new(config: &DashboardConfig) -> Self {
        let mut pages: HashMap<PageId, Box<dyn Page>> = HashMap::new();
        pages.insert(PageId::Overview, Box::new(overview::OverviewPage));
        pages.insert(PageId::Methodology, Box::new(methodology::MethodologyPage));
        pages.insert(PageId::Network, Box::new(network::NetworkPage::new(&config.network)));
        pages.insert(PageId::Risks, Box::new(risks::RisksPage));
        pages.insert(PageId::Opportunities, Box::new(opportunities::OpportunitiesPage));
        pages.insert(PageId::Indicators, Box::new(indicators::IndicatorsPage));
        pages.insert(PageId::Geography, Box::new(geography::GeographyPage));
        pages.insert(PageId::Lab, Box::new(lab::LabPage));
        pages.insert(PageId::CardDemo, Box::new(card_demo::CardDemoPage));
        Self { pages }
    }

    pub fn descriptors(&self) -> Vec<PageDescriptor> {
        PageId::ALL
            .into_iter()
            .filter(|id| self.pages.contains_key(id))
            .map(|id| id.descriptor())
            .collect()
    }

    /// Make `page` current for the session, count the view and render it
    pub fn render(&self, page: PageId, ctx: &mut SessionContext, data: &Dataset) -> PageResult<PageView> {
        let handler = self
            .pages
            .get(&page)
            .ok_or_else(|| PageError::UnknownPage(page.key().to_string()))?;
        ctx.set_page(page);
        ctx.increment_page_view(page);
        debug!(page = %page, session = %ctx.session_id, "Rendering page");
        Ok(handler.render(ctx, data))
    }
}
