//! Agreste Textile Ecosystem Dashboard
//!
//! Server-side implementation of a monitoring dashboard for the textile
//! clothing cluster of the Agreste region of Pernambuco: economic, social,
//! environmental and innovation indicators, an interactive actor network,
//! a geographic view, a risk matrix, an opportunity portfolio and an
//! analysis laboratory.
//!
//! # Architecture
//!
//! - [`graph`]: ontology model (actors, relationships, clusters) loaded from JSON
//! - [`viz`]: plotly-compatible figures, including the network renderer
//! - [`data`]: indicator tables, the risk register and the opportunity portfolio
//! - [`pages`]: one [`pages::Page`] per dashboard page, rendering a [`pages::PageView`]
//! - [`session`]: per-browser session state and filter records
//! - [`comments`] and [`analytics`]: best-effort side services
//! - [`http`]: the axum server hosting the API and the embedded UI
//!
//! ## Example Usage
//!
//! ```rust
//! use agreste::config::DashboardConfig;
//! use agreste::data::Dataset;
//! use agreste::pages::{PageId, PageRegistry};
//! use agreste::session::SessionContext;
//!
//! let registry = PageRegistry::new(&DashboardConfig::default());
//! let mut ctx = SessionContext::new("demo");
//!
//! let view = registry.render(PageId::Risks, &mut ctx, &Dataset::placeholder()).unwrap();
//! assert_eq!(view.page, PageId::Risks);
//! assert_eq!(ctx.page_views.get("risks"), Some(&1));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod analytics;
pub mod auth;
pub mod best_effort;
pub mod comments;
pub mod config;
pub mod data;
pub mod feedback;
pub mod graph;
pub mod http;
pub mod notice;
pub mod pages;
pub mod remote;
pub mod session;
pub mod viz;

// Re-export main types for convenience
pub use config::{ConfigError, DashboardConfig};
pub use data::Dataset;
pub use graph::{ActorId, ActorNode, OntologyError, OntologyGraph, OntologyResult};
pub use notice::Notice;
pub use pages::{PageId, PageRegistry, PageView};
pub use session::{SessionContext, SessionStore};
pub use viz::{Figure, NetworkOptions, NetworkRenderer};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
