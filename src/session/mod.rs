//! Session state
//!
//! Every browser session owns one [`SessionContext`]: current page, global
//! city filter, per-page filter records, the selected network node and page
//! view counters. Pages receive it explicitly instead of reading ambient
//! state.

pub mod context;
pub mod filters;
pub mod store;

use crate::pages::PageId;
use thiserror::Error;

pub use context::{SessionContext, SessionSummary};
pub use filters::{
    ComparisonChart, GeographyFilters, IndicatorFilters, LabFilters, LabMode, NetworkFilters, OpportunityFilters,
    PageFilters, RiskFilters, Scenario,
};
pub use store::{SessionHandle, SessionStore};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("page {0} has no filters")]
    NoFilters(PageId),

    #[error("invalid filters: {0}")]
    InvalidFilters(#[source] serde_json::Error),

    #[error("invalid session state: {0}")]
    State(#[source] serde_json::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;
