//! Dashboard HTTP surface
//!
//! An axum server that embeds the single-page UI and exposes the page,
//! session, comment and feedback API it talks to.

pub mod handler;
pub mod server;

use crate::analytics::Analytics;
use crate::comments::{CommentError, CommentsService};
use crate::config::DashboardConfig;
use crate::data::Dataset;
use crate::feedback::FeedbackError;
use crate::pages::{PageError, PageRegistry};
use crate::session::{PageFilters, SessionError, SessionStore};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

pub use server::{router, HttpServer};

/// Header carrying the browser session id
pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Comment(#[from] CommentError),

    #[error(transparent)]
    Feedback(#[from] FeedbackError),

    #[error("authentication required")]
    Unauthorized,

    #[error("internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Page(_) => StatusCode::NOT_FOUND,
            AppError::Session(SessionError::NoFilters(_)) => StatusCode::NOT_FOUND,
            AppError::Session(_) => StatusCode::BAD_REQUEST,
            AppError::Comment(CommentError::EmptyComment) => StatusCode::BAD_REQUEST,
            AppError::Comment(CommentError::Remote(_)) => StatusCode::BAD_GATEWAY,
            AppError::Feedback(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Everything a request handler can reach
pub struct AppState {
    pub config: DashboardConfig,
    pub data: RwLock<Dataset>,
    pub pages: PageRegistry,
    pub sessions: SessionStore,
    pub comments: CommentsService,
    pub analytics: Analytics,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Wire the subsystems from configuration around an already loaded dataset
    pub fn new(config: DashboardConfig, data: Dataset) -> Self {
        let mut defaults = PageFilters::default();
        defaults.network.options.layout = config.network.default_layout;
        Self {
            pages: PageRegistry::new(&config),
            sessions: SessionStore::with_defaults(defaults),
            comments: CommentsService::from_config(&config.comments, &config.remote),
            analytics: Analytics::new(&config.analytics, &config.remote, &config.env),
            data: RwLock::new(data),
            config,
        }
    }

    /// Replace the comment and analytics backends
    pub fn with_services(mut self, comments: CommentsService, analytics: Analytics) -> Self {
        self.comments = comments;
        self.analytics = analytics;
        self
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}
