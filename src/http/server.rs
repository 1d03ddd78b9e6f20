//! HTTP server for the dashboard

use super::handler::{
    cities_handler, comments_list_handler, comments_save_handler, comment_delete_handler, export_handler,
    feedback_handler, filters_handler, identify, import_handler, logout_handler, page_handler, pages_handler,
    reload_handler, reset_handler, select_node_handler, session_handler, status_handler,
};
use super::SharedState;
use axum::{
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use rust_embed::RustEmbed;
use tower_http::cors::CorsLayer;
use tracing::info;

#[derive(RustEmbed)]
#[folder = "src/http/static/"]
struct Assets;

async fn static_handler() -> Response {
    match Assets::get("index.html") {
        Some(file) => (
            [(header::CONTENT_TYPE, mime::TEXT_HTML_UTF_8.as_ref())],
            file.data.into_owned(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "index.html is not embedded").into_response(),
    }
}

/// The complete application router. Every `/api` route except status goes
/// through session identification.
pub fn router(state: SharedState) -> Router {
    let api = Router::new()
        .route("/api/pages", get(pages_handler))
        .route("/api/pages/:page", get(page_handler))
        .route("/api/session", get(session_handler))
        .route("/api/session/filters/:page", put(filters_handler))
        .route("/api/session/cities", put(cities_handler))
        .route("/api/session/reset", post(reset_handler))
        .route("/api/session/export", get(export_handler))
        .route("/api/session/import", post(import_handler))
        .route("/api/network/select", post(select_node_handler))
        .route("/api/comments", get(comments_list_handler).post(comments_save_handler))
        .route("/api/comments/:id", delete(comment_delete_handler))
        .route("/api/feedback", post(feedback_handler))
        .route("/api/admin/reload", post(reload_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), identify));

    Router::new()
        .route("/", get(static_handler))
        .route("/api/status", get(status_handler))
        .merge(api)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// HTTP server hosting the dashboard API and its UI
pub struct HttpServer {
    state: SharedState,
    address: String,
    port: u16,
}

impl HttpServer {
    pub fn new(state: SharedState) -> Self {
        let address = state.config.server.address.clone();
        let port = state.config.server.port;
        Self { state, address, port }
    }

    /// Serve until the process stops
    pub async fn start(&self) -> std::io::Result<()> {
        let app = router(self.state.clone());

        let addr = format!("{}:{}", self.address, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("Dashboard available at http://localhost:{}", self.port);

        axum::serve(listener, app).await
    }
}
