//! HTTP handlers for the dashboard API

use super::{AppError, AppResult, SharedState, SESSION_HEADER};
use crate::analytics::{AnalyticsEvent, EventType};
use crate::auth::UserInfo;
use crate::best_effort;
use crate::comments::{CommentError, CommentsService};
use crate::data::Dataset;
use crate::feedback::{feedback_link, FeedbackLink, FeedbackRequest};
use crate::graph::ActorId;
use crate::pages::{PageDescriptor, PageId, PageView};
use crate::session::{SessionError, SessionStore, SessionSummary};
use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

const MAX_SESSION_ID_LEN: usize = 128;

/// Who is calling: browser session plus the proxy-forwarded user
#[derive(Debug, Clone)]
pub struct Caller {
    pub session_id: String,
    pub user: UserInfo,
}

impl Caller {
    /// Author id for comments: user email when signed in, else the session
    pub fn author(&self) -> &str {
        self.user.id().unwrap_or(&self.session_id)
    }
}

fn session_id_from(request: &Request) -> Option<String> {
    request
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_SESSION_ID_LEN)
        .map(str::to_string)
}

/// Resolve the caller, enforce authentication and echo the session id
pub async fn identify(State(state): State<SharedState>, mut request: Request, next: Next) -> Response {
    let user = UserInfo::from_headers(request.headers());
    if state.config.auth.required && !user.is_authenticated() {
        return AppError::Unauthorized.into_response();
    }
    let session_id = session_id_from(&request).unwrap_or_else(SessionStore::mint_id);

    if user.is_authenticated() {
        let user_id = user.id().map(str::to_string);
        let first_login = state
            .sessions
            .with_session(&session_id, |ctx| {
                let first = !ctx.logged_in;
                ctx.logged_in = true;
                ctx.user_id = user_id;
                first
            })
            .await;
        if first_login {
            info!(session = %session_id, user = %user.display_name(), "User login");
            state
                .analytics
                .track(
                    AnalyticsEvent::new(&session_id, EventType::UserLogin)
                        .with_data(json!({ "display_name": user.display_name() })),
                    user.id(),
                )
                .await;
        }
    }

    request.extensions_mut().insert(Caller {
        session_id: session_id.clone(),
        user,
    });
    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&session_id) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

async fn track(state: &SharedState, caller: &Caller, event_type: EventType, page: Option<PageId>, data: Value) {
    let mut event = AnalyticsEvent::new(&caller.session_id, event_type).with_data(data);
    if let Some(page) = page {
        event = event.on_page(page.key());
    }
    state.analytics.track(event, caller.user.id()).await;
}

/// Handler for health checks
pub async fn status_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let data = state.data.read().await;
    let ontology = data.ontology().map(|graph| {
        json!({
            "nodes": graph.node_count(),
            "relationships": graph.relationship_count(),
            "clusters": graph.cluster_count(),
            "skipped_edges": graph.report().skipped_edges.len(),
        })
    });
    Json(json!({
        "status": "healthy",
        "version": crate::version(),
        "env": state.config.env,
        "ontology": ontology,
        "loaded_at": data.loaded_at,
        "sessions": state.sessions.len().await,
        "comments_enabled": state.comments.is_enabled(),
    }))
}

pub async fn pages_handler(State(state): State<SharedState>) -> Json<Vec<PageDescriptor>> {
    Json(state.pages.descriptors())
}

/// Render a page for the caller's session
pub async fn page_handler(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(page): Path<String>,
) -> AppResult<Json<PageView>> {
    let page: PageId = page.parse()?;
    let session = state.sessions.session(&caller.session_id).await;
    let renderer = state.clone();
    let view = tokio::task::spawn_blocking(move || {
        let mut ctx = session.blocking_lock();
        let data = renderer.data.blocking_read();
        renderer.pages.render(page, &mut ctx, &data)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;
    track(&state, &caller, EventType::PageView, Some(page), Value::Null).await;
    Ok(Json(view))
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub summary: SessionSummary,
    pub display_name: String,
    pub authenticated: bool,
    pub selected_cities: Vec<String>,
    pub comments_enabled: bool,
}

pub async fn session_handler(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
) -> Json<SessionResponse> {
    let (summary, selected_cities) = state
        .sessions
        .with_session(&caller.session_id, |ctx| (ctx.summary(), ctx.selected_cities.clone()))
        .await;
    Json(SessionResponse {
        summary,
        display_name: caller.user.display_name(),
        authenticated: caller.user.is_authenticated(),
        selected_cities,
        comments_enabled: state.comments.is_enabled(),
    })
}

/// Replace one page's filter record
pub async fn filters_handler(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(page): Path<String>,
    Json(filters): Json<Value>,
) -> AppResult<Json<Value>> {
    let page: PageId = page.parse()?;
    let (changed, mode_before, mode_after) = state
        .sessions
        .with_session(&caller.session_id, |ctx| {
            let before = ctx.filters.lab.mode;
            let changed = ctx.update_filters(page, filters.clone())?;
            Ok::<_, SessionError>((changed, before, ctx.filters.lab.mode))
        })
        .await?;

    if page == PageId::Lab && mode_before != mode_after {
        track(&state, &caller, EventType::AnalysisModeSelected, Some(page), json!({ "mode": mode_after })).await;
    } else if changed {
        track(&state, &caller, EventType::FilterApplied, Some(page), filters).await;
    }
    Ok(Json(json!({ "page": page, "changed": changed })))
}

#[derive(Debug, Deserialize)]
pub struct CitiesRequest {
    pub cities: Vec<String>,
}

pub async fn cities_handler(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<CitiesRequest>,
) -> Json<Value> {
    let cities = request.cities.clone();
    let current = state
        .sessions
        .with_session(&caller.session_id, |ctx| {
            ctx.set_cities(cities);
            ctx.current_page
        })
        .await;
    track(
        &state,
        &caller,
        EventType::FilterApplied,
        Some(current),
        json!({ "cities": request.cities }),
    )
    .await;
    Json(json!({ "cities": request.cities }))
}

#[derive(Debug, Deserialize)]
pub struct SelectNodeRequest {
    #[serde(default)]
    pub node_id: Option<String>,
}

/// Detail panel transition; a null id returns to the fallback actor
pub async fn select_node_handler(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<SelectNodeRequest>,
) -> Json<Value> {
    let node = request.node_id.filter(|id| !id.trim().is_empty()).map(ActorId::new);
    let selected = node.clone();
    state
        .sessions
        .with_session(&caller.session_id, |ctx| ctx.select_node(selected))
        .await;

    if let Some(id) = &node {
        let name = {
            let data = state.data.read().await;
            data.ontology()
                .and_then(|graph| graph.node(id.as_str()))
                .map(|actor| actor.name.clone())
        };
        debug!(node = %id, "Node selected");
        track(
            &state,
            &caller,
            EventType::NodeSelected,
            Some(PageId::Network),
            json!({ "node_id": id, "node_name": name }),
        )
        .await;
    }
    Json(json!({ "selected": node }))
}

pub async fn reset_handler(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
) -> Json<SessionSummary> {
    let summary = state
        .sessions
        .with_session(&caller.session_id, |ctx| {
            ctx.reset(state.sessions.defaults());
            ctx.summary()
        })
        .await;
    Json(summary)
}

pub async fn export_handler(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
) -> AppResult<Response> {
    let exported = state
        .sessions
        .with_session(&caller.session_id, |ctx| ctx.export_json())
        .await?;
    Ok(([(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())], exported).into_response())
}

pub async fn import_handler(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    body: String,
) -> AppResult<Json<SessionSummary>> {
    let summary = state
        .sessions
        .with_session(&caller.session_id, |ctx| {
            ctx.import_json(&body)?;
            Ok::<_, SessionError>(ctx.summary())
        })
        .await?;
    Ok(Json(summary))
}

#[derive(Debug, Deserialize)]
pub struct CommentQuery {
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub location: String,
    pub text: String,
}

pub async fn comments_list_handler(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<CommentQuery>,
) -> Json<Value> {
    let comments = best_effort::log_failure("list comments", state.comments.list(query.location.as_deref()).await)
        .unwrap_or_default();
    let shown: Vec<_> = comments
        .iter()
        .map(|c| CommentsService::display(c, caller.author()))
        .collect();
    Json(json!({
        "enabled": state.comments.is_enabled(),
        "comments": shown,
    }))
}

/// Save a comment. Blank text is a client error; backend failures are
/// logged and reported as not saved.
pub async fn comments_save_handler(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<CommentRequest>,
) -> AppResult<Json<Value>> {
    let saved = match state.comments.save(&request.location, caller.author(), &request.text).await {
        Err(CommentError::EmptyComment) => return Err(CommentError::EmptyComment.into()),
        other => best_effort::log_failure("save comment", other).unwrap_or(false),
    };
    if saved {
        track(
            &state,
            &caller,
            EventType::CommentSaved,
            None,
            json!({ "location": request.location, "length": request.text.trim().chars().count() }),
        )
        .await;
    }
    Ok(Json(json!({ "saved": saved })))
}

pub async fn comment_delete_handler(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i64>,
) -> Json<Value> {
    let deleted = best_effort::log_failure("delete comment", state.comments.delete(id, caller.author()).await)
        .unwrap_or(0);
    if deleted > 0 {
        track(&state, &caller, EventType::CommentDeleted, None, json!({ "comment_id": id })).await;
    }
    Json(json!({ "deleted": deleted }))
}

pub async fn feedback_handler(
    State(state): State<SharedState>,
    Json(request): Json<FeedbackRequest>,
) -> AppResult<Json<FeedbackLink>> {
    let link = feedback_link(&state.config.feedback.whatsapp_number, &request, Local::now())?;
    Ok(Json(link))
}

/// Re-read every data file from disk. Signed-in users only.
pub async fn reload_handler(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
) -> AppResult<Json<Value>> {
    if !caller.user.is_authenticated() {
        return Err(AppError::Unauthorized);
    }
    let config = state.config.data.clone();
    let data = tokio::task::spawn_blocking(move || Dataset::load(&config))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let notices = data.notices.clone();
    let nodes = data.ontology().map(|graph| graph.node_count());
    *state.data.write().await = data;
    info!(nodes = ?nodes, notices = notices.len(), user = %caller.author(), "Datasets reloaded");
    Ok(Json(json!({ "reloaded": true, "nodes": nodes, "notices": notices })))
}

pub async fn logout_handler(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
) -> Json<Value> {
    let duration = state
        .sessions
        .remove(&caller.session_id)
        .await
        .map(|ctx| ctx.duration_minutes());
    track(
        &state,
        &caller,
        EventType::UserLogout,
        None,
        json!({ "session_duration_minutes": duration.unwrap_or(0.0) }),
    )
    .await;
    Json(json!({ "logged_out": true }))
}
