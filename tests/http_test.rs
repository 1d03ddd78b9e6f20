use agreste::analytics::Analytics;
use agreste::comments::{CommentsService, InMemoryCommentStore};
use agreste::config::DashboardConfig;
use agreste::data::Dataset;
use agreste::http::{router, AppState, SESSION_HEADER};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(config: DashboardConfig) -> Router {
    let comments = CommentsService::new(Some(Arc::new(InMemoryCommentStore::new())), "st-textile-pe");
    let state = AppState::new(config, Dataset::placeholder()).with_services(comments, Analytics::disabled());
    router(state.shared())
}

fn app() -> Router {
    app_with(DashboardConfig::default())
}

fn request(method: &str, uri: &str, session: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let session = response
        .headers()
        .get(SESSION_HEADER)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, session, body)
}

#[tokio::test]
async fn test_status_and_pages() {
    let app = app();
    let (status, _, body) = send(&app, request("GET", "/api/status", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], agreste::version());
    assert!(body["ontology"].is_null());

    let (status, _, pages) = send(&app, request("GET", "/api/pages", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pages.as_array().unwrap().len(), 9);
    assert_eq!(pages[0]["id"], "overview");
}

#[tokio::test]
async fn test_session_id_is_minted_and_reused() {
    let app = app();
    let (status, session, view) = send(&app, request("GET", "/api/pages/risks", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["page"], "risks");
    let session = session.expect("session header");

    let (_, echoed, _) = send(&app, request("GET", "/api/pages/lab", Some(&session), None)).await;
    assert_eq!(echoed.as_deref(), Some(session.as_str()));

    let (_, _, summary) = send(&app, request("GET", "/api/session", Some(&session), None)).await;
    assert_eq!(summary["pages_visited"], 2);
    assert_eq!(summary["current_page"], "lab");
    assert_eq!(summary["display_name"], "Usuário Anônimo");
}

#[tokio::test]
async fn test_unknown_page_is_not_found() {
    let (status, _, body) = send(&app(), request("GET", "/api/pages/financeiro", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("financeiro"));
}

#[tokio::test]
async fn test_filters_shape_the_next_render() {
    let app = app();
    let sid = "filters-session";
    let (status, _, body) = send(
        &app,
        request("PUT", "/api/session/filters/risks", Some(sid), Some(json!({ "min_value": 26 }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);

    let (_, _, view) = send(&app, request("GET", "/api/pages/risks", Some(sid), None)).await;
    let notices = view["notices"].as_array().unwrap();
    assert!(notices
        .iter()
        .any(|n| n["message"] == "Nenhum risco atende aos filtros selecionados."));

    let (status, _, _) = send(
        &app,
        request("PUT", "/api/session/filters/overview", Some(sid), Some(json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(
        &app,
        request("PUT", "/api/session/filters/risks", Some(sid), Some(json!({ "min_value": "x" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, summary) = send(&app, request("POST", "/api/session/reset", Some(sid), None)).await;
    assert_eq!(summary["session_id"], sid);
}

#[tokio::test]
async fn test_node_selection() {
    let app = app();
    let (status, _, body) = send(
        &app,
        request("POST", "/api/network/select", Some("n"), Some(json!({ "node_id": "p005" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected"], "p005");

    let (_, _, body) = send(
        &app,
        request("POST", "/api/network/select", Some("n"), Some(json!({ "node_id": null }))),
    )
    .await;
    assert!(body["selected"].is_null());
}

#[tokio::test]
async fn test_comment_endpoints() {
    let app = app();
    let (status, _, _) = send(
        &app,
        request("POST", "/api/comments", Some("author-a"), Some(json!({ "location": "card_phase_1", "text": "  " }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, saved) = send(
        &app,
        request(
            "POST",
            "/api/comments",
            Some("author-a"),
            Some(json!({ "location": "card_phase_1", "text": "Boa fase" })),
        ),
    )
    .await;
    assert_eq!(saved["saved"], true);

    let (_, _, listed) = send(
        &app,
        request("GET", "/api/comments?location=card_phase_1", Some("author-a"), None),
    )
    .await;
    assert_eq!(listed["enabled"], true);
    let comment = &listed["comments"][0];
    assert_eq!(comment["text"], "Boa fase");
    assert_eq!(comment["author"], "author-a");
    assert_eq!(comment["can_delete"], true);
    let id = comment["id"].as_i64().unwrap();

    let uri = format!("/api/comments/{}", id);
    let (_, _, other) = send(&app, request("DELETE", &uri, Some("author-b"), None)).await;
    assert_eq!(other["deleted"], 0);
    let (_, _, own) = send(&app, request("DELETE", &uri, Some("author-a"), None)).await;
    assert_eq!(own["deleted"], 1);
}

#[tokio::test]
async fn test_feedback_link() {
    let app = app();
    let (status, _, link) = send(
        &app,
        request("POST", "/api/feedback", None, Some(json!({ "category": "Elogio", "text": "Ótimo painel" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(link["url"].as_str().unwrap().starts_with("https://wa.me/5581999999999?text="));
    assert!(link["message"].as_str().unwrap().starts_with("*Feedback - Elogio*"));

    let (status, _, _) = send(
        &app,
        request("POST", "/api/feedback", None, Some(json!({ "text": "" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_required_auth() {
    let mut config = DashboardConfig::default();
    config.auth.required = true;
    let app = app_with(config);

    let (status, _, body) = send(&app, request("GET", "/api/pages", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "authentication required");

    let (status, _, _) = send(&app, request("GET", "/api/status", None, None)).await;
    assert_eq!(status, StatusCode::OK);

    let signed_in = Request::builder()
        .uri("/api/session")
        .header("x-forwarded-email", "maria@example.org")
        .body(Body::empty())
        .unwrap();
    let (status, _, session) = send(&app, signed_in).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["display_name"], "maria");
    assert_eq!(session["authenticated"], true);
}

#[tokio::test]
async fn test_logout_drops_the_session() {
    let app = app();
    send(&app, request("GET", "/api/pages/overview", Some("bye"), None)).await;
    let (_, _, body) = send(&app, request("POST", "/api/auth/logout", Some("bye"), None)).await;
    assert_eq!(body["logged_out"], true);

    let (_, _, summary) = send(&app, request("GET", "/api/session", Some("bye"), None)).await;
    assert_eq!(summary["pages_visited"], 0);
}

#[tokio::test]
async fn test_index_is_served() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn test_reload_requires_signed_in_user() {
    let app = app();
    let (status, _, _) = send(&app, request("POST", "/api/admin/reload", Some("anon"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let signed_in = Request::builder()
        .method("POST")
        .uri("/api/admin/reload")
        .header("x-forwarded-email", "maria@example.org")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&app, signed_in).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reloaded"], true);
}

#[tokio::test]
async fn test_headerless_sessions_are_swept() {
    let comments = CommentsService::new(Some(Arc::new(InMemoryCommentStore::new())), "st-textile-pe");
    let state = AppState::new(DashboardConfig::default(), Dataset::placeholder())
        .with_services(comments, Analytics::disabled())
        .shared();
    let app = router(state.clone());

    for _ in 0..25 {
        send(&app, request("GET", "/api/pages/overview", None, None)).await;
    }
    assert_eq!(state.sessions.len().await, 25);

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    send(&app, request("GET", "/api/session", Some("kept"), None)).await;
    let expired = state.sessions.expire_idle(std::time::Duration::from_millis(10)).await;
    assert_eq!(expired, 25);
    assert_eq!(state.sessions.len().await, 1);
}
