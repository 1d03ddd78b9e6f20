use agreste::analytics::{AnalyticsEvent, EventType};
use agreste::http::{AppState, HttpServer};
use agreste::{DashboardConfig, Dataset};
use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,agreste=debug")))
        .init();

    info!("Agreste Textile Dashboard v{}", agreste::version());

    let config = DashboardConfig::load().context("loading configuration")?;
    info!(env = %config.env, datasets = %config.data.datasets_dir.display(), "Configuration loaded");

    let data_config = config.data.clone();
    let data = tokio::task::spawn_blocking(move || Dataset::load(&data_config))
        .await
        .context("loading datasets")?;
    match data.ontology() {
        Some(graph) => info!(
            nodes = graph.node_count(),
            relationships = graph.relationship_count(),
            clusters = graph.cluster_count(),
            "Ontology loaded"
        ),
        None => warn!("Running without an ontology; the network page will show a notice"),
    }

    let state = AppState::new(config, data).shared();
    state
        .analytics
        .track(
            AnalyticsEvent::new("server", EventType::AppStart)
                .with_data(serde_json::json!({ "version": agreste::version() })),
            None,
        )
        .await;

    let session_config = &state.config.session;
    let _sweeper = state
        .sessions
        .spawn_sweeper(session_config.idle_timeout(), session_config.sweep_interval());

    HttpServer::new(state).start().await.context("serving HTTP")?;
    Ok(())
}
