//! Usage analytics
//!
//! Events are appended as JSON lines to a daily file and, when a remote
//! table is configured, mirrored there in the background. Both sinks are
//! best effort: a failure is logged and never reaches the caller.

use crate::best_effort;
use crate::config::{AnalyticsConfig, RemoteConfig};
use crate::remote::TableClient;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Kinds of tracked interactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    AppStart,
    PageView,
    FilterApplied,
    NodeSelected,
    CommentSaved,
    CommentDeleted,
    UserLogin,
    UserLogout,
    AnalysisModeSelected,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::AppStart => "app_start",
            EventType::PageView => "page_view",
            EventType::FilterApplied => "filter_applied",
            EventType::NodeSelected => "node_selected",
            EventType::CommentSaved => "comment_saved",
            EventType::CommentDeleted => "comment_deleted",
            EventType::UserLogin => "user_login",
            EventType::UserLogout => "user_logout",
            EventType::AnalysisModeSelected => "analysis_mode_selected",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the analytics log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    pub page: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl AnalyticsEvent {
    pub fn new(session_id: impl Into<String>, event_type: EventType) -> Self {
        Self {
            session_id: session_id.into(),
            timestamp: Utc::now(),
            event_type,
            page: None,
            data: Value::Null,
        }
    }

    pub fn on_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

/// Row shape of the remote analytics table
#[derive(Debug, Clone, Serialize)]
struct RemoteEvent {
    source: String,
    env: String,
    user_id: String,
    action: String,
    page: Option<String>,
    data: Value,
    created_at: String,
}

/// Daily log file for a date: `analytics_YYYYMMDD.jsonl`
pub fn log_file_name(date: DateTime<Local>) -> String {
    format!("analytics_{}.jsonl", date.format("%Y%m%d"))
}

/// Event sink shared by every request
#[derive(Clone)]
pub struct Analytics {
    enabled: bool,
    directory: PathBuf,
    remote: Option<(TableClient, String)>,
    source: String,
    env: String,
}

impl Analytics {
    pub fn new(config: &AnalyticsConfig, remote: &RemoteConfig, env: &str) -> Self {
        let remote = match (&config.table, config.enabled) {
            (Some(table), true) => best_effort::log_failure("analytics remote mirror", TableClient::new(remote))
                .map(|client| (client, table.clone())),
            _ => None,
        };
        info!(
            enabled = config.enabled,
            directory = %config.directory.display(),
            remote = remote.is_some(),
            "Analytics configured"
        );
        Self {
            enabled: config.enabled,
            directory: config.directory.clone(),
            remote,
            source: config.source.clone(),
            env: env.to_string(),
        }
    }

    /// Sink that records nothing
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            directory: PathBuf::new(),
            remote: None,
            source: String::new(),
            env: String::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Record an event. `user_id` identifies the caller in the remote mirror.
    pub async fn track(&self, event: AnalyticsEvent, user_id: Option<&str>) {
        if !self.enabled {
            return;
        }
        debug!(event = %event.event_type, session = %event.session_id, "Analytics event");
        best_effort::log_failure("analytics file", self.append(&event).await);

        if let Some((client, table)) = &self.remote {
            let row = RemoteEvent {
                source: self.source.clone(),
                env: self.env.clone(),
                user_id: user_id.unwrap_or(&event.session_id).to_string(),
                action: event.event_type.as_str().to_string(),
                page: event.page.clone(),
                data: event.data.clone(),
                created_at: event.timestamp.to_rfc3339(),
            };
            let client = client.clone();
            let table = table.clone();
            best_effort::spawn("analytics remote mirror", async move {
                client.insert(&table, &row).await
            });
        }
    }

    async fn append(&self, event: &AnalyticsEvent) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.directory).await?;
        let path = self.directory.join(log_file_name(Local::now()));
        let mut line = serde_json::to_string(event)?;
        line.push('\n');
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}
