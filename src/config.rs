//! Dashboard configuration
//!
//! Read from a YAML file (`AGRESTE_CONFIG`, else `./agreste.yaml`). Every
//! section has defaults, so a missing file or a partial one is fine.
//! Secrets and deployment settings can be overridden from the environment.

use agreste_layout::LayoutAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_ENV: &str = "AGRESTE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "agreste.yaml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// HTTP listener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 8501,
        }
    }
}

/// Input file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub datasets_dir: PathBuf,
    pub ontology_file: String,
    /// Key the ontology is nested under, if any
    pub ontology_root_key: Option<String>,
    pub methodology_file: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            datasets_dir: PathBuf::from("static/datasets"),
            ontology_file: "ontologia_ecossistema_textil_ptbr.json".to_string(),
            ontology_root_key: Some("textile_ecosystem_network_ontology".to_string()),
            methodology_file: PathBuf::from("static/methodology/aim/board_aim_framework-fluid-version.html"),
        }
    }
}

impl DataConfig {
    pub fn ontology_path(&self) -> PathBuf {
        self.datasets_dir.join(&self.ontology_file)
    }
}

/// Network page defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Actor shown in the detail panel when nothing is selected
    pub fallback_node: String,
    pub default_layout: LayoutAlgorithm,
    pub seed: u64,
    pub spring_iterations: usize,
    /// Preferred edge length for the spring layout
    pub spring_distance: Option<f64>,
    pub min_marker_size: f64,
    pub max_marker_size: f64,
    pub default_marker_size: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            fallback_node: "p001".to_string(),
            default_layout: LayoutAlgorithm::KamadaKawai,
            seed: 42,
            spring_iterations: 50,
            spring_distance: Some(3.0),
            min_marker_size: 10.0,
            max_marker_size: 50.0,
            default_marker_size: 20.0,
        }
    }
}

/// Remote table store (PostgREST)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl RemoteConfig {
    pub fn is_configured(&self) -> bool {
        matches!((&self.url, &self.api_key), (Some(u), Some(k)) if !u.is_empty() && !k.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentBackend {
    #[default]
    Remote,
    Memory,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    pub backend: CommentBackend,
    /// Tag stored with every comment
    pub project: String,
    pub table: String,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            backend: CommentBackend::Remote,
            project: "st-textile-pe".to_string(),
            table: "comments".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub enabled: bool,
    pub directory: PathBuf,
    /// Remote mirror table; `None` keeps events local
    pub table: Option<String>,
    pub source: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: PathBuf::from("analytics"),
            table: Some("analytics".to_string()),
            source: "st-textile-pe".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Reject anonymous API calls
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub whatsapp_number: String,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            whatsapp_number: "5581999999999".to_string(),
        }
    }
}

/// Idle session expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sessions untouched for this long are dropped
    pub idle_minutes: u64,
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_minutes: 60,
            sweep_interval_secs: 300,
        }
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_minutes * 60)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Deployment environment tag (`dev`, `prod`, ...)
    pub env: String,
    pub server: ServerConfig,
    pub data: DataConfig,
    pub network: NetworkConfig,
    pub remote: RemoteConfig,
    pub comments: CommentsConfig,
    pub analytics: AnalyticsConfig,
    pub auth: AuthConfig,
    pub feedback: FeedbackConfig,
    pub session: SessionConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            env: "dev".to_string(),
            server: ServerConfig::default(),
            data: DataConfig::default(),
            network: NetworkConfig::default(),
            remote: RemoteConfig::default(),
            comments: CommentsConfig::default(),
            analytics: AnalyticsConfig::default(),
            auth: AuthConfig::default(),
            feedback: FeedbackConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let config: DashboardConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load a file; a missing file yields defaults
    pub fn load_file(path: &Path) -> ConfigResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                info!(path = %path.display(), "Loaded configuration");
                Self::from_yaml(&content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load from the default location, apply environment overrides and
    /// validate
    pub fn load() -> ConfigResult<Self> {
        let path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = Self::load_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `SUPABASE_URL`, `SUPABASE_KEY`, `AGRESTE_ENV` and `PORT`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SUPABASE_URL") {
            self.remote.url = Some(url);
        }
        if let Some(key) = lookup("SUPABASE_KEY") {
            self.remote.api_key = Some(key);
        }
        if let Some(env) = lookup("AGRESTE_ENV") {
            self.env = env;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let network = &self.network;
        if network.min_marker_size > network.max_marker_size {
            return Err(ConfigError::Invalid(format!(
                "marker size range is inverted ({} > {})",
                network.min_marker_size, network.max_marker_size
            )));
        }
        if self.comments.project.trim().is_empty() {
            return Err(ConfigError::Invalid("comments.project must not be empty".to_string()));
        }
        if self.session.sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid("session.sweep_interval_secs must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = DashboardConfig::from_yaml(
            r#"
network:
  fallback_node: p010
  default_layout: spring
comments:
  backend: memory
"#,
        )
        .unwrap();
        assert_eq!(config.network.fallback_node, "p010");
        assert_eq!(config.network.default_layout, LayoutAlgorithm::Spring);
        assert_eq!(config.network.seed, 42);
        assert_eq!(config.comments.backend, CommentBackend::Memory);
        assert_eq!(config.comments.project, "st-textile-pe");
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.session.idle_timeout(), Duration::from_secs(3600));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = DashboardConfig::load_file(Path::new("/nonexistent/agreste.yaml")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "env: prod\nauth:\n  required: true").unwrap();
        let config = DashboardConfig::load_file(file.path()).unwrap();
        assert_eq!(config.env, "prod");
        assert!(config.auth.required);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SUPABASE_URL", "https://db.example.org"),
            ("SUPABASE_KEY", "secret"),
            ("PORT", "9000"),
            ("AGRESTE_ENV", "prod"),
        ]
        .into_iter()
        .collect();
        let mut config = DashboardConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert!(config.remote.is_configured());
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.env, "prod");
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let mut config = DashboardConfig::default();
        config.network.min_marker_size = 60.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = DashboardConfig::default();
        config.comments.project = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
