//! Client for the remote table store
//!
//! The store speaks the PostgREST dialect: one REST resource per table under
//! `/rest/v1/`, row filters as `column=eq.value` query parameters and the
//! API key in both the `apikey` and bearer headers.

use crate::config::RemoteConfig;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("remote table store is not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote store answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// An equality filter on one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    fn query_pair(&self) -> (String, String) {
        (self.column.clone(), format!("eq.{}", self.value))
    }
}

/// Table-level access to the remote store
#[derive(Debug, Clone)]
pub struct TableClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TableClient {
    pub fn new(config: &RemoteConfig) -> RemoteResult<Self> {
        let (Some(url), Some(api_key)) = (config.url.as_deref(), config.api_key.as_deref()) else {
            return Err(RemoteError::NotConfigured);
        };
        if url.trim().is_empty() || api_key.trim().is_empty() {
            return Err(RemoteError::NotConfigured);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)))
            .build()?;
        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn check(response: reqwest::Response) -> RemoteResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Insert one row
    pub async fn insert<T: Serialize + ?Sized>(&self, table: &str, row: &T) -> RemoteResult<()> {
        let request = self
            .authorized(self.client.post(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .json(row);
        Self::check(request.send().await?).await?;
        debug!(table, "Inserted remote row");
        Ok(())
    }

    /// Rows matching every filter, optionally ordered (`column.desc`)
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&str>,
    ) -> RemoteResult<Vec<T>> {
        let mut query: Vec<(String, String)> = vec![("select".to_string(), "*".to_string())];
        query.extend(filters.iter().map(Filter::query_pair));
        if let Some(order) = order {
            query.push(("order".to_string(), order.to_string()));
        }
        let request = self.authorized(self.client.get(self.table_url(table))).query(&query);
        let response = Self::check(request.send().await?).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| RemoteError::Serialization(e.to_string()))
    }

    /// Delete rows matching every filter; returns the number of rows removed
    pub async fn delete(&self, table: &str, filters: &[Filter]) -> RemoteResult<usize> {
        let query: Vec<(String, String)> = filters.iter().map(Filter::query_pair).collect();
        let request = self
            .authorized(self.client.delete(self.table_url(table)))
            .header("Prefer", "return=representation")
            .query(&query);
        let response = Self::check(request.send().await?).await?;
        let removed: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| RemoteError::Serialization(e.to_string()))?;
        debug!(table, removed = removed.len(), "Deleted remote rows");
        Ok(removed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_url_and_key() {
        assert!(matches!(
            TableClient::new(&RemoteConfig::default()),
            Err(RemoteError::NotConfigured)
        ));
        let blank = RemoteConfig {
            url: Some("https://example.supabase.co".to_string()),
            api_key: Some("  ".to_string()),
            timeout_secs: None,
        };
        assert!(matches!(TableClient::new(&blank), Err(RemoteError::NotConfigured)));
    }

    #[test]
    fn test_table_url() {
        let client = TableClient::new(&RemoteConfig {
            url: Some("https://example.supabase.co/".to_string()),
            api_key: Some("key".to_string()),
            timeout_secs: Some(2),
        })
        .unwrap();
        assert_eq!(client.table_url("comments"), "https://example.supabase.co/rest/v1/comments");
    }

    #[test]
    fn test_filter_query_pair() {
        assert_eq!(
            Filter::eq("location", "card_phase_1").query_pair(),
            ("location".to_string(), "eq.card_phase_1".to_string())
        );
    }
}
