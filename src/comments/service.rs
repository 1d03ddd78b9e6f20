//! Comment operations used by the HTTP layer

use super::store::{CommentStore, InMemoryCommentStore, RemoteCommentStore};
use super::{Comment, CommentError, CommentResult};
use crate::config::{CommentBackend, CommentsConfig, RemoteConfig};
use crate::remote::TableClient;
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

const AUTHOR_PREFIX: usize = 8;
pub const UNKNOWN_DATE: &str = "Data não disponível";
pub const ANONYMOUS_AUTHOR: &str = "Anônimo";

/// A comment prepared for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentDisplay {
    pub id: Option<i64>,
    pub author: String,
    pub date: String,
    pub text: String,
    /// The viewer wrote this comment
    pub can_delete: bool,
}

/// First eight characters of the author id
pub fn short_author(author: Option<&str>) -> String {
    match author {
        Some(a) if !a.is_empty() => a.chars().take(AUTHOR_PREFIX).collect(),
        _ => ANONYMOUS_AUTHOR.to_string(),
    }
}

/// `dd/mm/YYYY HH:MM`, or a placeholder when the timestamp is absent or
/// unreadable
pub fn format_timestamp(timestamp: Option<&str>) -> String {
    let Some(raw) = timestamp else {
        return UNKNOWN_DATE.to_string();
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d/%m/%Y %H:%M").to_string();
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|_| UNKNOWN_DATE.to_string())
}

/// Front door of the comment subsystem; a disabled service stores nothing
#[derive(Clone)]
pub struct CommentsService {
    store: Option<Arc<dyn CommentStore>>,
    project: String,
}

impl CommentsService {
    pub fn new(store: Option<Arc<dyn CommentStore>>, project: impl Into<String>) -> Self {
        Self {
            store,
            project: project.into(),
        }
    }

    /// Backend chosen by configuration. An unconfigured remote store
    /// disables comments.
    pub fn from_config(comments: &CommentsConfig, remote: &RemoteConfig) -> Self {
        let store: Option<Arc<dyn CommentStore>> = match comments.backend {
            CommentBackend::Remote => match TableClient::new(remote) {
                Ok(client) => Some(Arc::new(RemoteCommentStore::new(client, comments.table.clone()))),
                Err(e) => {
                    warn!(error = %e, "Comments disabled");
                    None
                }
            },
            CommentBackend::Memory => Some(Arc::new(InMemoryCommentStore::new())),
            CommentBackend::Disabled => None,
        };
        info!(backend = ?comments.backend, enabled = store.is_some(), "Comments configured");
        Self::new(store, comments.project.clone())
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// Save a comment. Blank text is rejected before any I/O. Returns
    /// whether it was stored.
    pub async fn save(&self, location: &str, author: &str, text: &str) -> CommentResult<bool> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CommentError::EmptyComment);
        }
        let Some(store) = &self.store else {
            return Ok(false);
        };
        store.insert(&Comment::new(&self.project, location, author, text)).await?;
        Ok(true)
    }

    /// Newest first; empty when disabled
    pub async fn list(&self, location: Option<&str>) -> CommentResult<Vec<Comment>> {
        match &self.store {
            Some(store) => store.list(&self.project, location).await,
            None => Ok(Vec::new()),
        }
    }

    /// Delete the author's own comment; 0 when it is someone else's
    pub async fn delete(&self, id: i64, author: &str) -> CommentResult<usize> {
        match &self.store {
            Some(store) => store.delete(&self.project, id, author).await,
            None => Ok(0),
        }
    }

    pub fn display(comment: &Comment, viewer: &str) -> CommentDisplay {
        CommentDisplay {
            id: comment.id,
            author: short_author(comment.author.as_deref()),
            date: format_timestamp(comment.created_at.as_deref()),
            text: comment.comment.clone(),
            can_delete: comment.author.as_deref() == Some(viewer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> CommentsService {
        CommentsService::new(Some(Arc::new(InMemoryCommentStore::new())), "st-textile-pe")
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(short_author(Some("3f2a9c1e-7b4d-4c7a")), "3f2a9c1e");
        assert_eq!(short_author(None), "Anônimo");
        assert_eq!(format_timestamp(Some("2024-03-05T14:07:00Z")), "05/03/2024 14:07");
        assert_eq!(format_timestamp(Some("2024-03-05T14:07:00.123456")), "05/03/2024 14:07");
        assert_eq!(format_timestamp(Some("ontem")), UNKNOWN_DATE);
        assert_eq!(format_timestamp(None), UNKNOWN_DATE);
    }

    #[tokio::test]
    async fn test_blank_comment_rejected() {
        let service = memory();
        assert!(matches!(
            service.save("card_phase_1", "ana", "   ").await,
            Err(CommentError::EmptyComment)
        ));
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_trims_and_lists() {
        let service = memory();
        assert!(service.save("card_phase_1", "ana", "  ótima fase  ").await.unwrap());
        let comments = service.list(Some("card_phase_1")).await.unwrap();
        assert_eq!(comments[0].comment, "ótima fase");
        assert_eq!(comments[0].project, "st-textile-pe");

        let shown = CommentsService::display(&comments[0], "ana");
        assert!(shown.can_delete);
        assert!(!CommentsService::display(&comments[0], "bia").can_delete);
    }

    #[tokio::test]
    async fn test_disabled_service() {
        let service = CommentsService::from_config(&CommentsConfig::default(), &RemoteConfig::default());
        assert!(!service.is_enabled());
        assert!(!service.save("x", "ana", "texto").await.unwrap());
        assert_eq!(service.delete(1, "ana").await.unwrap(), 0);
    }
}
