//! Comment storage backends

use super::{Comment, CommentResult};
use crate::remote::{Filter, TableClient};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

/// Persistence for comments
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert(&self, comment: &Comment) -> CommentResult<()>;

    /// Comments of a project, optionally for one location, newest first
    async fn list(&self, project: &str, location: Option<&str>) -> CommentResult<Vec<Comment>>;

    /// Delete by id and author; returns rows removed
    async fn delete(&self, project: &str, id: i64, author: &str) -> CommentResult<usize>;
}

/// Comments kept in the remote table store
pub struct RemoteCommentStore {
    client: TableClient,
    table: String,
}

impl RemoteCommentStore {
    pub fn new(client: TableClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl CommentStore for RemoteCommentStore {
    async fn insert(&self, comment: &Comment) -> CommentResult<()> {
        self.client.insert(&self.table, comment).await?;
        Ok(())
    }

    async fn list(&self, project: &str, location: Option<&str>) -> CommentResult<Vec<Comment>> {
        let mut filters = vec![Filter::eq("project", project)];
        if let Some(location) = location {
            filters.push(Filter::eq("location", location));
        }
        Ok(self
            .client
            .select(&self.table, &filters, Some("created_at.desc"))
            .await?)
    }

    async fn delete(&self, project: &str, id: i64, author: &str) -> CommentResult<usize> {
        let filters = [
            Filter::eq("project", project),
            Filter::eq("id", id.to_string()),
            Filter::eq("author", author),
        ];
        Ok(self.client.delete(&self.table, &filters).await?)
    }
}

/// Process-local store, for development and tests
#[derive(Default)]
pub struct InMemoryCommentStore {
    comments: RwLock<Vec<Comment>>,
    next_id: AtomicI64,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn insert(&self, comment: &Comment) -> CommentResult<()> {
        let mut stored = comment.clone();
        stored.id = Some(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        stored.created_at = Some(Utc::now().to_rfc3339());
        self.comments.write().await.push(stored);
        Ok(())
    }

    async fn list(&self, project: &str, location: Option<&str>) -> CommentResult<Vec<Comment>> {
        let comments = self.comments.read().await;
        let mut found: Vec<Comment> = comments
            .iter()
            .filter(|c| c.project == project)
            .filter(|c| location.map_or(true, |l| c.location == l))
            .cloned()
            .collect();
        // insertion order is creation order
        found.reverse();
        Ok(found)
    }

    async fn delete(&self, project: &str, id: i64, author: &str) -> CommentResult<usize> {
        let mut comments = self.comments.write().await;
        let before = comments.len();
        comments.retain(|c| !(c.project == project && c.id == Some(id) && c.author.as_deref() == Some(author)));
        Ok(before - comments.len())
    }
}
