//! Comment threads attached to page locations
//!
//! Comments are stored per project tag and location id. The author is the
//! authenticated user's email or, for anonymous visitors, the session id;
//! only the author can delete a comment.

pub mod service;
pub mod store;

use crate::remote::RemoteError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use service::{CommentDisplay, CommentsService};
pub use store::{CommentStore, InMemoryCommentStore, RemoteCommentStore};

#[derive(Error, Debug)]
pub enum CommentError {
    #[error("comment is empty")]
    EmptyComment,

    #[error("comment store error: {0}")]
    Remote(#[from] RemoteError),
}

pub type CommentResult<T> = Result<T, CommentError>;

/// One stored comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Assigned by the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// RFC 3339 timestamp, assigned by the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub project: String,
    pub location: String,
    #[serde(default)]
    pub author: Option<String>,
    pub comment: String,
}

impl Comment {
    pub fn new(project: &str, location: &str, author: &str, text: &str) -> Self {
        Self {
            id: None,
            created_at: None,
            project: project.to_string(),
            location: location.to_string(),
            author: Some(author.to_string()),
            comment: text.to_string(),
        }
    }
}
