//! Passive, non-blocking messages shown above a page

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// A warning, also written to the log
    pub fn warning(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!("{}", message);
        Self {
            level: NoticeLevel::Warning,
            message,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        info!(notice = %message, "Page shows an error notice");
        Self {
            level: NoticeLevel::Error,
            message,
        }
    }
}
