//! Caller identity
//!
//! Authentication happens in the OAuth proxy in front of the server; it
//! forwards the signed-in user as `x-forwarded-*` headers. This module only
//! reads them.

use axum::http::HeaderMap;
use serde::Serialize;

pub const EMAIL_HEADER: &str = "x-forwarded-email";
pub const USER_HEADER: &str = "x-forwarded-user";
pub const NAME_HEADER: &str = "x-forwarded-preferred-username";
pub const PICTURE_HEADER: &str = "x-forwarded-picture";

const ANONYMOUS: &str = "Usuário Anônimo";

/// The signed-in user, when there is one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub email: Option<String>,
    pub user: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl UserInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            email: header(headers, EMAIL_HEADER),
            user: header(headers, USER_HEADER),
            name: header(headers, NAME_HEADER),
            picture: header(headers, PICTURE_HEADER),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.email.is_some() || self.user.is_some()
    }

    /// Stable identifier: email, else proxy user id
    pub fn id(&self) -> Option<&str> {
        self.email.as_deref().or(self.user.as_deref())
    }

    /// Name, else the local part of the email, else a generic label
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match self.email.as_deref().and_then(|e| e.split('@').next()) {
            Some(local) if !local.is_empty() => local.to_string(),
            _ => ANONYMOUS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_display_name_fallbacks() {
        let mut headers = HeaderMap::new();
        assert!(!UserInfo::from_headers(&headers).is_authenticated());
        assert_eq!(UserInfo::from_headers(&headers).display_name(), "Usuário Anônimo");

        headers.insert(EMAIL_HEADER, HeaderValue::from_static("maria.silva@example.org"));
        let user = UserInfo::from_headers(&headers);
        assert!(user.is_authenticated());
        assert_eq!(user.display_name(), "maria.silva");
        assert_eq!(user.id(), Some("maria.silva@example.org"));

        headers.insert(NAME_HEADER, HeaderValue::from_static("Maria Silva"));
        assert_eq!(UserInfo::from_headers(&headers).display_name(), "Maria Silva");
    }

    #[test]
    fn test_blank_headers_are_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_HEADER, HeaderValue::from_static("  "));
        assert_eq!(UserInfo::from_headers(&headers), UserInfo::default());
    }
}
