//! User feedback through a WhatsApp deep link

use chrono::{DateTime, Local};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CATEGORIES: [&str; 6] = ["Geral", "Bug/Erro", "Sugestão", "Dúvida", "Elogio", "Crítica"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("feedback text is empty")]
    EmptyText,

    #[error("unknown feedback category: {0}")]
    UnknownCategory(String),
}

pub type FeedbackResult<T> = Result<T, FeedbackError>;

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default = "default_category")]
    pub category: String,
    pub text: String,
}

fn default_category() -> String {
    CATEGORIES[0].to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackLink {
    pub message: String,
    pub url: String,
}

pub fn format_message(category: &str, text: &str, sent_at: DateTime<Local>) -> String {
    format!(
        "*Feedback - {}*\n\n{}\n\n_Enviado em: {}_",
        category,
        text,
        sent_at.format("%d/%m/%Y às %H:%M")
    )
}

/// Build the `wa.me` link carrying the formatted message
pub fn feedback_link(number: &str, request: &FeedbackRequest, sent_at: DateTime<Local>) -> FeedbackResult<FeedbackLink> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(FeedbackError::EmptyText);
    }
    if !CATEGORIES.contains(&request.category.as_str()) {
        return Err(FeedbackError::UnknownCategory(request.category.clone()));
    }
    let message = format_message(&request.category, text, sent_at);
    let url = format!(
        "https://wa.me/{}?text={}",
        number,
        utf8_percent_encode(&message, NON_ALPHANUMERIC)
    );
    Ok(FeedbackLink { message, url })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_message_and_link() {
        let request = FeedbackRequest {
            category: "Sugestão".to_string(),
            text: " Mapa com mais cidades ".to_string(),
        };
        let link = feedback_link("5581999999999", &request, at()).unwrap();
        assert_eq!(
            link.message,
            "*Feedback - Sugestão*\n\nMapa com mais cidades\n\n_Enviado em: 05/03/2024 às 09:30_"
        );
        assert!(link.url.starts_with("https://wa.me/5581999999999?text=%2AFeedback%20%2D%20Sugest%C3%A3o%2A%0A%0A"));
    }

    #[test]
    fn test_rejects_blank_and_unknown() {
        let blank = FeedbackRequest {
            category: "Geral".to_string(),
            text: "  ".to_string(),
        };
        assert_eq!(feedback_link("1", &blank, at()), Err(FeedbackError::EmptyText));
        let unknown = FeedbackRequest {
            category: "Spam".to_string(),
            text: "oi".to_string(),
        };
        assert!(matches!(feedback_link("1", &unknown, at()), Err(FeedbackError::UnknownCategory(_))));
    }
}
