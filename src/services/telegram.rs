// src/services/telegram.rs

//! Telegram notifier.
//!
//! Renders a publication into a Markdown alert and delivers it via
//! the Bot API. Rendering is deterministic so a given publication
//! always produces the same message.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Publication, TelegramConfig};
use crate::services::AlertSink;
use crate::utils::url::is_http_url;

/// Header of every alert.
const MESSAGE_HEADER: &str = "\u{1F4E2} *Nuova pubblicazione*";

/// Characters that corrupt link and bold syntax in Telegram's legacy
/// Markdown when they appear unescaped inside a value.
const ESCAPED_CHARS: [char; 5] = ['(', ')', '[', ']', '*'];

/// Escape Markdown-significant characters in a scalar value.
///
/// Values recognized as URLs pass through untouched so they stay
/// clickable in the rendered message.
pub fn escape_markdown(value: &str) -> String {
    if is_http_url(value) {
        return value.to_string();
    }

    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if ESCAPED_CHARS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Render the alert text for one publication.
///
/// Layout: header, one line per scalar field in model order, then a
/// document line and a numbered attachments line, each with an
/// explicit marker when empty.
pub fn compose_message(publication: &Publication) -> String {
    let mut lines = vec![MESSAGE_HEADER.to_string(), String::new()];

    for (label, value) in publication.scalar_fields() {
        lines.push(format!("*{label}:* {}", escape_markdown(value)));
    }

    lines.push(String::new());
    match &publication.primary_document_url {
        Some(url) => lines.push(format!("*Documento:* [Apri]({url})")),
        None => lines.push("*Documento:* Nessun documento".to_string()),
    }

    if publication.attachment_urls.is_empty() {
        lines.push("*Allegati:* Nessun allegato".to_string());
    } else {
        let links: Vec<String> = publication
            .attachment_urls
            .iter()
            .enumerate()
            .map(|(i, url)| format!("[Apri {}]({url})", i + 1))
            .collect();
        lines.push(format!("*Allegati:* {}", links.join(" ")));
    }

    lines.join("\n")
}

/// Service for delivering alerts to a Telegram chat.
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    /// Create a new notifier sharing the given HTTP client.
    pub fn new(client: Client, config: TelegramConfig) -> Self {
        Self { client, config }
    }

    /// Deliver the alert for one publication.
    ///
    /// Failure here is reported but never undoes the registry write;
    /// the record is already durably stored.
    pub async fn notify(&self, publication: &Publication) -> Result<()> {
        let url = self.config.send_message_url();
        let payload = serde_json::json!({
            "chat_id": self.config.chat_id,
            "text": compose_message(publication),
            "parse_mode": "Markdown",
            "disable_web_page_preview": true,
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::delivery(e))?;

        response
            .error_for_status()
            .map_err(|e| AppError::delivery(e))?;

        Ok(())
    }
}

#[async_trait]
impl AlertSink for TelegramNotifier {
    async fn notify(&self, publication: &Publication) -> Result<()> {
        TelegramNotifier::notify(self, publication).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Publication {
        Publication {
            id: "102".to_string(),
            sender: "UFFICIO SEGRETERIA".to_string(),
            act_type: "Determina".to_string(),
            registry_number: "42".to_string(),
            registry_date: "01-02-2026".to_string(),
            subject: "Test (A_B) [C]".to_string(),
            publication_start: "01-02-2026".to_string(),
            publication_end: "16-02-2026".to_string(),
            primary_document_url: Some("https://example.com/mc/a.pdf".to_string()),
            attachment_urls: vec![
                "https://example.com/mc/b.pdf".to_string(),
                "https://example.com/mc/c.pdf".to_string(),
            ],
        }
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("Test (A_B) [C]"), r"Test \(A_B\) \[C\]");
    }

    #[test]
    fn test_urls_skip_escaping() {
        assert_eq!(
            escape_markdown("http://example.com/(x)"),
            "http://example.com/(x)"
        );
    }

    #[test]
    fn test_compose_message_scalar_lines_in_order() {
        let message = compose_message(&sample());
        let lines: Vec<&str> = message.lines().collect();
        assert_eq!(lines[0], "\u{1F4E2} *Nuova pubblicazione*");
        assert_eq!(lines[2], "*Numero pubblicazione:* 102");
        assert_eq!(lines[7], r"*Oggetto atto:* Test \(A_B\) \[C\]");
        // Link-bearing fields never appear in the scalar loop.
        assert!(!lines[2..10].iter().any(|l| l.contains("a.pdf")));
    }

    #[test]
    fn test_compose_message_document_and_attachments() {
        let message = compose_message(&sample());
        assert!(message.contains("*Documento:* [Apri](https://example.com/mc/a.pdf)"));
        assert!(message.contains(
            "*Allegati:* [Apri 1](https://example.com/mc/b.pdf) [Apri 2](https://example.com/mc/c.pdf)"
        ));
    }

    #[test]
    fn test_compose_message_empty_markers() {
        let mut publication = sample();
        publication.primary_document_url = None;
        publication.attachment_urls.clear();
        let message = compose_message(&publication);
        assert!(message.contains("*Documento:* Nessun documento"));
        assert!(message.contains("*Allegati:* Nessun allegato"));
    }

    #[test]
    fn test_compose_message_is_deterministic() {
        assert_eq!(compose_message(&sample()), compose_message(&sample()));
    }
}
