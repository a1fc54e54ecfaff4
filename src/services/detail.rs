// src/services/detail.rs

//! Detail page extractor.
//!
//! Turns one publication's detail page into a [`Publication`]: the
//! label/value blocks become scalar fields, the inline attachment
//! triggers become document links.

use std::collections::HashMap;

use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{MISSING_FIELD, Publication, SiteConfig};
use crate::utils::http::fetch_text;
use crate::utils::url::join;

/// Raw extraction result before it is shaped into a `Publication`.
#[derive(Debug, Default)]
struct DetailFields {
    /// Recognized label/value pairs, keyed by canonical field name
    fields: HashMap<&'static str, String>,
    /// Attachment links in encounter order, already absolute
    attachments: Vec<String>,
}

/// Service for extracting a single publication from its detail page.
pub struct DetailExtractor {
    client: Client,
    base_url: String,
    attachment_endpoint: String,
    block_sel: Selector,
    label_sel: Selector,
    value_sel: Selector,
    trigger_sel: Selector,
    window_open_re: Regex,
}

impl DetailExtractor {
    /// Create a new detail extractor sharing the given HTTP client.
    pub fn new(client: Client, site: &SiteConfig) -> Result<Self> {
        Ok(Self {
            client,
            base_url: site.base_url.clone(),
            attachment_endpoint: site.attachment_endpoint.clone(),
            block_sel: parse_selector("div.row.detail-row")?,
            label_sel: parse_selector("div.detail-label")?,
            value_sel: parse_selector("div.detail-value")?,
            trigger_sel: parse_selector("a[onclick]")?,
            window_open_re: Regex::new(r"window\.open\('([^']+)'\)")
                .map_err(|e| AppError::parse(format!("attachment pattern: {e}")))?,
        })
    }

    /// Fetch and extract one publication.
    pub async fn extract(&self, url: &str) -> Result<Publication> {
        let body = fetch_text(&self.client, url).await?;
        let fields = {
            let document = Html::parse_document(&body);
            self.parse(&document)
        };
        self.build(url, fields)
    }

    /// Scan the detail markup for label/value blocks and attachment
    /// triggers.
    fn parse(&self, document: &Html) -> DetailFields {
        let mut details = DetailFields::default();

        for block in document.select(&self.block_sel) {
            let label = match block.select(&self.label_sel).next() {
                Some(element) => element.text().collect::<String>(),
                None => continue,
            };
            let value = match block.select(&self.value_sel).next() {
                Some(element) => element.text().collect::<String>(),
                None => continue,
            };
            // Labels outside the known vocabulary are ignored so new
            // blocks on the site don't break extraction.
            if let Some(field) = canonical_field(&label) {
                details.fields.insert(field, value.trim().to_string());
            }
        }

        for anchor in document.select(&self.trigger_sel) {
            let onclick = match anchor.value().attr("onclick") {
                Some(onclick) => onclick,
                None => continue,
            };
            if !onclick.contains(&self.attachment_endpoint) {
                continue;
            }
            if let Some(captures) = self.window_open_re.captures(onclick) {
                details
                    .attachments
                    .push(join(&self.base_url, &captures[1]));
            }
        }

        details
    }

    /// Shape raw fields into a `Publication`.
    ///
    /// A page without a publication number cannot be deduplicated, so
    /// it is rejected rather than stored under a sentinel id. Every
    /// other missing scalar defaults to `"N/A"`. No attachments is a
    /// valid outcome: the primary document stays empty.
    fn build(&self, url: &str, details: DetailFields) -> Result<Publication> {
        let DetailFields {
            mut fields,
            attachments,
        } = details;

        let id = fields
            .remove("numero_pubblicazione")
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                AppError::parse(format!("detail page {url} has no publication number"))
            })?;

        let mut links = attachments.into_iter();
        let primary_document_url = links.next();

        Ok(Publication {
            id,
            sender: take(&mut fields, "mittente"),
            act_type: take(&mut fields, "tipo_atto"),
            registry_number: take(&mut fields, "registro_generale"),
            registry_date: take(&mut fields, "data_registro_generale"),
            subject: take(&mut fields, "oggetto_atto"),
            publication_start: take(&mut fields, "data_inizio_pubblicazione"),
            publication_end: take(&mut fields, "data_fine_pubblicazione"),
            primary_document_url,
            attachment_urls: links.collect(),
        })
    }
}

/// Map a detail-page label onto its canonical field name.
///
/// Matching is case-insensitive; unknown labels yield `None`.
fn canonical_field(label: &str) -> Option<&'static str> {
    match label.trim().to_lowercase().as_str() {
        "numero pubblicazione" => Some("numero_pubblicazione"),
        "mittente" => Some("mittente"),
        "tipo atto" => Some("tipo_atto"),
        "registro generale" => Some("registro_generale"),
        "data registro generale" => Some("data_registro_generale"),
        "oggetto atto" => Some("oggetto_atto"),
        "data inizio pubblicazione" => Some("data_inizio_pubblicazione"),
        "data fine pubblicazione" => Some("data_fine_pubblicazione"),
        _ => None,
    }
}

fn take(fields: &mut HashMap<&'static str, String>, key: &str) -> String {
    fields
        .remove(key)
        .unwrap_or_else(|| MISSING_FIELD.to_string())
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> DetailExtractor {
        let site = SiteConfig {
            base_url: "https://example.com/mc/".to_string(),
            ..SiteConfig::default()
        };
        DetailExtractor::new(Client::new(), &site).unwrap()
    }

    fn block(label: &str, value: &str) -> String {
        format!(
            r#"<div class="row detail-row">
                 <div class="col-md-3 detail-label">{label}</div>
                 <div class="col-md-9 detail-value">{value}</div>
               </div>"#
        )
    }

    fn trigger(path: &str) -> String {
        format!(r##"<a href="#" onclick="window.open('mc_attachment.php?f={path}')">Apri</a>"##)
    }

    fn parse_and_build(html: &str) -> Result<Publication> {
        let extractor = extractor();
        let document = Html::parse_document(html);
        let details = extractor.parse(&document);
        extractor.build("https://example.com/mc/detail.php", details)
    }

    #[test]
    fn test_attachment_split_first_is_primary() {
        let html = format!(
            "{}{}{}{}",
            block("Numero pubblicazione", "102"),
            trigger("a.pdf"),
            trigger("b.pdf"),
            trigger("c.pdf"),
        );
        let publication = parse_and_build(&html).unwrap();
        assert_eq!(
            publication.primary_document_url.as_deref(),
            Some("https://example.com/mc/mc_attachment.php?f=a.pdf")
        );
        assert_eq!(
            publication.attachment_urls,
            [
                "https://example.com/mc/mc_attachment.php?f=b.pdf",
                "https://example.com/mc/mc_attachment.php?f=c.pdf",
            ]
        );
    }

    #[test]
    fn test_no_attachments_is_not_an_error() {
        let html = block("Numero pubblicazione", "103");
        let publication = parse_and_build(&html).unwrap();
        assert!(publication.primary_document_url.is_none());
        assert!(publication.attachment_urls.is_empty());
    }

    #[test]
    fn test_labels_match_case_insensitively() {
        let html = format!(
            "{}{}",
            block("NUMERO PUBBLICAZIONE", "104"),
            block("Oggetto Atto", "Avviso"),
        );
        let publication = parse_and_build(&html).unwrap();
        assert_eq!(publication.id, "104");
        assert_eq!(publication.subject, "Avviso");
    }

    #[test]
    fn test_unknown_labels_are_ignored() {
        let html = format!(
            "{}{}",
            block("Numero pubblicazione", "105"),
            block("Campo futuro", "ignorami"),
        );
        assert!(parse_and_build(&html).is_ok());
    }

    #[test]
    fn test_missing_fields_default_to_sentinel() {
        let html = block("Numero pubblicazione", "106");
        let publication = parse_and_build(&html).unwrap();
        assert_eq!(publication.sender, MISSING_FIELD);
        assert_eq!(publication.publication_end, MISSING_FIELD);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let html = block("Mittente", "UFFICIO TRIBUTI");
        let result = parse_and_build(&html);
        assert!(matches!(result, Err(AppError::Parse(_))));
    }

    #[test]
    fn test_unrelated_onclick_is_not_an_attachment() {
        let html = format!(
            "{}{}",
            block("Numero pubblicazione", "107"),
            r##"<a href="#" onclick="window.open('mc_p_help.php')">Aiuto</a>"##,
        );
        let publication = parse_and_build(&html).unwrap();
        assert!(publication.primary_document_url.is_none());
    }
}
