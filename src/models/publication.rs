//! Publication data structure.

use serde::{Deserialize, Serialize};

/// Sentinel stored for a scalar field the detail page did not expose.
pub const MISSING_FIELD: &str = "N/A";

/// One record on the public notice board.
///
/// Created by the detail extractor and passed unchanged through the
/// novelty check, persistence, and notification. The board never
/// revises historical records, so there is no update path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Publication {
    /// Publication number assigned by the board; the natural key
    pub id: String,

    /// Issuing office (mittente)
    pub sender: String,

    /// Category of the administrative act (tipo atto)
    pub act_type: String,

    /// Internal registration number of the issuing body (registro generale)
    pub registry_number: String,

    /// Internal registration date (data registro generale)
    pub registry_date: String,

    /// Free-text description of the act (oggetto atto)
    pub subject: String,

    /// First day of the publication window
    pub publication_start: String,

    /// Last day of the publication window
    pub publication_end: String,

    /// Link to the main document, when the page exposes one
    pub primary_document_url: Option<String>,

    /// Supplementary links, in the order they appear on the page
    pub attachment_urls: Vec<String>,
}

impl Publication {
    /// Scalar fields in the fixed order used for message rendering.
    ///
    /// The link-bearing fields are excluded; they get dedicated lines
    /// in the rendered alert. Order is stable across runs.
    pub fn scalar_fields(&self) -> [(&'static str, &str); 8] {
        [
            ("Numero pubblicazione", &self.id),
            ("Mittente", &self.sender),
            ("Tipo atto", &self.act_type),
            ("Registro generale", &self.registry_number),
            ("Data registro generale", &self.registry_date),
            ("Oggetto atto", &self.subject),
            ("Data inizio pubblicazione", &self.publication_start),
            ("Data fine pubblicazione", &self.publication_end),
        ]
    }
}

/// Sort publications into ascending id order.
///
/// When every id in the batch parses as an integer the sort is
/// numeric, so alerts for "101" precede "102" rather than following
/// table-scrape order. A batch with any non-numeric id falls back to
/// lexical order as a whole, keeping the result deterministic.
pub fn sort_by_id(publications: &mut [Publication]) {
    let all_numeric = publications
        .iter()
        .all(|p| p.id.parse::<u64>().is_ok());

    if all_numeric {
        publications.sort_by_key(|p| p.id.parse::<u64>().ok());
    } else {
        publications.sort_by(|a, b| a.id.cmp(&b.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str) -> Publication {
        Publication {
            id: id.to_string(),
            sender: "UFFICIO SEGRETERIA".to_string(),
            act_type: "Determina".to_string(),
            registry_number: "42".to_string(),
            registry_date: "01-02-2026".to_string(),
            subject: "Avviso pubblico".to_string(),
            publication_start: "01-02-2026".to_string(),
            publication_end: "16-02-2026".to_string(),
            primary_document_url: None,
            attachment_urls: Vec::new(),
        }
    }

    #[test]
    fn test_scalar_field_order_is_stable() {
        let publication = sample("100");
        let labels: Vec<&str> = publication
            .scalar_fields()
            .iter()
            .map(|(label, _)| *label)
            .collect();
        assert_eq!(labels[0], "Numero pubblicazione");
        assert_eq!(labels[5], "Oggetto atto");
        assert_eq!(labels.len(), 8);
    }

    #[test]
    fn test_sort_numeric_ids() {
        let mut batch = vec![sample("103"), sample("101"), sample("102")];
        sort_by_id(&mut batch);
        let ids: Vec<&str> = batch.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["101", "102", "103"]);
    }

    #[test]
    fn test_sort_numeric_is_not_lexical() {
        let mut batch = vec![sample("9"), sample("10"), sample("100")];
        sort_by_id(&mut batch);
        let ids: Vec<&str> = batch.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["9", "10", "100"]);
    }

    #[test]
    fn test_sort_falls_back_to_lexical() {
        let mut batch = vec![sample("10"), sample("2026/B"), sample("2026/A")];
        sort_by_id(&mut batch);
        let ids: Vec<&str> = batch.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["10", "2026/A", "2026/B"]);
    }
}
