// src/storage/sqlite.rs

//! SQLite registry backend.
//!
//! One flat table keyed by the publication number. The attachment
//! list is comma-joined on write and split on read; this adapter is
//! the only place the list shape touches the flat row.

use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::error::Result;
use crate::models::Publication;
use crate::storage::Registry;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS pubblicazioni (
        numero_pubblicazione      TEXT PRIMARY KEY,
        mittente                  TEXT,
        tipo_atto                 TEXT,
        registro_generale         TEXT,
        data_registro_generale    TEXT,
        oggetto_atto              TEXT,
        data_inizio_pubblicazione TEXT,
        data_fine_pubblicazione   TEXT,
        documento_principale      TEXT,
        allegati                  TEXT
    )
";

/// SQLite-backed registry.
#[derive(Clone)]
pub struct SqliteRegistry {
    pool: SqlitePool,
}

impl SqliteRegistry {
    /// Connect to the registry, creating the table if absent.
    pub async fn connect(db_url: &str) -> Result<Self> {
        // A single connection keeps writes serialized and makes the
        // in-memory URL usable for tests.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(db_url)
            .await?;

        sqlx::query(SCHEMA).execute(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Registry for SqliteRegistry {
    async fn exists(&self, id: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM pubblicazioni WHERE numero_pubblicazione = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn insert_if_absent(&self, publication: &Publication) -> Result<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO pubblicazioni (
                numero_pubblicazione, mittente, tipo_atto,
                registro_generale, data_registro_generale, oggetto_atto,
                data_inizio_pubblicazione, data_fine_pubblicazione,
                documento_principale, allegati
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&publication.id)
        .bind(&publication.sender)
        .bind(&publication.act_type)
        .bind(&publication.registry_number)
        .bind(&publication.registry_date)
        .bind(&publication.subject)
        .bind(&publication.publication_start)
        .bind(&publication.publication_end)
        .bind(publication.primary_document_url.as_deref().unwrap_or(""))
        .bind(publication.attachment_urls.join(","))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn load_all(&self) -> Result<Vec<Publication>> {
        let rows = sqlx::query(
            "SELECT numero_pubblicazione, mittente, tipo_atto,
                    registro_generale, data_registro_generale, oggetto_atto,
                    data_inizio_pubblicazione, data_fine_pubblicazione,
                    documento_principale, allegati
             FROM pubblicazioni",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut publications = Vec::with_capacity(rows.len());
        for row in rows {
            let primary: String = row.try_get("documento_principale")?;
            let attachments: String = row.try_get("allegati")?;

            publications.push(Publication {
                id: row.try_get("numero_pubblicazione")?,
                sender: row.try_get("mittente")?,
                act_type: row.try_get("tipo_atto")?,
                registry_number: row.try_get("registro_generale")?,
                registry_date: row.try_get("data_registro_generale")?,
                subject: row.try_get("oggetto_atto")?,
                publication_start: row.try_get("data_inizio_pubblicazione")?,
                publication_end: row.try_get("data_fine_pubblicazione")?,
                primary_document_url: if primary.is_empty() {
                    None
                } else {
                    Some(primary)
                },
                attachment_urls: attachments
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            });
        }

        Ok(publications)
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
            primary_document_url: Some("https://example.com/mc/a.pdf".to_string()),
            attachment_urls: vec![
                "https://example.com/mc/b.pdf".to_string(),
                "https://example.com/mc/c.pdf".to_string(),
            ],
        }
    }

    async fn memory_registry() -> SqliteRegistry {
        SqliteRegistry::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_then_exists() {
        let registry = memory_registry().await;
        assert!(!registry.exists("100").await.unwrap());
        assert!(registry.insert_if_absent(&sample("100")).await.unwrap());
        assert!(registry.exists("100").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_a_noop() {
        let registry = memory_registry().await;
        assert!(registry.insert_if_absent(&sample("100")).await.unwrap());
        assert!(!registry.insert_if_absent(&sample("100")).await.unwrap());
        assert_eq!(registry.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_attachments_round_trip() {
        let registry = memory_registry().await;
        let publication = sample("100");
        registry.insert_if_absent(&publication).await.unwrap();

        let stored = registry.load_all().await.unwrap();
        assert_eq!(stored, vec![publication]);
    }

    #[tokio::test]
    async fn test_empty_links_round_trip_as_empty() {
        let registry = memory_registry().await;
        let mut publication = sample("100");
        publication.primary_document_url = None;
        publication.attachment_urls.clear();
        registry.insert_if_absent(&publication).await.unwrap();

        let stored = registry.load_all().await.unwrap();
        assert!(stored[0].primary_document_url.is_none());
        assert!(stored[0].attachment_urls.is_empty());
    }

    #[tokio::test]
    async fn test_on_disk_registry_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pubblicazioni.db");
        let url = format!("sqlite://{}?mode=rwc", path.display());

        {
            let registry = SqliteRegistry::connect(&url).await.unwrap();
            registry.insert_if_absent(&sample("100")).await.unwrap();
        }

        let registry = SqliteRegistry::connect(&url).await.unwrap();
        assert!(registry.exists("100").await.unwrap());
    }
}
