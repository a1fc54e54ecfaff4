// src/storage/mod.rs

//! Registry of previously seen publications.
//!
//! The registry is the only state surviving across cycles. The
//! analytics dashboard reads the same table, which is why `load_all`
//! exists even though the watcher itself never calls it.

pub mod sqlite;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Publication;

pub use sqlite::SqliteRegistry;

/// Trait for registry backends.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Whether a publication with this id has already been stored.
    async fn exists(&self, id: &str) -> Result<bool>;

    /// Store a publication unless its id is already present.
    ///
    /// Returns `false` when the row already existed; a concurrent
    /// insert of the same id is a no-op, not an error.
    async fn insert_if_absent(&self, publication: &Publication) -> Result<bool>;

    /// Read every stored publication.
    async fn load_all(&self) -> Result<Vec<Publication>>;
}
