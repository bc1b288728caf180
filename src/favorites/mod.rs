//! Local favorites persistence.
//!
//! This module provides `SQLite`-backed storage for the books a user marked as
//! favorites, keyed by the catalog's volume id.
//!
//! # Overview
//!
//! - [`FavoriteStore`] - Durable CRUD plus a live subscription of the full list
//! - [`FavoriteRecord`] - One favorite with its denormalized display fields
//! - [`FavoriteRepository`] - Data-access seam used by the coordinator
//! - [`StorageError`] - Typed storage failure
//!
//! # Example
//!
//! ```ignore
//! use booklib_core::{Database, FavoriteRecord, FavoriteStore};
//! use std::path::Path;
//!
//! let db = Database::new(Path::new("favorites.db")).await?;
//! let store = FavoriteStore::new(db);
//!
//! let mut feed = store.subscribe().await?;
//! store.upsert(&FavoriteRecord::new("zyTCAlFPjgYC", "Dune", None)).await?;
//! feed.changed().await?;
//! assert_eq!(feed.borrow().len(), 1);
//! ```

mod error;
mod record;
mod repository;

pub use error::{StorageError, StorageErrorKind};
pub use record::FavoriteRecord;
pub use repository::FavoriteRepository;

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, instrument, warn};

use crate::db::Database;
use crate::keyed_lock::KeyedLocks;

/// Result type for favorite store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Every column of `favorite_books`, in [`FavoriteRecord`] field order.
const RECORD_COLUMNS: &str = "id, title, thumbnail";

/// SQLite-backed favorites store.
///
/// Mutations for the same id are applied one at a time through a per-id async
/// mutex; different ids never wait on each other. Reads take no lock.
///
/// Cloning is cheap and every clone shares the pool, the per-id locks, and the
/// subscription channel.
#[derive(Debug, Clone)]
pub struct FavoriteStore {
    db: Database,
    id_locks: Arc<KeyedLocks>,
    feed: Arc<watch::Sender<Vec<FavoriteRecord>>>,
    publish_lock: Arc<Mutex<()>>,
}

impl FavoriteStore {
    /// Creates a favorites store over an open database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        let (feed, _) = watch::channel(Vec::new());
        Self {
            db,
            id_locks: Arc::new(KeyedLocks::new()),
            feed: Arc::new(feed),
            publish_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Inserts the record, replacing any existing record with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails.
    #[instrument(skip(self, record), fields(id = %record.id))]
    pub async fn upsert(&self, record: &FavoriteRecord) -> Result<()> {
        {
            let _guard = self.id_locks.lock(&record.id).await;

            sqlx::query(
                r"INSERT OR REPLACE INTO favorite_books (id, title, thumbnail)
                  VALUES (?, ?, ?)",
            )
            .bind(&record.id)
            .bind(&record.title)
            .bind(record.thumbnail.as_deref())
            .execute(self.db.pool())
            .await?;
        }

        debug!("Favorite saved");
        self.publish().await;
        Ok(())
    }

    /// Deletes the record with the given id. Absent ids are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the delete fails.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<()> {
        let rows_affected = {
            let _guard = self.id_locks.lock(id).await;

            sqlx::query("DELETE FROM favorite_books WHERE id = ?")
                .bind(id)
                .execute(self.db.pool())
                .await?
                .rows_affected()
        };

        if rows_affected == 0 {
            debug!("No favorite to remove");
            return Ok(());
        }

        debug!("Favorite removed");
        self.publish().await;
        Ok(())
    }

    /// Looks up a single favorite by id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<FavoriteRecord>> {
        let record = sqlx::query_as::<_, FavoriteRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM favorite_books WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(record)
    }

    /// Returns every favorite, oldest save first.
    ///
    /// Replacing a record counts as a fresh save and moves it to the end.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<FavoriteRecord>> {
        let records = sqlx::query_as::<_, FavoriteRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM favorite_books ORDER BY rowid ASC"
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(records)
    }

    /// Returns the number of stored favorites.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the query fails.
    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM favorite_books")
            .fetch_one(self.db.pool())
            .await?;

        Ok(count)
    }

    /// Removes every favorite and returns how many were deleted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the delete fails.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<u64> {
        let removed = sqlx::query("DELETE FROM favorite_books")
            .execute(self.db.pool())
            .await?
            .rows_affected();

        debug!(removed, "Favorites cleared");
        self.publish().await;
        Ok(removed)
    }

    /// Subscribes to the full favorites list.
    ///
    /// The receiver starts with the current list and observes a fresh full
    /// list after every successful mutation made through this store or any of
    /// its clones.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the initial list cannot be read.
    #[instrument(skip(self))]
    pub async fn subscribe(&self) -> Result<watch::Receiver<Vec<FavoriteRecord>>> {
        let _publishing = self.publish_lock.lock().await;
        let current = self.list_all().await?;
        self.feed.send_replace(current);
        Ok(self.feed.subscribe())
    }

    /// Re-reads the list and hands it to subscribers.
    ///
    /// Publishing is serialized so the last emission always carries the
    /// newest committed state. The mutation that triggered it already
    /// committed, so a failed re-read is logged rather than returned.
    async fn publish(&self) {
        let _publishing = self.publish_lock.lock().await;
        match self.list_all().await {
            Ok(records) => {
                self.feed.send_replace(records);
            }
            Err(error) => {
                warn!(error = %error, "Favorites changed but the refreshed list could not be read");
            }
        }
    }
}
