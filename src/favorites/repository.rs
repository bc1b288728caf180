//! Repository seam for favorites persistence.
//!
//! The coordinator depends on this trait rather than on [`FavoriteStore`]
//! directly, so it never learns how favorites are stored.

use async_trait::async_trait;
use tokio::sync::watch;

use super::{FavoriteRecord, FavoriteStore, Result};

/// Data-access contract for favorite records.
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Inserts or replaces the record with the same id.
    async fn upsert(&self, record: &FavoriteRecord) -> Result<()>;

    /// Deletes the record with the given id; absent ids are a no-op.
    async fn remove(&self, id: &str) -> Result<()>;

    /// Point lookup by id.
    async fn get(&self, id: &str) -> Result<Option<FavoriteRecord>>;

    /// Every stored record.
    async fn list_all(&self) -> Result<Vec<FavoriteRecord>>;

    /// Live view of the full list, re-delivered after each mutation.
    async fn subscribe(&self) -> Result<watch::Receiver<Vec<FavoriteRecord>>>;
}

#[async_trait]
impl FavoriteRepository for FavoriteStore {
    async fn upsert(&self, record: &FavoriteRecord) -> Result<()> {
        FavoriteStore::upsert(self, record).await
    }

    async fn remove(&self, id: &str) -> Result<()> {
        FavoriteStore::remove(self, id).await
    }

    async fn get(&self, id: &str) -> Result<Option<FavoriteRecord>> {
        FavoriteStore::get(self, id).await
    }

    async fn list_all(&self) -> Result<Vec<FavoriteRecord>> {
        FavoriteStore::list_all(self).await
    }

    async fn subscribe(&self) -> Result<watch::Receiver<Vec<FavoriteRecord>>> {
        FavoriteStore::subscribe(self).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Database;

    async fn saved_count(repo: &impl FavoriteRepository) -> usize {
        repo.list_all().await.unwrap().len()
    }

    #[tokio::test]
    async fn test_favorite_repository_trait_delegates_to_store() {
        let store = FavoriteStore::new(Database::new_in_memory().await.unwrap());

        FavoriteRepository::upsert(&store, &FavoriteRecord::new("abc123", "Dune", None))
            .await
            .unwrap();
        assert_eq!(saved_count(&store).await, 1);
        assert!(
            FavoriteRepository::get(&store, "abc123")
                .await
                .unwrap()
                .is_some()
        );

        FavoriteRepository::remove(&store, "abc123").await.unwrap();
        assert_eq!(saved_count(&store).await, 0);
    }

    #[tokio::test]
    async fn test_favorite_repository_usable_as_trait_object() {
        let store = FavoriteStore::new(Database::new_in_memory().await.unwrap());
        let repo: &dyn FavoriteRepository = &store;

        let feed = repo.subscribe().await.unwrap();
        assert!(feed.borrow().is_empty());
    }
}
