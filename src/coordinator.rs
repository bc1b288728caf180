//! Favorite coordination between catalog results and the local store.
//!
//! [`FavoriteCoordinator`] answers "is this displayed book a favorite?" and
//! flips that state, without the store knowing the catalog's shape or the
//! catalog knowing about local storage.
//!
//! # Concurrency
//!
//! - Status lookups are independent reads; many can run at once.
//! - A toggle reads the current state and writes the opposite one while
//!   holding a per-id lock, so two toggles of the same book never interleave.
//! - The toggle's write runs on its own task: dropping the caller's future
//!   (a view going away mid-click) does not cancel it.
//!
//! # Example
//!
//! ```ignore
//! let coordinator = FavoriteCoordinator::new(Arc::new(store), Arc::new(client));
//! for (item, state) in coordinator.search_with_states("").await? {
//!     println!("{} {}", state.marker(), item.title);
//! }
//! ```

use std::sync::Arc;

use futures_util::future::try_join_all;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::catalog::{CatalogClient, CatalogError, CatalogItem, DEFAULT_MAX_RESULTS};
use crate::favorites::{FavoriteRecord, FavoriteRepository, StorageError};
use crate::keyed_lock::KeyedLocks;

/// Query used for an empty search unless configured otherwise.
pub const DEFAULT_QUERY: &str = "best+subject:fiction";

/// Favorite status of one catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteState {
    NotFavorited,
    Favorited,
}

impl FavoriteState {
    #[must_use]
    pub fn is_favorited(self) -> bool {
        self == Self::Favorited
    }

    /// One-character marker for list rendering.
    #[must_use]
    pub fn marker(self) -> char {
        match self {
            Self::Favorited => '*',
            Self::NotFavorited => ' ',
        }
    }
}

impl From<bool> for FavoriteState {
    fn from(favorited: bool) -> Self {
        if favorited {
            Self::Favorited
        } else {
            Self::NotFavorited
        }
    }
}

/// Caller-side search defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Sent instead of a blank query.
    pub default_query: String,
    /// Result count when the caller does not pick one.
    pub max_results: u32,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            default_query: DEFAULT_QUERY.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl SearchPolicy {
    /// Returns the query to send: the trimmed input, or the default when blank.
    #[must_use]
    pub fn effective_query<'a>(&'a self, query: &'a str) -> &'a str {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            &self.default_query
        } else {
            trimmed
        }
    }
}

/// Errors surfaced by the coordinator; dependency errors pass through untouched.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The catalog request failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The favorites store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The background task applying a toggle died before reporting back.
    #[error("favorite update for '{id}' did not complete: {reason}")]
    TaskFailed {
        /// Volume id being toggled
        id: String,
        /// Why the task ended
        reason: String,
    },
}

/// Result type for coordinator operations.
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Joins catalog display state with the local favorites store.
#[derive(Clone)]
pub struct FavoriteCoordinator {
    store: Arc<dyn FavoriteRepository>,
    catalog: Arc<dyn CatalogClient>,
    policy: SearchPolicy,
    toggle_locks: Arc<KeyedLocks>,
}

impl FavoriteCoordinator {
    /// Creates a coordinator over explicitly constructed dependencies.
    #[must_use]
    pub fn new(store: Arc<dyn FavoriteRepository>, catalog: Arc<dyn CatalogClient>) -> Self {
        Self {
            store,
            catalog,
            policy: SearchPolicy::default(),
            toggle_locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Replaces the search defaults.
    #[must_use]
    pub fn with_search_policy(mut self, policy: SearchPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn search_policy(&self) -> &SearchPolicy {
        &self.policy
    }

    /// Returns whether `id` is currently a favorite.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Storage`] if the lookup fails.
    #[instrument(skip(self))]
    pub async fn is_favorite(&self, id: &str) -> Result<bool> {
        Ok(self.store.get(id).await?.is_some())
    }

    /// Returns the favorite state of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Storage`] if the lookup fails.
    pub async fn favorite_state(&self, id: &str) -> Result<FavoriteState> {
        self.is_favorite(id).await.map(FavoriteState::from)
    }

    /// Flips the favorite state of `item` and returns the state it ends in.
    ///
    /// Favoriting stores the item's id, title, and thumbnail. The write runs to
    /// completion even if the returned future is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Storage`] if the read or write fails, or
    /// [`LibraryError::TaskFailed`] if the write task panicked.
    #[instrument(skip(self, item), fields(id = %item.id))]
    pub async fn toggle_favorite(&self, item: &CatalogItem) -> Result<FavoriteState> {
        let store = Arc::clone(&self.store);
        let locks = Arc::clone(&self.toggle_locks);
        let record = FavoriteRecord::from(item);
        let id = record.id.clone();

        let task = tokio::spawn(async move { apply_toggle(&*store, &locks, &record).await });

        let state = task.await.map_err(|error| LibraryError::TaskFailed {
            id,
            reason: error.to_string(),
        })??;
        debug!(?state, "Favorite toggled");
        Ok(state)
    }

    /// Live view of every favorite, re-delivered in full after each change.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Storage`] if the initial list cannot be read.
    pub async fn favorites(&self) -> Result<watch::Receiver<Vec<FavoriteRecord>>> {
        Ok(self.store.subscribe().await?)
    }

    /// Searches the catalog, substituting the default query for blank input.
    ///
    /// `max_results` falls back to the policy limit and is passed through to
    /// [`CatalogClient::search`], which caps it at [`crate::MAX_RESULTS_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Catalog`] if the catalog request fails.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, max_results: Option<u32>) -> Result<Vec<CatalogItem>> {
        let effective = self.policy.effective_query(query);
        let limit = max_results.unwrap_or(self.policy.max_results);
        debug!(query = effective, limit, "Searching catalog");
        Ok(self.catalog.search(effective, limit).await?)
    }

    /// Looks up a single catalog volume.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Catalog`] with [`CatalogError::NotFound`] for
    /// unknown ids, or another catalog error on failure.
    pub async fn get_by_id(&self, id: &str) -> Result<CatalogItem> {
        Ok(self.catalog.get_by_id(id).await?)
    }

    /// Resolves the favorite state of each item concurrently, keeping order.
    ///
    /// # Errors
    ///
    /// Returns the first [`LibraryError::Storage`] encountered.
    pub async fn annotate(
        &self,
        items: Vec<CatalogItem>,
    ) -> Result<Vec<(CatalogItem, FavoriteState)>> {
        let states = try_join_all(items.iter().map(|item| self.favorite_state(&item.id))).await?;
        Ok(items.into_iter().zip(states).collect())
    }

    /// Searches and annotates every result with its favorite state.
    ///
    /// # Errors
    ///
    /// Returns a catalog or storage error from either step.
    pub async fn search_with_states(
        &self,
        query: &str,
        max_results: Option<u32>,
    ) -> Result<Vec<(CatalogItem, FavoriteState)>> {
        let items = self.search(query, max_results).await?;
        self.annotate(items).await
    }
}

/// Read-decide-write for one toggle, serialized per id.
async fn apply_toggle(
    store: &dyn FavoriteRepository,
    locks: &KeyedLocks,
    record: &FavoriteRecord,
) -> std::result::Result<FavoriteState, StorageError> {
    let _guard = locks.lock(&record.id).await;
    if store.get(&record.id).await?.is_some() {
        store.remove(&record.id).await?;
        Ok(FavoriteState::NotFavorited)
    } else {
        store.upsert(record).await?;
        Ok(FavoriteState::Favorited)
    }
}

impl std::fmt::Debug for FavoriteCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoriteCoordinator")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
