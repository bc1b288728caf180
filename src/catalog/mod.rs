//! Read-only access to the remote book catalog.
//!
//! # Architecture
//!
//! - [`CatalogClient`] - Async trait the coordinator depends on
//! - [`GoogleBooksClient`] - Google Books volumes API implementation
//! - [`CatalogItem`] - One volume as displayed; never persisted
//! - [`CatalogError`] - Network / not-found / decode failures
//!
//! Clients are plain passthroughs: no caching, no retry, no rate limiting.
//!
//! # Example
//!
//! ```no_run
//! use booklib_core::catalog::{CatalogClient, GoogleBooksClient, CatalogSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GoogleBooksClient::new(CatalogSettings::default())?;
//! for item in client.search("dune", 20).await? {
//!     println!("{} - {}", item.id, item.title);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod google_books;
mod http_client;

pub use error::CatalogError;
pub use google_books::{CatalogSettings, DEFAULT_BASE_URL, GoogleBooksClient};
pub use http_client::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS, HttpTimeouts,
    build_catalog_http_client,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result count used when the caller does not pick one.
pub const DEFAULT_MAX_RESULTS: u32 = 20;

/// Largest page the catalog serves in one request.
pub const MAX_RESULTS_LIMIT: u32 = 40;

/// A price as quoted by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: f64,
    pub currency_code: String,
}

/// One volume as returned by the catalog.
///
/// Lives for a single fetch/display cycle. Only `id`, `title`, and
/// `thumbnail` are ever copied into local storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Catalog-assigned volume id.
    pub id: String,
    pub title: String,
    pub authors: Option<Vec<String>>,
    /// Cover thumbnail, always `https://` when present.
    pub thumbnail: Option<String>,
    pub description: Option<String>,
    pub average_rating: Option<f64>,
    pub ratings_count: Option<u32>,
    pub page_count: Option<u32>,
    /// BCP-47 language code.
    pub language: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub categories: Option<Vec<String>>,
    pub preview_link: Option<String>,
    pub web_reader_link: Option<String>,
    pub list_price: Option<Price>,
    pub buy_link: Option<String>,
}

impl CatalogItem {
    /// Creates an item with only an id and title.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: None,
            thumbnail: None,
            description: None,
            average_rating: None,
            ratings_count: None,
            page_count: None,
            language: None,
            publisher: None,
            published_date: None,
            categories: None,
            preview_link: None,
            web_reader_link: None,
            list_price: None,
            buy_link: None,
        }
    }

    /// Authors joined for single-line display, if any are known.
    #[must_use]
    pub fn authors_display(&self) -> Option<String> {
        self.authors
            .as_ref()
            .filter(|authors| !authors.is_empty())
            .map(|authors| authors.join(", "))
    }
}

/// Read-only catalog contract.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Returns at most `max_results` volumes matching `query`.
    ///
    /// Values above [`MAX_RESULTS_LIMIT`] are capped to it, and `0` yields an
    /// empty list without contacting the catalog. The query is forwarded as-is; choosing a fallback for empty input is
    /// the caller's business.
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Fetches a single volume.
    ///
    /// Fails with [`CatalogError::NotFound`] when the catalog has no such id.
    async fn get_by_id(&self, id: &str) -> Result<CatalogItem, CatalogError>;
}
