//! Google Books catalog client.
//!
//! Talks to the public volumes API:
//! - `GET {base}/volumes?q={query}&maxResults={n}` for search
//! - `GET {base}/volumes/{id}` for a single volume

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::http_client::{HttpTimeouts, build_catalog_http_client};
use super::{CatalogClient, CatalogError, CatalogItem, MAX_RESULTS_LIMIT, Price};

/// Default Google Books API base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";

// ==================== Google Books API Response Types ====================

/// Response of the volumes search endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VolumeList {
    #[allow(dead_code)] // Deserialized for Debug output; the page is bounded by maxResults
    #[serde(default)]
    pub total_items: u64,
    /// Absent when nothing matched.
    #[serde(default)]
    pub items: Vec<Volume>,
}

/// A single volume resource.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Volume {
    pub id: String,
    #[serde(default)]
    pub volume_info: VolumeInfo,
    #[serde(default)]
    pub sale_info: Option<SaleInfo>,
    #[serde(default)]
    pub access_info: Option<AccessInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VolumeInfo {
    #[serde(default)]
    pub title: String,
    pub authors: Option<Vec<String>>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub page_count: Option<u32>,
    pub categories: Option<Vec<String>>,
    pub average_rating: Option<f64>,
    pub ratings_count: Option<u32>,
    pub image_links: Option<ImageLinks>,
    pub language: Option<String>,
    pub preview_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageLinks {
    pub small_thumbnail: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SaleInfo {
    pub list_price: Option<WirePrice>,
    pub buy_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WirePrice {
    pub amount: f64,
    pub currency_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccessInfo {
    pub web_reader_link: Option<String>,
}

impl From<Volume> for CatalogItem {
    fn from(volume: Volume) -> Self {
        let info = volume.volume_info;
        let thumbnail = info
            .image_links
            .and_then(|links| links.thumbnail.or(links.small_thumbnail))
            .map(|url| secure_url(&url));
        let (list_price, buy_link) = match volume.sale_info {
            Some(sale) => (
                sale.list_price.map(|p| Price {
                    amount: p.amount,
                    currency_code: p.currency_code,
                }),
                sale.buy_link,
            ),
            None => (None, None),
        };

        Self {
            id: volume.id,
            title: info.title,
            authors: info.authors,
            thumbnail,
            description: info.description,
            average_rating: info.average_rating,
            ratings_count: info.ratings_count,
            page_count: info.page_count,
            language: info.language,
            publisher: info.publisher,
            published_date: info.published_date,
            categories: info.categories,
            preview_link: info.preview_link,
            web_reader_link: volume.access_info.and_then(|a| a.web_reader_link),
            list_price,
            buy_link,
        }
    }
}

/// Upgrades a plain-http image URL to https.
fn secure_url(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

// ==================== GoogleBooksClient ====================

/// Settings for constructing a [`GoogleBooksClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    /// API root, without a trailing `/volumes`.
    pub base_url: String,
    /// Optional Google API key, sent as the `key` query parameter.
    pub api_key: Option<String>,
    pub timeouts: HttpTimeouts,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeouts: HttpTimeouts::default(),
        }
    }
}

/// Catalog client for the Google Books volumes API.
pub struct GoogleBooksClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    /// Creates a client from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Setup`] if the base URL is not an http(s) URL
    /// or the HTTP client cannot be built.
    #[tracing::instrument(skip_all, fields(base_url = %settings.base_url))]
    pub fn new(settings: CatalogSettings) -> Result<Self, CatalogError> {
        let base = Url::parse(&settings.base_url).map_err(|error| {
            CatalogError::setup(
                &format!("invalid catalog base URL '{}': {error}", settings.base_url),
                "Set catalog_base_url to an absolute http(s) URL",
            )
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(CatalogError::setup(
                &format!("unsupported catalog URL scheme '{}'", base.scheme()),
                "Set catalog_base_url to an absolute http(s) URL",
            ));
        }
        if let Some(key) = &settings.api_key
            && key.chars().any(char::is_control)
        {
            return Err(CatalogError::setup(
                "api_key contains control characters",
                "Copy the key again without surrounding whitespace",
            ));
        }

        let client = build_catalog_http_client(settings.timeouts)?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.filter(|key| !key.is_empty()),
        })
    }

    /// Creates a client against a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Setup`] if client construction fails.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        Self::new(CatalogSettings {
            base_url: base_url.into(),
            ..CatalogSettings::default()
        })
    }

    fn search_url(&self, query: &str, max_results: u32) -> Result<Url, CatalogError> {
        let mut params = vec![
            ("q", query.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }
        Url::parse_with_params(&format!("{}/volumes", self.base_url), &params)
            .map_err(|error| CatalogError::transport(query, &format!("invalid request URL: {error}")))
    }

    fn volume_url(&self, id: &str) -> Result<Url, CatalogError> {
        let raw = format!("{}/volumes/{}", self.base_url, urlencoding::encode(id));
        let parsed = match &self.api_key {
            Some(key) => Url::parse_with_params(&raw, [("key", key.as_str())]),
            None => Url::parse(&raw),
        };
        parsed.map_err(|error| CatalogError::transport(id, &format!("invalid request URL: {error}")))
    }

    /// Sends a GET and returns the status and body text.
    async fn fetch(&self, target: &str, url: Url) -> Result<(StatusCode, String), CatalogError> {
        debug!(api_url = %redact_key(&url), "Calling catalog API");

        let response = self.client.get(url).send().await.map_err(|error| {
            warn!(error = %error, "Catalog request failed");
            CatalogError::transport(target, "cannot reach the catalog")
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|error| {
            warn!(error = %error, "Catalog response body could not be read");
            CatalogError::transport(target, "connection dropped while reading the response")
        })?;

        Ok((status, body))
    }
}

impl std::fmt::Debug for GoogleBooksClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleBooksClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

/// Drops the API key from a URL before it is logged.
fn redact_key(url: &Url) -> String {
    if !url.query_pairs().any(|(name, _)| name == "key") {
        return url.to_string();
    }
    let mut redacted = url.clone();
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| name != "key")
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(kept);
    redacted.to_string()
}

#[async_trait]
impl CatalogClient for GoogleBooksClient {
    #[tracing::instrument(skip(self), fields(catalog = "google_books"))]
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<CatalogItem>, CatalogError> {
        let bounded = max_results.min(MAX_RESULTS_LIMIT);
        if bounded != max_results {
            debug!(requested = max_results, bounded, "Clamped maxResults to catalog limits");
        }
        if bounded == 0 {
            return Ok(Vec::new());
        }

        let url = self.search_url(query, bounded)?;
        let (status, body) = self.fetch(query, url).await?;
        if !status.is_success() {
            debug!(status = status.as_u16(), "Catalog search failed");
            return Err(CatalogError::http_status(query, status.as_u16()));
        }

        let list: VolumeList = serde_json::from_str(&body).map_err(|error| {
            warn!(error = %error, "Failed to parse catalog search response");
            CatalogError::decode(query, &error.to_string())
        })?;

        let items: Vec<CatalogItem> = list
            .items
            .into_iter()
            .take(bounded as usize)
            .map(CatalogItem::from)
            .collect();
        debug!(count = items.len(), "Catalog search returned");
        Ok(items)
    }

    #[tracing::instrument(skip(self), fields(catalog = "google_books"))]
    async fn get_by_id(&self, id: &str) -> Result<CatalogItem, CatalogError> {
        if id.trim().is_empty() {
            return Err(CatalogError::not_found(id));
        }

        let url = self.volume_url(id)?;
        let (status, body) = self.fetch(id, url).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::not_found(id));
        }
        if !status.is_success() {
            debug!(status = status.as_u16(), "Catalog lookup failed");
            return Err(CatalogError::http_status(id, status.as_u16()));
        }

        let volume: Volume = serde_json::from_str(&body).map_err(|error| {
            warn!(error = %error, "Failed to parse catalog volume response");
            CatalogError::decode(id, &error.to_string())
        })?;
        Ok(CatalogItem::from(volume))
    }
}
