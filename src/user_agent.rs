//! User-Agent string for catalog HTTP traffic.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/nicksrandall/booklib";

/// Default User-Agent for catalog requests.
#[must_use]
pub(crate) fn default_catalog_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("booklib/{version} (book-catalog-client; +{PROJECT_UA_URL})")
}
