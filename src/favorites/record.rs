//! Favorite record type.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::catalog::CatalogItem;

/// A catalog item the user marked as a favorite.
///
/// `id` is the catalog's volume id and the primary key of the store. The other
/// fields are copies taken at favorite time so the list renders offline; they
/// are never refreshed from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FavoriteRecord {
    /// Catalog volume id.
    pub id: String,
    /// Title copied from the catalog.
    pub title: String,
    /// Thumbnail URL copied from the catalog, if it had one.
    pub thumbnail: Option<String>,
}

impl FavoriteRecord {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, thumbnail: Option<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            thumbnail,
        }
    }
}

impl From<&CatalogItem> for FavoriteRecord {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            thumbnail: item.thumbnail.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_catalog_item_copies_denormalized_fields() {
        let item = CatalogItem {
            thumbnail: Some("https://books.google.com/thumb.jpg".to_string()),
            description: Some("Desert planet".to_string()),
            page_count: Some(412),
            ..CatalogItem::new("abc123", "Dune")
        };

        let record = FavoriteRecord::from(&item);
        assert_eq!(record.id, "abc123");
        assert_eq!(record.title, "Dune");
        assert_eq!(
            record.thumbnail.as_deref(),
            Some("https://books.google.com/thumb.jpg")
        );
    }

    #[test]
    fn test_record_serializes_as_flat_json() {
        let record = FavoriteRecord::new("abc123", "Dune", None);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "abc123");
        assert_eq!(json["title"], "Dune");
        assert!(json["thumbnail"].is_null());
    }
}
