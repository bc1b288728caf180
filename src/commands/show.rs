//! Show command handler: one volume in detail.

use anyhow::{Context, Result};
use booklib_core::{CatalogItem, FavoriteState};

use crate::app::context::AppContext;

pub(crate) async fn run_show_command(context: &AppContext, id: &str) -> Result<()> {
    let item = context
        .coordinator
        .get_by_id(id)
        .await
        .with_context(|| format!("Failed to load volume '{id}'"))?;
    let state = context
        .coordinator
        .favorite_state(&item.id)
        .await
        .with_context(|| format!("Failed to check favorite status for '{id}'"))?;

    for line in render_details(&item, state) {
        println!("{line}");
    }
    Ok(())
}

fn render_details(item: &CatalogItem, state: FavoriteState) -> Vec<String> {
    let mut lines = vec![
        format!("id: {}", item.id),
        format!("title: {}", item.title),
        format!("favorite: {}", if state.is_favorited() { "yes" } else { "no" }),
    ];
    let mut push = |label: &str, value: Option<String>| {
        if let Some(value) = value {
            lines.push(format!("{label}: {value}"));
        }
    };
    push("authors", item.authors_display());
    push("publisher", item.publisher.clone());
    push("published", item.published_date.clone());
    push("pages", item.page_count.map(|n| n.to_string()));
    push("language", item.language.clone());
    push(
        "categories",
        item.categories.as_ref().map(|categories| categories.join(", ")),
    );
    push(
        "rating",
        item.average_rating.map(|rating| match item.ratings_count {
            Some(count) => format!("{rating:.1} ({count} ratings)"),
            None => format!("{rating:.1}"),
        }),
    );
    push(
        "price",
        item.list_price
            .as_ref()
            .map(|price| format!("{:.2} {}", price.amount, price.currency_code)),
    );
    push("thumbnail", item.thumbnail.clone());
    push("preview", item.preview_link.clone());
    push("read", item.web_reader_link.clone());
    push("buy", item.buy_link.clone());
    push("description", item.description.clone());
    lines
}

#[cfg(test)]
mod tests {
    use booklib_core::Price;

    use super::*;

    #[test]
    fn test_render_details_skips_missing_fields() {
        let lines = render_details(&CatalogItem::new("abc123", "Dune"), FavoriteState::NotFavorited);
        assert_eq!(lines, vec!["id: abc123", "title: Dune", "favorite: no"]);
    }

    #[test]
    fn test_render_details_formats_rating_and_price() {
        let item = CatalogItem {
            average_rating: Some(4.5),
            ratings_count: Some(12),
            list_price: Some(Price {
                amount: 9.5,
                currency_code: "USD".to_string(),
            }),
            ..CatalogItem::new("abc123", "Dune")
        };
        let lines = render_details(&item, FavoriteState::Favorited);
        assert!(lines.contains(&"favorite: yes".to_string()));
        assert!(lines.contains(&"rating: 4.5 (12 ratings)".to_string()));
        assert!(lines.contains(&"price: 9.50 USD".to_string()));
    }
}
