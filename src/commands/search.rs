//! Search command handler: query the catalog and mark saved favorites.

use anyhow::{Context, Result};
use booklib_core::{CatalogItem, FavoriteState};

use crate::app::context::AppContext;
use crate::cli::SearchArgs;

pub(crate) async fn run_search_command(context: &AppContext, args: &SearchArgs) -> Result<()> {
    let query = args.query.as_deref().unwrap_or_default();
    let effective_query = context.coordinator.search_policy().effective_query(query).to_string();

    let rows = context
        .coordinator
        .search_with_states(query, args.max_results)
        .await
        .with_context(|| format!("Search for '{effective_query}' failed"))?;

    if rows.is_empty() {
        println!("No results for '{effective_query}'.");
        return Ok(());
    }

    for (item, state) in &rows {
        println!("{}", render_search_row(item, *state));
    }
    Ok(())
}

/// One result line: favorite marker, id, title, and authors when known.
pub(crate) fn render_search_row(item: &CatalogItem, state: FavoriteState) -> String {
    let mut row = format!("{} {}  {}", state.marker(), item.id, item.title);
    if let Some(authors) = item.authors_display() {
        row.push_str(" - ");
        row.push_str(&authors);
    }
    row
}
