//! Favorites command handlers: list, add, remove, toggle, clear.

use anyhow::{Context, Result};
use booklib_core::{CatalogItem, FavoriteRecord, FavoriteState};

use crate::app::context::AppContext;
use crate::cli::FavoritesCommand;

pub(crate) async fn run_favorites_command(context: &AppContext, command: &FavoritesCommand) -> Result<()> {
    match command {
        FavoritesCommand::List => list(context).await,
        FavoritesCommand::Add { id } => add(context, id).await,
        FavoritesCommand::Remove { id } => {
            context
                .store
                .remove(id)
                .await
                .with_context(|| format!("Failed to remove favorite '{id}'"))?;
            println!("Removed {id}");
            Ok(())
        }
        FavoritesCommand::Toggle { id } => toggle(context, id).await,
        FavoritesCommand::Clear => {
            let removed = context
                .store
                .clear()
                .await
                .context("Failed to clear favorites")?;
            println!("Removed {removed} favorite(s)");
            Ok(())
        }
    }
}

async fn list(context: &AppContext) -> Result<()> {
    let feed = context
        .coordinator
        .favorites()
        .await
        .context("Failed to read favorites")?;
    let records = feed.borrow().clone();

    if records.is_empty() {
        println!("No favorites saved.");
        return Ok(());
    }
    for record in &records {
        println!("{}", render_favorite_row(record));
    }
    Ok(())
}

async fn add(context: &AppContext, id: &str) -> Result<()> {
    let item = context
        .coordinator
        .get_by_id(id)
        .await
        .with_context(|| format!("Failed to load volume '{id}'"))?;
    context
        .store
        .upsert(&FavoriteRecord::from(&item))
        .await
        .with_context(|| format!("Failed to save favorite '{id}'"))?;
    println!("Saved {}  {}", item.id, item.title);
    Ok(())
}

async fn toggle(context: &AppContext, id: &str) -> Result<()> {
    // A saved favorite already carries what a toggle stores; only unknown ids need the catalog.
    let item = match context.store.get(id).await? {
        Some(record) => CatalogItem {
            thumbnail: record.thumbnail,
            ..CatalogItem::new(record.id, record.title)
        },
        None => context
            .coordinator
            .get_by_id(id)
            .await
            .with_context(|| format!("Failed to load volume '{id}'"))?,
    };

    let state = context
        .coordinator
        .toggle_favorite(&item)
        .await
        .with_context(|| format!("Failed to toggle favorite '{id}'"))?;
    match state {
        FavoriteState::Favorited => println!("Saved {}  {}", item.id, item.title),
        FavoriteState::NotFavorited => println!("Removed {}", item.id),
    }
    Ok(())
}

fn render_favorite_row(record: &FavoriteRecord) -> String {
    format!("{}  {}", record.id, record.title)
}
