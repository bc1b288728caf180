//! Composition root: builds the store, catalog client, and coordinator.

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use booklib_core::{Database, FavoriteCoordinator, FavoriteStore, GoogleBooksClient};
use tracing::debug;

use crate::app::config_runtime::EffectiveConfig;

/// Everything a command handler needs, wired from the effective config.
pub(crate) struct AppContext {
    pub(crate) store: FavoriteStore,
    pub(crate) coordinator: FavoriteCoordinator,
}

impl AppContext {
    pub(crate) async fn build(config: &EffectiveConfig) -> Result<Self> {
        let db_path = &config.database_path;
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory '{}'", parent.display())
            })?;
        }

        let db = Database::new_with_options(db_path, config.db_options)
            .await
            .with_context(|| format!("Failed to open favorites database '{}'", db_path.display()))?;
        debug!(path = %db_path.display(), "Favorites database opened");

        let store = FavoriteStore::new(db);
        let catalog = GoogleBooksClient::new(config.catalog.clone())
            .context("Failed to configure catalog client")?;

        let coordinator = FavoriteCoordinator::new(Arc::new(store.clone()), Arc::new(catalog))
            .with_search_policy(config.search.clone());

        Ok(Self { store, coordinator })
    }
}
