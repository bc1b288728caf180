//! Booklib Core Library
//!
//! Browse a public book catalog and keep a durable local shelf of favorites.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`db`] - Database connection and schema management
//! - [`favorites`] - Favorites persistence with a live subscription
//! - [`catalog`] - Read-only remote catalog client
//! - [`coordinator`] - Joins catalog results with favorite status
//!
//! Presentation layers (the `booklib` binary, or any other front end) build a
//! [`FavoriteCoordinator`] from a [`FavoriteStore`] and a [`CatalogClient`]
//! and talk to nothing else.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod coordinator;
pub mod db;
pub mod favorites;
pub(crate) mod keyed_lock;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use catalog::{
    CatalogClient, CatalogError, CatalogItem, CatalogSettings, DEFAULT_BASE_URL,
    DEFAULT_MAX_RESULTS, GoogleBooksClient, HttpTimeouts, MAX_RESULTS_LIMIT, Price,
};
pub use coordinator::{DEFAULT_QUERY, FavoriteCoordinator, FavoriteState, LibraryError, SearchPolicy};
pub use db::{DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_MAX_CONNECTIONS, Database, DatabaseOptions, DbError};
pub use favorites::{
    FavoriteRecord, FavoriteRepository, FavoriteStore, StorageError, StorageErrorKind,
};
