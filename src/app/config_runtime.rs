//! Merging of CLI flags, file config, and built-in defaults.

use std::path::PathBuf;

use anyhow::{Result, bail};
use booklib_core::{
    CatalogSettings, DEFAULT_BASE_URL, DatabaseOptions, HttpTimeouts, MAX_RESULTS_LIMIT,
    SearchPolicy,
};

use crate::app_config::{FileConfig, VerbositySetting, resolve_default_database_path};
use crate::cli::Cli;

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub(crate) struct EffectiveConfig {
    pub(crate) database_path: PathBuf,
    pub(crate) db_options: DatabaseOptions,
    pub(crate) catalog: CatalogSettings,
    pub(crate) search: SearchPolicy,
    pub(crate) verbosity: VerbositySetting,
}

/// Applies file values under CLI overrides. CLI wins whenever a flag was given.
pub(crate) fn resolve_effective_config(
    cli: &Cli,
    file_config: Option<&FileConfig>,
) -> Result<EffectiveConfig> {
    let empty = FileConfig::default();
    let file_config = file_config.unwrap_or(&empty);

    let database_path = cli
        .db
        .clone()
        .or_else(|| file_config.database_path.clone())
        .unwrap_or_else(resolve_default_database_path);

    let catalog = CatalogSettings {
        base_url: file_config
            .catalog_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        api_key: file_config.api_key.clone().filter(|key| !key.is_empty()),
        timeouts: resolve_http_timeouts(file_config),
    };

    let mut search = SearchPolicy::default();
    if let Some(query) = &file_config.default_query {
        search.default_query.clone_from(query);
    }
    if let Some(max_results) = file_config.max_results {
        search.max_results = max_results;
    }
    if !(1..=MAX_RESULTS_LIMIT).contains(&search.max_results) {
        bail!(
            "Invalid effective max_results value: {}. Expected range: 1..={MAX_RESULTS_LIMIT}",
            search.max_results
        );
    }

    let verbosity = if cli_sets_verbosity(cli) {
        cli_verbosity(cli)
    } else {
        file_config.verbosity.unwrap_or_default()
    };

    Ok(EffectiveConfig {
        database_path,
        db_options: resolve_db_options(file_config),
        catalog,
        search,
        verbosity,
    })
}

fn resolve_http_timeouts(file_config: &FileConfig) -> HttpTimeouts {
    let mut timeouts = HttpTimeouts::default();
    if let Some(value) = file_config.connect_timeout_secs {
        timeouts.connect_secs = value;
    }
    if let Some(value) = file_config.read_timeout_secs {
        timeouts.read_secs = value;
    }
    timeouts
}

fn resolve_db_options(file_config: &FileConfig) -> DatabaseOptions {
    let mut options = DatabaseOptions::default();
    if let Some(n) = file_config.db_max_connections {
        options.max_connections = n;
    }
    if let Some(ms) = file_config.db_busy_timeout_ms {
        options.busy_timeout_ms = ms;
    }
    options
}

pub(crate) fn cli_sets_verbosity(cli: &Cli) -> bool {
    cli.verbose > 0 || cli.quiet
}

fn cli_verbosity(cli: &Cli) -> VerbositySetting {
    if cli.quiet {
        VerbositySetting::Quiet
    } else {
        match cli.verbose {
            0 => VerbositySetting::Default,
            1 => VerbositySetting::Verbose,
            _ => VerbositySetting::Debug,
        }
    }
}

pub(crate) fn resolve_default_log_level(verbosity: VerbositySetting) -> &'static str {
    match verbosity {
        VerbositySetting::Quiet => "error",
        VerbositySetting::Default => "info",
        VerbositySetting::Verbose => "debug",
        VerbositySetting::Debug => "trace",
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_defaults_without_file_config() {
        let cli = parse(&["booklib", "--db", "/tmp/a.db", "config", "show"]);
        let effective = resolve_effective_config(&cli, None).unwrap();

        assert_eq!(effective.database_path, PathBuf::from("/tmp/a.db"));
        assert_eq!(effective.catalog.base_url, DEFAULT_BASE_URL);
        assert!(effective.catalog.api_key.is_none());
        assert_eq!(effective.search, SearchPolicy::default());
        assert_eq!(effective.db_options, DatabaseOptions::default());
        assert_eq!(effective.verbosity, VerbositySetting::Default);
    }

    #[test]
    fn test_file_values_applied() {
        let cli = parse(&["booklib", "config", "show"]);
        let file = FileConfig {
            database_path: Some(PathBuf::from("/data/shelf.db")),
            catalog_base_url: Some("http://localhost:8080/books/v1".to_string()),
            api_key: Some("k".to_string()),
            default_query: Some("subject:poetry".to_string()),
            max_results: Some(10),
            connect_timeout_secs: Some(3),
            read_timeout_secs: Some(9),
            db_max_connections: Some(2),
            db_busy_timeout_ms: Some(250),
            verbosity: Some(VerbositySetting::Verbose),
        };

        let effective = resolve_effective_config(&cli, Some(&file)).unwrap();
        assert_eq!(effective.database_path, PathBuf::from("/data/shelf.db"));
        assert_eq!(effective.catalog.base_url, "http://localhost:8080/books/v1");
        assert_eq!(effective.catalog.api_key.as_deref(), Some("k"));
        assert_eq!(effective.catalog.timeouts.connect_secs, 3);
        assert_eq!(effective.catalog.timeouts.read_secs, 9);
        assert_eq!(effective.search.default_query, "subject:poetry");
        assert_eq!(effective.search.max_results, 10);
        assert_eq!(effective.db_options.max_connections, 2);
        assert_eq!(effective.db_options.busy_timeout_ms, 250);
        assert_eq!(effective.verbosity, VerbositySetting::Verbose);
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let cli = parse(&["booklib", "-q", "--db", "/tmp/cli.db", "config", "show"]);
        let file = FileConfig {
            database_path: Some(PathBuf::from("/data/shelf.db")),
            verbosity: Some(VerbositySetting::Debug),
            ..FileConfig::default()
        };

        let effective = resolve_effective_config(&cli, Some(&file)).unwrap();
        assert_eq!(effective.database_path, PathBuf::from("/tmp/cli.db"));
        assert_eq!(effective.verbosity, VerbositySetting::Quiet);
    }

    #[test]
    fn test_empty_api_key_treated_as_absent() {
        let cli = parse(&["booklib", "config", "show"]);
        let file = FileConfig {
            api_key: Some(String::new()),
            ..FileConfig::default()
        };
        let effective = resolve_effective_config(&cli, Some(&file)).unwrap();
        assert!(effective.catalog.api_key.is_none());
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(resolve_default_log_level(VerbositySetting::Quiet), "error");
        assert_eq!(resolve_default_log_level(VerbositySetting::Default), "info");
        assert_eq!(resolve_default_log_level(VerbositySetting::Verbose), "debug");
        assert_eq!(resolve_default_log_level(VerbositySetting::Debug), "trace");
    }
}
