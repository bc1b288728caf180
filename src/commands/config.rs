//! Config command handlers: show effective configuration.

use crate::app::config_runtime::EffectiveConfig;
use crate::app_config::LoadedConfig;

pub(crate) fn run_config_show_command(loaded_config: &LoadedConfig, effective: &EffectiveConfig) {
    let resolved_path = loaded_config.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded_config.loaded_from_file {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!("database_path = {}", effective.database_path.display());
    println!("catalog_base_url = {}", effective.catalog.base_url);
    println!(
        "api_key = {}",
        if effective.catalog.api_key.is_some() {
            "<set>"
        } else {
            "<unset>"
        }
    );
    println!("default_query = {}", effective.search.default_query);
    println!("max_results = {}", effective.search.max_results);
    println!(
        "connect_timeout_secs = {}",
        effective.catalog.timeouts.connect_secs
    );
    println!("read_timeout_secs = {}", effective.catalog.timeouts.read_secs);
    println!("db_max_connections = {}", effective.db_options.max_connections);
    println!("db_busy_timeout_ms = {}", effective.db_options.busy_timeout_ms);
    println!("verbosity = {}", effective.verbosity.as_str());
}
