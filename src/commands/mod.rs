//! CLI command handlers.

mod config;
mod favorites;
mod search;
mod show;

pub(crate) use config::run_config_show_command;
pub(crate) use favorites::run_favorites_command;
pub(crate) use search::run_search_command;
pub(crate) use show::run_show_command;
