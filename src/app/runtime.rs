//! Process lifecycle: parse, load config, init tracing, dispatch.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::app::{command_dispatcher, config_runtime, terminal};
use crate::app_config::load_default_file_config;
use crate::cli::Cli;

pub(crate) async fn run() -> Result<()> {
    // Parse before tracing so --help works without logs
    let cli = Cli::parse();

    let loaded_config = load_default_file_config()?;
    let effective = config_runtime::resolve_effective_config(&cli, loaded_config.config.as_ref())?;

    let no_color = terminal::should_disable_color(
        cli.no_color,
        terminal::no_color_env_requested(),
        terminal::is_dumb_terminal(),
    );
    terminal::init_tracing(
        config_runtime::resolve_default_log_level(effective.verbosity),
        config_runtime::cli_sets_verbosity(&cli),
        no_color,
    );

    debug!(?cli, "CLI arguments parsed");
    command_dispatcher::dispatch(&cli, &loaded_config, &effective).await
}
