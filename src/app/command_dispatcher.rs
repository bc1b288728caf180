//! CLI command routing.
//!
//! `config show` never touches the database or the network; every other
//! command gets a fully wired [`AppContext`].

use anyhow::Result;

use crate::app::config_runtime::EffectiveConfig;
use crate::app::context::AppContext;
use crate::app_config::LoadedConfig;
use crate::cli::{Cli, Command, ConfigCommand};
use crate::commands;

/// Runs the handler for the parsed subcommand.
pub(crate) async fn dispatch(
    cli: &Cli,
    loaded_config: &LoadedConfig,
    effective: &EffectiveConfig,
) -> Result<()> {
    match &cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Show => {
                commands::run_config_show_command(loaded_config, effective);
                Ok(())
            }
        },
        Command::Search(args) => {
            let context = AppContext::build(effective).await?;
            commands::run_search_command(&context, args).await
        }
        Command::Show { id } => {
            let context = AppContext::build(effective).await?;
            commands::run_show_command(&context, id).await
        }
        Command::Favorites { command } => {
            let context = AppContext::build(effective).await?;
            commands::run_favorites_command(&context, command).await
        }
    }
}
