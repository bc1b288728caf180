//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use booklib_core::MAX_RESULTS_LIMIT;

/// Browse a public book catalog and keep a local shelf of favorites.
#[derive(Parser, Debug)]
#[command(name = "booklib")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Favorites database file (overrides `database_path` in config)
    #[arg(long, value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the catalog; favorites are marked with '*'
    Search(SearchArgs),

    /// Show one catalog volume in detail
    Show {
        /// Catalog volume id
        id: String,
    },

    /// Manage saved favorites
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommand,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Search terms (blank uses the configured default query)
    pub query: Option<String>,

    /// Number of results to fetch (1-40)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_RESULTS_LIMIT)))]
    pub max_results: Option<u32>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum FavoritesCommand {
    /// List saved favorites
    List,
    /// Save a catalog volume as a favorite
    Add {
        /// Catalog volume id
        id: String,
    },
    /// Remove a favorite (no-op if not saved)
    Remove {
        /// Catalog volume id
        id: String,
    },
    /// Flip the favorite state of a catalog volume
    Toggle {
        /// Catalog volume id
        id: String,
    },
    /// Remove every favorite
    Clear,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
}
