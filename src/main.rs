//! CLI entry point for booklib.

mod app;
mod app_config;
mod cli;
mod commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::runtime::run().await
}
