//! CLI entry point for coursekit.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app;
mod cli;
mod commands;
mod output;

use app::{BACKEND_URL_ENV, Settings, config, terminal};
use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Cli::parse();

    let loaded = config::load_default_file_config()?;
    let settings = Settings::resolve(
        &args,
        loaded.config.as_ref(),
        std::env::var(BACKEND_URL_ENV).ok(),
    );

    terminal::init_tracing(settings.log_level);
    debug!(
        config_path = ?loaded.path,
        config_loaded = loaded.config.is_some(),
        base_url = %settings.base_url,
        "Settings resolved"
    );

    commands::dispatch(args.command, &settings).await
}
