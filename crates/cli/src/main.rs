//! `omni` binary: config resolution, log setup, TUI launch.

use clap::Parser;
use colored::Colorize;
use omni_core::config::{load_config, AppConfig};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Terminal front end for the Omni-Stack AI platform.
#[derive(Parser, Debug)]
#[command(name = "omni", version, about)]
struct Cli {
    /// Backend API base URL (overrides omni.toml and OMNI_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Record store base URL (overrides omni.toml and OMNI_STORE_URL)
    #[arg(long)]
    store_url: Option<String>,

    /// Record store API key (overrides omni.toml and OMNI_STORE_KEY)
    #[arg(long)]
    store_key: Option<String>,

    /// Log file path
    #[arg(long, default_value = "omni.log")]
    log_file: String,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    init_logging(&cli.log_file)?;

    let config = resolve_config(&cli)?;
    omni_tui::run_app(config)
        .await
        .map_err(|e| color_eyre::eyre::eyre!(e))
}

/// Defaults, then `omni.toml`, then environment, then CLI flags.
fn resolve_config(cli: &Cli) -> color_eyre::Result<AppConfig> {
    let cwd = std::env::current_dir()?;
    let mut config = load_config(&cwd).map_err(|error| {
        eprintln!("{} {error}", "configuration error:".red().bold());
        color_eyre::eyre::eyre!(error)
    })?;

    if let Some(backend_url) = &cli.backend_url {
        config.backend_url = backend_url.clone();
    }
    if let Some(store_url) = &cli.store_url {
        config.store_url = store_url.clone();
    }
    if let Some(store_key) = &cli.store_key {
        config.store_key = store_key.clone();
    }
    Ok(config)
}

/// Log to a file: the TUI owns the terminal, so stderr is not usable.
fn init_logging(path: &str) -> color_eyre::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
