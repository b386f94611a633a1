//! Transit Crawler CLI
//!
//! Local execution entry point.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use transit_crawler::{
    error::Result,
    models::Config,
    pipeline::{self, LogSink},
    storage::{DataStore, LocalStorage},
};

/// transit-crawler - Route, direction, and stop scraper
#[derive(Parser, Debug)]
#[command(
    name = "transit-crawler",
    version,
    about = "Scrapes transit routes, directions, and stops into a local snapshot"
)]
struct Cli {
    /// Path to the configuration file [default: storage/config.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the snapshot output directory
    #[arg(short, long)]
    storage_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch every route, direction, and stop and save the snapshot
    Ingest {
        /// Override the site base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Validate the configuration file
    Validate,

    /// Show the saved snapshot
    Info,
}

const DEFAULT_CONFIG: &str = "storage/config.toml";

/// Load the configuration.
///
/// A file given with `-c` must parse, and so must any file being validated.
/// Otherwise an unreadable default file falls back to built-in defaults.
fn load_config(path: Option<&Path>, strict: bool) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None if strict => Config::load(DEFAULT_CONFIG),
        None => Ok(Config::load_or_default(DEFAULT_CONFIG)),
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.as_deref();
    let strict = matches!(cli.command, Command::Validate);
    let mut config = match load_config(config_path, strict) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Config load failed: {}", e);
            return Err(e);
        }
    };
    if let Some(dir) = &cli.storage_dir {
        config.storage.output_dir = dir.display().to_string();
    }
    log::debug!("Configuration: {:?}", config);

    match cli.command {
        Command::Ingest { base_url } => {
            if let Some(base_url) = base_url {
                config.source.base_url = base_url;
            }

            let report = pipeline::run_ingest(&config, &LogSink).await?;
            match report.saved {
                Some(saved) => log::info!("Snapshot saved to {}", saved.location),
                None => log::warn!("Nothing to save: the routes page listed no routes"),
            }
        }

        Command::Validate => {
            let shown = config_path.unwrap_or(Path::new(DEFAULT_CONFIG));
            log::info!("Validating {}...", shown.display());

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }

        Command::Info => {
            let storage = LocalStorage::from_config(&config.storage);
            log::info!("Snapshot: {}", storage.snapshot_path().display());

            match storage.load_bus_data().await? {
                Some(snapshot) => {
                    log::info!("Last updated: {}", snapshot.updated_at);
                    log::info!("Contents: {}", snapshot.summary);

                    let mut routes = snapshot.data.routes.clone();
                    routes.sort_by_key(|r| r.numeric().unwrap_or(u32::MAX));
                    for route in &routes {
                        log::info!("    {}", route.name_with_number());
                    }
                }
                None => log::info!("No snapshot found yet."),
            }
        }
    }

    Ok(())
}
