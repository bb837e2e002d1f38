//! nfo-scout CLI
//!
//! Fetches catalog metadata for video files by code and writes Kodi-style
//! `.nfo` descriptors next to them.

mod cli_types;
mod commands;
mod error;
mod logging;
mod progress;
mod session;

use std::path::PathBuf;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use nfo_scout_lib::{Settings, settings_path};

use cli_types::{Cli, Commands};
pub(crate) use error::CliError;

/// Print an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{e}");
        std::process::exit(2);
    }

    if let Err(e) = run(cli) {
        match e {
            // The summary has already been printed
            CliError::ItemsFailed(_) => {}
            e => log::error!("{} {}", "\u{2718}".if_supports_color(Stderr, |t| t.red()), e),
        }
        log::logger().flush();
        std::process::exit(1);
    }
    log::logger().flush();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.clone().unwrap_or_else(settings_path);
    let load = || Settings::load(Some(&config_path));

    match cli.command {
        Commands::Search {
            identifier,
            source,
            output,
            features,
            no_nfo,
        } => commands::search::run_search(
            load()?,
            &identifier,
            source.as_deref(),
            output,
            features,
            no_nfo,
        ),
        Commands::Auto { scan } => {
            let root = std::env::current_dir()?;
            commands::scan::run_scan(load()?, root, scan, cli.quiet)
        }
        Commands::Batch { dir, scan } => commands::scan::run_scan(load()?, dir, scan, cli.quiet),
        Commands::Scrapers => commands::scrapers::run_list(&load()?),
        Commands::Test {
            scraper,
            identifier,
        } => commands::scrapers::run_test(&load()?, &scraper, &identifier),
        Commands::Cache { action } => commands::cache::run(&load()?, action),
        Commands::Config { action } => commands::config::run(action, &config_path),
    }
}

/// Current directory, falling back to `.` when it cannot be resolved.
pub(crate) fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
