//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use nfo_scout_core::Field;

#[derive(Parser)]
#[command(name = "nfo-scout")]
#[command(
    about = "Fetch catalog metadata for video files and write .nfo descriptors",
    long_about = None
)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Switches that force-enable optional pipeline stages.
#[derive(Args, Clone, Copy, Debug, Default)]
pub(crate) struct FeatureArgs {
    /// Translate metadata fields (overrides translation.enabled)
    #[arg(long)]
    pub translate: bool,

    /// Download cover and poster images
    #[arg(long)]
    pub images: bool,

    /// Download subtitles
    #[arg(long)]
    pub subtitles: bool,
}

/// Common arguments for commands that scan directories.
#[derive(Args, Clone, Debug)]
pub(crate) struct ScanArgs {
    /// Subdirectory levels to descend into (0 = only the directory itself)
    #[arg(short, long, default_value_t = 0)]
    pub depth: usize,

    /// Write descriptors below this directory instead of next to each video
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub features: FeatureArgs,

    /// Reprocess videos that already have a descriptor
    #[arg(short, long)]
    pub force: bool,

    /// Write a plain-text run report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Look up a single code and write its descriptor
    Search {
        /// Code or file name, e.g. SONE-638 or sone00638.mp4
        identifier: String,

        /// Use only this metadata source
        #[arg(short, long)]
        source: Option<String>,

        /// Directory to write into (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        features: FeatureArgs,

        /// Print the metadata without writing a descriptor
        #[arg(long)]
        no_nfo: bool,
    },

    /// Scan the current directory and process every video found
    Auto {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Scan a directory and process every video found
    Batch {
        /// Directory to scan
        dir: PathBuf,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// List available metadata sources
    Scrapers,

    /// Fetch one code from one source and print the raw record
    Test {
        /// Source name (see `nfo-scout scrapers`)
        scraper: String,

        /// Code to look up
        identifier: String,
    },

    /// Manage the translation cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum CacheAction {
    /// Show entry counts per field
    Stats,

    /// Remove cached translations
    Clear {
        /// Only clear this field (e.g. genres, title)
        #[arg(long)]
        field: Option<Field>,
    },

    /// Write every cached translation to a JSON file
    Export {
        /// Target file
        file: PathBuf,
    },

    /// Merge translations from a JSON file
    Import {
        /// Source file (an export, or a flat field -> text -> translation map)
        file: PathBuf,

        /// Imported entries replace existing ones
        #[arg(long)]
        overwrite: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the resolved settings and where they came from
    Show,

    /// Print the settings file path
    Path,

    /// Write the default settings to the settings file
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}
