//! Command-line interface definitions.
//!
//! Every option has a default, so running the binary with no arguments
//! scrapes the built-in catalog and writes the CSV export to the current
//! directory.

use crate::aggregator::DEFAULT_CONCURRENCY;
use crate::dedupe::DedupeKey;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Built-in catalog, CSV into ./out
/// energy_news -o ./out
///
/// # Custom catalog, dedupe by URL, also write the JSON report
/// energy_news -c catalog.yaml --dedupe url --json
///
/// # Print the built-in catalog as an editable starting point
/// energy_news --dump-config > catalog.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory for the exported files
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// YAML catalog of sources and keywords (defaults to the built-in catalog)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of sources fetched at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Drop duplicate headlines across sources
    #[arg(long, value_enum, default_value_t = DedupeKey::Off)]
    pub dedupe: DedupeKey,

    /// Also write the run report (items plus per-source outcomes) as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the effective catalog as YAML and exit
    #[arg(long)]
    pub dump_config: bool,
}
