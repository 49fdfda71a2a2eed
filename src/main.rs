//! Command-line driver: one batch run over the catalog, then export.
//!
//! ```sh
//! energy_news -o ./out --json
//! ```

use chrono::Local;
use clap::Parser;
use energy_news::cli::Cli;
use energy_news::dedupe::dedupe;
use energy_news::outputs::{csv, json};
use energy_news::utils::ensure_writable_dir;
use energy_news::{Aggregator, Catalog, Classifier, HttpFetcher};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let catalog = match &args.config {
        Some(path) => Catalog::load(path)?,
        None => Catalog::default_catalog(),
    };

    if args.dump_config {
        print!("{}", catalog.to_yaml()?);
        return Ok(());
    }

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let classifier = Classifier::new(&catalog.keywords)?;
    let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout_secs))?;
    debug!(timeout = ?fetcher.timeout(), "HTTP client ready");
    let aggregator = Aggregator::new(fetcher, classifier).with_concurrency(args.concurrency);
    info!(
        sources = catalog.sources.len(),
        concurrency = aggregator.concurrency(),
        "Starting run"
    );

    let run_date = Local::now().date_naive();
    let mut report = aggregator.run_on(&catalog.sources, run_date).await;

    let before = report.items.len();
    report.items = dedupe(report.items, args.dedupe);
    if report.items.len() != before {
        info!(
            dedupe = ?args.dedupe,
            removed = before - report.items.len(),
            "Dropped duplicate headlines"
        );
    }

    let csv_path = csv::write_csv(&report.items, &args.output_dir, run_date).await?;
    if args.json {
        if let Err(e) = json::write_report(&report, &args.output_dir, run_date).await {
            error!(error = %e, "Failed to write JSON report");
        }
    }

    if report.items.is_empty() {
        println!("No relevant news found.");
    } else {
        for item in &report.items {
            println!("[{}] {} - {}", item.source, item.title, item.url);
        }
        println!("Found {} relevant headlines.", report.items.len());
    }
    for outcome in report.outcomes.iter().filter(|o| !o.is_ok()) {
        if let Some(failure) = &outcome.error {
            eprintln!("warning: {} skipped ({}): {}", outcome.source, failure.kind, failure.message);
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        csv = %csv_path.display(),
        items = report.items.len(),
        sources_ok = report.sources_ok(),
        sources_failed = report.sources_failed(),
        "Execution complete"
    );
    Ok(())
}
