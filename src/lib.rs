//! # Energy News
//!
//! Aggregates energy-sector headlines from many independently formatted news
//! sites, keeps only the ones relevant to the topic, and exports them as CSV.
//!
//! ## Architecture
//!
//! 1. **Fetching**: download each source page with browser-like headers ([`fetcher`])
//! 2. **Extraction**: pull `(title, link)` candidates using the source's selection rule ([`scrapers`])
//! 3. **Classification**: keep titles with an inclusion term and no exclusion term ([`classifier`])
//! 4. **Aggregation**: merge sources in catalog order, stamping the run date ([`aggregator`])
//! 5. **Output**: optional dedup ([`dedupe`]), then CSV/JSON export ([`outputs`])
//!
//! Failures are contained per source: the worst a run can produce is an
//! empty list.
//!
//! ```no_run
//! use energy_news::{Aggregator, Catalog, Classifier, HttpFetcher};
//! use energy_news::fetcher::DEFAULT_TIMEOUT;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::default_catalog();
//! let classifier = Classifier::new(&catalog.keywords)?;
//! let aggregator = Aggregator::new(HttpFetcher::new(DEFAULT_TIMEOUT)?, classifier);
//! let items = aggregator.run(&catalog.sources).await;
//! let csv = energy_news::outputs::csv::to_delimited_text(&items)?;
//! # Ok(()) }
//! ```

pub mod aggregator;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod outputs;
pub mod scrapers;
pub mod utils;

pub use aggregator::Aggregator;
pub use classifier::Classifier;
pub use config::{Catalog, KeywordSet, SelectionRule, SourceConfig};
pub use fetcher::{Fetch, HttpFetcher};
pub use models::{Candidate, NewsItem, RunReport, SourceOutcome};
