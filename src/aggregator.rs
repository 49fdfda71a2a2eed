//! Runs every configured source and merges the relevant headlines.
//!
//! # Pipeline
//!
//! For each source, independently:
//! 1. **Fetch** the page with the configured [`Fetch`] implementation
//! 2. **Extract** `(title, link)` candidates with [`scrapers::extract`]
//! 3. **Classify** each candidate with the [`Classifier`]
//! 4. **Stamp** survivors as [`NewsItem`]s with the run date and source name
//!
//! Up to `concurrency` sources are in flight at once. Results are yielded in
//! catalog order, so the merged list never depends on which site answered
//! first. A failing source contributes zero items and a logged
//! [`SourceOutcome`] with the error kind; it never affects other sources.

use crate::classifier::Classifier;
use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::fetcher::Fetch;
use crate::models::{NewsItem, RunReport, SourceFailure, SourceOutcome};
use crate::scrapers;
use chrono::{Local, NaiveDate};
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Default number of concurrent fetches.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Upper bound on concurrent fetches.
pub const MAX_CONCURRENCY: usize = 32;

/// Headline aggregator over a fetcher and a compiled classifier.
#[derive(Debug)]
pub struct Aggregator<F> {
    fetcher: F,
    classifier: Classifier,
    concurrency: usize,
}

impl<F: Fetch> Aggregator<F> {
    pub fn new(fetcher: F, classifier: Classifier) -> Self {
        Self {
            fetcher,
            classifier,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Set the maximum number of in-flight fetches (clamped to `1..=32`).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Relevant items from every source, stamped with today's date.
    pub async fn run(&self, sources: &[SourceConfig]) -> Vec<NewsItem> {
        self.run_with_report(sources).await.items
    }

    /// Like [`Aggregator::run`], plus per-source outcomes.
    pub async fn run_with_report(&self, sources: &[SourceConfig]) -> RunReport {
        self.run_on(sources, Local::now().date_naive()).await
    }

    /// Run the catalog, stamping every item with `extracted_on`.
    #[instrument(level = "info", skip_all, fields(sources = sources.len(), concurrency = self.concurrency))]
    pub async fn run_on(&self, sources: &[SourceConfig], extracted_on: NaiveDate) -> RunReport {
        let t0 = Instant::now();

        let per_source: Vec<(Vec<NewsItem>, SourceOutcome)> = stream::iter(sources)
            .map(|source| self.process_source(source, extracted_on))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut report = RunReport::default();
        for (items, outcome) in per_source {
            report.items.extend(items);
            report.outcomes.push(outcome);
        }

        info!(
            sources_ok = report.sources_ok(),
            sources_failed = report.sources_failed(),
            items = report.items.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Run complete"
        );
        report
    }

    /// Process one source; every failure is contained here.
    async fn process_source(
        &self,
        source: &SourceConfig,
        extracted_on: NaiveDate,
    ) -> (Vec<NewsItem>, SourceOutcome) {
        match self.collect_source(source, extracted_on).await {
            Ok((candidates, items)) => {
                info!(
                    source = %source.name,
                    candidates,
                    relevant = items.len(),
                    "Source processed"
                );
                let outcome = SourceOutcome {
                    source: source.name.clone(),
                    candidates,
                    relevant: items.len(),
                    error: None,
                };
                (items, outcome)
            }
            Err(e) => {
                warn!(
                    source = %source.name,
                    url = %source.url,
                    error_kind = e.kind(),
                    error = %e,
                    "Source failed; contributing no items"
                );
                let outcome = SourceOutcome {
                    source: source.name.clone(),
                    candidates: 0,
                    relevant: 0,
                    error: Some(SourceFailure {
                        kind: e.kind().to_string(),
                        message: e.to_string(),
                    }),
                };
                (Vec::new(), outcome)
            }
        }
    }

    /// Returns the candidate count and the relevant items.
    async fn collect_source(
        &self,
        source: &SourceConfig,
        extracted_on: NaiveDate,
    ) -> Result<(usize, Vec<NewsItem>), SourceError> {
        let markup = self.fetcher.fetch(&source.url).await?;
        let candidates = scrapers::extract(&markup, source)?;
        let total = candidates.len();

        let items = candidates
            .into_iter()
            .filter(|c| self.classifier.is_relevant(&c.title))
            .map(|c| NewsItem {
                source: source.name.clone(),
                title: c.title,
                url: c.link,
                extracted_on,
            })
            .collect();
        Ok((total, items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeywordSet;
    use crate::error::FetchError;
    use std::collections::HashMap;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Serves canned pages; unknown URLs fail like a refused connection.
    #[derive(Default)]
    struct FakeFetcher {
        pages: HashMap<String, String>,
    }

    impl FakeFetcher {
        fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }
    }

    impl Fetch for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Timeout { url: url.to_string() })
        }
    }

    fn classifier() -> Classifier {
        Classifier::new(&KeywordSet::new(
            ["solar", "eólica", "renovables"],
            ["militar", "guerra"],
        ))
        .unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 6).unwrap()
    }

    const EXAMPLE_PAGE: &str = r#"
        <html><body>
          <a href="/a">Nueva planta solar inaugurada</a>
          <a href="/b">Conflicto militar en la zona</a>
        </body></html>"#;

    #[tokio::test]
    async fn test_end_to_end_single_source() {
        let source =
            SourceConfig::with_selector("Ejemplo", "https://example.com/", "a", Some("https://example.com"));
        let fetcher = FakeFetcher::default().with_page("https://example.com/", EXAMPLE_PAGE);
        let aggregator = Aggregator::new(fetcher, classifier());

        let today = Local::now().date_naive();
        let items = aggregator.run_on(&[source], today).await.items;
        assert_eq!(
            items,
            vec![NewsItem {
                source: "Ejemplo".to_string(),
                title: "Nueva planta solar inaugurada".to_string(),
                url: "https://example.com/a".to_string(),
                extracted_on: today,
            }]
        );
    }

    #[tokio::test]
    async fn test_zero_sources_is_empty_result() {
        let aggregator = Aggregator::new(FakeFetcher::default(), classifier());
        let report = aggregator.run_with_report(&[]).await;
        assert!(report.items.is_empty());
        assert!(report.outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_failing_source_is_isolated() {
        let sources = vec![
            SourceConfig::with_selector("A", "https://a.example.com/", "h2 a", None),
            SourceConfig::with_selector("B", "https://b.example.com/", "h2 a", None),
            SourceConfig::with_selector("C", "https://c.example.com/", "h2 a", None),
        ];
        let fetcher = FakeFetcher::default()
            .with_page(
                "https://b.example.com/",
                r#"<h2><a href="/1">Récord eólica</a></h2><h2><a href="/2">Tiempo</a></h2>"#,
            )
            .with_page(
                "https://c.example.com/",
                r#"<h2><a href="https://c.example.com/x">Subasta de renovables</a></h2>"#,
            );
        let aggregator = Aggregator::new(fetcher, classifier());

        let report = aggregator.run_on(&sources, day()).await;
        let titles: Vec<_> = report.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Récord eólica", "Subasta de renovables"]);
        assert_eq!(report.items[0].url, "https://b.example.com/1");
        assert!(report.items.iter().all(|i| i.extracted_on == day()));

        assert_eq!(report.sources_ok(), 2);
        assert_eq!(report.sources_failed(), 1);
        let failure = report.outcomes[0].error.as_ref().unwrap();
        assert_eq!(failure.kind, "fetch");
        assert_eq!(report.outcomes[1].candidates, 2);
        assert_eq!(report.outcomes[1].relevant, 1);
    }

    #[tokio::test]
    async fn test_parse_error_is_isolated_and_labelled() {
        let sources = vec![
            SourceConfig::with_selector("Roto", "https://a.example.com/", "h2[", None),
            SourceConfig::with_selector("Bien", "https://b.example.com/", "a", None),
        ];
        let fetcher = FakeFetcher::default()
            .with_page("https://a.example.com/", EXAMPLE_PAGE)
            .with_page("https://b.example.com/", EXAMPLE_PAGE);
        let aggregator = Aggregator::new(fetcher, classifier());

        let report = aggregator.run_on(&sources, day()).await;
        assert_eq!(report.outcomes[0].error.as_ref().unwrap().kind, "parse");
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].source, "Bien");
    }

    #[tokio::test]
    async fn test_catalog_order_preserved_with_concurrency() {
        let names = ["S0", "S1", "S2", "S3", "S4", "S5"];
        let mut fetcher = FakeFetcher::default();
        let mut sources = Vec::new();
        for name in names {
            let url = format!("https://{}.example.com/", name.to_lowercase());
            fetcher = fetcher.with_page(&url, &format!(r#"<a href="/n">Energía solar {name}</a>"#));
            sources.push(SourceConfig::with_selector(name, &url, "a", None));
        }
        let aggregator = Aggregator::new(fetcher, classifier()).with_concurrency(3);

        let items = aggregator.run_on(&sources, day()).await.items;
        let got: Vec<_> = items.iter().map(|i| i.source.as_str()).collect();
        assert_eq!(got, names);
    }

    #[test]
    fn test_concurrency_is_clamped() {
        let a = Aggregator::new(FakeFetcher::default(), classifier()).with_concurrency(0);
        assert_eq!(a.concurrency(), 1);
        let a = Aggregator::new(FakeFetcher::default(), classifier()).with_concurrency(1000);
        assert_eq!(a.concurrency(), MAX_CONCURRENCY);
    }

    #[tokio::test]
    async fn test_http_sources_with_one_failing_server() {
        use crate::fetcher::{DEFAULT_TIMEOUT, HttpFetcher};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EXAMPLE_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let sources = vec![
            SourceConfig::with_selector("Caído", &format!("{}/down", server.uri()), "a", None),
            SourceConfig::with_selector("Activo", &format!("{}/ok", server.uri()), "a", None),
        ];
        let aggregator = Aggregator::new(HttpFetcher::new(DEFAULT_TIMEOUT).unwrap(), classifier());

        let report = aggregator.run_on(&sources, day()).await;
        assert_eq!(report.sources_failed(), 1);
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].source, "Activo");
        assert_eq!(report.items[0].url, format!("{}/a", server.uri()));
    }
}
