//! Data models flowing through the pipeline.
//!
//! - [`Candidate`]: an unfiltered `(title, link)` pair pulled out of markup
//! - [`NewsItem`]: a relevant headline, stamped with its source and the run date
//! - [`SourceOutcome`] / [`RunReport`]: per-source observability for one run

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A headline candidate extracted from one matched element.
///
/// Candidates only exist between extraction and classification. The adapter
/// never emits one with an empty title or a missing link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    /// Absolute link to the article.
    pub link: String,
}

/// A relevant headline, as exported.
///
/// Field names serialize to the export header `source, title, url, extractedOn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Name of the outlet the headline came from.
    pub source: String,
    pub title: String,
    /// Always absolute.
    pub url: String,
    /// Date the run extracted the headline (not its publication date).
    #[serde(rename = "extractedOn")]
    pub extracted_on: NaiveDate,
}

/// What happened to one source during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOutcome {
    pub source: String,
    /// Candidates extracted from the page.
    pub candidates: usize,
    /// Candidates that passed the classifier.
    pub relevant: usize,
    /// Present when the source failed and contributed nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SourceFailure>,
}

/// Serializable summary of a [`crate::error::SourceError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    /// `"fetch"` or `"parse"`.
    pub kind: String,
    pub message: String,
}

impl SourceOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of one complete pass over the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Relevant items in catalog order.
    pub items: Vec<NewsItem>,
    /// One entry per configured source, in catalog order.
    pub outcomes: Vec<SourceOutcome>,
}

impl RunReport {
    pub fn sources_ok(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn sources_failed(&self) -> usize {
        self.outcomes.len() - self.sources_ok()
    }
}
