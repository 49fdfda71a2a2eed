//! Optional cross-source deduplication.
//!
//! Several outlets republish the same wire story, so a run may contain the
//! same headline more than once. This stage is off by default and runs after
//! aggregation. The first occurrence wins and catalog order is kept.

use crate::models::NewsItem;
use clap::ValueEnum;
use itertools::Itertools;
use url::Url;

/// What makes two items duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DedupeKey {
    /// Keep everything.
    #[default]
    #[value(name = "none")]
    Off,
    /// Same normalized URL.
    Url,
    /// Same case- and whitespace-folded title on the same date.
    Title,
}

pub fn dedupe(items: Vec<NewsItem>, key: DedupeKey) -> Vec<NewsItem> {
    match key {
        DedupeKey::Off => items,
        DedupeKey::Url => items.into_iter().unique_by(|i| normalize_url(&i.url)).collect(),
        DedupeKey::Title => items
            .into_iter()
            .unique_by(|i| (normalize_title(&i.title), i.extracted_on))
            .collect(),
    }
}

/// Lower-cased scheme and host, no fragment, no trailing slash.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_fragment(None);
            let mut s = url.to_string();
            while s.ends_with('/') && !s.ends_with("://") {
                s.pop();
            }
            s
        }
        Err(_) => raw.trim().trim_end_matches('/').to_string(),
    }
}

fn normalize_title(title: &str) -> String {
    title.split_whitespace().join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(source: &str, title: &str, url: &str) -> NewsItem {
        NewsItem {
            source: source.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            extracted_on: NaiveDate::from_ymd_opt(2025, 5, 6).unwrap(),
        }
    }

    #[test]
    fn test_none_keeps_everything() {
        let items = vec![
            item("A", "Solar", "https://x.com/a"),
            item("B", "Solar", "https://x.com/a"),
        ];
        assert_eq!(dedupe(items.clone(), DedupeKey::Off), items);
    }

    #[test]
    fn test_url_dedupe_keeps_first_occurrence() {
        let items = vec![
            item("A", "Planta solar", "https://EXAMPLE.com/nota/#comentarios"),
            item("B", "Otra cosa", "https://example.com/otra"),
            item("C", "Planta solar (EFE)", "https://example.com/nota"),
        ];
        let out = dedupe(items, DedupeKey::Url);
        let sources: Vec<_> = out.iter().map(|i| i.source.as_str()).collect();
        assert_eq!(sources, vec!["A", "B"]);
    }

    #[test]
    fn test_url_dedupe_respects_query() {
        let items = vec![
            item("A", "x", "https://example.com/n?id=1"),
            item("B", "x", "https://example.com/n?id=2"),
        ];
        assert_eq!(dedupe(items, DedupeKey::Url).len(), 2);
    }

    #[test]
    fn test_title_dedupe_folds_case_and_whitespace() {
        let items = vec![
            item("A", "Récord de  eólica", "https://a.com/1"),
            item("B", "RÉCORD de eólica", "https://b.com/2"),
            item("C", "Récord solar", "https://c.com/3"),
        ];
        let out = dedupe(items, DedupeKey::Title);
        let sources: Vec<_> = out.iter().map(|i| i.source.as_str()).collect();
        assert_eq!(sources, vec!["A", "C"]);
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("HTTPS://Example.COM/a/"), "https://example.com/a");
        assert_eq!(normalize_url("https://example.com/"), "https://example.com");
        assert_eq!(normalize_url("not a url/"), "not a url");
    }
}
