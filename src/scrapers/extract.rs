//! HTML extraction shared by every configured source.
//!
//! # Link Resolution
//!
//! - Links that already carry a scheme are kept as-is (only `http`/`https`
//!   are accepted; `javascript:`, `mailto:` and the like are dropped).
//! - With a `link_prefix`, relative links become `link_prefix + link`. A `/`
//!   goes in between when the prefix is a bare origin and the link is
//!   path-relative, so `nota.html` never fuses into the host name.
//! - Without one, relative links are resolved against the source page URL.

use crate::config::{SelectionRule, SourceConfig};
use crate::error::ExtractError;
use crate::models::Candidate;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Extract headline candidates from `markup` using the source's selection rule.
///
/// Elements with no visible text or no usable link are skipped. The only
/// error is an unparseable CSS selector.
#[instrument(level = "debug", skip_all, fields(source = %source.name))]
pub fn extract(markup: &str, source: &SourceConfig) -> Result<Vec<Candidate>, ExtractError> {
    let document = Html::parse_document(markup);

    let elements: Vec<ElementRef> = match &source.rule {
        SelectionRule::BySelector(selector) => {
            let selector =
                Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
                    selector: selector.clone(),
                    reason: e.to_string(),
                })?;
            document.select(&selector).collect()
        }
        SelectionRule::ByTagAndClass { tag, class } => {
            let tag = tag.to_ascii_lowercase();
            document
                .root_element()
                .descendants()
                .filter_map(ElementRef::wrap)
                .filter(|el| el.value().name() == tag && el.value().classes().any(|c| c == class.as_str()))
                .collect()
        }
    };

    let matched = elements.len();
    let candidates: Vec<Candidate> = elements
        .into_iter()
        .filter_map(|el| {
            let title = visible_text(&el);
            if title.is_empty() {
                return None;
            }
            let raw = href_of(&el)?;
            let link = resolve_link(raw, source)?;
            Some(Candidate { title, link })
        })
        .collect();

    debug!(matched, candidates = candidates.len(), "Extracted candidates");
    Ok(candidates)
}

/// Concatenated text of an element with whitespace runs collapsed.
fn visible_text(el: &ElementRef) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The element's own `href`, or the first descendant anchor's.
fn href_of<'a>(el: &ElementRef<'a>) -> Option<&'a str> {
    let href = el
        .value()
        .attr("href")
        .or_else(|| {
            el.select(&ANCHOR_SELECTOR)
                .next()
                .and_then(|a| a.value().attr("href"))
        })?
        .trim();
    (!href.is_empty()).then_some(href)
}

/// Make `link` absolute, or drop it when that is not possible.
pub fn resolve_link(link: &str, source: &SourceConfig) -> Option<String> {
    if let Ok(absolute) = Url::parse(link) {
        return matches!(absolute.scheme(), "http" | "https").then(|| link.to_string());
    }
    match &source.link_prefix {
        Some(prefix) if is_bare_origin(prefix) && !link.starts_with('/') => {
            Some(format!("{prefix}/{link}"))
        }
        Some(prefix) => Some(format!("{prefix}{link}")),
        None => Url::parse(&source.url)
            .and_then(|base| base.join(link))
            .ok()
            .map(String::from),
    }
}

/// `https://host` with nothing after the authority.
fn is_bare_origin(prefix: &str) -> bool {
    Url::parse(prefix).is_ok_and(|u| u.path() == "/" && !prefix.ends_with('/'))
}
