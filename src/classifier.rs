//! Keyword relevance classifier.
//!
//! A headline is relevant when it mentions at least one inclusion term and
//! no exclusion term. Matching is case-insensitive and respects Unicode word
//! boundaries, so `ira` never matches inside `mira`.
//!
//! Each term list is compiled into a single alternation regex when the
//! classifier is built; [`Classifier::is_relevant`] does no allocation.

use crate::config::KeywordSet;
use crate::error::ConfigError;
use regex::{Regex, RegexBuilder};

/// Compiled inclusion and exclusion matchers.
#[derive(Debug, Clone)]
pub struct Classifier {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl Classifier {
    pub fn new(keywords: &KeywordSet) -> Result<Self, ConfigError> {
        Ok(Self {
            include: compile_terms(&keywords.inclusion_terms)?,
            exclude: compile_terms(&keywords.exclusion_terms)?,
        })
    }

    pub fn is_relevant(&self, title: &str) -> bool {
        let included = self.include.as_ref().is_some_and(|re| re.is_match(title));
        included && !self.exclude.as_ref().is_some_and(|re| re.is_match(title))
    }
}

/// Build `\b(?:t1|t2|...)\b`; `None` for an empty list, which matches nothing.
fn compile_terms(terms: &[String]) -> Result<Option<Regex>, ConfigError> {
    let mut escaped: Vec<String> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(regex::escape)
        .collect();
    if escaped.is_empty() {
        return Ok(None);
    }
    // Longest first so multi-word phrases win over their prefixes.
    escaped.sort_by_key(|t| std::cmp::Reverse(t.len()));

    let pattern = format!(r"\b(?:{})\b", escaped.join("|"));
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .unicode(true)
        .build()?;
    Ok(Some(re))
}
