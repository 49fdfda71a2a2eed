//! Source adapters: turn a source's markup into headline candidates.
//!
//! Every outlet is described by a [`SourceConfig`](crate::config::SourceConfig)
//! rather than a dedicated module, so adding an outlet is a catalog change.
//! The adapter supports two selection strategies:
//!
//! | Rule | Matches |
//! |------|---------|
//! | `BySelector` | elements matching a CSS selector, e.g. `article h2 a` |
//! | `ByTagAndClass` | elements with the given tag carrying the given class |
//!
//! Extraction does not classify. It returns every usable `(title, link)`
//! pair and leaves relevance to [`crate::classifier`].

pub mod extract;

pub use extract::extract;
