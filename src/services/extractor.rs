// src/services/extractor.rs

//! Link extraction.
//!
//! Every listing page on the transit site is a set of anchors sharing one
//! marker class. The anchor's `title` is the entity name and its `href` ends
//! with the entity id (`...r=02`, `...d=1`, `...s=1234`).

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};

/// Message for an anchor whose href lacks the expected id suffix.
pub const UNRECOGNIZED_URL: &str = "unrecognized route URL format";

/// A (label, id) pair read from one anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub id: String,
}

/// Pulls (label, id) pairs out of marker anchors.
pub struct LinkExtractor {
    selector: Selector,
}

impl LinkExtractor {
    /// Create an extractor for anchors matching `selector`.
    pub fn new(selector: &str) -> Result<Self> {
        let selector =
            Selector::parse(selector).map_err(|e| AppError::selector(selector, format!("{e:?}")))?;
        Ok(Self { selector })
    }

    /// Extract links in document order.
    ///
    /// Fails on the first anchor whose href does not match `pattern`; no
    /// partial result is returned in that case.
    pub fn extract(&self, document: &Html, pattern: &Regex) -> Result<Vec<Link>> {
        document
            .select(&self.selector)
            .map(|anchor| -> Result<Link> {
                let attrs = anchor.value();
                let href = attrs.attr("href").unwrap_or("");
                let id = pattern
                    .captures(href)
                    .and_then(|caps| caps.get(1))
                    .ok_or_else(|| {
                        log::debug!("No id in href '{}' (pattern {})", href, pattern.as_str());
                        AppError::format(UNRECOGNIZED_URL)
                    })?;

                Ok(Link {
                    label: attrs.attr("title").unwrap_or("").to_string(),
                    id: id.as_str().to_string(),
                })
            })
            .collect()
    }

    /// Parse `html` and extract links from it.
    pub fn extract_html(&self, html: &str, pattern: &Regex) -> Result<Vec<Link>> {
        let document = Html::parse_document(html);
        self.extract(&document, pattern)
    }
}
