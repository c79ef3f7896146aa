//! HTML parser for extracting links and assets
//!
//! This module scans a fetched page for every resource the link checker
//! should validate:
//! - `<a href="...">` anchors
//! - `<img src="...">` images
//! - `<link rel="stylesheet" href="...">` stylesheets
//! - `<script src="...">` scripts

use crate::url::normalize_url;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use tracing::trace;
use url::Url;

/// Selector and the attribute holding the link for each extracted element
const LINK_SOURCES: &[(&str, &str)] = &[
    ("a[href]", "href"),
    ("img[src]", "src"),
    ("link[rel~='stylesheet'][href]", "href"),
    ("script[src]", "src"),
];

/// Extracts all candidate links from an HTML document
///
/// Every raw value is normalized relative to `page_url`. Values that are not
/// valid crawl targets (`mailto:`, `javascript:`, unparsable, ...) are dropped
/// silently. Duplicates collapse because the result is a set.
///
/// # Example
///
/// ```
/// use site_health::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/about#team">About</a><img src="logo.png">"#;
/// let page = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &page);
/// assert!(links.contains(&Url::parse("https://example.com/about").unwrap()));
/// assert!(links.contains(&Url::parse("https://example.com/logo.png").unwrap()));
/// ```
pub fn extract_links(html: &str, page_url: &Url) -> BTreeSet<Url> {
    let document = Html::parse_document(html);
    let mut links = BTreeSet::new();

    for (selector, attribute) in LINK_SOURCES {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };

        for element in document.select(&selector) {
            let Some(raw) = element.value().attr(attribute) else {
                continue;
            };

            match normalize_url(raw, page_url) {
                Ok(url) => {
                    links.insert(url);
                }
                Err(e) => trace!("Dropping link {:?} on {}: {}", raw, page_url, e),
            }
        }
    }

    links
}
