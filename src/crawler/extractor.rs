//! Reference extraction
//!
//! Two independent scans over a parsed document:
//! - assets: `link[href]`, `script[src]`, `img[src]` and the candidate lists
//!   of `img[srcset]` / `source[srcset]`
//! - links: `a[href]`, minus pure fragment references
//!
//! Both resolve relative references against the document's own URL and drop
//! anything that is not HTTP(S).

use crate::document::{parse_candidate_list, Document, TagKind};
use crate::url::resolve_reference;
use std::collections::HashSet;
use url::Url;

/// Extracts the absolute URLs of all assets referenced by a document
///
/// # Example
///
/// ```
/// use site_mirror::crawler::extract_assets;
/// use site_mirror::document::parse_html;
/// use url::Url;
///
/// let document = parse_html(br#"<img src="logo.png" srcset="logo@2x.png 2x">"#);
/// let base = Url::parse("http://example.com/about/").unwrap();
/// let assets = extract_assets(&document, &base);
/// assert!(assets.contains(&Url::parse("http://example.com/about/logo@2x.png").unwrap()));
/// ```
pub fn extract_assets(document: &Document, base_url: &Url) -> HashSet<Url> {
    let mut assets = HashSet::new();

    for element in document.elements() {
        let Some(kind) = element.kind().filter(|kind| kind.is_asset()) else {
            continue;
        };

        if let Some(attr) = kind.reference_attr() {
            let reference = element.attr_value(attr);
            if let Some(url) = reference
                .as_ref()
                .and_then(|value| value.first())
                .and_then(|value| resolve_reference(base_url, value))
            {
                assets.insert(url);
            }
        }

        if let Some(attr) = kind.candidate_list_attr() {
            let Some(value) = element.attr_value(attr) else {
                continue;
            };
            let joined = value.joined();
            for candidate in parse_candidate_list(&joined) {
                if let Some(url) = resolve_reference(base_url, candidate.url) {
                    assets.insert(url);
                }
            }
        }
    }

    assets
}

/// Extracts the absolute URLs of all hyperlinks in a document
///
/// Links come back in document order with duplicates removed, so the crawl
/// visits siblings the same way on every run. Fragment-only references
/// (`#section`) are skipped and fragments are stripped from the rest. Origin
/// filtering is left to the caller.
pub fn extract_links(document: &Document, base_url: &Url) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.elements() {
        if element.kind() != Some(TagKind::Anchor) {
            continue;
        }
        let Some(value) = element.attr_value("href") else {
            continue;
        };
        let Some(href) = value.first().map(str::trim) else {
            continue;
        };
        if href.starts_with('#') {
            continue;
        }
        if let Some(url) = resolve_reference(base_url, href) {
            if seen.insert(url.clone()) {
                links.push(url);
            }
        }
    }

    links
}
