//! Content classification
//!
//! Decides from a response's content type (and the URL path) whether a
//! resource is a page to analyze or an opaque file to store verbatim.

use url::Url;

/// How a fetched resource is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentClass {
    /// HTML or XHTML, parsed leniently
    Markup,
    /// XML, parsed strictly with a lenient fallback
    Xml,
    /// Anything else, stored as-is
    Opaque,
}

impl ContentClass {
    /// Returns true for resources that are parsed for links
    pub fn is_page(self) -> bool {
        !matches!(self, Self::Opaque)
    }
}

/// Reduces a Content-Type header to its lowercase media type
///
/// # Examples
///
/// ```
/// use site_mirror::crawler::normalize_content_type;
///
/// assert_eq!(normalize_content_type("Text/HTML; charset=UTF-8"), "text/html");
/// ```
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Classifies a resource from its content type and URL
///
/// XML wins over markup: a `.xml` path is treated as XML whatever the
/// server claims.
pub fn classify_content(content_type: &str, url: &Url) -> ContentClass {
    let media_type = normalize_content_type(content_type);

    let xml_path = url.path().to_ascii_lowercase().ends_with(".xml");
    if xml_path || matches!(media_type.as_str(), "application/xml" | "text/xml") {
        return ContentClass::Xml;
    }

    match media_type.as_str() {
        "text/html" | "application/xhtml+xml" => ContentClass::Markup,
        _ => ContentClass::Opaque,
    }
}
