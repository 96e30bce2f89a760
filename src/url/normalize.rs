use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a URL according to Site-Mirror's identity rules
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not HTTP or HTTPS
/// 3. Require a host
/// 4. Remove fragment (everything after #)
///
/// Scheme and host are lower-cased by the parser itself. The path and query
/// are left exactly as given: they feed the local path layout, so rewriting
/// them here would merge distinct files.
///
/// # Examples
///
/// ```
/// use site_mirror::url::normalize_url;
///
/// let url = normalize_url("HTTP://Example.COM/page/#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page/");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    check_url(url)
}

/// Resolves a (possibly relative) reference against a base URL
///
/// Returns `None` for references that cannot be resolved or that resolve to
/// something other than HTTP(S), such as `data:`, `mailto:` or `javascript:`.
/// The fragment is removed from the result.
pub fn resolve_reference(base: &Url, reference: &str) -> Option<Url> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    base.join(reference).ok().and_then(|url| check_url(url).ok())
}

/// Returns a copy of the URL without its fragment
pub fn strip_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

fn check_url(mut url: Url) -> UrlResult<Url> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    Ok(url)
}
