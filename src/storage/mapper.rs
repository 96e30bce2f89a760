//! URL to local path mapping
//!
//! The mapping is a pure function of the URL and an optional content-type
//! hint, so the same asset discovered from several pages always lands in
//! the same file.

use crate::crawler::normalize_content_type;
use percent_encoding::percent_decode_str;
use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};
use url::Url;

/// File name used for directory-like URLs
const INDEX_NAME: &str = "index";

/// Extension used when neither the path nor the content type provide one
const DEFAULT_EXTENSION: &str = "html";

/// Number of hex characters of the query digest kept in file names
const QUERY_SUFFIX_LEN: usize = 12;

/// Content types with a well-known file extension
const CONTENT_TYPE_EXTENSIONS: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
    ("image/svg+xml", "svg"),
    ("image/bmp", "bmp"),
    ("image/x-icon", "ico"),
    ("application/pdf", "pdf"),
    ("text/css", "css"),
    ("application/javascript", "js"),
    ("text/javascript", "js"),
];

/// Looks up the file extension for a content type
///
/// Parameters such as `; charset=utf-8` are ignored.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let normalized = normalize_content_type(content_type);
    CONTENT_TYPE_EXTENSIONS
        .iter()
        .find(|(mime, _)| *mime == normalized)
        .map(|(_, ext)| *ext)
}

/// Maps a URL to a path relative to the project root
///
/// # Mapping Steps
///
/// 1. Percent-decode the path and strip leading slashes
/// 2. Append `index` if the path is empty or ends with `/`
/// 3. Add an extension from the content type (or `.html`) if there is none
/// 4. Insert `__<first 12 hex chars of SHA-1(query)>` before the extension
///    when the URL has a query string
///
/// `.` and `..` segments are dropped so the result never leaves the root.
///
/// # Examples
///
/// ```
/// use site_mirror::storage::map_url_to_path;
/// use std::path::PathBuf;
/// use url::Url;
///
/// let url = Url::parse("http://example.com/blog/").unwrap();
/// assert_eq!(map_url_to_path(&url, None), PathBuf::from("blog/index.html"));
/// ```
pub fn map_url_to_path(url: &Url, content_type: Option<&str>) -> PathBuf {
    let decoded = percent_decode_str(url.path()).decode_utf8_lossy();
    let mut path = decoded.trim_start_matches('/').to_string();

    if path.is_empty() || path.ends_with('/') {
        path.push_str(INDEX_NAME);
    }

    let mut relative: PathBuf = path
        .split('/')
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .collect();
    if relative.as_os_str().is_empty() {
        relative = PathBuf::from(INDEX_NAME);
    }

    if relative.extension().is_none() {
        let ext = content_type
            .and_then(extension_for_content_type)
            .unwrap_or(DEFAULT_EXTENSION);
        relative.set_extension(ext);
    }

    match url.query() {
        Some(query) if !query.is_empty() => append_query_suffix(&relative, query),
        _ => relative,
    }
}

/// Inserts the query digest between the file stem and its extension
fn append_query_suffix(path: &Path, query: &str) -> PathBuf {
    let digest = hex::encode(Sha1::digest(query.as_bytes()));
    let suffix = &digest[..QUERY_SUFFIX_LEN];

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{}__{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}__{}", stem, suffix),
    };

    path.with_file_name(file_name)
}
