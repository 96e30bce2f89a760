//! URL handling module for Site-Mirror
//!
//! This module provides URL normalization, reference resolution, origin
//! comparison and project directory naming.

mod domain;
mod normalize;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, is_same_origin, project_dir_name};
pub use normalize::{normalize_url, resolve_reference, strip_fragment};

/// Validates and normalizes the base URL given on the command line
///
/// The raw string must start with `http://` or `https://`; anything else is
/// rejected before parsing so that inputs such as `example.com` produce a
/// scheme error rather than a confusing parse error.
///
/// # Examples
///
/// ```
/// use site_mirror::url::parse_base_url;
///
/// assert!(parse_base_url("https://example.com").is_ok());
/// assert!(parse_base_url("example.com").is_err());
/// ```
pub fn parse_base_url(raw: &str) -> UrlResult<Url> {
    let lowered = raw.trim_start().to_ascii_lowercase();
    if !lowered.starts_with("http://") && !lowered.starts_with("https://") {
        return Err(UrlError::InvalidScheme(format!(
            "base URL must start with http:// or https://, got '{}'",
            raw
        )));
    }

    normalize_url(raw.trim())
}
