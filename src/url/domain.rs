use url::Url;

/// Extracts the domain from a URL
///
/// Returns the lowercase host of the URL, or `None` if the URL has no host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mirror::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the project directory name for a host
///
/// The directory is named after the host with dots replaced by underscores,
/// so `www.example.com` is mirrored into `www_example_com`.
pub fn project_dir_name(host: &str) -> String {
    host.to_lowercase().replace('.', "_")
}

/// Checks whether two URLs share scheme and host
///
/// Ports are not considered.
pub fn is_same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme() && extract_domain(a) == extract_domain(b)
}
