//! Console progress lines
//!
//! These go straight to stdout, independent of the log level.

use crate::output::UrlOutcome;
use crate::state::PageState;
use url::Url;

/// Formats the progress line for a URL that reached a terminal state
///
/// # Examples
///
/// ```
/// use site_mirror::output::{format_outcome, UrlOutcome};
/// use site_mirror::PageState;
/// use url::Url;
///
/// let url = Url::parse("http://example.com/about").unwrap();
/// let outcome = UrlOutcome::new(url, 1, PageState::CrawledOnly);
/// assert_eq!(format_outcome(&outcome), "[•] Crawled only (depth 1): http://example.com/about");
/// ```
pub fn format_outcome(outcome: &UrlOutcome) -> String {
    let marker = outcome.state.marker();
    let url = &outcome.url;
    let depth = outcome.depth;

    match outcome.state {
        PageState::StoredAsAsset => format!("{} Saved asset: {}", marker, url),
        PageState::AnalyzedAndStored => format!("{} Analyzed (depth {}): {}", marker, depth, url),
        PageState::CrawledOnly => format!("{} Crawled only (depth {}): {}", marker, depth, url),
        PageState::Failed => format!(
            "{} Error at {}: {}",
            marker,
            url,
            outcome.detail.as_deref().unwrap_or("unknown error")
        ),
        PageState::Queued | PageState::Fetching => format!("{} {}: {}", marker, outcome.state, url),
    }
}

/// Formats the progress line for an asset saved while analyzing a page
pub fn format_asset_saved(url: &Url) -> String {
    format!("{} Saved asset: {}", PageState::StoredAsAsset.marker(), url)
}

pub fn report_outcome(outcome: &UrlOutcome) {
    println!("{}", format_outcome(outcome));
}

pub fn report_asset_saved(url: &Url) {
    println!("{}", format_asset_saved(url));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://example.com/blog/").unwrap()
    }

    #[test]
    fn test_format_terminal_states() {
        assert_eq!(
            format_outcome(&UrlOutcome::new(url(), 0, PageState::StoredAsAsset)),
            "[+] Saved asset: https://example.com/blog/"
        );
        assert_eq!(
            format_outcome(&UrlOutcome::new(url(), 2, PageState::AnalyzedAndStored)),
            "[✓] Analyzed (depth 2): https://example.com/blog/"
        );
        assert_eq!(
            format_outcome(&UrlOutcome::new(url(), 0, PageState::CrawledOnly)),
            "[•] Crawled only (depth 0): https://example.com/blog/"
        );
    }

    #[test]
    fn test_format_failure_includes_message() {
        let outcome =
            UrlOutcome::new(url(), 1, PageState::Failed).with_detail("HTTP 404 for https://example.com/blog/");
        assert_eq!(
            format_outcome(&outcome),
            "[!] Error at https://example.com/blog/: HTTP 404 for https://example.com/blog/"
        );
    }

    #[test]
    fn test_format_asset_saved() {
        let asset = Url::parse("https://example.com/a.css").unwrap();
        assert_eq!(format_asset_saved(&asset), "[+] Saved asset: https://example.com/a.css");
    }
}
