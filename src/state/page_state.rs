/// Page state definitions for tracking crawl progress
///
/// This module defines all possible states a URL can be in during a mirror run.
use std::fmt;

/// Represents the current state of a URL in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// URL is in the frontier, waiting to be fetched
    Queued,

    /// URL is currently being fetched or processed
    Fetching,

    // ===== Terminal Success States =====
    /// Non-page resource stored verbatim
    StoredAsAsset,

    /// Page inside the depth window: assets saved, references rewritten, page written
    AnalyzedAndStored,

    /// Page outside the depth window: links followed, nothing written
    CrawledOnly,

    // ===== Terminal Error States =====
    /// Fetch, parse or write failed; the crawl went on without it
    Failed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Queued | Self::Fetching)
    }

    /// Returns true if the page contents ended up on disk
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::StoredAsAsset | Self::AnalyzedAndStored)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Console marker printed in front of the URL's progress line
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Queued | Self::Fetching => "[ ]",
            Self::StoredAsAsset => "[+]",
            Self::AnalyzedAndStored => "[✓]",
            Self::CrawledOnly => "[•]",
            Self::Failed => "[!]",
        }
    }

    /// Short machine-friendly name, used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Fetching => "fetching",
            Self::StoredAsAsset => "stored_as_asset",
            Self::AnalyzedAndStored => "analyzed_and_stored",
            Self::CrawledOnly => "crawled_only",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Queued,
            Self::Fetching,
            Self::StoredAsAsset,
            Self::AnalyzedAndStored,
            Self::CrawledOnly,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
