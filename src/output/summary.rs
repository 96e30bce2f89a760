use crate::state::PageState;
use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;
use url::Url;

/// What happened to one URL taken from the frontier
#[derive(Debug, Clone)]
pub struct UrlOutcome {
    pub url: Url,

    /// Link distance from the seed URL
    pub depth: u32,

    /// Terminal state reached
    pub state: PageState,

    /// Error message for failed URLs
    pub detail: Option<String>,

    /// Where the URL was written, if it was
    pub local_path: Option<PathBuf>,
}

impl UrlOutcome {
    pub fn new(url: Url, depth: u32, state: PageState) -> Self {
        Self {
            url,
            depth,
            state,
            detail: None,
            local_path: None,
        }
    }

    pub fn with_local_path(mut self, path: PathBuf) -> Self {
        self.local_path = Some(path);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Summary of a finished mirror run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    // Run metadata
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// One entry per URL taken from the frontier, in processing order
    pub outcomes: Vec<UrlOutcome>,

    // Page-embedded assets
    pub assets_saved: u64,
    pub assets_failed: u64,
}

impl CrawlSummary {
    /// Creates an empty summary starting now
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            outcomes: Vec::new(),
            assets_saved: 0,
            assets_failed: 0,
        }
    }

    pub fn record(&mut self, outcome: UrlOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of URLs that ended in `state`
    pub fn count(&self, state: PageState) -> u64 {
        self.outcomes.iter().filter(|o| o.state == state).count() as u64
    }

    pub fn total_urls(&self) -> u64 {
        self.outcomes.len() as u64
    }

    /// Outcome recorded for `url`, if it was processed
    pub fn outcome_for(&self, url: &Url) -> Option<&UrlOutcome> {
        self.outcomes.iter().find(|o| &o.url == url)
    }

    /// Elapsed time of the run, up to now if it has not finished
    pub fn duration(&self) -> Duration {
        self.finished_at.unwrap_or_else(Utc::now) - self.started_at
    }

    /// Returns the failure rate as a percentage
    pub fn error_rate(&self) -> f64 {
        let total = self.total_urls();
        if total == 0 {
            return 0.0;
        }
        let failed = self
            .outcomes
            .iter()
            .filter(|outcome| outcome.state.is_error())
            .count();
        (failed as f64 / total as f64) * 100.0
    }
}

impl Default for CrawlSummary {
    fn default() -> Self {
        Self::new()
    }
}
