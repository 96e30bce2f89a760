//! Statistics generation from a crawl summary
//!
//! This module provides functionality for deriving and displaying
//! end-of-run statistics.

use crate::output::CrawlSummary;
use crate::state::PageState;
use std::collections::{BTreeMap, HashMap};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Total number of URLs taken from the frontier
    pub total_urls: u64,

    /// Count of URLs by terminal state
    pub urls_by_state: HashMap<PageState, u64>,

    /// Count of URLs by depth
    pub urls_by_depth: BTreeMap<u32, u64>,

    /// Page-embedded assets saved and failed
    pub assets_saved: u64,
    pub assets_failed: u64,

    /// Wall-clock duration of the run in seconds
    pub duration_seconds: f64,
}

impl CrawlStatistics {
    /// Derives statistics from a run summary
    pub fn from_summary(summary: &CrawlSummary) -> Self {
        let mut urls_by_state = HashMap::new();
        let mut urls_by_depth = BTreeMap::new();

        for outcome in &summary.outcomes {
            *urls_by_state.entry(outcome.state).or_insert(0) += 1;
            *urls_by_depth.entry(outcome.depth).or_insert(0) += 1;
        }

        Self {
            total_urls: summary.total_urls(),
            urls_by_state,
            urls_by_depth,
            assets_saved: summary.assets_saved,
            assets_failed: summary.assets_failed,
            duration_seconds: summary.duration().num_milliseconds() as f64 / 1000.0,
        }
    }

    pub fn count(&self, state: PageState) -> u64 {
        self.urls_by_state.get(&state).copied().unwrap_or(0)
    }
}

/// Prints statistics to stdout
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!();
    println!("=== Mirror Statistics ===\n");

    println!("Overview:");
    println!("  URLs processed: {}", stats.total_urls);
    println!("  Embedded assets saved: {}", stats.assets_saved);
    if stats.assets_failed > 0 {
        println!("  Embedded assets failed: {}", stats.assets_failed);
    }
    println!("  Elapsed: {:.1}s", stats.duration_seconds);
    println!();

    println!("URLs by State:");
    let mut state_counts: Vec<_> = stats.urls_by_state.iter().collect();
    state_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));

    for (state, count) in state_counts {
        let percentage = if stats.total_urls > 0 {
            (*count as f64 / stats.total_urls as f64) * 100.0
        } else {
            0.0
        };
        println!("  {} {}: {} ({:.1}%)", state.marker(), state, count, percentage);
    }
    println!();

    if !stats.urls_by_depth.is_empty() {
        println!("URLs by Depth:");
        for (depth, count) in &stats.urls_by_depth {
            println!("  {}: {}", depth, count);
        }
    }
}
