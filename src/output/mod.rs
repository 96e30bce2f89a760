//! Output module for console progress and crawl summaries
//!
//! This module handles:
//! - One progress line per URL as it reaches a terminal state
//! - Recording per-URL outcomes into a run summary
//! - End-of-run statistics

mod console;
pub mod stats;
mod summary;

pub use console::{format_asset_saved, format_outcome, report_asset_saved, report_outcome};
pub use stats::{print_statistics, CrawlStatistics};
pub use summary::{CrawlSummary, UrlOutcome};
