//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: Tracks the state of each URL taken from the frontier
//!   (queued, fetching, stored, analyzed, crawled only, failed)

mod page_state;

pub use page_state::PageState;
