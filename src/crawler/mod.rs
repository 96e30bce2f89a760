//! Crawler module for mirroring a site
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and verbatim storage of resources
//! - Content classification and reference extraction
//! - Rewriting references to point at local copies
//! - The breadth-first frontier and overall crawl coordination

mod classify;
mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod rewriter;

pub use classify::{classify_content, normalize_content_type, ContentClass};
pub use coordinator::{project_root, run_crawl, Coordinator};
pub use extractor::{extract_assets, extract_links};
pub use fetcher::{
    build_http_client, fetch_and_store, fetch_url, store_resource, FetchedResource, StoredResource,
};
pub use frontier::{Frontier, QueuedUrl};
pub use rewriter::rewrite_references;
