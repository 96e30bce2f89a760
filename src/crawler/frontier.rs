//! Frontier for the breadth-first crawl
//!
//! This module handles:
//! - FIFO queue management for URLs to crawl
//! - The visited set, so each URL is fetched at most once per run
//! - Depth limiting, so nothing beyond the window's maximum is ever queued

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL queued for fetching with its link distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The URL to fetch
    pub url: Url,

    /// Link distance from the seed URL (seed is 0)
    pub depth: u32,
}

/// Frontier manages the crawl queue and the visited set
///
/// URLs come out in insertion order, so every page at depth `d` is fetched
/// before any page at depth `d + 1`.
#[derive(Debug)]
pub struct Frontier {
    /// Pending URLs, oldest first
    queue: VecDeque<QueuedUrl>,

    /// URLs already handed out for fetching
    visited: HashSet<Url>,

    /// Deepest depth that may be queued
    max_depth: u32,
}

impl Frontier {
    /// Creates a frontier holding only the seed URL at depth 0
    pub fn new(seed: Url, max_depth: u32) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(QueuedUrl {
            url: seed,
            depth: 0,
        });

        Self {
            queue,
            visited: HashSet::new(),
            max_depth,
        }
    }

    /// Queues a URL discovered at `depth`
    ///
    /// URLs already visited or deeper than the maximum are ignored. A URL
    /// may sit in the queue more than once; the duplicate is dropped when
    /// popped.
    ///
    /// # Returns
    ///
    /// `true` if the URL was queued
    pub fn push(&mut self, url: Url, depth: u32) -> bool {
        if depth > self.max_depth || self.visited.contains(&url) {
            return false;
        }

        self.queue.push_back(QueuedUrl { url, depth });
        true
    }

    /// Gets the next URL to fetch and marks it visited
    ///
    /// # Returns
    ///
    /// * `Some(QueuedUrl)` - A URL that has not been fetched yet
    /// * `None` - The frontier is exhausted
    pub fn next_url(&mut self) -> Option<QueuedUrl> {
        while let Some(queued) = self.queue.pop_front() {
            if queued.depth > self.max_depth {
                continue;
            }
            if !self.visited.insert(queued.url.clone()) {
                tracing::trace!("Skipping already visited {}", queued.url);
                continue;
            }
            return Some(queued);
        }
        None
    }

    /// Number of queued entries, duplicates included
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url)
    }
}
