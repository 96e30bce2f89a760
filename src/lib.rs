//! Site-Mirror: an offline website mirror
//!
//! This crate walks same-origin hyperlinks breadth-first from a base URL,
//! downloads pages and their assets, and rewrites in-document references so
//! the saved copy can be browsed from the local filesystem.

pub mod config;
pub mod crawler;
pub mod document;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use std::fmt;
use thiserror::Error;

/// Main error type for Site-Mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Request failed for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
}

/// Coarse failure classes used by the crawl loop to decide how to report a
/// failed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Network, timeout, DNS or HTTP status failures
    Transport,
    /// Unusable URL
    Parse,
    /// Directory creation or file write failures
    Filesystem,
    /// Configuration problems discovered at startup
    Setup,
}

impl MirrorError {
    /// Returns the failure class of this error
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport { .. } | Self::HttpStatus { .. } | Self::Reqwest(_) => {
                FailureKind::Transport
            }
            Self::UrlError(_) => FailureKind::Parse,
            Self::Storage(_) => FailureKind::Filesystem,
            Self::Config(_) => FailureKind::Setup,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Transport => "transport",
            Self::Parse => "parse",
            Self::Filesystem => "filesystem",
            Self::Setup => "setup",
        };
        f.write_str(label)
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid depth specifier: {0}")]
    InvalidDepth(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingDomain,
}

/// Result type alias for Site-Mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, DepthWindow};
pub use crawler::{run_crawl, Coordinator};
pub use state::PageState;
pub use crate::url::{is_same_origin, normalize_url, parse_base_url};
