//! Configuration module for Site-Mirror
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and the depth window specifier shared with the command line.
//!
//! # Example
//!
//! ```no_run
//! use site_mirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mirror.toml")).unwrap();
//! println!("Analysis window: {}", config.crawler.depth);
//! ```

mod depth;
mod parser;
mod types;
mod validation;

// Re-export types
pub use depth::DepthWindow;
pub use types::{Config, CrawlerConfig, FetcherConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
