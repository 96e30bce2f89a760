//! Storage traits and error types
//!
//! This module defines the trait interface for the place mirrored files are
//! written to and associated error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Path has no parent directory: {}", .0.display())]
    NoParent(PathBuf),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The crawler only needs two capabilities: checking whether a local copy
/// already exists (to decide whether a reference can be rewritten) and
/// writing a file, creating parent directories on demand.
pub trait Storage {
    /// Returns true if a file exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Writes `contents` to `path`, replacing any existing file
    ///
    /// Missing parent directories are created first.
    fn write(&mut self, path: &Path, contents: &[u8]) -> StorageResult<()>;
}
