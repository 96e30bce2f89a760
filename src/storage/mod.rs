//! Storage module for the mirrored files
//!
//! This module handles where and how mirrored content is written:
//! - Mapping URLs to paths inside the project directory
//! - The project directory layout for one crawl
//! - Writing files through the `Storage` trait

mod fs;
mod mapper;
mod traits;

pub use fs::FsStorage;
pub use mapper::{extension_for_content_type, map_url_to_path};
pub use traits::{Storage, StorageError, StorageResult};

use crate::url::project_dir_name;
use crate::UrlError;
use std::path::{Path, PathBuf};
use url::Url;

/// Directory layout of one mirror
///
/// The project root is `<output_dir>/<host with dots replaced by underscores>`
/// and every mirrored file lives below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    /// Creates the layout for a crawl of `base_url` under `output_dir`
    pub fn for_url(base_url: &Url, output_dir: &Path) -> Result<Self, UrlError> {
        let host = base_url.host_str().ok_or(UrlError::MissingDomain)?;
        Ok(Self {
            root: output_dir.join(project_dir_name(host)),
        })
    }

    /// Creates a layout rooted at an explicit directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the local path for a URL, joined under the project root
    pub fn local_path(&self, url: &Url, content_type: Option<&str>) -> PathBuf {
        self.root.join(map_url_to_path(url, content_type))
    }
}
