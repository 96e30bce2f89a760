use crate::storage::{Storage, StorageError, StorageResult};
use std::fs;
use std::path::Path;

/// Storage backed by the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for FsStorage {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn write(&mut self, path: &Path, contents: &[u8]) -> StorageResult<()> {
        let parent = path
            .parent()
            .ok_or_else(|| StorageError::NoParent(path.to_path_buf()))?;

        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, contents).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::trace!("Wrote {} bytes to {}", contents.len(), path.display());
        Ok(())
    }
}
