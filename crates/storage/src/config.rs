//! Storage runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into
//! services, rather than read from the environment during request handling —
//! ambient lookups behave inconsistently across multi-threaded runtimes and
//! test harnesses.

use crate::constants::{PRIVATE_DIR_NAME, PUBLIC_DIR_NAME};
use crate::{StorageError, StorageResult};
use std::path::{Path, PathBuf};

/// Storage configuration resolved at startup.
///
/// Holds the canonicalized storage root and exposes the two visibility
/// subtrees. The root must exist up front; the subtrees and everything
/// below them are created lazily at write time.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    storage_root: PathBuf,
}

impl StorageConfig {
    /// Creates a new `StorageConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidRootDirectory`] if the root does not
    /// exist, is not a directory, or cannot be canonicalized.
    pub fn new(storage_root: impl Into<PathBuf>) -> StorageResult<Self> {
        let storage_root = storage_root.into();

        if !storage_root.exists() {
            return Err(StorageError::InvalidRootDirectory(format!(
                "Directory does not exist: {}",
                storage_root.display()
            )));
        }

        if !storage_root.is_dir() {
            return Err(StorageError::InvalidRootDirectory(format!(
                "Path is not a directory: {}",
                storage_root.display()
            )));
        }

        let storage_root = storage_root.canonicalize().map_err(|e| {
            StorageError::InvalidRootDirectory(format!(
                "Cannot canonicalize path {}: {}",
                storage_root.display(),
                e
            ))
        })?;

        Ok(Self { storage_root })
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    /// Root of the web-servable subtree.
    pub fn public_dir(&self) -> PathBuf {
        self.storage_root.join(PUBLIC_DIR_NAME)
    }

    /// Root of the restricted subtree.
    pub fn private_dir(&self) -> PathBuf {
        self.storage_root.join(PRIVATE_DIR_NAME)
    }
}
