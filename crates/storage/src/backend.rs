//! Storage backends: the abstraction and the on-disk implementation.

use crate::{StorageError, StorageResult};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// How many leading bytes are read for MIME detection.
const MIME_PROBE_BYTES: u64 = 8192;

/// A visibility root's byte store.
///
/// Implementations perform the actual copies, existence checks and deletes
/// for one visibility subtree. Paths are forward-slash strings relative to
/// that subtree (`modelfiles/…`). All operations are synchronous, blocking
/// filesystem calls; no caching sits between an `exists` probe and the
/// filesystem, trading a little latency for always-correct freshness.
pub trait StorageBackend: Send + Sync {
    /// Returns true if a file exists at `rel`.
    fn exists(&self, rel: &str) -> bool;

    /// Writes `data` to `rel`, creating missing ancestor directories.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::CopyFailed`] on any I/O failure.
    fn write(&self, rel: &str, data: &[u8]) -> StorageResult<()>;

    /// Copies the file at `source` to `rel`, creating missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::CopyFailed`] on any I/O failure, including
    /// an unreadable source.
    fn copy_from(&self, source: &Path, rel: &str) -> StorageResult<()>;

    /// Deletes the file at `rel`. Idempotent: deleting a path that does
    /// not exist succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DeleteFailed`] for failures other than
    /// absence (permissions, I/O).
    fn delete(&self, rel: &str) -> StorageResult<()>;

    /// Best-effort MIME detection from the file's leading bytes.
    fn mime_type(&self, rel: &str) -> Option<String>;

    /// Resolves a backend-relative path to an absolute filesystem path.
    fn absolute(&self, rel: &str) -> PathBuf;
}

/// Filesystem-backed storage for one visibility subtree.
///
/// The subtree root itself may not exist yet; it is created together with
/// the shard directories on first write. `create_dir_all` is idempotent and
/// safe when two writers race to create the same shard.
#[derive(Debug, Clone)]
pub struct DiskBackend {
    root: PathBuf,
}

impl DiskBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn ensure_parent(&self, destination: &Path, rel: &str) -> StorageResult<()> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::CopyFailed {
                destination: rel.to_owned(),
                source: e,
            })?;
        }
        Ok(())
    }
}

impl StorageBackend for DiskBackend {
    fn exists(&self, rel: &str) -> bool {
        self.absolute(rel).is_file()
    }

    fn write(&self, rel: &str, data: &[u8]) -> StorageResult<()> {
        let destination = self.absolute(rel);
        self.ensure_parent(&destination, rel)?;
        fs::write(&destination, data).map_err(|e| StorageError::CopyFailed {
            destination: rel.to_owned(),
            source: e,
        })
    }

    fn copy_from(&self, source: &Path, rel: &str) -> StorageResult<()> {
        let destination = self.absolute(rel);
        self.ensure_parent(&destination, rel)?;
        fs::copy(source, &destination)
            .map(|_| ())
            .map_err(|e| StorageError::CopyFailed {
                destination: rel.to_owned(),
                source: e,
            })
    }

    fn delete(&self, rel: &str) -> StorageResult<()> {
        match fs::remove_file(self.absolute(rel)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed {
                path: rel.to_owned(),
                source: e,
            }),
        }
    }

    fn mime_type(&self, rel: &str) -> Option<String> {
        let mut file = fs::File::open(self.absolute(rel)).ok()?;
        let mut head = Vec::new();
        file.by_ref()
            .take(MIME_PROBE_BYTES)
            .read_to_end(&mut head)
            .ok()?;
        infer::get(&head).map(|kind| kind.mime_type().to_owned())
    }

    fn absolute(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }
}
