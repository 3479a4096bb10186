//! Lifecycle orchestration: store, targeted removal, set reconciliation.

use crate::backend::{DiskBackend, StorageBackend};
use crate::collision::{CollisionResolver, TokenGenerator, UuidTokens};
use crate::config::StorageConfig;
use crate::constants::DEFAULT_MAX_ATTEMPTS;
use crate::derive::{derive, Clock, SystemClock};
use crate::paths::managed_backend_path;
use crate::payload::{Payload, StorageOptions, Visibility};
use crate::{StorageError, StorageResult};
use mfs_sanitize::{sanitize, slugify};
use mfs_types::OwnerCategory;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Where the bytes of a non-opaque payload come from.
enum ByteSource {
    Memory(Vec<u8>),
    Local(PathBuf),
}

/// Orchestrates the full store pipeline and the cleanup operations the
/// owning entity-lifecycle layer calls on update and delete.
///
/// The coordinator is a stateless service object: backends, clock and
/// token source are injected at construction, never read ambiently. One
/// instance serves any number of callers; it holds no per-entity state and
/// provides no per-entity locking (callers needing strict exclusivity for
/// one owner+field serialize at a higher layer).
///
/// Failure semantics: [`store`](Self::store) errors are fatal and
/// propagate — the caller's entity mutation must not proceed with an
/// unstored reference. The remove operations treat absence as success, and
/// [`reconcile_set`](Self::reconcile_set) degrades per-path failures to
/// warnings so one bad delete never aborts the rest of a batch.
pub struct FileLifecycleCoordinator {
    public: Box<dyn StorageBackend>,
    private: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
    tokens: Box<dyn TokenGenerator>,
    max_attempts: usize,
}

impl FileLifecycleCoordinator {
    /// Creates a coordinator over disk backends with production
    /// collaborators (system clock, UUID tokens, default retry budget).
    pub fn new(config: &StorageConfig) -> Self {
        Self::with_collaborators(
            Box::new(DiskBackend::new(config.public_dir())),
            Box::new(DiskBackend::new(config.private_dir())),
            Box::new(SystemClock),
            Box::new(UuidTokens),
            DEFAULT_MAX_ATTEMPTS,
        )
    }

    /// Creates a coordinator with explicit collaborators.
    pub fn with_collaborators(
        public: Box<dyn StorageBackend>,
        private: Box<dyn StorageBackend>,
        clock: Box<dyn Clock>,
        tokens: Box<dyn TokenGenerator>,
        max_attempts: usize,
    ) -> Self {
        Self {
            public,
            private,
            clock,
            tokens,
            max_attempts,
        }
    }

    /// Stores a payload and returns its canonical path string.
    ///
    /// Pipeline for byte and file payloads: sanitize the requested name
    /// (explicit override or the payload's declared name), optionally
    /// slugify it, resolve collisions under the retry budget — re-deriving
    /// the shard directory for every candidate, since the shard follows the
    /// final name — then write through the visibility's backend.
    ///
    /// Opaque payloads return their string unchanged without touching any
    /// backend: re-saving an already-canonical value is a no-op.
    ///
    /// # Errors
    ///
    /// - [`StorageError::SanitizationAmbiguous`] if the name sanitizes to
    ///   nothing; the caller must supply a fallback or reject the upload.
    /// - [`StorageError::StorageExhausted`] if no free slot was found.
    /// - [`StorageError::CopyFailed`] if the byte copy failed; no partial
    ///   file is referenced.
    pub fn store(
        &self,
        owner_category: &OwnerCategory,
        payload: Payload,
        options: &StorageOptions,
    ) -> StorageResult<String> {
        let (source, declared_name) = match payload {
            Payload::Opaque(value) => return Ok(value),
            Payload::Bytes {
                data,
                original_name,
            } => (ByteSource::Memory(data), original_name),
            Payload::File(path) => {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default()
                    .to_owned();
                (ByteSource::Local(path), name)
            }
        };

        let requested = options.filename.clone().unwrap_or(declared_name);
        let mut filename = sanitize(&requested, true);
        if options.slugify {
            filename = slugify(&filename);
        }
        if filename.is_empty() {
            return Err(StorageError::SanitizationAmbiguous(requested));
        }

        let backend = self.backend_for(options.visibility);
        let today = self.clock.today();
        let resolver = CollisionResolver::new(self.tokens.as_ref(), self.max_attempts);
        let final_name = resolver.resolve(&filename, |candidate| {
            let candidate_path = derive(owner_category, candidate, options.visibility, today);
            Ok(backend.exists(&candidate_path.file_rel()))
        })?;

        let canonical = derive(owner_category, &final_name, options.visibility, today);
        match source {
            ByteSource::Memory(data) => backend.write(&canonical.file_rel(), &data)?,
            ByteSource::Local(path) => backend.copy_from(&path, &canonical.file_rel())?,
        }

        debug!(path = %canonical, "stored file");
        Ok(canonical.to_string())
    }

    /// Deletes the file behind a persisted value, if the value is managed.
    ///
    /// Unmanaged values — external URLs, arbitrary strings — are silently
    /// ignored; this operation can never delete something the subsystem
    /// did not create. An already-absent file is success.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DeleteFailed`] for true I/O failures; the
    /// caller may log and continue, since cleanup is best-effort.
    pub fn remove_current(&self, value: &str) -> StorageResult<()> {
        let Some((visibility, rel)) = managed_backend_path(value) else {
            return Ok(());
        };
        self.backend_for(visibility).delete(&rel)
    }

    /// Deletes the previous value only when the field actually changed.
    ///
    /// Guards against deleting a file that is still the current value,
    /// e.g. an entity update that never touched the file field.
    pub fn remove_if_changed(&self, old_value: &str, new_value: &str) -> StorageResult<()> {
        if old_value == new_value {
            return Ok(());
        }
        self.remove_current(old_value)
    }

    /// Reconciles a multi-valued file field across an update.
    ///
    /// Both sides are filtered to managed paths and deduplicated, then
    /// every old path not present in the new set is deleted. Comparison is
    /// by canonical path equality, order-independent: a path present in
    /// both sets survives no matter how often or where it is listed.
    ///
    /// Per-path delete failures are logged and the batch continues.
    pub fn reconcile_set(&self, old_paths: &[String], new_paths: &[String]) {
        let keep: HashSet<(Visibility, String)> = new_paths
            .iter()
            .filter_map(|value| managed_backend_path(value))
            .collect();

        let mut seen = HashSet::new();
        for value in old_paths {
            let Some(target) = managed_backend_path(value) else {
                continue;
            };
            if keep.contains(&target) || !seen.insert(target.clone()) {
                continue;
            }
            if let Err(error) = self.backend_for(target.0).delete(&target.1) {
                warn!(path = %value, %error, "cleanup failed, continuing batch");
            }
        }
    }

    fn backend_for(&self, visibility: Visibility) -> &dyn StorageBackend {
        match visibility {
            Visibility::Public => self.public.as_ref(),
            Visibility::Private => self.private.as_ref(),
        }
    }
}
