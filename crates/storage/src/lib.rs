//! Sharded model-file storage.
//!
//! This crate turns an arbitrary uploaded or referenced file into a
//! canonical, collision-free, shard-distributed path on a storage root, and
//! reconciles before/after sets of stored references so orphaned files are
//! deleted without risking files still in use.
//!
//! # Storage Layout
//!
//! Files are stored by date and filename-hash shard under the owner
//! category's subtree:
//!
//! ```text
//! <storage_root>/
//! ├── public/                  # web-servable visibility root
//! │   └── modelfiles/
//! │       └── games/           # owner category (a table name)
//! │           └── 24/          # year
//! │               └── 04/      # month
//! │                   └── 19/  # day
//! │                       └── 7d/                           # md5 shard
//! │                           ├── black-cat-under-red-car.png
//! │                           └── black-cat-under-red-car-3f9ae210cc84.png
//! └── private/                 # restricted visibility root
//!     └── modelfiles/…
//! ```
//!
//! The two-hex-character shard is the first two characters of the MD5 of the
//! *final* filename — after sanitization, slugification and de-duplication
//! suffixing — so the shard a file lives under is always recomputable from
//! its stored name alone, without a side index. Date plus hash sharding
//! bounds per-directory fan-out to roughly 1/256 of one day's uploads per
//! category.
//!
//! # Canonical paths
//!
//! The only persisted representation of a stored file is a relative path
//! string. Public paths carry the `storage/` web prefix
//! (`storage/modelfiles/games/24/04/19/7d/cover.png`); private paths do not
//! (`modelfiles/…`). Anything not under either tree — an external URL, a
//! user-supplied string — is *unmanaged*: the lifecycle operations never
//! delete it.
//!
//! # Design
//!
//! - Stateless services: backends, clock and uniqueness-token source are
//!   injected, so tests run against pinned dates and deterministic tokens.
//! - No internal locking: directory creation and deletion are idempotent,
//!   shard sizing keeps same-name contention rare, and the
//!   existence-check-then-write gap in collision resolution is an accepted
//!   residual risk. Callers needing strict per-entity exclusivity serialize
//!   at a higher layer.
//! - Store failures are fatal and propagate; cleanup failures are
//!   best-effort and degrade to warnings.

mod backend;
mod collision;
mod config;
mod constants;
mod coordinator;
mod derive;
mod paths;
mod payload;

pub use backend::{DiskBackend, StorageBackend};
pub use collision::{CollisionResolver, TokenGenerator, UuidTokens};
pub use config::StorageConfig;
pub use constants::{DEFAULT_MAX_ATTEMPTS, MODELFILES_DIR_NAME, PUBLIC_URL_PREFIX};
pub use coordinator::FileLifecycleCoordinator;
pub use derive::{derive, Clock, SystemClock};
pub use mfs_types::{CategoryError, OwnerCategory};
pub use paths::{is_managed, CanonicalPath};
pub use payload::{Payload, StorageOptions, Visibility};

/// Errors that can occur during storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Storage root does not exist or is not a directory
    #[error("Invalid storage root: {0}")]
    InvalidRootDirectory(String),

    /// The supplied filename sanitized down to an empty name; the caller
    /// must provide a fallback name or reject the upload
    #[error("Filename sanitized to an empty name: '{0}'")]
    SanitizationAmbiguous(String),

    /// Byte copy/write into storage failed; fatal, the store operation
    /// leaves no partial file referenced
    #[error("Failed to store file at '{destination}': {source}")]
    CopyFailed {
        destination: String,
        #[source]
        source: std::io::Error,
    },

    /// Collision retry budget exhausted without finding a free slot;
    /// never surfaced together with a usable path
    #[error("No unique filename found for '{filename}' after {attempts} attempts")]
    StorageExhausted { filename: String, attempts: usize },

    /// Delete failed for a reason other than the file being absent;
    /// recoverable — reconciliation logs it and continues the batch
    #[error("Failed to delete '{path}': {source}")]
    DeleteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error outside the copy and delete paths
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
