//! Canonical path construction and the managed-path predicate.
//!
//! A canonical path is the single persisted handle to a stored file. This
//! module owns its structure, its string form, the shard computation, and
//! the predicate that separates paths this subsystem manages from external
//! values it must never touch.

use crate::constants::{MODELFILES_DIR_NAME, PUBLIC_URL_PREFIX};
use crate::payload::Visibility;
use md5::{Digest, Md5};
use mfs_types::OwnerCategory;
use std::fmt;

/// The structured form of a stored file's location.
///
/// Constructed at store time by path derivation, immutable thereafter. Only
/// the serialized string is persisted — callers hold it as an attribute on
/// the owning entity and hand it back for cleanup; no separate registry of
/// paths exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPath {
    visibility: Visibility,
    owner_category: OwnerCategory,
    /// Two-digit UTC year
    year: String,
    /// Two-digit month
    month: String,
    /// Two-digit day
    day: String,
    /// First two hex characters of the MD5 of the final filename
    shard: String,
    filename: String,
}

impl CanonicalPath {
    pub(crate) fn new(
        visibility: Visibility,
        owner_category: OwnerCategory,
        year: String,
        month: String,
        day: String,
        filename: String,
    ) -> Self {
        let shard = shard_for(&filename);
        Self {
            visibility,
            owner_category,
            year,
            month,
            day,
            shard,
            filename,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn shard(&self) -> &str {
        &self.shard
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Directory portion relative to the visibility root:
    /// `modelfiles/<category>/<yy>/<mm>/<dd>/<shard>`.
    pub fn directory_rel(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}/{}",
            MODELFILES_DIR_NAME,
            self.owner_category,
            self.year,
            self.month,
            self.day,
            self.shard
        )
    }

    /// Full file path relative to the visibility root.
    pub fn file_rel(&self) -> String {
        format!("{}/{}", self.directory_rel(), self.filename)
    }
}

impl fmt::Display for CanonicalPath {
    /// The persisted string form: public paths are URL-prefixed, private
    /// paths are bare.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.visibility {
            Visibility::Public => write!(f, "{}/{}", PUBLIC_URL_PREFIX, self.file_rel()),
            Visibility::Private => write!(f, "{}", self.file_rel()),
        }
    }
}

/// Computes the two-hex-character shard for a final filename.
///
/// MD5 is a directory-layout choice here, not a security boundary: the goal
/// is a uniform 1/256 spread of one day's uploads per category. Because the
/// input is the *final* filename (post-sanitization, post-suffixing), the
/// shard is always recomputable from a stored name alone.
pub(crate) fn shard_for(filename: &str) -> String {
    let digest = Md5::digest(filename.as_bytes());
    hex::encode(digest)[..2].to_owned()
}

/// Returns true if `value` is a path managed by this subsystem.
///
/// Managed values live under `storage/modelfiles/` (public) or
/// `modelfiles/` (private) after normalization — leading-slash trimming and
/// percent-decoding, since persisted values may arrive URL-encoded.
/// Anything with a URL scheme is external by definition. Lifecycle cleanup
/// only ever deletes managed paths.
pub fn is_managed(value: &str) -> bool {
    managed_backend_path(value).is_some()
}

/// Resolves a persisted value to its visibility root and backend-relative
/// path, or `None` for unmanaged values.
pub(crate) fn managed_backend_path(value: &str) -> Option<(Visibility, String)> {
    if value.contains("://") {
        return None;
    }
    let normalized = normalize_value(value);

    let public_prefix = format!("{}/{}/", PUBLIC_URL_PREFIX, MODELFILES_DIR_NAME);
    if let Some(rest) = normalized.strip_prefix(&public_prefix) {
        if !rest.is_empty() {
            let rel = format!("{}/{}", MODELFILES_DIR_NAME, rest);
            return Some((Visibility::Public, rel));
        }
    }

    let private_prefix = format!("{}/", MODELFILES_DIR_NAME);
    if let Some(rest) = normalized.strip_prefix(&private_prefix) {
        if !rest.is_empty() {
            return Some((Visibility::Private, normalized));
        }
    }

    None
}

/// Normalizes a persisted value for prefix checks: trims the leading slash
/// and percent-decodes `%XX` escapes.
fn normalize_value(value: &str) -> String {
    percent_decode(value.trim_start_matches('/'))
}

/// Decodes `%XX` escape pairs; everything else passes through.
///
/// Stored values may have travelled through URL contexts. Invalid escapes
/// are kept literally rather than rejected, matching how the values are
/// treated everywhere else: as opaque strings.
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
