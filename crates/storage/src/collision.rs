//! Bounded collision resolution for candidate filenames.

use crate::{StorageError, StorageResult};
use uuid::Uuid;

/// Source of uniqueness tokens inserted into colliding filenames.
///
/// Injected so tests can use a deterministic sequence; the production
/// implementation draws from a v4 UUID.
pub trait TokenGenerator: Send + Sync {
    /// A short token with negligible collision probability.
    fn token(&self) -> String;
}

/// The production token source: twelve lowercase hex characters of a fresh
/// v4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokens;

impl TokenGenerator for UuidTokens {
    fn token(&self) -> String {
        let simple = Uuid::new_v4().simple().to_string();
        simple[..12].to_owned()
    }
}

/// Finds a free filename under a bounded retry budget.
///
/// The resolver probes candidate *filenames*, not slots in one fixed
/// directory: because the shard is derived from the final filename, a
/// suffixed candidate may live in a different shard directory than the
/// original, so the caller's probe re-derives the location per candidate.
///
/// The existence-check-then-write window is not atomic; two concurrent
/// writers can both pass the probe for the same name before either writes.
/// Shard sizing keeps that contention statistically rare and the gap is an
/// accepted residual risk — no locking is attempted here.
pub struct CollisionResolver<'a> {
    tokens: &'a dyn TokenGenerator,
    max_attempts: usize,
}

impl std::fmt::Debug for CollisionResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionResolver")
            .field("tokens", &"<dyn TokenGenerator>")
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl<'a> CollisionResolver<'a> {
    pub fn new(tokens: &'a dyn TokenGenerator, max_attempts: usize) -> Self {
        Self {
            tokens,
            max_attempts,
        }
    }

    /// Resolves `filename` to a name whose slot is free.
    ///
    /// The first candidate is `filename` itself; each subsequent candidate
    /// inserts a fresh uniqueness token before the extension
    /// (`stem-<token>.ext`). `taken` is probed exactly once per candidate,
    /// at most `max_attempts` times in total.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::StorageExhausted`] when every probed
    /// candidate was taken — never a colliding name. Probe errors
    /// propagate as-is.
    pub fn resolve<F>(&self, filename: &str, mut taken: F) -> StorageResult<String>
    where
        F: FnMut(&str) -> StorageResult<bool>,
    {
        let mut candidate = filename.to_owned();
        for _ in 0..self.max_attempts {
            if !taken(&candidate)? {
                return Ok(candidate);
            }
            candidate = with_token(filename, &self.tokens.token());
        }
        Err(StorageError::StorageExhausted {
            filename: filename.to_owned(),
            attempts: self.max_attempts,
        })
    }
}

/// Inserts a uniqueness token before the extension.
fn with_token(filename: &str, token: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !stem.is_empty() => {
            format!("{stem}-{token}.{ext}")
        }
        _ => format!("{filename}-{token}"),
    }
}
