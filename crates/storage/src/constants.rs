//! Shared constants for the storage tree layout.

/// Name of the managed subtree under each visibility root.
pub const MODELFILES_DIR_NAME: &str = "modelfiles";

/// Subdirectory of the storage root holding web-servable files.
pub const PUBLIC_DIR_NAME: &str = "public";

/// Subdirectory of the storage root holding restricted files.
pub const PRIVATE_DIR_NAME: &str = "private";

/// URL prefix carried by public canonical paths.
///
/// A public file stored under `<root>/public/modelfiles/…` is persisted as
/// `storage/modelfiles/…`, the path the web server exposes it under.
pub const PUBLIC_URL_PREFIX: &str = "storage";

/// Default retry budget for the collision resolver.
pub const DEFAULT_MAX_ATTEMPTS: usize = 20;
