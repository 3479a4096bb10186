//! Store inputs: payloads, options and visibility.

use std::path::PathBuf;

/// Which visibility root a file is stored under.
///
/// Public files live under the web-servable root and their canonical paths
/// carry the `storage/` URL prefix; private files live under the restricted
/// root and their paths are meaningful only to server-side code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Visibility {
    /// Web-reachable storage; canonical paths are URL-prefixed
    #[default]
    Public,
    /// Restricted storage; canonical paths have no URL prefix
    Private,
}

/// A file to be stored. Immutable once constructed.
///
/// The three variants mirror the three things a caller can hand the storage
/// layer: uploaded content with a declared client filename, a reference to a
/// file already on the local filesystem, and a string that is *already* a
/// resolved path or URL and must pass through untouched.
#[derive(Debug)]
pub enum Payload {
    /// Raw uploaded bytes plus the client-declared original filename
    Bytes {
        data: Vec<u8>,
        original_name: String,
    },

    /// A file on the local filesystem; the name is taken from the final
    /// path component
    File(PathBuf),

    /// An already-resolved path or URL, returned unchanged by `store`
    /// without touching any backend
    Opaque(String),
}

impl Payload {
    /// Returns the filename this payload declares, if it declares one.
    ///
    /// `Bytes` carries the client's original name; `File` uses the final
    /// path component; `Opaque` values have no filename of their own.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Payload::Bytes { original_name, .. } => Some(original_name),
            Payload::File(path) => path.file_name().and_then(|name| name.to_str()),
            Payload::Opaque(_) => None,
        }
    }
}

/// Options for a single store operation.
///
/// The defaults are the documented ones: public visibility, no forced
/// slugification, no filename override.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct StorageOptions {
    /// Force slugification of the sanitized filename
    #[serde(default)]
    pub slugify: bool,

    /// Store under this filename instead of the payload's declared name.
    /// The override is sanitized like any other name.
    #[serde(default)]
    pub filename: Option<String>,

    /// Which visibility root to store under
    #[serde(default)]
    pub visibility: Visibility,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_defaults() {
        let options = StorageOptions::default();
        assert!(!options.slugify);
        assert!(options.filename.is_none());
        assert_eq!(options.visibility, Visibility::Public);
    }

    #[test]
    fn test_declared_name() {
        let bytes = Payload::Bytes {
            data: vec![1, 2, 3],
            original_name: "photo.jpg".into(),
        };
        assert_eq!(bytes.declared_name(), Some("photo.jpg"));

        let file = Payload::File(Path::new("/tmp/uploads/scan.pdf").to_path_buf());
        assert_eq!(file.declared_name(), Some("scan.pdf"));

        let opaque = Payload::Opaque("https://cdn.example.com/x.png".into());
        assert_eq!(opaque.declared_name(), None);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: StorageOptions = serde_json::from_str("{}").unwrap();
        assert!(!options.slugify);
        assert_eq!(options.visibility, Visibility::Public);

        let options: StorageOptions =
            serde_json::from_str(r#"{"slugify":true,"visibility":"Private","filename":"x.png"}"#)
                .unwrap();
        assert!(options.slugify);
        assert_eq!(options.visibility, Visibility::Private);
        assert_eq!(options.filename.as_deref(), Some("x.png"));
    }

    #[test]
    fn test_visibility_serde_round_trip() {
        for visibility in [Visibility::Public, Visibility::Private] {
            let json = serde_json::to_string(&visibility).unwrap();
            let back: Visibility = serde_json::from_str(&json).unwrap();
            assert_eq!(visibility, back);
        }
    }
}
