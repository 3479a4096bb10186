/// Errors that can occur when creating validated storage types.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// The input category was empty
    #[error("Owner category cannot be empty")]
    Empty,

    /// The input category contained characters that are not safe in a path segment
    #[error("Owner category must contain only lowercase letters, digits, '-' and '_', got: '{0}'")]
    UnsafeSegment(String),
}

/// A validated owner-category path segment.
///
/// An owner category identifies the kind of entity a stored file belongs to
/// (for example `games` or `users`, typically a pluralized table name). It is
/// used verbatim as a directory name, so it must already be filesystem-safe:
/// this type guarantees that once constructed, the contained segment is
/// non-empty and contains only lowercase ASCII letters, digits, `-` and `_`.
///
/// Owner categories are **not** run through the filename sanitizer. They come
/// from the owning application's own naming, not from untrusted input, and the
/// storage layer treats an unsafe value here as a programming error rather
/// than something to silently rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerCategory(String);

impl OwnerCategory {
    /// Creates a new `OwnerCategory` from the given input.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(OwnerCategory)` if the input is a safe path segment,
    /// `Err(CategoryError::Empty)` if it is empty, or
    /// `Err(CategoryError::UnsafeSegment)` if it contains any character
    /// outside `a-z`, `0-9`, `-` and `_`.
    pub fn new(input: impl AsRef<str>) -> Result<Self, CategoryError> {
        let segment = input.as_ref();
        if segment.is_empty() {
            return Err(CategoryError::Empty);
        }
        if !Self::is_safe_segment(segment) {
            return Err(CategoryError::UnsafeSegment(segment.to_owned()));
        }
        Ok(Self(segment.to_owned()))
    }

    /// Returns true if `input` is a safe owner-category segment.
    ///
    /// This is a purely syntactic check: non-empty, and every byte is a
    /// lowercase ASCII letter, a digit, `-` or `_`.
    pub fn is_safe_segment(input: &str) -> bool {
        !input.is_empty()
            && input
                .bytes()
                .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_'))
    }

    /// Returns the inner segment as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OwnerCategory {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for OwnerCategory {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OwnerCategory::new(s)
    }
}

impl serde::Serialize for OwnerCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for OwnerCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        OwnerCategory::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_plural_table_names() {
        assert!(OwnerCategory::new("games").is_ok());
        assert!(OwnerCategory::new("static_pages").is_ok());
        assert!(OwnerCategory::new("user-avatars").is_ok());
        assert!(OwnerCategory::new("f0lders").is_ok());
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(matches!(OwnerCategory::new(""), Err(CategoryError::Empty)));
    }

    #[test]
    fn test_new_rejects_uppercase() {
        assert!(matches!(
            OwnerCategory::new("Games"),
            Err(CategoryError::UnsafeSegment(_))
        ));
    }

    #[test]
    fn test_new_rejects_path_separators() {
        assert!(OwnerCategory::new("games/2024").is_err());
        assert!(OwnerCategory::new("..").is_err());
        assert!(OwnerCategory::new("a\\b").is_err());
    }

    #[test]
    fn test_new_rejects_whitespace_and_unicode() {
        assert!(OwnerCategory::new("my games").is_err());
        assert!(OwnerCategory::new("jeux-vidéo").is_err());
    }

    #[test]
    fn test_is_safe_segment() {
        assert!(OwnerCategory::is_safe_segment("posts"));
        assert!(!OwnerCategory::is_safe_segment(""));
        assert!(!OwnerCategory::is_safe_segment("posts/"));
        assert!(!OwnerCategory::is_safe_segment("p osts"));
    }

    #[test]
    fn test_display_and_as_ref() {
        let category = OwnerCategory::new("games").unwrap();
        assert_eq!(category.to_string(), "games");
        assert_eq!(category.as_ref(), "games");
        assert_eq!(category.as_str(), "games");
    }

    #[test]
    fn test_from_str() {
        let category: OwnerCategory = "games".parse().unwrap();
        assert_eq!(category.as_str(), "games");

        let invalid: Result<OwnerCategory, _> = "Games!".parse();
        assert!(invalid.is_err());
    }
}
