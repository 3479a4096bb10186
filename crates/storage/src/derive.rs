//! Deterministic sharded path derivation.

use crate::paths::CanonicalPath;
use crate::payload::Visibility;
use chrono::{Datelike, NaiveDate, Utc};
use mfs_types::OwnerCategory;

/// Source of the UTC calendar date used in path derivation.
///
/// Injected rather than read ambiently so tests can pin the date and
/// derivation stays a pure function of its inputs.
pub trait Clock: Send + Sync {
    /// The current UTC calendar date.
    fn today(&self) -> NaiveDate;
}

/// The production clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Derives the canonical path for a final filename.
///
/// The directory is `modelfiles/<category>/<YY>/<MM>/<DD>/<shard>` under the
/// visibility root, where the shard is the first two hex characters of the
/// MD5 of `filename`. Deterministic: identical inputs produce identical
/// paths. No directories are created here — that happens at write time,
/// where `create_dir_all` makes creation idempotent and safe under
/// concurrent writers targeting the same shard.
///
/// # Arguments
///
/// * `owner_category` - The entity kind the file belongs to.
/// * `filename` - The final filename (sanitized, optionally slugified,
///   de-duplication suffix included if any).
/// * `visibility` - Which visibility root the path lives under.
/// * `date` - The UTC calendar date, resolved once per store operation.
pub fn derive(
    owner_category: &OwnerCategory,
    filename: &str,
    visibility: Visibility,
    date: NaiveDate,
) -> CanonicalPath {
    CanonicalPath::new(
        visibility,
        owner_category.clone(),
        format!("{:02}", date.year() % 100),
        format!("{:02}", date.month()),
        format!("{:02}", date.day()),
        filename.to_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn games() -> OwnerCategory {
        OwnerCategory::new("games").unwrap()
    }

    fn april_19() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 19).unwrap()
    }

    #[test]
    fn test_derive_is_deterministic() {
        let first = derive(&games(), "report.pdf", Visibility::Public, april_19());
        let second = derive(&games(), "report.pdf", Visibility::Public, april_19());
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_derive_scenario_directory() {
        let path = derive(
            &games(),
            "black-cat-under-red-car.png",
            Visibility::Public,
            april_19(),
        );
        assert_eq!(path.directory_rel(), "modelfiles/games/24/04/19/7d");
        assert_eq!(
            path.to_string(),
            "storage/modelfiles/games/24/04/19/7d/black-cat-under-red-car.png"
        );
    }

    #[test]
    fn test_derive_zero_pads_date_segments() {
        let date = NaiveDate::from_ymd_opt(2030, 1, 5).unwrap();
        let path = derive(&games(), "a.txt", Visibility::Private, date);
        assert_eq!(path.directory_rel(), "modelfiles/games/30/01/05/a5");
    }

    #[test]
    fn test_system_clock_returns_a_date() {
        // Smoke test only: the value is wall-clock dependent.
        let today = SystemClock.today();
        assert!(today.year() >= 2024);
    }
}
