//! Age buckets derived from modification time.
//!
//! Every root entry is placed in one of four buckets based on how many days
//! have passed since it was last modified. The reference time is passed in
//! explicitly so a whole run classifies against a single instant.

use crate::file_organizer::{OrganizeError, OrganizeResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Represents how recently an item was modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeBucket {
    /// Modified within the last day.
    Today,
    /// Modified within the last week.
    Week,
    /// Modified within the last 30 days.
    Month,
    /// Older than 30 days. Items in this bucket are sent to the trash.
    Old,
}

impl AgeBucket {
    /// All buckets in ascending threshold order.
    pub const ALL: [AgeBucket; 4] = [
        AgeBucket::Today,
        AgeBucket::Week,
        AgeBucket::Month,
        AgeBucket::Old,
    ];

    /// Returns the directory name for this bucket.
    pub fn dir_name(&self) -> &'static str {
        match self {
            AgeBucket::Today => "Today",
            AgeBucket::Week => "Week",
            AgeBucket::Month => "Month",
            AgeBucket::Old => "Old",
        }
    }

    /// Upper bound, in days, of this bucket's range.
    pub fn max_days(&self) -> f64 {
        match self {
            AgeBucket::Today => 1.0,
            AgeBucket::Week => 7.0,
            AgeBucket::Month => 30.0,
            AgeBucket::Old => 90.0,
        }
    }

    /// Whether items in this bucket are routed to the trash instead of being nested.
    pub fn is_trash_bound(&self) -> bool {
        matches!(self, AgeBucket::Old)
    }

    /// Maps an elapsed number of days to a bucket.
    ///
    /// Returns the first bucket whose threshold is at least `days`. Anything
    /// past the largest threshold still folds into [`AgeBucket::Old`].
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsweep::age::AgeBucket;
    ///
    /// assert_eq!(AgeBucket::from_elapsed_days(0.5), AgeBucket::Today);
    /// assert_eq!(AgeBucket::from_elapsed_days(2.0), AgeBucket::Week);
    /// assert_eq!(AgeBucket::from_elapsed_days(31.0), AgeBucket::Old);
    /// assert_eq!(AgeBucket::from_elapsed_days(400.0), AgeBucket::Old);
    /// ```
    pub fn from_elapsed_days(days: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|bucket| days <= bucket.max_days())
            .unwrap_or(AgeBucket::Old)
    }

    /// Looks up a bucket by its directory name.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.dir_name() == name)
    }
}

/// Days elapsed between `modified` and `now`, as a fraction.
pub fn elapsed_days(modified: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - modified).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY
}

/// Determines the age bucket of a filesystem item.
///
/// Reads the item's modification time (following symlinks) and classifies
/// it relative to `now`.
///
/// # Errors
///
/// Returns [`OrganizeError::TimeUnavailable`] if the metadata or the
/// modification time cannot be read. Callers treat this as a skip.
pub fn age_bucket_of(path: &Path, now: DateTime<Utc>) -> OrganizeResult<AgeBucket> {
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| OrganizeError::TimeUnavailable {
            path: path.to_path_buf(),
            source: e,
        })?;

    let modified = DateTime::<Utc>::from(modified);
    Ok(AgeBucket::from_elapsed_days(elapsed_days(modified, now)))
}
