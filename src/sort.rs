//! Sorting pass over the root directory.
//!
//! Each root entry is read once: excluded names are left alone, entries with
//! an unreadable modification time are skipped, stale entries go to the
//! trash, folders are moved under their age bucket and files under their age
//! bucket and category. Empty directories are pruned at the end.

use crate::age::{AgeBucket, age_bucket_of};
use crate::config::CompiledFilters;
use crate::file_organizer::{FileOrganizer, OrganizeError, OrganizeResult};
use crate::naming::unique_path;
use crate::reclaim::{ReclaimReport, prune_empty_directories};
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use std::fs;
use std::path::{Path, PathBuf};

/// A relocation performed (or planned, in a dry run) for one root entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortAction {
    /// A file nested under `root/<bucket>/<category>/`.
    File {
        source: PathBuf,
        destination: PathBuf,
        bucket: AgeBucket,
    },
    /// A folder moved as a unit under `root/<bucket>/`.
    Folder {
        source: PathBuf,
        destination: PathBuf,
        bucket: AgeBucket,
    },
    /// An entry past the retention window, moved to the trash.
    Trash {
        source: PathBuf,
        destination: PathBuf,
    },
}

impl SortAction {
    pub fn source(&self) -> &Path {
        match self {
            Self::File { source, .. } | Self::Folder { source, .. } | Self::Trash { source, .. } => {
                source
            }
        }
    }

    pub fn destination(&self) -> &Path {
        match self {
            Self::File { destination, .. }
            | Self::Folder { destination, .. }
            | Self::Trash { destination, .. } => destination,
        }
    }
}

/// Represents the result of a sort run.
#[derive(Debug, Default)]
pub struct SortReport {
    /// Moves that happened, or would happen in a dry run.
    pub actions: Vec<SortAction>,
    /// Entries left alone by the filter rules.
    pub excluded: Vec<PathBuf>,
    /// Entries skipped because of an unreadable mtime or a folder conflict.
    pub skipped: Vec<OrganizeError>,
    /// Entries whose move failed; they remain in the root.
    pub failures: Vec<OrganizeError>,
    /// Outcome of the empty-directory pass. Empty in a dry run.
    pub reclaimed: ReclaimReport,
    /// Whether this report describes a dry run.
    pub dry_run: bool,
}

impl SortReport {
    pub fn trashed_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, SortAction::Trash { .. }))
            .count()
    }

    /// Returns true if no entry failed to move.
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty() && self.reclaimed.failures.is_empty()
    }
}

/// Sorts the entries of a root directory.
pub struct Sorter {
    organizer: FileOrganizer,
    filters: CompiledFilters,
    now: DateTime<Utc>,
    dry_run: bool,
    progress: ProgressBar,
}

impl Sorter {
    /// Creates a sorter that classifies every entry relative to `now`.
    pub fn new(organizer: FileOrganizer, filters: CompiledFilters, now: DateTime<Utc>) -> Self {
        Self {
            organizer,
            filters,
            now,
            dry_run: false,
            progress: ProgressBar::hidden(),
        }
    }

    /// Only plan the moves; leave the filesystem untouched.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Advance `progress` once per root entry.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Runs the sort.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::InvalidBasePath`] if the root directory cannot
    /// be listed. Every other failure is recorded in the report.
    pub fn sort(&self) -> OrganizeResult<SortReport> {
        let root = self.organizer.root();
        let entries = fs::read_dir(root).map_err(|e| OrganizeError::InvalidBasePath {
            path: root.to_path_buf(),
            source: e,
        })?;

        let mut report = SortReport {
            dry_run: self.dry_run,
            ..Default::default()
        };

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => paths.push(entry.path()),
                Err(e) => report.failures.push(OrganizeError::ReadDirFailed {
                    path: root.to_path_buf(),
                    source: e,
                }),
            }
        }
        paths.sort();

        self.progress.set_length(paths.len() as u64);
        for path in paths {
            self.progress.set_message(display_name(&path));
            self.sort_entry(&path, &mut report);
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();

        if !self.dry_run {
            report.reclaimed = prune_empty_directories(root, &[self.organizer.trash()]);
        }

        Ok(report)
    }

    fn sort_entry(&self, path: &Path, report: &mut SortReport) {
        if self.is_structural(path) {
            return;
        }
        if !self.filters.should_include(path) {
            report.excluded.push(path.to_path_buf());
            return;
        }

        let bucket = match age_bucket_of(path, self.now) {
            Ok(bucket) => bucket,
            Err(e) => {
                report.skipped.push(e);
                return;
            }
        };

        let result = if bucket.is_trash_bound() {
            self.trash(path)
        } else if path.is_dir() {
            self.folder(path, bucket)
        } else {
            self.file(path, bucket)
        };

        match result {
            Ok(action) => report.actions.push(action),
            Err(e @ OrganizeError::DestinationConflict { .. }) => report.skipped.push(e),
            Err(e) => report.failures.push(e),
        }
    }

    /// Bucket folders and the trash itself are never treated as content.
    fn is_structural(&self, path: &Path) -> bool {
        if path == self.organizer.trash() {
            return true;
        }
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(AgeBucket::from_dir_name)
            .is_some()
    }

    fn trash(&self, path: &Path) -> OrganizeResult<SortAction> {
        let destination = if self.dry_run {
            match path.file_name() {
                Some(name) => unique_path(self.organizer.trash(), name),
                None => self.organizer.trash().to_path_buf(),
            }
        } else {
            self.organizer.move_to_trash(path)?
        };

        Ok(SortAction::Trash {
            source: path.to_path_buf(),
            destination,
        })
    }

    fn folder(&self, path: &Path, bucket: AgeBucket) -> OrganizeResult<SortAction> {
        let destination = if self.dry_run {
            self.organizer.folder_destination(path, bucket)?
        } else {
            self.organizer.move_folder(path, bucket)?
        };

        Ok(SortAction::Folder {
            source: path.to_path_buf(),
            destination,
            bucket,
        })
    }

    fn file(&self, path: &Path, bucket: AgeBucket) -> OrganizeResult<SortAction> {
        let destination = if self.dry_run {
            let dir = self.organizer.file_destination_dir(path, bucket);
            match path.file_name() {
                Some(name) => unique_path(&dir, name),
                None => dir,
            }
        } else {
            self.organizer.move_file(path, bucket)?
        };

        Ok(SortAction::File {
            source: path.to_path_buf(),
            destination,
            bucket,
        })
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
