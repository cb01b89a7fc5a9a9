/// Flattening of a sorted tree back into the root directory.
///
/// This module reverses a sort using nothing but the on-disk layout: every
/// item found under a bucket folder is moved back to the root and the bucket
/// folders are removed afterwards. No history file is needed.
use crate::age::AgeBucket;
use crate::file_category::Category;
use crate::file_organizer::{OrganizeError, OrganizeResult, rename};
use crate::naming::unique_path_bare;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the result of a reset operation.
#[derive(Debug, Default)]
pub struct ResetReport {
    /// Items moved back to the root, as `(from, to)`.
    pub restored: Vec<(PathBuf, PathBuf)>,
    /// Bucket folders that were removed.
    pub removed_buckets: Vec<PathBuf>,
    /// Items or folders that could not be moved or removed.
    pub failures: Vec<OrganizeError>,
}

impl ResetReport {
    /// Returns true if the reset was completely successful.
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Flattens `root/<bucket>/...` back into `root`.
pub struct Resetter {
    root: PathBuf,
}

impl Resetter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Moves every sorted item back to the root and removes the bucket folders.
    ///
    /// Buckets are visited in age order. Within a bucket, items inside the
    /// known category folders are restored first; whatever else sits directly
    /// in the bucket (folders that were moved whole) follows. Name clashes in
    /// the root are resolved by appending `_N` to the full name.
    ///
    /// # Edge Cases Handled
    ///
    /// * **Missing bucket**: skipped
    /// * **Name conflict in root**: restored as `name_1`, `name_2`, ...
    /// * **Failed move**: recorded; the bucket folder is then kept rather than
    ///   deleted so the item is not lost
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::InvalidBasePath`] if the root does not exist.
    pub fn reset(&self) -> OrganizeResult<ResetReport> {
        if !self.root.is_dir() {
            return Err(OrganizeError::InvalidBasePath {
                path: self.root.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "base path does not exist",
                ),
            });
        }

        let mut report = ResetReport::default();
        for bucket in AgeBucket::ALL {
            let bucket_path = self.root.join(bucket.dir_name());
            if bucket_path.is_dir() {
                self.reset_bucket(&bucket_path, &mut report);
            }
        }

        Ok(report)
    }

    fn reset_bucket(&self, bucket_path: &Path, report: &mut ResetReport) {
        let failures_before = report.failures.len();
        let mut drained: HashSet<PathBuf> = HashSet::new();

        for category in Category::ALL {
            let category_path = bucket_path.join(category.dir_name());
            if !category_path.is_dir() {
                continue;
            }
            self.restore_children(&category_path, &HashSet::new(), report);
            drained.insert(category_path);
        }

        self.restore_children(bucket_path, &drained, report);

        if report.failures.len() > failures_before {
            report.failures.push(OrganizeError::CleanupFailure {
                path: bucket_path.to_path_buf(),
                reason: "kept because some items could not be restored".to_string(),
            });
            return;
        }

        match fs::remove_dir_all(bucket_path) {
            Ok(()) => report.removed_buckets.push(bucket_path.to_path_buf()),
            Err(e) => report.failures.push(OrganizeError::CleanupFailure {
                path: bucket_path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    /// Moves every child of `dir` except those in `skip` into the root.
    fn restore_children(&self, dir: &Path, skip: &HashSet<PathBuf>, report: &mut ResetReport) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                report.failures.push(OrganizeError::ReadDirFailed {
                    path: dir.to_path_buf(),
                    source: e,
                });
                return;
            }
        };

        let mut children = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) if !skip.contains(&entry.path()) => children.push(entry.path()),
                Ok(_) => {}
                Err(e) => report.failures.push(OrganizeError::ReadDirFailed {
                    path: dir.to_path_buf(),
                    source: e,
                }),
            }
        }
        children.sort();

        for source in children {
            let Some(name) = source.file_name() else {
                continue;
            };
            let destination = unique_path_bare(&self.root, name);
            match rename(&source, destination) {
                Ok(destination) => report.restored.push((source, destination)),
                Err(e) => report.failures.push(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reset_without_buckets_is_noop() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("loose.txt"), "x").unwrap();

        let report = Resetter::new(temp_dir.path()).reset().expect("Reset failed");

        assert!(report.restored.is_empty());
        assert!(report.removed_buckets.is_empty());
        assert!(temp_dir.path().join("loose.txt").exists());
    }

    #[test]
    fn test_reset_flattens_categories_and_folders() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        fs::create_dir_all(root.join("Week").join("Documents")).unwrap();
        fs::write(root.join("Week").join("Documents").join("report.pdf"), "pdf").unwrap();
        fs::create_dir_all(root.join("Today").join("Code")).unwrap();
        fs::write(root.join("Today").join("Code").join("app.py"), "py").unwrap();
        fs::create_dir_all(root.join("Today").join("projects")).unwrap();
        fs::write(root.join("Today").join("projects").join("main.go"), "go").unwrap();

        let report = Resetter::new(root).reset().expect("Reset failed");

        assert!(report.is_complete_success());
        assert_eq!(report.restored.len(), 3);
        assert!(root.join("report.pdf").is_file());
        assert!(root.join("app.py").is_file());
        assert!(root.join("projects").join("main.go").is_file());
        assert!(!root.join("Today").exists());
        assert!(!root.join("Week").exists());
        // Drained category folders are removed, not restored
        assert!(!root.join("Code").exists());
        assert!(!root.join("Documents").exists());
    }

    #[test]
    fn test_reset_uses_bare_suffix_on_conflict() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        fs::write(root.join("report.pdf"), "new").unwrap();
        fs::create_dir_all(root.join("Week").join("Documents")).unwrap();
        fs::write(root.join("Week").join("Documents").join("report.pdf"), "sorted").unwrap();

        let report = Resetter::new(root).reset().expect("Reset failed");

        assert_eq!(
            report.restored,
            vec![(
                root.join("Week").join("Documents").join("report.pdf"),
                root.join("report.pdf_1")
            )]
        );
        assert_eq!(fs::read_to_string(root.join("report.pdf")).unwrap(), "new");
        assert_eq!(fs::read_to_string(root.join("report.pdf_1")).unwrap(), "sorted");
    }

    #[test]
    fn test_reset_same_name_in_two_buckets() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        for bucket in ["Today", "Month"] {
            let dir = root.join(bucket).join("Other");
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("notes"), bucket).unwrap();
        }

        Resetter::new(root).reset().expect("Reset failed");

        // Today is visited before Month
        assert_eq!(fs::read_to_string(root.join("notes")).unwrap(), "Today");
        assert_eq!(fs::read_to_string(root.join("notes_1")).unwrap(), "Month");
    }

    #[test]
    fn test_reset_restores_unknown_entries_in_bucket() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        fs::create_dir_all(root.join("Old")).unwrap();
        fs::write(root.join("Old").join("stray.bin"), "b").unwrap();

        let report = Resetter::new(root).reset().expect("Reset failed");

        assert!(root.join("stray.bin").is_file());
        assert_eq!(report.removed_buckets, vec![root.join("Old")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_restore_keeps_bucket() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        // The root already holds this name and the `_1` suffix pushes it past
        // the filesystem's name length limit, so the restore fails.
        let long_name = "n".repeat(255);
        fs::write(root.join(&long_name), "loose").unwrap();
        fs::create_dir_all(root.join("Week").join("Other")).unwrap();
        fs::write(root.join("Week").join("Other").join(&long_name), "sorted").unwrap();
        fs::write(root.join("Week").join("Other").join("notes"), "n").unwrap();
        fs::create_dir_all(root.join("Today").join("Code")).unwrap();
        fs::write(root.join("Today").join("Code").join("app.py"), "py").unwrap();

        let report = Resetter::new(root).reset().expect("Reset failed");

        assert!(!report.is_complete_success());
        assert!(matches!(
            report.failures.as_slice(),
            [
                OrganizeError::MoveFailure { .. },
                OrganizeError::CleanupFailure { path, .. },
            ] if path == &root.join("Week")
        ));
        let kept = root.join("Week").join("Other").join(&long_name);
        assert_eq!(fs::read_to_string(kept).unwrap(), "sorted");
        assert!(root.join("notes").is_file());
        assert!(root.join("app.py").is_file());
        assert_eq!(report.removed_buckets, vec![root.join("Today")]);
    }

    #[test]
    fn test_reset_invalid_base_path() {
        let result = Resetter::new("/non/existent/path").reset();
        assert!(matches!(result, Err(OrganizeError::InvalidBasePath { .. })));
    }
}
