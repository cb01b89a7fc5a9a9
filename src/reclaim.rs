//! Removal of directories left empty after a sort.

use crate::file_organizer::OrganizeError;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of a pruning pass.
#[derive(Debug, Default)]
pub struct ReclaimReport {
    /// Directories that were removed, deepest first.
    pub removed: Vec<PathBuf>,
    /// Directories that could not be walked, or were empty but could not be
    /// removed.
    pub failures: Vec<OrganizeError>,
}

/// Deletes every empty directory below `root`, deepest first.
///
/// The walk is post-order, so a directory is examined only after all of its
/// descendants; removing the last child makes the parent eligible in the same
/// pass. `root` itself is never removed, and nothing inside a `protected`
/// directory is touched.
pub fn prune_empty_directories(root: &Path, protected: &[&Path]) -> ReclaimReport {
    let mut report = ReclaimReport::default();

    let walker = WalkDir::new(root).min_depth(1).contents_first(true);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                report.failures.push(OrganizeError::ReadDirFailed {
                    path,
                    source: e.into(),
                });
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        // filter_entry cannot prune here: with contents_first a directory
        // is only yielded after its children.
        if protected.iter().any(|p| path.starts_with(p)) || !is_empty_dir(path) {
            continue;
        }

        match fs::remove_dir(path) {
            Ok(()) => report.removed.push(path.to_path_buf()),
            Err(e) => report.failures.push(OrganizeError::CleanupFailure {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    report
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_removes_empty_and_keeps_non_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("empty")).unwrap();
        fs::create_dir(root.join("full")).unwrap();
        fs::write(root.join("full").join("keep.txt"), "x").unwrap();

        let report = prune_empty_directories(root, &[]);

        assert!(!root.join("empty").exists());
        assert!(root.join("full").join("keep.txt").exists());
        assert_eq!(report.removed, vec![root.join("empty")]);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_cascades_to_parents() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("Week").join("Code").join("deep")).unwrap();

        let report = prune_empty_directories(root, &[]);

        assert!(!root.join("Week").exists());
        assert_eq!(report.removed.len(), 3);
        assert_eq!(report.removed.last(), Some(&root.join("Week")));
    }

    #[test]
    fn test_root_is_never_removed() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let report = prune_empty_directories(temp_dir.path(), &[]);
        assert!(temp_dir.path().is_dir());
        assert!(report.removed.is_empty());
    }

    #[test]
    fn test_walk_errors_are_reported() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("missing");

        let report = prune_empty_directories(&missing, &[]);

        assert!(report.removed.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            &report.failures[0],
            OrganizeError::ReadDirFailed { path, .. } if path == &missing
        ));
    }

    #[test]
    fn test_protected_directory_is_skipped() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let trash = root.join(".trash");
        fs::create_dir_all(trash.join("inner")).unwrap();

        prune_empty_directories(root, &[trash.as_path()]);

        assert!(trash.join("inner").is_dir());
    }
}
