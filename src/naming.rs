//! Collision-free destination names.
//!
//! Two schemes are provided. [`unique_path`] keeps the extension last
//! (`report_1.pdf`) and is used when sorting and trashing. [`unique_path_bare`]
//! appends the counter to the whole name (`report.pdf_1`) and is used when
//! flattening a sorted tree back into the root.
//!
//! Both only check for existence; the caller should move immediately after.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Returns `dir/name`, or the first free `dir/stem_N.ext` for N = 1, 2, ...
///
/// # Examples
///
/// ```
/// use dirsweep::naming::unique_path;
/// use std::ffi::OsStr;
/// use std::path::Path;
///
/// let dir = Path::new("/definitely/not/here");
/// assert_eq!(unique_path(dir, OsStr::new("a.txt")), dir.join("a.txt"));
/// ```
pub fn unique_path(dir: &Path, name: &OsStr) -> PathBuf {
    let candidate = dir.join(name);
    if !exists(&candidate) {
        return candidate;
    }

    let as_path = Path::new(name);
    let stem = as_path.file_stem().unwrap_or(name);
    let extension = as_path.extension();

    (1u64..)
        .map(|counter| {
            let mut next = OsString::from(stem);
            next.push(format!("_{}", counter));
            if let Some(ext) = extension {
                next.push(".");
                next.push(ext);
            }
            dir.join(next)
        })
        .find(|path| !exists(path))
        .unwrap_or(candidate)
}

/// Returns `dir/name`, or the first free `dir/name_N` for N = 1, 2, ...
pub fn unique_path_bare(dir: &Path, name: &OsStr) -> PathBuf {
    let candidate = dir.join(name);
    if !exists(&candidate) {
        return candidate;
    }

    (1u64..)
        .map(|counter| {
            let mut next = OsString::from(name);
            next.push(format!("_{}", counter));
            dir.join(next)
        })
        .find(|path| !exists(path))
        .unwrap_or(candidate)
}

// Broken symlinks count as taken.
fn exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}
