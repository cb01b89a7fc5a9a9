/// Relocation of root entries into the age/category hierarchy or the trash.
///
/// This module owns every move performed while sorting. Each operation
/// resolves a destination, creates missing parent directories and renames
/// the item, returning the final path. Failures are returned per item so the
/// caller can record them and carry on with the next entry.
use crate::age::AgeBucket;
use crate::file_category::{Category, category_of};
use crate::naming::unique_path;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Errors that can occur while sorting or resetting a directory.
///
/// Everything except [`OrganizeError::InvalidBasePath`] is scoped to a single
/// item and does not stop a run.
#[derive(Debug)]
pub enum OrganizeError {
    /// The modification time of an item could not be read.
    TimeUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move an item to its destination.
    MoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// A folder's destination already exists, or the folder is named like a
    /// category folder; folders are never merged.
    DestinationConflict {
        source: PathBuf,
        destination: PathBuf,
    },
    /// A directory could not be removed after its contents were relocated.
    CleanupFailure { path: PathBuf, reason: String },
    /// Failed to create a bucket, category or trash directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A directory below the root could not be listed.
    ReadDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The root directory is missing or cannot be enumerated.
    InvalidBasePath {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl OrganizeError {
    /// The item this error is about.
    pub fn path(&self) -> &Path {
        match self {
            Self::TimeUnavailable { path, .. }
            | Self::CleanupFailure { path, .. }
            | Self::DirectoryCreationFailed { path, .. }
            | Self::ReadDirFailed { path, .. }
            | Self::InvalidBasePath { path, .. } => path,
            Self::MoveFailure { source, .. } | Self::DestinationConflict { source, .. } => source,
        }
    }
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TimeUnavailable { path, source } => {
                write!(
                    f,
                    "Could not read modification time of {}: {}",
                    path.display(),
                    source
                )
            }
            Self::MoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::DestinationConflict {
                source,
                destination,
            } => {
                write!(
                    f,
                    "Skipping {}: destination {} already exists",
                    source.display(),
                    destination.display()
                )
            }
            Self::CleanupFailure { path, reason } => {
                write!(f, "Could not remove {}: {}", path.display(), reason)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TimeUnavailable { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::ReadDirFailed { source, .. }
            | Self::InvalidBasePath { source, .. } => Some(source),
            Self::MoveFailure { source_error, .. } => Some(source_error),
            Self::DestinationConflict { .. } | Self::CleanupFailure { .. } => None,
        }
    }
}

/// Result type for sorting and reset operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Moves root entries into `root/<bucket>/<category>/`, `root/<bucket>/` or the trash.
#[derive(Debug, Clone)]
pub struct FileOrganizer {
    root: PathBuf,
    trash: PathBuf,
}

impl FileOrganizer {
    /// Creates an organizer for the given root and trash directories.
    ///
    /// Both paths are resolved with [`resolve_dir`] so that the trash is
    /// recognised under the root whatever form it was given in.
    pub fn new(root: impl AsRef<Path>, trash: impl AsRef<Path>) -> Self {
        Self {
            root: resolve_dir(root.as_ref()),
            trash: resolve_dir(trash.as_ref()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn trash(&self) -> &Path {
        &self.trash
    }

    /// The directory a file of this bucket and name would be sorted into.
    pub fn file_destination_dir(&self, file_path: &Path, bucket: AgeBucket) -> PathBuf {
        self.root
            .join(bucket.dir_name())
            .join(category_of(file_path).dir_name())
    }

    /// The exact path a folder of this bucket would be moved to.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::DestinationConflict`] if the destination
    /// already exists, or if the folder carries a category name. A folder
    /// called `Images` under a bucket would be drained like a category
    /// folder on reset, so it stays in the root instead.
    pub fn folder_destination(&self, folder_path: &Path, bucket: AgeBucket) -> OrganizeResult<PathBuf> {
        let name = folder_path.file_name().unwrap_or(folder_path.as_os_str());
        let destination = self.root.join(bucket.dir_name()).join(name);

        let category_named = name.to_str().and_then(Category::from_dir_name).is_some();
        if category_named || destination.symlink_metadata().is_ok() {
            return Err(OrganizeError::DestinationConflict {
                source: folder_path.to_path_buf(),
                destination,
            });
        }
        Ok(destination)
    }

    /// Moves an item into the trash directory, renaming it on collision.
    ///
    /// The trash directory is created if it does not exist. Nothing is ever
    /// deleted: the item is only relocated.
    ///
    /// The move is a plain rename, so the trash must be on the same
    /// filesystem as the root. A trash on another device fails with
    /// [`OrganizeError::MoveFailure`] and the item stays where it is; there
    /// is no copy-then-delete fallback.
    ///
    /// # Returns
    ///
    /// The path the item now lives at.
    pub fn move_to_trash(&self, path: &Path) -> OrganizeResult<PathBuf> {
        ensure_dir(&self.trash)?;
        let name = file_name(path, &self.trash)?;
        let destination = unique_path(&self.trash, name);
        rename(path, destination)
    }

    /// Moves a file into `root/<bucket>/<category>/`.
    ///
    /// The category is derived from the file name. The destination tree is
    /// created on demand. If a file of the same name is already there, the
    /// new one is suffixed (`app_1.py`) rather than overwriting it.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsweep::age::AgeBucket;
    /// use dirsweep::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let organizer = FileOrganizer::new("/home/me/Downloads", "/home/me/.Trash");
    /// match organizer.move_file(Path::new("/home/me/Downloads/report.pdf"), AgeBucket::Week) {
    ///     Ok(dest) => println!("Moved to {}", dest.display()),
    ///     Err(e) => eprintln!("{}", e),
    /// }
    /// ```
    pub fn move_file(&self, file_path: &Path, bucket: AgeBucket) -> OrganizeResult<PathBuf> {
        let destination_dir = self.file_destination_dir(file_path, bucket);
        ensure_dir(&destination_dir)?;
        let name = file_name(file_path, &destination_dir)?;
        let destination = unique_path(&destination_dir, name);
        rename(file_path, destination)
    }

    /// Moves a whole folder into `root/<bucket>/`.
    ///
    /// Folders are not categorised. If [`FileOrganizer::folder_destination`]
    /// reports a conflict the folder is left where it is and the error is
    /// returned.
    pub fn move_folder(&self, folder_path: &Path, bucket: AgeBucket) -> OrganizeResult<PathBuf> {
        let destination = self.folder_destination(folder_path, bucket)?;

        if let Some(parent) = destination.parent() {
            ensure_dir(parent)?;
        }
        rename(folder_path, destination)
    }
}

/// Makes `path` absolute, resolving symlinks and `..` components.
///
/// Trailing components that do not exist yet are appended to the nearest
/// existing ancestor, with `.` and `..` applied lexically.
pub fn resolve_dir(path: &Path) -> PathBuf {
    let Ok(absolute) = std::path::absolute(path) else {
        return path.to_path_buf();
    };

    for base in absolute.ancestors() {
        let Ok(mut resolved) = base.canonicalize() else {
            continue;
        };
        let rest = absolute.strip_prefix(base).unwrap_or(Path::new(""));
        for component in rest.components() {
            match component {
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::Normal(part) => resolved.push(part),
                _ => {}
            }
        }
        return resolved;
    }

    absolute
}

/// Creates `dir` and any missing parents.
pub(crate) fn ensure_dir(dir: &Path) -> OrganizeResult<()> {
    fs::create_dir_all(dir).map_err(|e| OrganizeError::DirectoryCreationFailed {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Renames `source` to `destination`, returning the destination on success.
pub(crate) fn rename(source: &Path, destination: PathBuf) -> OrganizeResult<PathBuf> {
    match fs::rename(source, &destination) {
        Ok(()) => Ok(destination),
        Err(e) => Err(OrganizeError::MoveFailure {
            source: source.to_path_buf(),
            destination,
            source_error: e,
        }),
    }
}

fn file_name<'a>(path: &'a Path, destination_dir: &Path) -> OrganizeResult<&'a std::ffi::OsStr> {
    path.file_name().ok_or_else(|| OrganizeError::MoveFailure {
        source: path.to_path_buf(),
        destination: destination_dir.to_path_buf(),
        source_error: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no name component",
        ),
    })
}
