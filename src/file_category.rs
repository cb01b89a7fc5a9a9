/// File categorization by name suffix.
///
/// This module maps a file name to one of a fixed set of categories using an
/// ordered, static rule table. The first rule that matches wins; names that
/// match no rule fall into [`Category::Other`].
///
/// # Examples
///
/// ```
/// use dirsweep::file_category::{Category, category_of};
/// use std::path::Path;
///
/// assert_eq!(category_of(Path::new("report.PDF")), Category::Documents);
/// assert_eq!(category_of(Path::new("backup.tar.gz")), Category::Archives);
/// assert_eq!(category_of(Path::new("notes")), Category::Other);
/// ```
use std::path::Path;

/// Represents a broad file category.
///
/// Each category owns a folder of the same name under an age bucket folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Document files (PDF, DOCX, TXT, spreadsheets, etc.)
    Documents,
    /// Image files (PNG, JPG, GIF, etc.)
    Images,
    /// Screenshots, recognised by suffix or by name
    Screenshots,
    /// Video files (MP4, MOV, MKV, etc.)
    Videos,
    /// Audio files (MP3, WAV, FLAC)
    Music,
    /// Archives and disk images (ZIP, TAR, DMG, etc.)
    Archives,
    /// Source code and data files
    Code,
    /// BitTorrent metadata files
    Torrents,
    /// Anything not matched by another rule
    Other,
}

impl Category {
    /// Every category, in the order folders are visited during a reset.
    pub const ALL: [Category; 9] = [
        Category::Images,
        Category::Videos,
        Category::Music,
        Category::Documents,
        Category::Archives,
        Category::Code,
        Category::Torrents,
        Category::Screenshots,
        Category::Other,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsweep::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "Images");
    /// assert_eq!(Category::Other.dir_name(), "Other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Documents => "Documents",
            Category::Images => "Images",
            Category::Screenshots => "Screenshots",
            Category::Videos => "Videos",
            Category::Music => "Music",
            Category::Archives => "Archives",
            Category::Code => "Code",
            Category::Torrents => "Torrents",
            Category::Other => "Other",
        }
    }

    /// Looks up a category by its directory name, ignoring ASCII case.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.dir_name().eq_ignore_ascii_case(name))
    }
}

/// One row of the classification table.
#[derive(Debug)]
pub struct CategoryRule {
    pub category: Category,
    /// Lower-case suffixes matched against the end of the file name.
    pub suffixes: &'static [&'static str],
    /// Lower-case substrings matched anywhere in the file name.
    pub name_patterns: &'static [&'static str],
}

/// Classification rules. Order matters: the first matching rule wins.
pub static CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Documents,
        suffixes: &[".pdf", ".docx", ".txt", ".rtf", ".md", ".xls", ".xlsx"],
        name_patterns: &[],
    },
    CategoryRule {
        category: Category::Images,
        suffixes: &[".jpg", ".jpeg", ".png", ".gif", ".bmp"],
        name_patterns: &[],
    },
    CategoryRule {
        category: Category::Screenshots,
        suffixes: &[".screenshot"],
        name_patterns: &["_screenshot", "screenshot"],
    },
    CategoryRule {
        category: Category::Videos,
        suffixes: &[".mp4", ".mov", ".avi", ".mkv"],
        name_patterns: &[],
    },
    CategoryRule {
        category: Category::Music,
        suffixes: &[".mp3", ".wav", ".flac"],
        name_patterns: &[],
    },
    CategoryRule {
        category: Category::Archives,
        suffixes: &[".zip", ".rar", ".tar.gz", ".tar", ".dmg"],
        name_patterns: &[],
    },
    CategoryRule {
        category: Category::Code,
        suffixes: &[".py", ".js", ".html", ".css", ".java", ".go", ".json"],
        name_patterns: &[],
    },
    CategoryRule {
        category: Category::Torrents,
        suffixes: &[".torrent"],
        name_patterns: &[],
    },
];

impl CategoryRule {
    fn matches(&self, lower_name: &str) -> bool {
        self.suffixes.iter().any(|s| lower_name.ends_with(s))
            || self.name_patterns.iter().any(|p| lower_name.contains(p))
    }
}

/// Determines the category of a file from its name.
///
/// Matching is case-insensitive and purely name-based; the file is never
/// opened. Paths without a file name component classify as `Other`.
pub fn category_of(path: &Path) -> Category {
    let Some(name) = path.file_name() else {
        return Category::Other;
    };
    let lower_name = name.to_string_lossy().to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|rule| rule.matches(&lower_name))
        .map(|rule| rule.category)
        .unwrap_or(Category::Other)
}
