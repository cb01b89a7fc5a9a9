//! Configuration for directory locations and entry filtering.
//!
//! Configuration is stored in TOML. Every section is optional; missing
//! values fall back to the defaults shown below.
//!
//! ```toml
//! [paths]
//! root = "~/Downloads"
//! trash = "~/.Trash"
//!
//! [filters]
//! enable_hidden_files = true
//!
//! [filters.exclude]
//! filenames = [".DS_Store", "desktop.ini"]
//! patterns = ["*.part"]
//! extensions = ["crdownload"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```
//!
//! Filters decide which root entries are considered at all; an excluded entry
//! is left exactly where it is.

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during configuration loading and filtering.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub filters: FilterRules,
}

/// Locations of the directory to sort and the trash.
///
/// A leading `~` is expanded to `$HOME` when resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default = "default_trash")]
    pub trash: String,
}

fn default_root() -> String {
    "~/Downloads".to_string()
}

fn default_trash() -> String {
    "~/.Trash".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            trash: default_trash(),
        }
    }
}

/// Root-level filter rules configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether entries starting with "." are sorted. Defaults to true.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    /// Rules for excluding entries.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including entries (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

fn default_enable_hidden_files() -> bool {
    true
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: default_enable_hidden_files(),
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

/// Rules for excluding entries from sorting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact names to exclude. Defaults to OS metadata files.
    #[serde(default = "default_excluded_filenames")]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.part").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude (e.g., "crdownload"), case-insensitive.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the entry name.
    #[serde(default)]
    pub regex: Vec<String>,
}

fn default_excluded_filenames() -> Vec<String> {
    vec![".DS_Store".to_string(), "desktop.ini".to_string()]
}

impl Default for ExcludeRules {
    fn default() -> Self {
        Self {
            filenames: default_excluded_filenames(),
            patterns: Vec::new(),
            extensions: Vec::new(),
            regex: Vec::new(),
        }
    }
}

/// Rules for including entries, overriding exclude rules (whitelist).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns that override exclude rules.
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Root and trash directories after `~` expansion and command-line overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepPaths {
    pub root: PathBuf,
    pub trash: PathBuf,
}

impl SweepConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.dirsweeprc.toml` in the current directory
    /// 3. Look for `~/.config/dirsweep/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any discovered file is not valid TOML.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".dirsweeprc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(home) = home_dir() {
            let home_config = home.join(".config").join("dirsweep").join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Resolves the root and trash directories.
    ///
    /// Explicit overrides win over configured values; configured values have
    /// a leading `~` expanded.
    pub fn resolve_paths(&self, root: Option<&Path>, trash: Option<&Path>) -> SweepPaths {
        SweepPaths {
            root: root
                .map(Path::to_path_buf)
                .unwrap_or_else(|| expand_home(&self.paths.root)),
            trash: trash
                .map(Path::to_path_buf)
                .unwrap_or_else(|| expand_home(&self.paths.trash)),
        }
    }

    /// Compile the filter rules into matchers.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    if raw == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from(raw));
    }
    match (raw.strip_prefix("~/"), home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}

/// Compiled filter rules, ready for matching.
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let compile_globs = |patterns: &[String]| {
            patterns
                .iter()
                .map(|pattern| {
                    Pattern::new(pattern)
                        .map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
                })
                .collect::<Result<Vec<_>, _>>()
        };

        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Check whether a root entry should be sorted.
    ///
    /// Checks are performed in this order, with early termination:
    /// 1. Include patterns (whitelist) - if matched, always include
    /// 2. Hidden entry filter - if hidden and disabled, exclude
    /// 3. Exact name match - if matched, exclude
    /// 4. Extension match - if matched, exclude
    /// 5. Glob pattern match - if matched, exclude
    /// 6. Regex match on the name - if matched, exclude
    /// 7. Default: include
    pub fn should_include(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.include_patterns.iter().any(|p| p.matches_path(path)) {
            return true;
        }

        if !self.enable_hidden_files && name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(name.as_ref()) {
            return false;
        }

        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self.exclude_patterns.iter().any(|p| p.matches_path(path)) {
            return false;
        }

        !self.exclude_regexes.iter().any(|r| r.is_match(&name))
    }
}

impl Default for CompiledFilters {
    fn default() -> Self {
        // The default rules contain no patterns, so compilation cannot fail.
        let rules = FilterRules::default();
        Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.into_iter().collect(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(rules: FilterRules) -> CompiledFilters {
        SweepConfig {
            paths: PathsConfig::default(),
            filters: rules,
        }
        .compile_filters()
        .unwrap()
    }

    #[test]
    fn test_default_excludes_os_metadata() {
        let compiled = SweepConfig::default().compile_filters().unwrap();

        assert!(!compiled.should_include(Path::new(".DS_Store")));
        assert!(!compiled.should_include(Path::new("desktop.ini")));
        assert!(compiled.should_include(Path::new("report.pdf")));
    }

    #[test]
    fn test_hidden_files_sorted_by_default() {
        let compiled = SweepConfig::default().compile_filters().unwrap();
        assert!(compiled.should_include(Path::new(".env.backup")));
    }

    #[test]
    fn test_hidden_files_excluded_when_disabled() {
        let compiled = compile(FilterRules {
            enable_hidden_files: false,
            ..Default::default()
        });
        assert!(!compiled.should_include(Path::new(".hidden")));
        assert!(compiled.should_include(Path::new("visible")));
    }

    #[test]
    fn test_exclude_extensions_case_insensitive() {
        let compiled = compile(FilterRules {
            exclude: ExcludeRules {
                extensions: vec!["crdownload".to_string(), ".part".to_string()],
                ..Default::default()
            },
            ..Default::default()
        });

        assert!(!compiled.should_include(Path::new("movie.mp4.crdownload")));
        assert!(!compiled.should_include(Path::new("iso.PART")));
        assert!(compiled.should_include(Path::new("movie.mp4")));
    }

    #[test]
    fn test_exclude_glob_and_regex() {
        let compiled = compile(FilterRules {
            exclude: ExcludeRules {
                patterns: vec!["*.tmp".to_string()],
                regex: vec![r"^keep_.*".to_string()],
                ..Default::default()
            },
            ..Default::default()
        });

        assert!(!compiled.should_include(Path::new("scratch.tmp")));
        assert!(!compiled.should_include(Path::new("keep_me.pdf")));
        assert!(compiled.should_include(Path::new("other.pdf")));
    }

    #[test]
    fn test_include_overrides_exclude() {
        let compiled = compile(FilterRules {
            enable_hidden_files: false,
            include: IncludeRules {
                patterns: vec![".important".to_string()],
            },
            ..Default::default()
        });

        assert!(compiled.should_include(Path::new(".important")));
        assert!(!compiled.should_include(Path::new(".other")));
    }

    #[test]
    fn test_invalid_patterns_return_errors() {
        let bad_regex = SweepConfig {
            paths: PathsConfig::default(),
            filters: FilterRules {
                exclude: ExcludeRules {
                    regex: vec!["[invalid(".to_string()],
                    ..Default::default()
                },
                ..Default::default()
            },
        };
        assert!(matches!(
            bad_regex.compile_filters(),
            Err(ConfigError::InvalidRegexPattern { .. })
        ));

        let bad_glob = SweepConfig {
            paths: PathsConfig::default(),
            filters: FilterRules {
                exclude: ExcludeRules {
                    patterns: vec!["[invalid".to_string()],
                    ..Default::default()
                },
                ..Default::default()
            },
        };
        assert!(matches!(
            bad_glob.compile_filters(),
            Err(ConfigError::InvalidGlobPattern(_))
        ));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SweepConfig::from_toml(
            r#"
            [paths]
            root = "/data/incoming"
            "#,
        )
        .unwrap();

        assert_eq!(config.paths.root, "/data/incoming");
        assert_eq!(config.paths.trash, "~/.Trash");
        assert!(config.filters.enable_hidden_files);
        assert_eq!(config.filters.exclude.filenames, default_excluded_filenames());
    }

    #[test]
    fn test_full_toml() {
        let config = SweepConfig::from_toml(
            r#"
            [paths]
            root = "/srv/dl"
            trash = "/srv/trash"

            [filters]
            enable_hidden_files = false

            [filters.exclude]
            filenames = ["Thumbs.db"]
            extensions = ["part"]
            "#,
        )
        .unwrap();

        assert!(!config.filters.enable_hidden_files);
        assert_eq!(config.filters.exclude.filenames, vec!["Thumbs.db"]);
        assert_eq!(config.filters.exclude.extensions, vec!["part"]);
    }

    #[test]
    fn test_invalid_toml() {
        let result = SweepConfig::from_toml("[paths\nroot = 1");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let result = SweepConfig::load(Some(Path::new("/no/such/dirsweep.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_resolve_paths_prefers_overrides() {
        let config = SweepConfig::from_toml(
            r#"
            [paths]
            root = "/configured/root"
            trash = "/configured/trash"
            "#,
        )
        .unwrap();

        let resolved = config.resolve_paths(Some(Path::new("/cli/root")), None);
        assert_eq!(resolved.root, PathBuf::from("/cli/root"));
        assert_eq!(resolved.trash, PathBuf::from("/configured/trash"));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_home("relative"), PathBuf::from("relative"));
        if let Some(home) = home_dir() {
            assert_eq!(expand_home("~/Downloads"), home.join("Downloads"));
            assert_eq!(expand_home("~"), home);
        }
    }

    #[test]
    fn test_default_compiled_filters_match_default_config() {
        let compiled = CompiledFilters::default();
        assert!(!compiled.should_include(Path::new(".DS_Store")));
        assert!(compiled.should_include(Path::new(".hidden")));
    }
}
