//! dirsweep - age and type based sorting for a downloads-style directory
//!
//! This library classifies the entries of a single directory by category
//! (from the file name) and age (from the modification time), nests them into
//! `root/<bucket>/<category>/`, moves stale entries to a trash directory, and
//! can flatten the generated layout back into the root.

pub mod age;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod naming;
pub mod output;
pub mod reclaim;
pub mod reset;
pub mod sort;

pub use age::{AgeBucket, age_bucket_of};
pub use config::{CompiledFilters, ConfigError, SweepConfig};
pub use file_category::{Category, category_of};
pub use file_organizer::{FileOrganizer, OrganizeError, OrganizeResult};
pub use reclaim::prune_empty_directories;
pub use reset::{ResetReport, Resetter};
pub use sort::{SortAction, SortReport, Sorter};

pub use cli::{SweepCommand, run_cli, run_cli_with_config};
