//! Command-line interface module for dirsweep.
//!
//! This module handles:
//! - Configuration loading and path resolution
//! - Dispatch of the sort, reset and tidy commands
//! - Reporting of every move and every item-level warning

use crate::config::{SweepConfig, SweepPaths};
use crate::file_organizer::FileOrganizer;
use crate::output::OutputFormatter;
use crate::reset::{ResetReport, Resetter};
use crate::sort::{SortAction, SortReport, Sorter};
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::Path;

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepCommand {
    /// Sort root entries into age and category folders.
    Sort {
        /// If true, report the planned moves without making changes.
        dry_run: bool,
    },
    /// Move everything under the bucket folders back to the root.
    Reset,
    /// Reset, then sort.
    Tidy,
}

/// Runs a command against the configured root and trash.
///
/// # Examples
///
/// ```no_run
/// use dirsweep::cli::{run_cli, SweepCommand};
/// use std::path::Path;
///
/// let result = run_cli(SweepCommand::Tidy, Path::new("/home/me/Downloads"));
/// if let Err(e) = result {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(command: SweepCommand, root: &Path) -> Result<(), String> {
    run_cli_with_config(command, Some(root), None, None)
}

/// Runs a command with explicit overrides and an optional configuration file.
///
/// `root` and `trash` take precedence over the configuration file. Item-level
/// failures are reported as warnings and do not produce an `Err`; only
/// configuration problems and an unreadable root do.
///
/// # Arguments
///
/// * `command` - The command to execute
/// * `root` - Directory to sort, overriding the configuration
/// * `trash` - Trash directory, overriding the configuration
/// * `config_path` - Optional path to configuration file
pub fn run_cli_with_config(
    command: SweepCommand,
    root: Option<&Path>,
    trash: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<(), String> {
    let config =
        SweepConfig::load(config_path).map_err(|e| format!("Error loading configuration: {}", e))?;
    let paths = config.resolve_paths(root, trash);

    match command {
        SweepCommand::Sort { dry_run } => sort_directory(&config, &paths, dry_run),
        SweepCommand::Reset => reset_directory(&paths),
        SweepCommand::Tidy => {
            reset_directory(&paths)?;
            sort_directory(&config, &paths, false)
        }
    }
}

/// Sorts the root directory and prints what happened.
fn sort_directory(config: &SweepConfig, paths: &SweepPaths, dry_run: bool) -> Result<(), String> {
    let filters = config
        .compile_filters()
        .map_err(|e| format!("Error compiling filters: {}", e))?;

    if dry_run {
        OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", paths.root.display()));
    } else {
        OutputFormatter::info(&format!("Sorting contents of: {}", paths.root.display()));
    }

    let organizer = FileOrganizer::new(&paths.root, &paths.trash);
    let report = Sorter::new(organizer, filters, Utc::now())
        .dry_run(dry_run)
        .with_progress(OutputFormatter::create_progress_bar())
        .sort()
        .map_err(|e| format!("Error: {}", e))?;

    print_sort_report(&report, &paths.root);
    Ok(())
}

fn print_sort_report(report: &SortReport, root: &Path) {
    let verb = if report.dry_run { "Would move" } else { "Moved" };

    for action in &report.actions {
        let line = format!(
            "{} {} → {}",
            verb,
            action.source().display(),
            action.destination().display()
        );
        if report.dry_run {
            OutputFormatter::plain(&format!(" - {}", line));
        } else {
            OutputFormatter::success(&line);
        }
    }

    for path in &report.reclaimed.removed {
        OutputFormatter::plain(&format!("Removed empty folder: {}", path.display()));
    }

    for skipped in &report.skipped {
        OutputFormatter::warning(&skipped.to_string());
    }
    for failure in report.failures.iter().chain(&report.reclaimed.failures) {
        OutputFormatter::warning(&failure.to_string());
    }

    if report.actions.is_empty() {
        OutputFormatter::plain("Nothing to sort.");
        return;
    }

    OutputFormatter::summary_table(&destination_counts(report, root));

    if report.dry_run {
        OutputFormatter::dry_run_notice("No files were modified.");
    } else if !report.is_complete_success() {
        OutputFormatter::warning("Some items could not be sorted. Please review warnings above.");
    }
}

/// Groups actions by `Bucket/Category`, `Bucket` for folders, or `Trash`.
fn destination_counts(report: &SortReport, root: &Path) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for action in &report.actions {
        let key = match action {
            SortAction::Trash { .. } => "Trash".to_string(),
            SortAction::Folder { bucket, .. } => bucket.dir_name().to_string(),
            SortAction::File { destination, .. } => destination
                .parent()
                .and_then(|dir| dir.strip_prefix(root).ok())
                .map(|rel| rel.to_string_lossy().to_string())
                .unwrap_or_default(),
        };
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Flattens the sorted tree back into the root and prints what happened.
fn reset_directory(paths: &SweepPaths) -> Result<(), String> {
    OutputFormatter::info(&format!("Resetting layout of: {}", paths.root.display()));

    let report = Resetter::new(&paths.root)
        .reset()
        .map_err(|e| format!("Error: {}", e))?;

    print_reset_report(&report);
    Ok(())
}

fn print_reset_report(report: &ResetReport) {
    for (from, to) in &report.restored {
        OutputFormatter::success(&format!("Restored {} → {}", from.display(), to.display()));
    }
    for bucket in &report.removed_buckets {
        OutputFormatter::plain(&format!("Removed folder: {}", bucket.display()));
    }
    for failure in &report.failures {
        OutputFormatter::warning(&failure.to_string());
    }

    OutputFormatter::plain(&format!("Reset complete. Restored: {}", report.restored.len()));
}
