use clap::{Parser, Subcommand};
use dirsweep::cli::{SweepCommand, run_cli_with_config};
use dirsweep::output::OutputFormatter;
use std::path::PathBuf;
use std::process::ExitCode;

/// Sort a directory into age and category folders, or reset it back to flat.
#[derive(Debug, Parser)]
#[command(name = "dirsweep", version, about)]
struct Cli {
    /// Directory to sort (defaults to the configured root, ~/Downloads)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Where stale items are moved (defaults to the configured trash, ~/.Trash)
    #[arg(long, global = true)]
    trash: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify root entries and nest them by age and category
    Sort {
        /// Show what would be moved without touching anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Move everything under the age folders back into the root
    Reset,
    /// Reset, then sort (the default)
    Tidy,
}

impl From<Command> for SweepCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Sort { dry_run } => SweepCommand::Sort { dry_run },
            Command::Reset => SweepCommand::Reset,
            Command::Tidy => SweepCommand::Tidy,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.map(SweepCommand::from).unwrap_or(SweepCommand::Tidy);

    match run_cli_with_config(
        command,
        cli.root.as_deref(),
        cli.trash.as_deref(),
        cli.config.as_deref(),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e);
            ExitCode::FAILURE
        }
    }
}
