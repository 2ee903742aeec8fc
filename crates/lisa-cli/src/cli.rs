//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// Lisa - apply governed project configuration to a repository
///
/// Examples:
///   lisa /path/to/my-project
///   lisa --dry-run .
///   lisa --yes /path/to/project    # CI/CD pipeline usage
///   lisa --validate .              # Check compatibility only
///   lisa --uninstall .             # Remove Lisa configurations
#[derive(Parser, Debug)]
#[command(name = "lisa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the project directory
    pub destination: PathBuf,

    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Non-interactive mode (accept detected types, overwrite on conflict)
    #[arg(short, long)]
    pub yes: bool,

    /// Validate project compatibility without applying changes
    #[arg(long, conflicts_with = "uninstall")]
    pub validate: bool,

    /// Remove Lisa-managed files from the project
    #[arg(short, long)]
    pub uninstall: bool,

    /// Directory holding the Lisa configuration templates
    #[arg(short, long, env = "LISA_DIR")]
    pub source: Option<PathBuf>,

    /// Do not check the project for uncommitted git changes
    #[arg(long)]
    pub skip_git_check: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
