//! Lisa CLI
//!
//! Applies governed configuration templates to a project directory.

mod cli;
mod error;
mod output;
mod prompts;

use clap::Parser;
use colored::Colorize;
use lisa_core::{ApplyConfig, Engine, RunMode};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::Cli;
use error::{CliError, Result};
use prompts::TerminalPrompter;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    let source = cli.source.as_deref().ok_or(CliError::MissingSource)?;
    let config = ApplyConfig::new(error::absolute(source)?, error::absolute(&cli.destination)?)
        .with_dry_run(cli.dry_run)
        .with_yes_mode(cli.yes)
        .with_validate_only(cli.validate)
        .with_skip_git_check(cli.skip_git_check);
    let engine = Engine::new(config).with_prompter(TerminalPrompter::new(cli.yes));

    if cli.uninstall {
        cmd_uninstall(&engine)
    } else {
        cmd_apply(&engine)
    }
}

fn cmd_apply(engine: &Engine) -> Result<()> {
    let config = engine.config();
    output::print_header(config);

    let report = if config.validate_only {
        engine.validate()?
    } else {
        engine.apply()?
    };

    output::print_results(&report);
    output::print_warnings(&report.warnings);

    if !report.success {
        for error in &report.errors {
            eprintln!("{}: {}", "error".red().bold(), error);
        }
        return Err(CliError::RunFailed {
            restored: report.mode == RunMode::Apply,
        });
    }

    output::print_summary(&report);
    Ok(())
}

fn cmd_uninstall(engine: &Engine) -> Result<()> {
    let config = engine.config();
    output::print_uninstall_header(&config.dest_dir);

    let report = engine.uninstall()?;
    output::print_warnings(&report.warnings);
    if let Some(stats) = &report.uninstall {
        output::print_uninstall(stats, config.dry_run);
    }
    Ok(())
}
