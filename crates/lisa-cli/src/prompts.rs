//! Terminal prompts for a Lisa run
//!
//! Uses dialoguer for interactive selection. Without a TTY, or in `--yes`
//! mode, overwrites and detected types are accepted as-is; the
//! uncommitted-changes question is never auto-accepted.

use std::io::IsTerminal;

use colored::Colorize;
use dialoguer::{Confirm, MultiSelect, Select};
use lisa_core::{OverwriteDecision, ProjectType, Prompter};
use lisa_fs::NormalizedPath;

const UNCOMMITTED_CHANGES_HEADER: &str = "Uncommitted changes detected:";

const DIRTY_GIT_CONFIRM_MESSAGE: &str =
    "Your git working directory has uncommitted changes.\nContinue with Lisa anyway?";

/// Overwrite choices, in display order.
const OVERWRITE_CHOICES: &[(&str, OverwriteDecision)] = &[
    ("Yes - overwrite", OverwriteDecision::Yes),
    ("No - skip", OverwriteDecision::No),
    ("Diff - show differences", OverwriteDecision::Diff),
];

/// [`Prompter`] talking to the user's terminal.
pub struct TerminalPrompter {
    auto_accept: bool,
    has_tty: bool,
}

impl TerminalPrompter {
    pub fn new(yes_mode: bool) -> Self {
        let has_tty = std::io::stdin().is_terminal();
        Self {
            auto_accept: yes_mode || !has_tty,
            has_tty,
        }
    }
}

fn prompt_error(err: dialoguer::Error) -> lisa_core::Error {
    lisa_core::Error::Prompt {
        message: err.to_string(),
    }
}

impl Prompter for TerminalPrompter {
    fn prompt_overwrite(&self, relative: &NormalizedPath) -> lisa_core::Result<OverwriteDecision> {
        if self.auto_accept {
            return Ok(OverwriteDecision::Yes);
        }

        let labels: Vec<&str> = OVERWRITE_CHOICES.iter().map(|(label, _)| *label).collect();
        let index = Select::new()
            .with_prompt(format!("File differs: {relative}\nOverwrite?"))
            .items(&labels)
            .default(0)
            .interact()
            .map_err(prompt_error)?;

        Ok(OVERWRITE_CHOICES[index].1)
    }

    fn show_diff(&self, _relative: &NormalizedPath, diff: &str) -> lisa_core::Result<()> {
        println!("--- Differences ---");
        for line in diff.lines() {
            if line.starts_with("+++") || line.starts_with("---") {
                println!("{}", line.bold());
            } else if line.starts_with('+') {
                println!("{}", line.green());
            } else if line.starts_with('-') {
                println!("{}", line.red());
            } else if line.starts_with("@@") {
                println!("{}", line.cyan());
            } else {
                println!("{line}");
            }
        }
        println!("-------------------");
        Ok(())
    }

    fn confirm_project_types(&self, detected: &[String]) -> lisa_core::Result<Vec<String>> {
        if self.auto_accept {
            return Ok(detected.to_vec());
        }

        let display = if detected.is_empty() {
            "(none detected)".to_string()
        } else {
            detected.join(", ")
        };
        let accepted = Confirm::new()
            .with_prompt(format!("Detected project types: {display}\nContinue with these types?"))
            .default(true)
            .interact()
            .map_err(prompt_error)?;
        if accepted {
            return Ok(detected.to_vec());
        }

        let labels: Vec<&str> = ProjectType::ORDER.iter().map(ProjectType::as_str).collect();
        let preselected: Vec<bool> = labels
            .iter()
            .map(|label| detected.iter().any(|d| d == label))
            .collect();
        let chosen = MultiSelect::new()
            .with_prompt("Select project types (space to toggle, enter to confirm)")
            .items(&labels)
            .defaults(&preselected)
            .interact()
            .map_err(prompt_error)?;

        Ok(chosen.into_iter().map(|i| labels[i].to_string()).collect())
    }

    fn confirm_dirty_git(&self, status: &[String]) -> lisa_core::Result<bool> {
        println!();
        println!("{}", UNCOMMITTED_CHANGES_HEADER.yellow().bold());
        for line in status {
            println!("  {line}");
        }
        println!();

        if !self.has_tty {
            println!(
                "Cannot proceed: working directory has uncommitted changes and no TTY available for confirmation."
            );
            println!("Please commit or stash your changes before running Lisa.");
            return Ok(false);
        }

        Confirm::new()
            .with_prompt(DIRTY_GIT_CONFIRM_MESSAGE)
            .default(false)
            .interact()
            .map_err(prompt_error)
    }
}
