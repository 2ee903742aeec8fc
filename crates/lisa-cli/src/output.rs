//! Terminal rendering of run reports

use std::path::Path;

use colored::{ColoredString, Colorize};
use lisa_core::{Action, ApplyConfig, FileOperationResult, RunMode, RunReport, UninstallStats};

const SEPARATOR: &str = "========================================";
const LISAIGNORE_SUFFIX: &str = "(.lisaignore)";

fn banner(title: &str, paint: fn(&str) -> ColoredString) {
    println!();
    println!("{}", paint(SEPARATOR));
    println!("{}", paint(&format!("    {title}")));
    println!("{}", paint(SEPARATOR));
    println!();
}

fn blue(text: &str) -> ColoredString {
    text.blue()
}

fn green(text: &str) -> ColoredString {
    text.green()
}

/// Mode of an apply run as configured on the command line.
pub fn apply_mode(config: &ApplyConfig) -> RunMode {
    if config.validate_only {
        RunMode::Validate
    } else if config.dry_run {
        RunMode::DryRun
    } else {
        RunMode::Apply
    }
}

pub fn print_header(config: &ApplyConfig) {
    let mode = apply_mode(config);
    let title = match mode {
        RunMode::Validate => "Lisa Project Bootstrapper (VALIDATE)",
        RunMode::DryRun => "Lisa Project Bootstrapper (DRY RUN)",
        _ => "Lisa Project Bootstrapper",
    };
    banner(title, blue);

    match mode {
        RunMode::Validate => {
            println!("{} Validate mode - checking project compatibility", "=>".blue().bold());
        }
        RunMode::DryRun => {
            println!("{} Dry run mode - no changes will be made", "WARN".yellow().bold());
        }
        _ => {}
    }
    print_paths(&config.source_dir, &config.dest_dir);
}

fn print_paths(source: &Path, dest: &Path) {
    println!("{} Lisa directory: {}", "=>".blue().bold(), source.display());
    println!("{} Destination:    {}", "=>".blue().bold(), dest.display());
    println!();
}

/// One line per file that changed, or would change.
pub fn print_results(report: &RunReport) {
    let dry = report.mode != RunMode::Apply;
    for result in &report.results {
        if let Some(line) = describe(result, dry) {
            println!("  {line}");
        }
    }
    for path in &report.deleted {
        let verb = if dry { "Would delete:" } else { "Deleted:" };
        println!("  {} {path}", verb.red());
    }
}

fn describe(result: &FileOperationResult, dry: bool) -> Option<String> {
    let path = &result.relative_path;
    let line = match (result.action, dry) {
        (Action::Skipped, _) => return None,
        (Action::Copied, true) => format!("{} {path}", "Would copy:".green()),
        (Action::Copied, false) => format!("{} {path}", "Copied:".green()),
        (Action::Created, true) => format!("{} {path}", "Would create:".green()),
        (Action::Created, false) => format!("{} {path}", "Created:".green()),
        (Action::Overwritten, true) => format!("{} {path}", "Would prompt to overwrite:".yellow()),
        (Action::Overwritten, false) => format!("{} {path}", "Overwritten:".yellow()),
        (Action::Appended, dry) => {
            let lines = result.lines_added.unwrap_or_default();
            let verb = if dry { "Would append" } else { "Appended" };
            format!("{} {lines} lines to: {path}", verb.blue())
        }
        (Action::Merged, true) => format!("{} {path}", "Would merge:".green()),
        (Action::Merged, false) => format!("{} {path}", "Merged:".green()),
    };
    Some(line)
}

pub fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        println!("{} {warning}", "WARN".yellow().bold());
    }
}

fn stat_line(label: ColoredString, value: usize, suffix: &str) {
    if suffix.is_empty() {
        println!("  {label} {value:>3} files");
    } else {
        println!("  {label} {value:>3} files {suffix}");
    }
}

pub fn print_summary(report: &RunReport) {
    let title = match report.mode {
        RunMode::Validate => "Lisa Validation Complete",
        RunMode::DryRun => "Lisa Dry Run Complete",
        _ => "Lisa Installation Complete!",
    };
    banner(title, green);

    let c = &report.counters;
    match report.mode {
        RunMode::Validate => {
            stat_line("Compatible files:   ".green(), c.copied, "");
            stat_line("Already present:    ".blue(), c.skipped, "");
            stat_line("Would conflict:     ".yellow(), c.overwritten, "");
            stat_line("Would append:       ".blue(), c.appended, "");
            stat_line("Would merge:        ".green(), c.merged, "");
            stat_line("Would delete:       ".red(), c.deleted, "");
            if c.ignored > 0 {
                stat_line("Ignored:            ".magenta(), c.ignored, LISAIGNORE_SUFFIX);
            }
        }
        RunMode::DryRun => {
            stat_line("Would copy:     ".green(), c.copied, "");
            stat_line("Would skip:     ".blue(), c.skipped, "(identical or create-only)");
            stat_line("Would prompt:   ".yellow(), c.overwritten, "(differ)");
            stat_line("Would append:   ".blue(), c.appended, "(copy-contents)");
            stat_line("Would merge:    ".green(), c.merged, "(JSON)");
            stat_line("Would delete:   ".red(), c.deleted, "");
            if c.ignored > 0 {
                stat_line("Would ignore:   ".magenta(), c.ignored, LISAIGNORE_SUFFIX);
            }
        }
        _ => {
            stat_line("Copied:     ".green(), c.copied, "");
            stat_line("Skipped:    ".blue(), c.skipped, "(identical or create-only)");
            stat_line("Overwritten:".yellow(), c.overwritten, "(user approved)");
            stat_line("Appended:   ".blue(), c.appended, "(copy-contents)");
            stat_line("Merged:     ".green(), c.merged, "(JSON merged)");
            stat_line("Deleted:    ".red(), c.deleted, "");
            if c.ignored > 0 {
                stat_line("Ignored:    ".magenta(), c.ignored, LISAIGNORE_SUFFIX);
            }
        }
    }

    println!();
    let types = std::iter::once(lisa_core::ALL_TYPE)
        .chain(report.detected_types.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    println!("Project types: {}", types.green());
    println!();

    if report.mode == RunMode::Validate {
        if c.overwritten > 0 {
            println!(
                "{} Validation found {} file(s) that would conflict",
                "WARN".yellow().bold(),
                c.overwritten
            );
            println!("Run without --validate to apply changes interactively");
        } else {
            println!(
                "{} Project is compatible with Lisa configurations",
                "OK".green().bold()
            );
        }
    }
}

pub fn print_uninstall_header(dest: &Path) {
    banner("Lisa Uninstaller", blue);
    println!(
        "{} Reading manifest: {}",
        "=>".blue().bold(),
        dest.join(lisa_core::MANIFEST_FILE).display()
    );
    println!();
}

pub fn print_uninstall(stats: &UninstallStats, dry_run: bool) {
    let verb = if dry_run { "Would remove:" } else { "Removed:" };
    for path in &stats.removed {
        println!("  {} {path}", verb.green());
    }

    let title = if dry_run {
        "Lisa Uninstall Dry Run Complete"
    } else {
        "Lisa Uninstall Complete!"
    };
    banner(title, green);
    stat_line("Removed:    ".green(), stats.removed.len(), "");
    stat_line("Skipped:    ".yellow(), stats.skipped.len(), "(manual review needed)");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use lisa_core::StrategyKind;
    use lisa_fs::NormalizedPath;

    fn result(action: Action, lines_added: Option<usize>) -> FileOperationResult {
        FileOperationResult {
            relative_path: NormalizedPath::new(".gitignore"),
            strategy: StrategyKind::CopyContents,
            action,
            lines_added,
        }
    }

    #[test]
    fn test_skipped_files_are_silent() {
        assert!(describe(&result(Action::Skipped, None), false).is_none());
    }

    #[test]
    fn test_appended_mentions_line_count() {
        colored::control::set_override(false);
        let line = describe(&result(Action::Appended, Some(2)), true).unwrap();
        assert_eq!(line, "Would append 2 lines to: .gitignore");
    }

    #[test]
    fn test_apply_mode_prefers_validate() {
        let config = ApplyConfig::new("/lisa", "/p")
            .with_dry_run(true)
            .with_validate_only(true);
        assert_eq!(apply_mode(&config), RunMode::Validate);
    }
}
