//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use std::path::Path;

use console::style;

use crate::domain::{BumpReport, FileAnalysisResult, UpdateOutcome};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a warning with a yellow marker.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print a dimmed diagnostic line.
pub fn display_verbose(message: &str) {
    println!("{}", style(message).dim());
}

fn relative<'p>(path: &'p Path, root: &Path) -> &'p Path {
    path.strip_prefix(root).unwrap_or(path)
}

/// Display the proposed version change.
pub fn display_version_change(from: &str, to: &str, dry_run: bool) {
    let title = if dry_run {
        "Proposed Version Change (dry run):"
    } else {
        "Version Change:"
    };
    println!("\n{}", style(title).bold());
    println!("  From: {}", style(from).red());
    println!("  To:   {}", style(to).green());
}

/// One line per analyzed file: status, detected version, reason.
pub fn format_analysis_line(result: &FileAnalysisResult, root: &Path) -> String {
    let file = relative(&result.file, root).display();
    let detected = result.detected_version.as_deref().unwrap_or("-");
    let status = if !result.supported {
        "unsupported"
    } else if result.version_mismatch {
        "mismatch"
    } else {
        "ok"
    };
    format!("{:<12} {:<14} {} ({})", status, detected, file, result.reason)
}

/// Display analysis results, highlighting unsupported and mismatched files.
pub fn display_analysis(results: &[FileAnalysisResult], root: &Path) {
    println!("\n{}", style("File analysis:").bold().underlined());
    for result in results {
        let line = format_analysis_line(result, root);
        if !result.supported {
            println!("  {}", style(line).red());
        } else if result.version_mismatch {
            println!("  {}", style(line).yellow());
        } else {
            println!("  {}", line);
        }
    }
}

/// Confirmation question for an analysis with unsupported or mismatched files.
pub fn format_confirmation_prompt(results: &[FileAnalysisResult]) -> String {
    let unsupported = results.iter().filter(|r| !r.supported).count();
    let mismatched = results
        .iter()
        .filter(|r| r.supported && r.version_mismatch)
        .count();

    let mut parts = Vec::new();
    if unsupported > 0 {
        parts.push(format!("{} unsupported file(s) will be skipped", unsupported));
    }
    if mismatched > 0 {
        parts.push(format!(
            "{} mismatched file(s) will be updated from their own version",
            mismatched
        ));
    }
    format!("{}. Continue?", parts.join("; "))
}

/// Summary line for a finished batch.
pub fn format_report_summary(report: &BumpReport) -> String {
    let modified = report.modified_files().len();
    let unchanged = report
        .results
        .iter()
        .filter(|r| matches!(r.outcome, UpdateOutcome::Unchanged | UpdateOutcome::Skipped))
        .count();
    if report.dry_run {
        format!(
            "Dry run: {} file(s) would be updated to {}, {} unchanged",
            modified, report.to, unchanged
        )
    } else {
        format!(
            "Updated {} file(s) to {}, {} unchanged",
            modified, report.to, unchanged
        )
    }
}

/// Display the files touched by a batch and its summary.
pub fn display_report(report: &BumpReport, root: &Path) {
    for file in report.modified_files() {
        println!("  {}", relative(file, root).display());
    }
    display_success(&format_report_summary(report));
}
