//! Pure formatting functions for UI output.
//!
//! This module contains all display logic separated from user interaction.

use console::style;

use crate::display::StatusItem;
use crate::error::ProjectVersionError;
use crate::service::BumpReport;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print an informational notice in cyan.
pub fn display_info(message: &str) {
    eprintln!("{} {}", style("ℹ").cyan(), message);
}

/// Present an error the way the host would.
///
/// A missing manifest is informational; everything else is an error.
pub fn display_failure(err: &ProjectVersionError) {
    if err.is_not_found() {
        display_info(&err.to_string());
    } else {
        display_error(&err.to_string());
    }
}

/// Render a status item as one line of terminal text.
///
/// The tooltip follows the text, dimmed, when there is one.
pub fn status_line(item: &StatusItem) -> String {
    match &item.tooltip {
        Some(tooltip) => format!("{}  {}", item.text, style(tooltip).dim()),
        None => item.text.clone(),
    }
}

/// Display the outcome of a bump.
///
/// Shows the version change and, for a saved manifest, where it was written.
pub fn display_bump(report: &BumpReport) {
    match report {
        BumpReport::Saved { path, from, to } => {
            println!("\n{}", style("Version Change:").bold());
            println!("  From: {}", style(from).red());
            println!("  To:   {}", style(to).green());
            display_success(&format!("Saved {}", path.display()));
        }
        BumpReport::Pending { from, to, .. } => {
            eprintln!("{} {} -> {} (not saved)", style("→").yellow(), from, to);
        }
    }
}
