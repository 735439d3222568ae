//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::patch::{Outcome, PatchReport};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Format a step outcome as a colored string
pub fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Applied { .. } => outcome.to_string().green().to_string(),
        Outcome::AlreadyPresent => outcome.to_string().dimmed().to_string(),
        Outcome::ListNotFound { .. } => outcome.to_string().yellow().to_string(),
    }
}

/// Print a table of step outcomes
pub fn print_report_table(report: &PatchReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Step").fg(Color::Cyan),
            Cell::new("Outcome").fg(Color::Cyan),
        ]);

    for step in &report.steps {
        let color = match step.outcome {
            Outcome::Applied { .. } => Color::Green,
            Outcome::AlreadyPresent => Color::Grey,
            Outcome::ListNotFound { .. } => Color::Yellow,
        };
        table.add_row(vec![
            Cell::new(step.step.to_string()),
            Cell::new(step.outcome.to_string()).fg(color),
        ]);
    }

    println!("{table}");
}

/// Print a one-line summary per step, for dry runs and checks
pub fn print_report_lines(report: &PatchReport) {
    println!("{}", report.path.display().to_string().bold());
    for step in &report.steps {
        println!("  {:<16} {}", step.step.to_string(), format_outcome(&step.outcome));
    }
}
