//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use apkcfg_core::error::Error;
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print a key/value line under a header
    pub fn field(key: &str, value: &str) {
        println!("  {:<22} {}", key.dimmed(), value);
    }
}

/// Print an error with its code, context and suggestion
pub fn print_error(err: &Error) {
    eprintln!(
        "{} {} {}",
        "✗".red(),
        format!("[{}]", err.code).red().bold(),
        err.message
    );
    if let Some(ctx) = &err.context {
        eprintln!("  {} {}", "context:".dimmed(), ctx);
    }
    if let Some(suggestion) = &err.suggestion {
        eprintln!("  {} {}", "hint:".cyan(), suggestion);
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        format!("{}µs", duration.as_micros())
    } else if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else {
        format!("{secs:.1}s")
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}
