//! Table formatting utilities for CLI output.

use std::fmt::Write;

use uptrack_core::upload::{UploadRunSummary, UploadSnapshot};

const NAME_WIDTH: usize = 32;
const ERROR_WIDTH: usize = 40;

/// Truncates a string to a maximum number of characters, adding "..." if needed.
///
/// # Examples
///
/// ```rust
/// use uptrack_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 8), "Hello...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Format an optional value for table display, returning a default if None.
pub fn format_optional<T: std::fmt::Display>(value: Option<&T>, default: &str) -> String {
    value.map_or_else(|| default.to_string(), ToString::to_string)
}

/// Render the snapshot as an aligned table, one row per upload.
pub fn format_upload_table(snapshot: &UploadSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:<NAME_WIDTH$} {:>10} {:<10} {:>8}  ERROR",
        "ID", "NAME", "SIZE", "STATE", "PROGRESS"
    );
    let _ = writeln!(out, "{}", "-".repeat(12 + NAME_WIDTH + 10 + 10 + 8 + 11));

    for item in &snapshot.items {
        let _ = writeln!(
            out,
            "{:<12} {:<NAME_WIDTH$} {:>10} {:<10} {:>7}%  {}",
            item.id.to_string(),
            truncate_string(&item.payload.name, NAME_WIDTH),
            item.payload.display_size(),
            item.state.as_str(),
            item.rounded_progress(),
            truncate_string(
                &format_optional(item.error_message.as_ref(), "-"),
                ERROR_WIDTH
            ),
        );
    }
    out
}

/// One-line summary of a finished run.
pub fn format_run_summary(summary: &UploadRunSummary) -> String {
    #[allow(clippy::cast_precision_loss)]
    let seconds = summary.duration_ms() as f64 / 1000.0;
    format!(
        "{} upload(s): {} succeeded, {} failed, {} cancelled in {seconds:.1}s",
        summary.total, summary.succeeded, summary.failed, summary.cancelled
    )
}

/// Print the snapshot table to stdout.
pub fn print_upload_table(snapshot: &UploadSnapshot) {
    if snapshot.is_empty() {
        println!("No uploads.");
        return;
    }
    print!("{}", format_upload_table(snapshot));
}
