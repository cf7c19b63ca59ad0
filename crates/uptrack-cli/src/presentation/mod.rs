//! Shared CLI presentation utilities.
//!
//! This module provides reusable display and formatting functions
//! for consistent CLI output across commands.
//!
//! # Guidelines
//!
//! - Keep this module format-only: no engine calls
//! - Everything renders from `UploadSnapshot` values

pub mod progress;
pub mod tables;
pub mod throttle;

// Re-export commonly used items
pub use progress::UploadProgressView;
pub use tables::{
    format_optional, format_run_summary, format_upload_table, print_upload_table, truncate_string,
};
pub use throttle::ProgressThrottle;
