//! Upload command handler.
//!
//! Turns file system paths into payload descriptors and hands them to the
//! upload session. File contents are never read; only names and sizes from
//! metadata are used.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use uptrack_core::PayloadRef;

use crate::bootstrap::CliContext;
use crate::commands::ViewArgs;
use crate::error::CliError;

use super::session::{self, SessionReport};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Which files the selection accepts.
#[derive(Debug, Clone, Default)]
pub struct SelectionFilter {
    /// Lowercase extensions without the leading dot; empty accepts all.
    accept: Vec<String>,
    max_size_bytes: Option<u64>,
}

impl SelectionFilter {
    /// Build a filter from `--accept` and `--max-size-mb`.
    pub fn new(accept: &[String], max_size_mb: Option<f64>) -> Result<Self, CliError> {
        let max_size_bytes = match max_size_mb {
            Some(mb) if !mb.is_finite() || mb <= 0.0 => {
                return Err(CliError::Arguments(format!(
                    "--max-size-mb must be a positive number, got {mb}"
                )));
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(mb) => Some((mb * BYTES_PER_MB) as u64),
            None => None,
        };

        let accept = accept
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        Ok(Self {
            accept,
            max_size_bytes,
        })
    }

    fn check(&self, path: &Path, size: u64) -> Result<(), SkipReason> {
        if !self.accept.is_empty() {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase)
                .unwrap_or_default();
            if !self.accept.contains(&ext) {
                return Err(SkipReason::Extension {
                    accepted: self.accept.join(", "),
                });
            }
        }

        if let Some(limit) = self.max_size_bytes
            && size > limit
        {
            return Err(SkipReason::TooLarge {
                size: PayloadRef::new("", size).display_size(),
                limit: PayloadRef::new("", limit).display_size(),
            });
        }
        Ok(())
    }
}

/// Why a path did not become a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("not an accepted type (accepted: {accepted})")]
    Extension { accepted: String },

    #[error("too large ({size} > {limit})")]
    TooLarge { size: String, limit: String },

    #[error("nested directory (only one level is expanded)")]
    NestedDirectory,

    #[error("unreadable: {0}")]
    Unreadable(String),
}

/// A path that was left out of the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Result of collecting payloads from paths.
#[derive(Debug, Default)]
pub struct Selection {
    pub payloads: Vec<PayloadRef>,
    pub skipped: Vec<Skipped>,
}

/// Collect payloads from files and directories.
///
/// Directories contribute their regular files (sorted by name); nested
/// directories are skipped. Problems with individual paths are recorded in
/// `skipped` rather than aborting the selection.
pub fn collect_payloads(paths: &[PathBuf], filter: &SelectionFilter) -> Selection {
    let mut selection = Selection::default();

    for path in paths {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => expand_directory(path, filter, &mut selection),
            Ok(meta) => consider_file(path, meta.len(), filter, &mut selection),
            Err(e) => selection.skipped.push(Skipped {
                path: path.clone(),
                reason: SkipReason::Unreadable(e.to_string()),
            }),
        }
    }

    selection
}

fn expand_directory(dir: &Path, filter: &SelectionFilter, selection: &mut Selection) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            selection.skipped.push(Skipped {
                path: dir.to_path_buf(),
                reason: SkipReason::Unreadable(e.to_string()),
            });
            return;
        }
    };

    let mut paths: Vec<PathBuf> = entries.filter_map(Result::ok).map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => selection.skipped.push(Skipped {
                path,
                reason: SkipReason::NestedDirectory,
            }),
            Ok(meta) => consider_file(&path, meta.len(), filter, selection),
            Err(e) => selection.skipped.push(Skipped {
                path,
                reason: SkipReason::Unreadable(e.to_string()),
            }),
        }
    }
}

fn consider_file(path: &Path, size: u64, filter: &SelectionFilter, selection: &mut Selection) {
    match filter.check(path, size) {
        Ok(()) => {
            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            selection.payloads.push(PayloadRef::new(name, size));
        }
        Err(reason) => selection.skipped.push(Skipped {
            path: path.to_path_buf(),
            reason,
        }),
    }
}

/// Execute the upload command.
///
/// Skipped paths are reported on stderr. Fails with an argument error when
/// nothing is left to upload.
pub async fn execute(
    ctx: &mut CliContext,
    paths: &[PathBuf],
    accept: &[String],
    max_size_mb: Option<f64>,
    view: &ViewArgs,
) -> Result<SessionReport, CliError> {
    let filter = SelectionFilter::new(accept, max_size_mb)?;
    let selection = collect_payloads(paths, &filter);

    for skipped in &selection.skipped {
        eprintln!("Skipping {}: {}", skipped.path.display(), skipped.reason);
    }
    if selection.payloads.is_empty() {
        return Err(CliError::Arguments("no files to upload".to_string()));
    }

    session::execute(ctx, selection.payloads, view).await
}
