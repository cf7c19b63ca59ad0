//! Live upload progress rendering.
//!
//! Presentation-only module: renders successive snapshots, with no knowledge
//! of drivers or timers. Terminals get one `indicatif` bar per upload; piped
//! output gets throttled plain lines.

use std::collections::HashMap;
use std::io::{self, IsTerminal};
use std::time::Instant;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use uptrack_core::upload::{UploadId, UploadItem, UploadSnapshot, UploadState};

use super::tables::truncate_string;
use super::throttle::ProgressThrottle;

const MAX_LABEL: usize = 32;

/// Progress display that automatically selects terminal or plain output.
pub struct UploadProgressView {
    inner: ProgressRender,
}

enum ProgressRender {
    Fancy(FancyProgress),
    Plain(PlainProgress),
    Hidden,
}

impl UploadProgressView {
    /// Create a view, auto-detecting terminal capability.
    ///
    /// A hidden view renders nothing (used when stdout carries JSON).
    pub fn new(hidden: bool) -> Self {
        let inner = if hidden {
            ProgressRender::Hidden
        } else if io::stdout().is_terminal() {
            ProgressRender::Fancy(FancyProgress::new())
        } else {
            ProgressRender::Plain(PlainProgress::new())
        };
        Self { inner }
    }

    /// Render the latest snapshot.
    pub fn update(&mut self, snapshot: &UploadSnapshot) {
        match &mut self.inner {
            ProgressRender::Fancy(inner) => inner.update(snapshot),
            ProgressRender::Plain(inner) => {
                for line in inner.render(snapshot, Instant::now()) {
                    println!("{line}");
                }
            }
            ProgressRender::Hidden => {}
        }
    }

    /// Tear down the live display.
    pub fn finish(&mut self) {
        if let ProgressRender::Fancy(inner) = &mut self.inner {
            inner.finish();
        }
    }
}

fn label(item: &UploadItem) -> String {
    truncate_string(&item.payload.name, MAX_LABEL)
}

// ============================================================================
// Fancy Terminal Progress (indicatif)
// ============================================================================

struct FancyProgress {
    multi: MultiProgress,
    bars: HashMap<UploadId, ProgressBar>,
}

impl FancyProgress {
    fn new() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::stdout()),
            bars: HashMap::new(),
        }
    }

    fn update(&mut self, snapshot: &UploadSnapshot) {
        for item in &snapshot.items {
            let bar = self.bars.entry(item.id).or_insert_with(|| {
                let bar = self.multi.add(ProgressBar::new(100));
                bar.set_style(Self::bar_style());
                bar.set_prefix(item.id.to_string());
                bar.set_message(label(item));
                bar
            });

            if bar.is_finished() {
                continue;
            }
            bar.set_position(u64::from(item.rounded_progress()));

            match item.state {
                UploadState::Uploading => {}
                UploadState::Succeeded => {
                    bar.finish_with_message(format!("{} ✓", label(item)));
                }
                UploadState::Failed => {
                    let error = item.error_message.as_deref().unwrap_or_default();
                    bar.abandon_with_message(format!("{} ✗ {error}", label(item)));
                }
            }
        }

        // Uploads dismissed from the list lose their bar
        self.bars.retain(|id, bar| {
            let keep = snapshot.get(*id).is_some();
            if !keep {
                bar.finish_and_clear();
            }
            keep
        });
    }

    fn finish(&mut self) {
        for bar in self.bars.values() {
            if !bar.is_finished() {
                bar.abandon();
            }
        }
        self.bars.clear();
        let _ = self.multi.clear();
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{prefix:>10} {bar:30.cyan/blue} {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ")
    }
}

// ============================================================================
// Plain Progress (non-terminal)
// ============================================================================

struct PlainProgress {
    /// Last reported state and rounded progress per upload.
    seen: HashMap<UploadId, (UploadState, u8)>,
    throttles: HashMap<UploadId, ProgressThrottle>,
    /// Insertion order of `seen`, for stable removal lines.
    order: Vec<UploadId>,
}

impl PlainProgress {
    fn new() -> Self {
        Self {
            seen: HashMap::new(),
            throttles: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Lines describing what changed since the previous snapshot.
    fn render(&mut self, snapshot: &UploadSnapshot, now: Instant) -> Vec<String> {
        let mut lines = Vec::new();

        for item in &snapshot.items {
            let current = (item.state, item.rounded_progress());
            let previous = self.seen.insert(item.id, current);
            let prefix = format!("[{}] {}", item.id, label(item));

            match (previous, item.state) {
                (None, _) => {
                    self.order.push(item.id);
                    lines.push(format!("{prefix}: queued ({})", item.payload.display_size()));
                    self.throttle(item.id).should_emit_at(now);
                    if item.is_terminal() {
                        lines.push(Self::terminal_line(&prefix, item));
                    }
                }
                (Some((prev_state, _)), _) if prev_state != item.state => {
                    lines.push(Self::terminal_line(&prefix, item));
                }
                (Some((_, prev_progress)), UploadState::Uploading)
                    if prev_progress != current.1 =>
                {
                    if self.throttle(item.id).should_emit_at(now) {
                        lines.push(format!("{prefix}: {:>3}%", current.1));
                    } else {
                        // Report the skipped value on the next eligible tick
                        self.seen.insert(item.id, (item.state, prev_progress));
                    }
                }
                _ => {}
            }
        }

        let mut gone = Vec::new();
        self.order.retain(|id| {
            let present = snapshot.get(*id).is_some();
            if !present {
                gone.push(*id);
            }
            present
        });
        for id in gone {
            self.seen.remove(&id);
            self.throttles.remove(&id);
            lines.push(format!("[{id}] removed"));
        }

        lines
    }

    fn throttle(&mut self, id: UploadId) -> &mut ProgressThrottle {
        self.throttles.entry(id).or_default()
    }

    fn terminal_line(prefix: &str, item: &UploadItem) -> String {
        match item.state {
            UploadState::Failed => format!(
                "{prefix}: failed - {}",
                item.error_message.as_deref().unwrap_or_default()
            ),
            state => format!("{prefix}: {state}"),
        }
    }
}
