//! Upload session shared by the `upload` and `simulate` commands.
//!
//! Enqueues the payloads, renders snapshots until everything settles, and
//! applies the view options (mid-flight dismissal, dismissing failures).
//! Ctrl-C closes the session by clearing every tracked upload at once.

use std::collections::HashSet;
use std::future::{self, Future};
use std::io::{self, Write};

use tokio::sync::mpsc::UnboundedReceiver;

use uptrack_core::{
    PayloadRef, UploadEvent, UploadId, UploadItem, UploadSnapshot, UploadState, UploadTrackerPort,
};

use crate::bootstrap::CliContext;
use crate::commands::ViewArgs;
use crate::error::CliError;
use crate::presentation::{UploadProgressView, format_run_summary, print_upload_table};

/// Progress at which `--cancel` targets are dismissed.
pub const CANCEL_AT_PROGRESS: f64 = 50.0;

/// Outcome of a session, for exit status and tests.
#[derive(Debug)]
pub struct SessionReport {
    /// Final snapshot after dismissals.
    pub snapshot: UploadSnapshot,
    /// Uploads dismissed while still uploading.
    pub cancelled: Vec<UploadId>,
    /// Failed uploads dismissed after settling.
    pub dismissed: Vec<UploadId>,
    /// Uploads removed by an interrupt (0 when the session ran to the end).
    pub cleared: usize,
}

/// Run one upload session and print its result.
pub async fn execute(
    ctx: &mut CliContext,
    payloads: Vec<PayloadRef>,
    view: &ViewArgs,
) -> Result<SessionReport, CliError> {
    let mut progress = UploadProgressView::new(view.json);
    let report = run(ctx, payloads, view, &mut progress, interrupted()).await?;
    log_events(&mut ctx.events);

    if view.json {
        let mut out = io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, &report.snapshot)?;
        writeln!(out)?;
    } else {
        println!();
        print_upload_table(&report.snapshot);
        if let Some(summary) = ctx.manager.last_run().await {
            println!();
            println!("{}", format_run_summary(&summary));
        }
    }

    ctx.manager.shutdown().await;
    Ok(report)
}

/// `--cancel` values, matched by file name or by upload id (`upload-2`).
struct CancelTargets<'a> {
    names: HashSet<&'a str>,
    ids: HashSet<UploadId>,
}

impl<'a> CancelTargets<'a> {
    fn new(values: &'a [String]) -> Self {
        Self {
            names: values.iter().map(String::as_str).collect(),
            ids: values.iter().filter_map(|v| v.parse().ok()).collect(),
        }
    }

    fn matches(&self, item: &UploadItem) -> bool {
        self.ids.contains(&item.id) || self.names.contains(item.payload.name.as_str())
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Cannot listen for Ctrl-C");
        future::pending::<()>().await;
    }
}

/// Drive the session without printing the final result.
///
/// When `interrupt` resolves first, every tracked upload is cleared and the
/// session ends.
pub async fn run(
    ctx: &CliContext,
    payloads: Vec<PayloadRef>,
    view: &ViewArgs,
    progress: &mut UploadProgressView,
    interrupt: impl Future<Output = ()>,
) -> Result<SessionReport, CliError> {
    let manager = &ctx.manager;
    let mut rx = manager.subscribe();
    let ids = manager.enqueue(payloads).await;
    tracing::debug!(count = ids.len(), "Session started");

    let targets = CancelTargets::new(&view.cancel);
    let mut cancelled = Vec::new();
    let mut cleared = None;
    tokio::pin!(interrupt);

    loop {
        let snapshot = rx.borrow_and_update().clone();
        progress.update(&snapshot);

        for item in &snapshot.items {
            if !item.is_terminal()
                && item.progress >= CANCEL_AT_PROGRESS
                && targets.matches(item)
                && manager.remove(item.id).await
            {
                tracing::info!(id = %item.id, name = %item.payload.name, "Dismissed upload");
                cancelled.push(item.id);
            }
        }

        if snapshot.is_settled() {
            break;
        }

        tokio::select! {
            biased;

            () = &mut interrupt, if cleared.is_none() => {
                let removed = manager.clear().await;
                tracing::info!(removed, "Session interrupted; cleared uploads");
                cleared = Some(removed);
            }

            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    progress.finish();

    let mut dismissed = Vec::new();
    if view.dismiss_failed && cleared.is_none() {
        for item in manager.snapshot().await.items {
            if item.state == UploadState::Failed && manager.remove(item.id).await {
                dismissed.push(item.id);
            }
        }
    }

    Ok(SessionReport {
        snapshot: manager.snapshot().await,
        cancelled,
        dismissed,
        cleared: cleared.unwrap_or_default(),
    })
}

/// Forward queued engine events to the debug log.
fn log_events(events: &mut UnboundedReceiver<UploadEvent>) {
    while let Ok(event) = events.try_recv() {
        tracing::debug!(event = event.event_name(), id = ?event.id(), "Upload event");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use uptrack_core::TrackerConfig;

    use super::*;
    use crate::bootstrap::bootstrap;

    fn fast_config(failure_rate: f64) -> TrackerConfig {
        TrackerConfig::default()
            .with_tick_interval_ms(10)
            .with_duration_range_ms(100, 200)
            .with_failure_probability(failure_rate)
            .with_seed(Some(42))
    }

    fn payloads(names: &[&str]) -> Vec<PayloadRef> {
        names.iter().map(|n| PayloadRef::new(*n, 1024)).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_settles_all_uploads() {
        let ctx = bootstrap(fast_config(0.0)).unwrap();
        let report = run(
            &ctx,
            payloads(&["a.pdf", "b.pdf"]),
            &ViewArgs::default(),
            &mut UploadProgressView::new(true),
            future::pending(),
        )
        .await
        .unwrap();

        assert!(report.snapshot.is_settled());
        assert_eq!(report.snapshot.counts().succeeded, 2);
        assert!(report.cancelled.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_dismisses_named_upload_mid_flight() {
        let ctx = bootstrap(fast_config(0.0)).unwrap();
        let view = ViewArgs {
            cancel: vec!["b.pdf".to_string()],
            ..ViewArgs::default()
        };

        let report = run(
            &ctx,
            payloads(&["a.pdf", "b.pdf"]),
            &view,
            &mut UploadProgressView::new(true),
            future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(report.cancelled.len(), 1);
        assert_eq!(report.snapshot.len(), 1);
        assert_eq!(report.snapshot.items[0].payload.name, "a.pdf");
        assert_eq!(ctx.manager.last_run().await.unwrap().cancelled, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_accepts_upload_id() {
        let ctx = bootstrap(fast_config(0.0)).unwrap();
        let view = ViewArgs {
            cancel: vec!["upload-1".to_string()],
            ..ViewArgs::default()
        };

        let report = run(
            &ctx,
            payloads(&["a.pdf", "b.pdf"]),
            &view,
            &mut UploadProgressView::new(true),
            future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(report.cancelled, vec![UploadId::new(1)]);
        assert_eq!(report.snapshot.len(), 1);
        assert_eq!(report.snapshot.items[0].payload.name, "b.pdf");
    }

    #[test]
    fn test_cancel_targets_match_name_or_id() {
        let values = vec!["report.pdf".to_string(), "upload-7".to_string()];
        let targets = CancelTargets::new(&values);

        let by_name = UploadItem::new(UploadId::new(1), PayloadRef::new("report.pdf", 1));
        let by_id = UploadItem::new(UploadId::new(7), PayloadRef::new("other.pdf", 1));
        let neither = UploadItem::new(UploadId::new(8), PayloadRef::new("other.pdf", 1));

        assert!(targets.matches(&by_name));
        assert!(targets.matches(&by_id));
        assert!(!targets.matches(&neither));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_failed_clears_failures() {
        let ctx = bootstrap(fast_config(1.0)).unwrap();
        let view = ViewArgs {
            dismiss_failed: true,
            ..ViewArgs::default()
        };

        let report = run(
            &ctx,
            payloads(&["a.pdf", "b.pdf", "c.pdf"]),
            &view,
            &mut UploadProgressView::new(true),
            future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(report.dismissed.len(), 3);
        assert!(report.snapshot.is_empty());
        assert_eq!(ctx.manager.last_run().await.unwrap().failed, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_clears_uploads_mid_flight() {
        let config = fast_config(0.0).with_duration_range_ms(1_000, 2_000);
        let ctx = bootstrap(config).unwrap();

        let report = run(
            &ctx,
            payloads(&["a.pdf", "b.pdf"]),
            &ViewArgs::default(),
            &mut UploadProgressView::new(true),
            tokio::time::sleep(Duration::from_millis(300)),
        )
        .await
        .unwrap();

        assert_eq!(report.cleared, 2);
        assert!(report.snapshot.is_empty());

        let summary = ctx.manager.last_run().await.unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.cancelled, 2);
        assert_eq!(summary.succeeded, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_uninterrupted_session_clears_nothing() {
        let ctx = bootstrap(fast_config(0.0)).unwrap();
        let report = run(
            &ctx,
            payloads(&["a.pdf"]),
            &ViewArgs::default(),
            &mut UploadProgressView::new(true),
            tokio::time::sleep(Duration::from_secs(60)),
        )
        .await
        .unwrap();

        assert_eq!(report.cleared, 0);
        assert_eq!(report.snapshot.counts().succeeded, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_session_returns_immediately() {
        let ctx = bootstrap(fast_config(0.0)).unwrap();
        let report = run(
            &ctx,
            Vec::new(),
            &ViewArgs::default(),
            &mut UploadProgressView::new(true),
            future::pending(),
        )
        .await
        .unwrap();

        assert!(report.snapshot.is_empty());
        assert!(ctx.manager.last_run().await.is_none());
    }
}
