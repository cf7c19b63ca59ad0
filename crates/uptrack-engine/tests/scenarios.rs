//! End-to-end upload scenarios against the real manager, on virtual time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio_test::{assert_pending, assert_ready};

use uptrack_engine::{
    ChannelEmitter, FixedDuration, Outcome, OutcomeResolver, PayloadRef, ScriptedOutcomeResolver,
    TrackerConfig, UploadEvent, UploadId, UploadManager, UploadManagerDeps, UploadState,
    UploadTrackerPort, build_upload_manager,
};

const DEFAULT_MESSAGE: &str = "Upload failed. Please try again.";

fn manager_with(
    duration_ms: u64,
    resolver: Arc<dyn OutcomeResolver>,
) -> (UploadManager, UnboundedReceiver<UploadEvent>) {
    let (emitter, rx) = ChannelEmitter::new();
    let deps = UploadManagerDeps::from_config(TrackerConfig::default(), Arc::new(emitter))
        .with_resolver(resolver)
        .with_durations(Arc::new(FixedDuration::from_millis(duration_ms)));
    (build_upload_manager(deps), rx)
}

fn succeeding() -> Arc<dyn OutcomeResolver> {
    Arc::new(ScriptedOutcomeResolver::new(Outcome::Succeeded))
}

fn drain(rx: &mut UnboundedReceiver<UploadEvent>) -> Vec<UploadEvent> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

fn payloads(names: &[&str]) -> Vec<PayloadRef> {
    names
        .iter()
        .map(|name| PayloadRef::new(*name, 1_572_864))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn zero_duration_upload_settles_immediately() {
    let (manager, _rx) = manager_with(0, succeeding());

    let ids = manager.enqueue(payloads(&["instant.pdf"])).await;
    manager.wait_until_settled().await;

    let snapshot = manager.snapshot().await;
    let item = snapshot.get(ids[0]).unwrap();
    assert!(item.is_terminal());
    assert!((item.progress - 100.0).abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn forced_outcomes_keep_insertion_order() {
    let resolver = ScriptedOutcomeResolver::in_order(
        [
            Outcome::Succeeded,
            Outcome::failed(DEFAULT_MESSAGE),
            Outcome::Succeeded,
        ],
        Outcome::Succeeded,
    );
    let (manager, _rx) = manager_with(300, Arc::new(resolver));

    let ids = manager.enqueue(payloads(&["x.pdf", "y.pdf", "z.pdf"])).await;
    assert_eq!(ids, vec![UploadId::new(1), UploadId::new(2), UploadId::new(3)]);

    manager.wait_until_settled().await;
    let snapshot = manager.snapshot().await;

    let names: Vec<_> = snapshot.items.iter().map(|i| i.payload.name.as_str()).collect();
    assert_eq!(names, ["x.pdf", "y.pdf", "z.pdf"]);

    let states: Vec<_> = snapshot.items.iter().map(|i| i.state).collect();
    assert_eq!(
        states,
        [UploadState::Succeeded, UploadState::Failed, UploadState::Succeeded]
    );

    let failed = &snapshot.items[1];
    assert!(!failed.error_message.as_deref().unwrap_or_default().is_empty());
    assert!(snapshot.items[0].error_message.is_none());
    assert!(snapshot.items[2].error_message.is_none());
}

#[tokio::test(start_paused = true)]
async fn removing_mid_flight_leaves_the_rest_running() {
    let (manager, _rx) = manager_with(2_000, succeeding());

    let ids = manager.enqueue(payloads(&["a.pdf", "b.pdf"])).await;

    let mut settled = tokio_test::task::spawn(manager.wait_until_settled());
    assert_pending!(settled.poll());

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(manager.remove(ids[0]).await);
    assert_pending!(settled.poll());

    tokio::time::sleep(Duration::from_millis(1_600)).await;
    assert_ready!(settled.poll());

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.len(), 1);
    let remaining = &snapshot.items[0];
    assert_eq!(remaining.id, ids[1]);
    assert!(remaining.is_terminal());
    assert!((remaining.progress - 100.0).abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn empty_enqueue_changes_nothing() {
    let (manager, mut rx) = manager_with(1_000, succeeding());
    manager.enqueue(payloads(&["a.pdf"])).await;
    let before = manager.snapshot().await;
    let _ = drain(&mut rx);

    let ids = manager.enqueue(Vec::new()).await;

    assert!(ids.is_empty());
    assert_eq!(manager.snapshot().await, before);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn single_upload_event_stream() {
    let (manager, mut rx) = manager_with(250, succeeding());

    let ids = manager.enqueue(payloads(&["a.pdf"])).await;
    manager.wait_until_settled().await;

    let events = drain(&mut rx);
    let names: Vec<_> = events.iter().map(UploadEvent::event_name).collect();
    assert_eq!(
        names,
        [
            "upload:queued",
            "upload:progress",
            "upload:progress",
            "upload:succeeded",
            "upload:run_complete",
        ]
    );
    assert!(events[..4].iter().all(|e| e.id() == Some(ids[0])));

    match &events[4] {
        UploadEvent::RunComplete { summary } => {
            assert_eq!(summary.total, 1);
            assert!(summary.all_succeeded());
        }
        other => panic!("Expected RunComplete, got {other:?}"),
    }

    let json = serde_json::to_value(&events[0]).unwrap();
    assert_eq!(json["type"], "upload_queued");
    assert_eq!(json["name"], "a.pdf");
}

#[tokio::test(start_paused = true)]
async fn run_summary_counts_failures_and_cancellations() {
    let resolver = ScriptedOutcomeResolver::in_order(
        [Outcome::Succeeded, Outcome::Succeeded, Outcome::failed("bad")],
        Outcome::Succeeded,
    );
    let (manager, mut rx) = manager_with(1_000, Arc::new(resolver));

    let ids = manager.enqueue(payloads(&["a.pdf", "b.pdf", "c.pdf"])).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    manager.remove(ids[0]).await;
    manager.wait_until_settled().await;

    let summary = manager.last_run().await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.cancelled, 1);

    let completions = drain(&mut rx)
        .into_iter()
        .filter(|e| matches!(e, UploadEvent::RunComplete { .. }))
        .count();
    assert_eq!(completions, 1);

    // Removing a terminal item does not reopen or alter the run
    manager.remove(ids[1]).await;
    assert_eq!(manager.last_run().await.unwrap(), summary);
}

#[tokio::test(start_paused = true)]
async fn each_run_gets_a_new_id() {
    let (manager, _rx) = manager_with(100, succeeding());

    manager.enqueue(payloads(&["a.pdf"])).await;
    manager.wait_until_settled().await;
    let first = manager.last_run().await.unwrap();

    manager.enqueue(payloads(&["b.pdf"])).await;
    manager.wait_until_settled().await;
    let second = manager.last_run().await.unwrap();

    assert_ne!(first.run_id, second.run_id);
    assert_eq!(second.total, 1);
}

#[tokio::test(start_paused = true)]
async fn clear_removes_everything_and_stops_drivers() {
    let (manager, mut rx) = manager_with(5_000, succeeding());

    manager.enqueue(payloads(&["a.pdf", "b.pdf", "c.pdf"])).await;
    tokio::time::sleep(Duration::from_millis(1_000)).await;

    assert_eq!(manager.clear().await, 3);
    assert!(manager.snapshot().await.is_empty());
    assert_eq!(manager.active_drivers().await, 0);

    let events = drain(&mut rx);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, UploadEvent::UploadsCleared { removed: 3 }))
    );

    let summary = manager.last_run().await.unwrap();
    assert_eq!(summary.cancelled, 3);

    // Nothing left to report, even after the original durations elapse
    tokio::time::sleep(Duration::from_millis(5_000)).await;
    assert!(drain(&mut rx).is_empty());
    assert_eq!(manager.clear().await, 0);

    // IDs keep counting after a clear
    let next = manager.enqueue(payloads(&["d.pdf"])).await;
    assert_eq!(next[0], UploadId::new(4));
}

#[tokio::test(start_paused = true)]
async fn snapshot_versions_increase_in_commit_order() {
    let (manager, _rx) = manager_with(400, succeeding());
    let mut rx = manager.subscribe();
    let mut seen = vec![rx.borrow_and_update().version];

    manager.enqueue(payloads(&["a.pdf", "b.pdf"])).await;
    let collector = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            seen.push(snapshot.version);
            if snapshot.is_settled() {
                break;
            }
        }
        seen
    });

    manager.wait_until_settled().await;
    let seen = collector.await.unwrap();

    assert!(seen.windows(2).all(|w| w[0] < w[1]), "versions: {seen:?}");
    assert_eq!(*seen.last().unwrap(), manager.snapshot().await.version);
}
