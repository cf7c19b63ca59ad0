//! Upload manager implementation.
//!
//! This module provides the concrete implementation of `UploadTrackerPort`
//! and `ProgressSink`, composing the tracker state machine, one progress
//! driver per item, and the outcome resolver.
//!
//! # Architecture
//!
//! - **Manager**: Admits items, spawns drivers, handles removal and shutdown
//! - **Core**: Owns the tracker behind one lock and commits every mutation
//! - **Drivers**: Report through `ProgressSink` only (no locks, no events)
//!
//! # Concurrency Model
//!
//! - One `tokio::sync::Mutex` guards the tracker, the run state, and the
//!   driver registry
//! - Each commit publishes the snapshot and emits events before the lock is
//!   released, so observers see versions in commit order
//! - Removal is soft: the tracker ignores late reports, and the driver's
//!   token is cancelled so it exits early

mod driver;
mod run_state;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use uptrack_core::ports::{
    DurationPolicy, OutcomeResolver, ProgressSink, UploadEventEmitterPort, UploadTrackerPort,
};
use uptrack_core::upload::{
    Outcome, PayloadRef, UploadEvent, UploadId, UploadItem, UploadRunSummary, UploadSnapshot,
    UploadState,
};
use uptrack_core::TrackerConfig;

use crate::duration::UniformDuration;
use crate::resolver::RandomOutcomeResolver;
use crate::tracker::UploadTracker;

use run_state::RunState;

pub use driver::{DriverDeps, DriverExit, DriverJob, progress_at, run_driver};

/// Registry entry for a live driver.
struct DriverHandle {
    /// Cancelled on removal or shutdown.
    cancel: CancellationToken,
    /// Joined on shutdown; detached on removal.
    task: JoinHandle<()>,
}

/// Everything guarded by the manager lock.
struct ManagerState {
    tracker: UploadTracker,
    /// Current run (None while nothing is uploading).
    run: Option<RunState>,
    /// Summary of the most recently completed run.
    last_run: Option<UploadRunSummary>,
    /// Live drivers keyed by upload ID.
    drivers: HashMap<UploadId, DriverHandle>,
}

/// Dependencies for creating an upload manager.
///
/// This struct bundles the ports and configuration needed to construct an
/// `UploadManager`.
pub struct UploadManagerDeps<E>
where
    E: UploadEventEmitterPort + 'static,
{
    /// Port for emitting upload events.
    pub event_emitter: Arc<E>,
    /// Decides each upload's outcome at completion.
    pub resolver: Arc<dyn OutcomeResolver>,
    /// Decides each upload's simulated duration.
    pub durations: Arc<dyn DurationPolicy>,
    /// Engine configuration.
    pub config: TrackerConfig,
}

impl<E> UploadManagerDeps<E>
where
    E: UploadEventEmitterPort + 'static,
{
    /// Random outcomes and uniform durations, both drawn from `config`.
    pub fn from_config(config: TrackerConfig, event_emitter: Arc<E>) -> Self {
        Self {
            event_emitter,
            resolver: Arc::new(RandomOutcomeResolver::from_config(&config)),
            durations: Arc::new(UniformDuration::from_config(&config)),
            config,
        }
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn OutcomeResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub fn with_durations(mut self, durations: Arc<dyn DurationPolicy>) -> Self {
        self.durations = durations;
        self
    }
}

/// Build an upload manager from its dependencies.
///
/// Returns an implementation of `UploadTrackerPort` that can be stored as
/// `Arc<dyn UploadTrackerPort>` in adapters. Must be called inside a Tokio
/// runtime only when items are enqueued; construction itself spawns nothing.
pub fn build_upload_manager<E>(deps: UploadManagerDeps<E>) -> UploadManager
where
    E: UploadEventEmitterPort + 'static,
{
    UploadManager::new(
        deps.event_emitter,
        deps.resolver,
        deps.durations,
        deps.config,
    )
}

/// Shared state reachable from both the manager and its drivers.
struct ManagerCore {
    state: Mutex<ManagerState>,
    snapshot_tx: watch::Sender<Arc<UploadSnapshot>>,
    event_emitter: Arc<dyn UploadEventEmitterPort>,
}

impl ManagerCore {
    /// Publish the tracker's current contents to snapshot subscribers.
    fn publish(&self, state: &ManagerState) {
        self.snapshot_tx
            .send_replace(Arc::new(state.tracker.to_snapshot()));
    }

    /// Close the current run once nothing is uploading.
    fn settle_run(&self, state: &mut ManagerState) {
        if state.tracker.uploading_count() > 0 {
            return;
        }
        let Some(run) = state.run.take() else {
            return;
        };

        let summary = run.finish();
        tracing::info!(
            target: "uptrack.engine",
            run_id = %summary.run_id,
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            cancelled = summary.cancelled,
            "Upload run complete"
        );

        state.last_run = Some(summary.clone());
        self.event_emitter
            .emit(UploadEvent::RunComplete { summary });
    }

    /// Drop a finished driver from the registry.
    async fn deregister(&self, id: UploadId, exit: DriverExit) {
        let mut state = self.state.lock().await;
        if state.drivers.remove(&id).is_some() {
            tracing::trace!(target: "uptrack.engine", id = %id, ?exit, "Driver deregistered");
        }
    }
}

#[async_trait]
impl ProgressSink for ManagerCore {
    async fn advance(&self, id: UploadId, progress: f64) {
        let mut state = self.state.lock().await;
        let Some(committed) = state.tracker.advance(id, progress) else {
            tracing::trace!(target: "uptrack.engine", id = %id, progress, "Ignored progress report");
            return;
        };

        self.publish(&state);
        self.event_emitter
            .emit(UploadEvent::progress(id, committed));
    }

    async fn finalize(&self, id: UploadId, outcome: Outcome) {
        let mut state = self.state.lock().await;
        let Some(item) = state.tracker.finalize(id, outcome) else {
            tracing::trace!(target: "uptrack.engine", id = %id, "Ignored finalize");
            return;
        };

        if let Some(run) = state.run.as_mut() {
            run.record_finalized(item.state);
        }
        self.publish(&state);

        match item.error_message {
            Some(error) => {
                tracing::info!(target: "uptrack.engine", id = %id, error = %error, "Upload failed");
                self.event_emitter.emit(UploadEvent::failed(id, error));
            }
            None => {
                tracing::info!(target: "uptrack.engine", id = %id, "Upload succeeded");
                self.event_emitter
                    .emit(UploadEvent::UploadSucceeded { id });
            }
        }

        self.settle_run(&mut state);
    }
}

/// Concrete implementation of the upload tracker port.
///
/// Adapters should typically hold `Arc<dyn UploadTrackerPort>` instead of
/// depending on this type directly. Dropping the manager cancels every
/// driver it started.
pub struct UploadManager {
    core: Arc<ManagerCore>,
    driver_deps: DriverDeps,
    durations: Arc<dyn DurationPolicy>,
    config: TrackerConfig,
    /// Parent of every driver token.
    root_cancel: CancellationToken,
}

impl UploadManager {
    fn new<E>(
        event_emitter: Arc<E>,
        resolver: Arc<dyn OutcomeResolver>,
        durations: Arc<dyn DurationPolicy>,
        config: TrackerConfig,
    ) -> Self
    where
        E: UploadEventEmitterPort + 'static,
    {
        let tracker = UploadTracker::new();
        let (snapshot_tx, _) = watch::channel(Arc::new(tracker.to_snapshot()));

        let core = Arc::new(ManagerCore {
            state: Mutex::new(ManagerState {
                tracker,
                run: None,
                last_run: None,
                drivers: HashMap::new(),
            }),
            snapshot_tx,
            event_emitter: event_emitter as Arc<dyn UploadEventEmitterPort>,
        });

        let driver_deps = DriverDeps {
            sink: Arc::clone(&core) as Arc<dyn ProgressSink>,
            resolver,
        };

        Self {
            core,
            driver_deps,
            durations,
            config,
            root_cancel: CancellationToken::new(),
        }
    }

    /// The configuration this manager was built with.
    pub const fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// The sink drivers report to.
    ///
    /// Exposed so adapters and tests can feed progress from an external
    /// transport instead of the built-in simulation.
    pub fn progress_sink(&self) -> Arc<dyn ProgressSink> {
        Arc::clone(&self.driver_deps.sink)
    }

    /// Number of drivers still running.
    pub async fn active_drivers(&self) -> usize {
        self.core.state.lock().await.drivers.len()
    }

    /// Summary of the most recently completed run, if any.
    pub async fn last_run(&self) -> Option<UploadRunSummary> {
        self.core.state.lock().await.last_run.clone()
    }

    /// Wait until no tracked item is uploading.
    ///
    /// Returns immediately when the tracker is already settled. Never
    /// returns after `shutdown` if items were still in flight.
    pub async fn wait_until_settled(&self) {
        let mut rx = self.core.snapshot_tx.subscribe();
        let _ = rx.wait_for(|snapshot| snapshot.is_settled()).await;
    }

    /// Cancel every driver and wait for them to exit.
    ///
    /// Items that were still uploading stay in the `Uploading` state. Later
    /// `enqueue` calls are refused. Returns the number of drivers that were
    /// stopped.
    pub async fn shutdown(&self) -> usize {
        self.root_cancel.cancel();

        let handles: Vec<DriverHandle> = {
            let mut state = self.core.state.lock().await;
            state.drivers.drain().map(|(_, handle)| handle).collect()
        };

        let count = handles.len();
        for handle in handles {
            let _ = handle.task.await;
        }

        tracing::info!(target: "uptrack.engine", count, "Shutdown: stopped upload drivers");
        count
    }

    /// Start the driver for a freshly enqueued item.
    fn spawn_driver(&self, item: &UploadItem) -> DriverHandle {
        let id = item.id;
        let cancel = self.root_cancel.child_token();
        let job = DriverJob {
            id,
            payload: item.payload.clone(),
            duration: self.durations.sample(id, &item.payload),
            tick: self.config.tick_interval(),
            cancel: cancel.clone(),
        };

        let deps = self.driver_deps.clone();
        let core = Arc::clone(&self.core);
        let task = tokio::spawn(async move {
            let exit = run_driver(job, &deps).await;
            core.deregister(id, exit).await;
        });

        DriverHandle { cancel, task }
    }
}

impl Drop for UploadManager {
    fn drop(&mut self) {
        self.root_cancel.cancel();
    }
}

#[async_trait]
impl UploadTrackerPort for UploadManager {
    async fn enqueue(&self, payloads: Vec<PayloadRef>) -> Vec<UploadId> {
        if payloads.is_empty() {
            tracing::trace!(target: "uptrack.engine", "Ignored empty enqueue");
            return Vec::new();
        }
        if self.root_cancel.is_cancelled() {
            tracing::warn!(
                target: "uptrack.engine",
                count = payloads.len(),
                "Manager is shut down; refusing new uploads"
            );
            return Vec::new();
        }

        let mut state = self.core.state.lock().await;
        let created = state.tracker.enqueue(payloads);

        let run = state.run.get_or_insert_with(|| {
            let run = RunState::start();
            tracing::info!(target: "uptrack.engine", run_id = %run.run_id(), "Upload run started");
            run
        });
        run.record_enqueued(created.len());

        self.core.publish(&state);

        let mut ids = Vec::with_capacity(created.len());
        for item in &created {
            self.core
                .event_emitter
                .emit(UploadEvent::queued(item.id, &item.payload));

            let handle = self.spawn_driver(item);
            state.drivers.insert(item.id, handle);
            ids.push(item.id);
        }

        tracing::info!(target: "uptrack.engine", count = ids.len(), "Uploads enqueued");
        ids
    }

    async fn remove(&self, id: UploadId) -> bool {
        let mut state = self.core.state.lock().await;
        let Some(item) = state.tracker.remove(id) else {
            tracing::trace!(target: "uptrack.engine", id = %id, "Ignored removal of unknown upload");
            return false;
        };

        if let Some(handle) = state.drivers.remove(&id) {
            handle.cancel.cancel();
        }
        if item.state == UploadState::Uploading
            && let Some(run) = state.run.as_mut()
        {
            run.record_cancelled();
        }

        self.core.publish(&state);
        self.core
            .event_emitter
            .emit(UploadEvent::UploadRemoved { id });
        tracing::info!(target: "uptrack.engine", id = %id, state = %item.state, "Upload removed");

        self.core.settle_run(&mut state);
        true
    }

    async fn clear(&self) -> usize {
        let mut state = self.core.state.lock().await;
        let removed = state.tracker.clear();
        if removed.is_empty() {
            return 0;
        }

        for item in &removed {
            if let Some(handle) = state.drivers.remove(&item.id) {
                handle.cancel.cancel();
            }
            if !item.is_terminal()
                && let Some(run) = state.run.as_mut()
            {
                run.record_cancelled();
            }
        }

        self.core.publish(&state);
        self.core.event_emitter.emit(UploadEvent::UploadsCleared {
            removed: removed.len(),
        });
        tracing::info!(target: "uptrack.engine", removed = removed.len(), "Uploads cleared");

        self.core.settle_run(&mut state);
        removed.len()
    }

    async fn snapshot(&self) -> UploadSnapshot {
        self.core.state.lock().await.tracker.to_snapshot()
    }

    fn subscribe(&self) -> watch::Receiver<Arc<UploadSnapshot>> {
        self.core.snapshot_tx.subscribe()
    }
}
