//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the engine is wired together for the
//! CLI adapter: configuration is validated, the event channel is created,
//! and the upload manager is built with random outcomes and durations.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

use uptrack_core::{TrackerConfig, UploadEvent};
use uptrack_engine::{ChannelEmitter, UploadManager, UploadManagerDeps, build_upload_manager};

use crate::error::CliError;

/// Fully composed context for CLI commands.
pub struct CliContext {
    /// The upload manager driving every upload.
    pub manager: Arc<UploadManager>,
    /// Discrete upload events, in commit order.
    pub events: UnboundedReceiver<UploadEvent>,
}

/// Build the CLI context from an engine configuration.
pub fn bootstrap(config: TrackerConfig) -> Result<CliContext, CliError> {
    config.validate()?;

    tracing::debug!(
        tick_ms = config.tick_interval_ms,
        min_ms = config.min_duration_ms,
        max_ms = config.max_duration_ms,
        failure_probability = config.failure_probability,
        seed = ?config.seed,
        "Bootstrapping upload manager"
    );

    let (emitter, events) = ChannelEmitter::new();
    let deps = UploadManagerDeps::from_config(config, Arc::new(emitter));

    Ok(CliContext {
        manager: Arc::new(build_upload_manager(deps)),
        events,
    })
}

/// Install the tracing subscriber.
///
/// Logs go to stderr so they never interleave with tables or JSON on stdout.
/// `RUST_LOG` overrides the default level.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
