//! Main commands enum and shared argument groups.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use uptrack_core::{
    DEFAULT_FAILURE_PROBABILITY, DEFAULT_MAX_DURATION_MS, DEFAULT_MIN_DURATION_MS,
    DEFAULT_TICK_INTERVAL_MS, TrackerConfig,
};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Upload files (simulated) and watch their progress
    Upload {
        /// Files or directories to upload (directories are expanded one level)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Only accept these extensions (comma separated, e.g. "pdf,doc,docx")
        #[arg(long, value_delimiter = ',')]
        accept: Vec<String>,

        /// Skip files larger than this many megabytes
        #[arg(long = "max-size-mb", env = "UPTRACK_MAX_SIZE_MB")]
        max_size_mb: Option<f64>,

        #[command(flatten)]
        simulation: SimulationArgs,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Upload synthetic documents (document-1.pdf, document-2.pdf, ...)
    Simulate {
        /// Number of documents to upload
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,

        #[command(flatten)]
        simulation: SimulationArgs,

        #[command(flatten)]
        view: ViewArgs,
    },
}

/// Options controlling the simulated transfers.
#[derive(Args, Debug, Clone)]
pub struct SimulationArgs {
    /// Interval between progress reports in milliseconds
    #[arg(long = "tick-ms", env = "UPTRACK_TICK_MS", default_value_t = DEFAULT_TICK_INTERVAL_MS)]
    pub tick_ms: u64,

    /// Shortest simulated transfer in milliseconds
    #[arg(long = "min-duration-ms", env = "UPTRACK_MIN_DURATION_MS", default_value_t = DEFAULT_MIN_DURATION_MS)]
    pub min_duration_ms: u64,

    /// Longest simulated transfer in milliseconds
    #[arg(long = "max-duration-ms", env = "UPTRACK_MAX_DURATION_MS", default_value_t = DEFAULT_MAX_DURATION_MS)]
    pub max_duration_ms: u64,

    /// Probability (0.0-1.0) that an upload fails
    #[arg(long = "failure-rate", env = "UPTRACK_FAILURE_RATE", default_value_t = DEFAULT_FAILURE_PROBABILITY)]
    pub failure_rate: f64,

    /// Seed for reproducible durations and outcomes
    #[arg(long, env = "UPTRACK_SEED")]
    pub seed: Option<u64>,
}

impl SimulationArgs {
    /// Engine configuration for these options (not yet validated).
    pub fn to_config(&self) -> TrackerConfig {
        TrackerConfig::default()
            .with_tick_interval_ms(self.tick_ms)
            .with_duration_range_ms(self.min_duration_ms, self.max_duration_ms)
            .with_failure_probability(self.failure_rate)
            .with_seed(self.seed)
    }
}

/// Options controlling what the view does with the uploads.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Dismiss uploads with this name or id (e.g. upload-2) once they pass 50% (repeatable)
    #[arg(long = "cancel", value_name = "NAME")]
    pub cancel: Vec<String>,

    /// Remove failed uploads from the list once everything settles
    #[arg(long = "dismiss-failed")]
    pub dismiss_failed: bool,

    /// Print the final snapshot as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
