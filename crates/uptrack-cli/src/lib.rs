//! Command-line adapter for the uptrack upload engine.
//!
//! Parses arguments, composes the engine in [`bootstrap`], and renders
//! live upload progress followed by a summary table or JSON snapshot.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use anyhow as _;
use dotenvy as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliContext, bootstrap, init_logging};
pub use commands::{Commands, SimulationArgs, ViewArgs};
pub use error::CliError;
pub use handlers::session::SessionReport;
pub use parser::Cli;
