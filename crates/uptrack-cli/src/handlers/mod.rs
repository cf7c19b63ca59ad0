//! Command handlers that delegate to the upload manager.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &mut CliContext, ...) -> Result<SessionReport, CliError>`
//! - Thin wrappers that:
//!   1. Parse/validate CLI-specific input
//!   2. Turn it into payload descriptors
//!   3. Hand them to the shared upload session
//!
//! Handlers should NOT:
//! - Mutate upload state other than through `UploadTrackerPort`
//! - Compute progress or outcomes themselves

pub mod session;
pub mod simulate;
pub mod upload;
