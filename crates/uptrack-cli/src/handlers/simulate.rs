//! Simulate command handler.
//!
//! Uploads synthetic documents so the engine can be exercised without
//! touching the file system.

use uptrack_core::PayloadRef;

use crate::bootstrap::CliContext;
use crate::commands::ViewArgs;
use crate::error::CliError;

use super::session::{self, SessionReport};

/// Largest synthetic document, matching the upload size limit.
const MAX_SYNTHETIC_BYTES: u64 = 10 * 1024 * 1024;

/// Smallest synthetic document.
const MIN_SYNTHETIC_BYTES: u64 = 64 * 1024;

/// `document-1.pdf` .. `document-<count>.pdf` with varied sizes.
pub fn synthetic_payloads(count: usize) -> Vec<PayloadRef> {
    (1..=count as u64)
        .map(|n| PayloadRef::new(format!("document-{n}.pdf"), synthetic_size(n)))
        .collect()
}

/// Deterministic size in `[MIN_SYNTHETIC_BYTES, MAX_SYNTHETIC_BYTES)`.
fn synthetic_size(n: u64) -> u64 {
    n.wrapping_mul(2_654_435_761) % (MAX_SYNTHETIC_BYTES - MIN_SYNTHETIC_BYTES)
        + MIN_SYNTHETIC_BYTES
}

/// Execute the simulate command.
pub async fn execute(
    ctx: &mut CliContext,
    count: usize,
    view: &ViewArgs,
) -> Result<SessionReport, CliError> {
    if count == 0 {
        return Err(CliError::Arguments("--count must be at least 1".to_string()));
    }
    session::execute(ctx, synthetic_payloads(count), view).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_names_and_sizes() {
        let payloads = synthetic_payloads(4);

        let names: Vec<_> = payloads.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["document-1.pdf", "document-2.pdf", "document-3.pdf", "document-4.pdf"]
        );
        assert!(payloads.iter().all(|p| {
            (MIN_SYNTHETIC_BYTES..MAX_SYNTHETIC_BYTES).contains(&p.size_bytes)
        }));
    }

    #[test]
    fn test_size_stays_in_range_for_huge_indices() {
        for n in [u64::MAX, u64::MAX / 2, 1 << 40, 7_000_000_007] {
            let size = synthetic_size(n);
            assert!(
                (MIN_SYNTHETIC_BYTES..MAX_SYNTHETIC_BYTES).contains(&size),
                "n={n} size={size}"
            );
        }
    }

    #[test]
    fn test_zero_count_yields_nothing() {
        assert!(synthetic_payloads(0).is_empty());
    }
}
