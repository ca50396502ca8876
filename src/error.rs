use crate::address::InvalidAddressFormat;
use thiserror::Error;

/// Failure modes of the indexing pipeline.
///
/// Notification failures are deliberately absent: alert delivery is
/// best-effort and never surfaces as a pipeline error.
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error(transparent)]
    InvalidAddressFormat(#[from] InvalidAddressFormat),

    /// A log matched the donation filter but its payload did not decode.
    /// The current range is abandoned and the cursor stays put.
    #[error("malformed donation event at block {block_number}: {source}")]
    MalformedEvent {
        block_number: u64,
        source: alloy::sol_types::Error,
    },

    /// The ledger node could not serve the request, retries included.
    #[error("ledger fetch failed: {0}")]
    LedgerUnavailable(anyhow::Error),

    /// A store write failed. The cursor is never advanced past a range
    /// that did not persist, so the same range is re-run after restart.
    #[error("persistence failed: {0}")]
    Persistence(anyhow::Error),
}
