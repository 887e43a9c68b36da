use thiserror::Error;

/// Errors originating from the core engines.
///
/// Both variants are local, synchronous failures: a failed construction or
/// step aborts the run and the caller must reconstruct and restart. Cells
/// that never converge in the Newton solver are *not* errors — they are a
/// valid terminal data state (label 0) that calling code interprets.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("invalid state: {reason}")]
    InvalidState { reason: String },
}
