use thiserror::Error;

/// Failures crossing the service boundary.
///
/// A session failure is fatal to the connection presenting it; storage
/// failures are logged and swallowed at the dispatch boundary so the
/// connection survives.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("session missing or expired")]
    SessionInvalid,

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
