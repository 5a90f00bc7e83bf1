pub mod comments;
pub mod error;
pub mod id;
pub mod likes;
pub mod projects;
pub mod session;

pub use error::ServiceError;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

/// Run a blocking store closure off the async runtime.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::Storage(anyhow::anyhow!("blocking task failed: {e}")))?
        .map_err(ServiceError::from)
}

/// SQLite hands timestamps back as text. Accept RFC 3339 as well as the
/// bare `datetime('now')` format, which carries no timezone marker.
pub(crate) fn parse_timestamp(raw: &str, context: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}' on {}: {}", raw, context, e);
            DateTime::default()
        })
}
