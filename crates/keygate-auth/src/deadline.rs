//! Per-call deadlines for repository and cache calls.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use keygate_core::error::AppError;
use keygate_core::result::AppResult;

/// Runs one external call, failing with an internal error once `timeout` elapses.
///
/// The deadline covers a single call, not a whole use case; nothing is retried.
pub async fn with_deadline<T, F>(timeout: Duration, operation: &str, call: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                operation,
                timeout_ms = timeout.as_millis() as u64,
                "External call exceeded its deadline"
            );
            Err(AppError::internal(format!(
                "{operation} timed out after {} ms",
                timeout.as_millis()
            )))
        }
    }
}
