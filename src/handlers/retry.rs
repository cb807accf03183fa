//! Serialization-conflict retry

use std::future::Future;
use std::time::Duration;

use crate::ledger::StoreError;

/// Run a store transaction, re-running it on a serialization conflict up to
/// `retries` more times with linear backoff.
pub(crate) async fn with_serialization_retry<T, F, Fut>(
    operation: &'static str,
    retries: u32,
    mut run: F,
) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match run().await {
            Err(e) if e.is_retryable() && attempt < retries => {
                attempt += 1;
                let delay = Duration::from_millis(50 * attempt as u64);
                tracing::warn!(
                    operation,
                    "Serialization conflict, retrying (attempt {}/{})",
                    attempt,
                    retries
                );
                tokio::time::sleep(delay).await;
            }
            result => return result,
        }
    }
}
