//! Format Inspectors (C5) plus the Inspector isolation framework (C1).
//!
//! Every inspector is a plain, synchronous function over bytes: it never
//! touches the network and never panics on "this isn't really my format" —
//! that's a normal, reported outcome. `run_isolated` is the only thing that
//! knows about timeouts and thread isolation; inspectors stay pure.

pub mod ole;
pub mod ooxml;
pub mod pdf;

use std::time::Duration;

/// Run a blocking, possibly-panicking inspector body off the async
/// executor, decaying to `R::default()` if it panics or outruns
/// `timeout` (§5: "inspectors are not cancellable mid-parse; bounded by
/// a per-inspector wall clock").
pub async fn run_isolated<R, F>(timeout: Duration, body: F) -> R
where
    R: Default + Send + 'static,
    F: FnOnce() -> R + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(body);
    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "inspector: task panicked");
            R::default()
        }
        Err(_) => {
            tracing::warn!("inspector: timed out");
            R::default()
        }
    }
}
