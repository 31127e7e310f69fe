//! One-shot recovery around a fallible operation.
//!
//! A command can fail because the page side is not ready yet (the handler
//! was never injected, or the page was still restricted). Callers recover
//! by fixing that once and trying again.

use std::fmt::Display;

use tracing::{debug, warn};

/// Runs `attempt`; on failure runs `recover` and retries `attempt` once.
///
/// Returns the outcome of the last attempt. If `recover` itself fails, its
/// error is returned and `attempt` is not retried.
pub fn with_recovery<T, E, A, R>(mut attempt: A, recover: R) -> Result<T, E>
where
    A: FnMut() -> Result<T, E>,
    R: FnOnce() -> Result<(), E>,
    E: Display,
{
    match attempt() {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(error = %err, "operation failed, recovering and retrying once");
            recover()?;
            let result = attempt();
            if result.is_ok() {
                debug!("retry succeeded");
            }
            result
        }
    }
}
