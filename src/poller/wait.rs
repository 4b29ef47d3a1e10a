use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use super::options::{INTERRUPTED, WaitOptions};
use crate::api::ModuleInfo;
use crate::error::{ConformanceError, Result, require};

/// Anything that can report a module's current status.
///
/// Implemented by [`ConformanceClient`](crate::ConformanceClient); tests swap in
/// scripted sources.
pub trait ModuleInfoSource {
    fn module_info(&self, module_id: &str) -> impl Future<Output = Result<ModuleInfo>> + Send;
}

/// Stand-in deadline for durations too large to add to an [`Instant`].
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `from + duration`, or `from + FAR_FUTURE` when the sum is not representable.
fn instant_after(from: Instant, duration: Duration) -> Instant {
    from.checked_add(duration)
        .unwrap_or_else(|| from + FAR_FUTURE)
}

/// The terminal (status, result) pair a wait session resolved with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOutcome {
    pub status: String,
    pub result: Option<String>,
}

/// Polls `module_id` every `options.interval` until its status is one of
/// `options.states`, or `options.timeout` has elapsed since the call started.
///
/// Fails with:
/// - [`ConformanceError::ResultMismatch`] when a terminal status carries a
///   result outside a non-empty `options.results`;
/// - [`ConformanceError::Interrupted`] as soon as the module reports
///   `INTERRUPTED` (unless that status is itself in `options.states`);
/// - [`ConformanceError::Timeout`] when the deadline passes first.
///
/// Errors from the source (network, unexpected status) end the session
/// unchanged. A terminal status without a result, when a result is
/// required, is not conclusive: the module is polled again after the
/// regular interval.
///
/// A `timeout` or `interval` too large to add to the clock counts as thirty years.
///
/// Dropping the returned future abandons the session; nothing keeps running.
pub async fn wait_for_state(
    source: &impl ModuleInfoSource,
    module_id: &str,
    options: &WaitOptions,
) -> Result<ModuleOutcome> {
    require(module_id, "moduleId")?;

    let deadline = instant_after(Instant::now(), options.timeout);

    while Instant::now() < deadline {
        let info = source.module_info(module_id).await?;
        debug!(
            module_id,
            status = info.status().unwrap_or("<none>"),
            "module status"
        );

        if let Some(outcome) = evaluate(module_id, &info, options)? {
            return Ok(outcome);
        }

        sleep_until(instant_after(Instant::now(), options.interval).min(deadline)).await;
    }

    warn!(module_id, "expected state timeout");
    Err(ConformanceError::Timeout {
        module_id: module_id.to_string(),
        states: options.states.iter().cloned().collect(),
        timeout: options.timeout,
    })
}

/// Runs one wait session per id, all on the current task, and returns the
/// outcomes in the order of `module_ids`. Each session has its own deadline;
/// one failing does not stop the others.
pub async fn wait_for_modules(
    source: &impl ModuleInfoSource,
    module_ids: &[&str],
    options: &WaitOptions,
) -> Vec<Result<ModuleOutcome>> {
    join_all(
        module_ids
            .iter()
            .map(|module_id| wait_for_state(source, module_id, options)),
    )
    .await
}

/// Decides what a single poll means: resolved, failed, or keep polling (`None`).
fn evaluate(
    module_id: &str,
    info: &ModuleInfo,
    options: &WaitOptions,
) -> Result<Option<ModuleOutcome>> {
    let Some(status) = info.status() else {
        return Ok(None);
    };

    if options.is_terminal(status) {
        let result = info.result();
        if !options.results.is_empty() {
            let Some(result) = result else {
                debug!(module_id, status, "terminal status without result yet");
                return Ok(None);
            };
            if !options.accepts(result) {
                warn!(module_id, status, result, "unacceptable module result");
                return Err(ConformanceError::ResultMismatch {
                    module_id: module_id.to_string(),
                    status: status.to_string(),
                    result: result.to_string(),
                });
            }
        }
        return Ok(Some(ModuleOutcome {
            status: status.to_string(),
            result: result.map(str::to_string),
        }));
    }

    if status == INTERRUPTED {
        warn!(module_id, status, "module interrupted");
        return Err(ConformanceError::Interrupted {
            module_id: module_id.to_string(),
            status: status.to_string(),
        });
    }

    Ok(None)
}
