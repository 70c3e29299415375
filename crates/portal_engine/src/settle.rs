use std::future::Future;
use std::time::Duration;

use portal_core::{FailureReason, ProbeOutcome};
use tokio_util::sync::CancellationToken;

use crate::ProbeFault;

/// Races one attempt against its timer and its abort token.
///
/// Exactly one of {attempt, timer, abort} settles the result. The losers are
/// dropped on return, which disarms the timer and tears down the attempt's
/// I/O. On timer expiry `abort` is cancelled as well so anything else
/// watching it (for example a spawned request) stops too.
pub async fn within<F>(
    timeout: Duration,
    abort: &CancellationToken,
    attempt: F,
) -> Result<ProbeOutcome, ProbeFault>
where
    F: Future<Output = Result<ProbeOutcome, ProbeFault>>,
{
    tokio::select! {
        biased;
        _ = abort.cancelled() => Ok(ProbeOutcome::Failure(FailureReason::Aborted)),
        settled = attempt => settled,
        _ = tokio::time::sleep(timeout) => {
            abort.cancel();
            Ok(ProbeOutcome::Failure(FailureReason::Timeout))
        }
    }
}
