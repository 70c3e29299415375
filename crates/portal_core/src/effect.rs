use crate::{AttemptRequest, RunId, StrategyKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RunStrategy {
        run_id: RunId,
        strategy: StrategyKind,
        request: AttemptRequest,
    },
    /// Cancel the run's token so in-flight I/O can be torn down.
    AbortRun { run_id: RunId },
    /// Full navigation to the redirect url. Emitted at most once per run.
    Navigate { run_id: RunId, url: String },
}
