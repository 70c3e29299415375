use crate::{ProbeConfig, ProbeOutcome, RunId, StrategyKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Configuration supplied or changed by the collaborator.
    ConfigChanged(ProbeConfig),
    /// Explicit restart with the current configuration.
    RestartRequested,
    /// Invalidate the active run (teardown).
    CancelRequested,
    /// A strategy finished within its contract.
    StrategySettled {
        run_id: RunId,
        strategy: StrategyKind,
        outcome: ProbeOutcome,
    },
    /// A strategy broke its contract (panic, client failure).
    StrategyFaulted {
        run_id: RunId,
        strategy: StrategyKind,
        message: String,
    },
}
