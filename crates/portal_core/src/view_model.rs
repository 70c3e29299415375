use crate::{ProbeStatus, RunId, StrategyKind};

/// What presentation renders: the status surface of the most recent run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusView {
    pub status: ProbeStatus,
    pub step: String,
    pub run_id: Option<RunId>,
    /// Strategies dispatched so far in the run, in order.
    pub attempts: Vec<StrategyKind>,
}
