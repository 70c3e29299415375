use std::sync::Arc;

use portal_core::{AttemptRequest, ProbeOutcome, StrategyKind};
use tokio_util::sync::CancellationToken;

use crate::{
    settle, BackendOracleProbe, OpaqueFetchProbe, ProbeFault, ProbeSettings, ResourceLoadProbe,
};

/// One bounded way of testing reachability.
#[async_trait::async_trait]
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// A bare attempt with no timer of its own. `abort` fires on timer expiry
    /// or when the run is torn down; implementations with abortable I/O
    /// should watch it.
    async fn attempt(
        &self,
        request: &AttemptRequest,
        abort: &CancellationToken,
    ) -> Result<ProbeOutcome, ProbeFault>;

    /// `attempt` bounded by `request.timeout` and the run token.
    async fn probe(
        &self,
        request: &AttemptRequest,
        run: &CancellationToken,
    ) -> Result<ProbeOutcome, ProbeFault> {
        let abort = run.child_token();
        settle::within(request.timeout, &abort, self.attempt(request, &abort)).await
    }
}

/// The strategies an orchestrator can dispatch, looked up by kind.
#[derive(Clone, Default)]
pub struct StrategySet {
    strategies: Vec<Arc<dyn Strategy>>,
}

impl StrategySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three HTTP strategies sharing one client.
    pub fn http(settings: &ProbeSettings) -> Result<Self, reqwest::Error> {
        let client = crate::http::build_client(settings)?;
        let oracle = BackendOracleProbe::new(client.clone())
            .with_max_reply_bytes(settings.max_reply_bytes);
        Ok(Self::new()
            .with(ResourceLoadProbe::new(client.clone(), settings.clone()))
            .with(OpaqueFetchProbe::new(client))
            .with(oracle))
    }

    /// Registers a strategy, replacing any previous one of the same kind.
    pub fn with(mut self, strategy: impl Strategy + 'static) -> Self {
        self.insert(Arc::new(strategy));
        self
    }

    pub fn insert(&mut self, strategy: Arc<dyn Strategy>) {
        let kind = strategy.kind();
        self.strategies.retain(|existing| existing.kind() != kind);
        self.strategies.push(strategy);
    }

    pub fn get(&self, kind: StrategyKind) -> Option<Arc<dyn Strategy>> {
        self.strategies
            .iter()
            .find(|strategy| strategy.kind() == kind)
            .cloned()
    }
}
