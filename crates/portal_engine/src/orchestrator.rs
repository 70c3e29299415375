use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use portal_core::{
    update, AttemptRequest, Effect, Msg, ProbeConfig, ProbeState, RunId, StatusView, StrategyKind,
};
use portal_logging::{portal_debug, portal_info, portal_trace, portal_warn};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::{EngineError, Navigator, ProbeFault, ProbeSettings, StatusSink, StrategySet};

enum Command {
    Start(ProbeConfig),
    Restart,
    Cancel,
    Shutdown,
}

/// Composes the strategies into the fallback chain and owns the status state machine.
pub struct Orchestrator {
    strategies: StrategySet,
    navigator: Arc<dyn Navigator>,
    sink: Arc<dyn StatusSink>,
}

impl Orchestrator {
    pub fn new(
        strategies: StrategySet,
        navigator: Arc<dyn Navigator>,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            strategies,
            navigator,
            sink,
        }
    }

    /// Orchestrator over the three HTTP strategies.
    pub fn with_settings(
        settings: &ProbeSettings,
        navigator: Arc<dyn Navigator>,
        sink: Arc<dyn StatusSink>,
    ) -> Result<Self, EngineError> {
        let strategies = StrategySet::http(settings)?;
        Ok(Self::new(strategies, navigator, sink))
    }

    /// Splits into a control handle and the driver future that must be polled.
    pub fn into_parts(self) -> (OrchestratorHandle, Driver) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let state = ProbeState::new();
        let (status_tx, status_rx) = watch::channel(state.view());
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let handle = OrchestratorHandle { cmd_tx, status_rx };
        let driver = Driver {
            orchestrator: self,
            cmd_rx,
            msg_tx,
            msg_rx,
            status_tx,
            state,
            runs: HashMap::new(),
        };
        (handle, driver)
    }

    /// Spawns the driver on the current Tokio runtime.
    pub fn spawn(self) -> OrchestratorHandle {
        let (handle, driver) = self.into_parts();
        tokio::spawn(driver.run());
        handle
    }
}

/// Control surface for a running orchestrator. Cheap to clone.
#[derive(Clone)]
pub struct OrchestratorHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
    status_rx: watch::Receiver<StatusView>,
}

impl OrchestratorHandle {
    /// Supplies configuration. A config different from the current one
    /// supersedes any run in flight and starts a new one.
    pub fn start(&self, config: ProbeConfig) -> Result<(), EngineError> {
        config.validate()?;
        self.send(Command::Start(config))
    }

    pub fn restart(&self) -> Result<(), EngineError> {
        self.send(Command::Restart)
    }

    /// Invalidates the active run. In-flight I/O is aborted where possible;
    /// anything that still settles later is discarded.
    pub fn cancel(&self) -> Result<(), EngineError> {
        self.send(Command::Cancel)
    }

    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(Command::Shutdown);
    }

    pub fn status(&self) -> StatusView {
        self.status_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusView> {
        self.status_rx.clone()
    }

    fn send(&self, command: Command) -> Result<(), EngineError> {
        self.cmd_tx.send(command).map_err(|_| EngineError::Closed)
    }
}

/// The single task that owns `ProbeState`. Strategy attempts run as
/// separate tasks and report back through `msg_tx`.
pub struct Driver {
    orchestrator: Orchestrator,
    cmd_rx: mpsc::UnboundedReceiver<Command>,
    msg_tx: mpsc::UnboundedSender<Msg>,
    msg_rx: mpsc::UnboundedReceiver<Msg>,
    status_tx: watch::Sender<StatusView>,
    state: ProbeState,
    runs: HashMap<RunId, CancellationToken>,
}

impl Driver {
    pub async fn run(mut self) {
        loop {
            let msg = tokio::select! {
                command = self.cmd_rx.recv() => match command {
                    Some(Command::Start(config)) => Msg::ConfigChanged(config),
                    Some(Command::Restart) => Msg::RestartRequested,
                    Some(Command::Cancel) => Msg::CancelRequested,
                    Some(Command::Shutdown) | None => break,
                },
                Some(msg) = self.msg_rx.recv() => msg,
            };
            self.dispatch(msg);
        }

        for (run_id, token) in self.runs.drain() {
            portal_debug!("Tearing down run {}", run_id);
            token.cancel();
        }
        portal_info!("Orchestrator stopped");
    }

    fn dispatch(&mut self, msg: Msg) {
        portal_trace!("Dispatching {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            let view = state.view();
            self.orchestrator.sink.emit(view.clone());
            self.status_tx.send_replace(view);
        }
        self.state = state;

        for effect in effects {
            self.execute(effect);
        }

        // Finished runs have nothing in flight; only the active token matters.
        let active = self.state.active_run();
        self.runs.retain(|run_id, _| Some(*run_id) == active);
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::RunStrategy {
                run_id,
                strategy,
                request,
            } => {
                let token = self.runs.entry(run_id).or_default().clone();
                self.spawn_attempt(run_id, strategy, request, token);
            }
            Effect::AbortRun { run_id } => {
                if let Some(token) = self.runs.remove(&run_id) {
                    token.cancel();
                }
            }
            Effect::Navigate { run_id, url } => {
                let cancelled = self
                    .runs
                    .get(&run_id)
                    .is_none_or(CancellationToken::is_cancelled);
                if cancelled {
                    portal_warn!("Run {} no longer valid; not navigating", run_id);
                    return;
                }
                portal_info!("Run {} navigating to {}", run_id, url);
                self.orchestrator.navigator.navigate(&url);
            }
        }
    }

    fn spawn_attempt(
        &self,
        run_id: RunId,
        kind: StrategyKind,
        request: AttemptRequest,
        token: CancellationToken,
    ) {
        let msg_tx = self.msg_tx.clone();
        let Some(strategy) = self.orchestrator.strategies.get(kind) else {
            let _ = msg_tx.send(Msg::StrategyFaulted {
                run_id,
                strategy: kind,
                message: ProbeFault::Missing(kind).to_string(),
            });
            return;
        };

        portal_info!("Run {} trying {}", run_id, kind);
        tokio::spawn(async move {
            let attempt = AssertUnwindSafe(strategy.probe(&request, &token))
                .catch_unwind()
                .await;
            let msg = match attempt {
                Ok(Ok(outcome)) => Msg::StrategySettled {
                    run_id,
                    strategy: kind,
                    outcome,
                },
                Ok(Err(fault)) => Msg::StrategyFaulted {
                    run_id,
                    strategy: kind,
                    message: fault.to_string(),
                },
                Err(payload) => Msg::StrategyFaulted {
                    run_id,
                    strategy: kind,
                    message: ProbeFault::Panicked {
                        strategy: kind,
                        message: panic_message(payload.as_ref()),
                    }
                    .to_string(),
                },
            };
            let _ = msg_tx.send(msg);
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
