use std::fmt;

use crate::view_model::StatusView;
use crate::{AttemptRequest, ProbeConfig, StrategyKind};

pub const STEP_IDLE: &str = "Idle...";
pub const STEP_CHECKING: &str = "Checking connection...";
pub const STEP_CONNECTED: &str = "Connected!";
pub const STEP_NOT_CONNECTED: &str = "Not Connected";
pub const STEP_ERROR: &str = "Connection check failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeStatus {
    #[default]
    Idle,
    Probing,
    Alive,
    Dead,
    Error,
}

impl ProbeStatus {
    /// Alive, Dead and Error end a run.
    pub fn is_terminal(self) -> bool {
        matches!(self, ProbeStatus::Alive | ProbeStatus::Dead | ProbeStatus::Error)
    }

    pub fn label(self) -> &'static str {
        match self {
            ProbeStatus::Idle => "idle",
            ProbeStatus::Probing => "probing",
            ProbeStatus::Alive => "alive",
            ProbeStatus::Dead => "dead",
            ProbeStatus::Error => "error",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of one orchestration pass. Only the active run may mutate status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveRun {
    id: RunId,
    strategy: StrategyKind,
    request: AttemptRequest,
    redirect_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeState {
    config: Option<ProbeConfig>,
    status: ProbeStatus,
    step: String,
    active: Option<ActiveRun>,
    last_run: Option<RunId>,
    next_run: u64,
    attempts: Vec<StrategyKind>,
    dirty: bool,
}

impl Default for ProbeState {
    fn default() -> Self {
        Self {
            config: None,
            status: ProbeStatus::Idle,
            step: STEP_IDLE.to_string(),
            active: None,
            last_run: None,
            next_run: 1,
            attempts: Vec::new(),
            dirty: false,
        }
    }
}

impl ProbeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> StatusView {
        StatusView {
            status: self.status,
            step: self.step.clone(),
            run_id: self.last_run,
            attempts: self.attempts.clone(),
        }
    }

    pub fn status(&self) -> ProbeStatus {
        self.status
    }

    pub fn config(&self) -> Option<&ProbeConfig> {
        self.config.as_ref()
    }

    pub fn active_run(&self) -> Option<RunId> {
        self.active.as_ref().map(|run| run.id)
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_config(&mut self, config: ProbeConfig) {
        self.config = Some(config);
    }

    /// True when `run_id` is active and currently waiting on `strategy`.
    pub(crate) fn is_current(&self, run_id: RunId, strategy: StrategyKind) -> bool {
        self.active
            .as_ref()
            .is_some_and(|run| run.id == run_id && run.strategy == strategy)
    }

    /// Drops the active run, if any. Status and step text are left as they are.
    pub(crate) fn invalidate_active(&mut self) -> Option<RunId> {
        self.active.take().map(|run| run.id)
    }

    /// Enters `Probing` for a fresh run on the first strategy of the chain.
    pub(crate) fn begin_run(&mut self, config: &ProbeConfig) -> (RunId, AttemptRequest) {
        let id = RunId(self.next_run);
        self.next_run += 1;
        let request = config.attempt_request();
        let strategy = StrategyKind::first();
        self.active = Some(ActiveRun {
            id,
            strategy,
            request: request.clone(),
            redirect_url: config.redirect_url.clone(),
        });
        self.last_run = Some(id);
        self.attempts = vec![strategy];
        self.set_status(ProbeStatus::Probing, STEP_CHECKING);
        (id, request)
    }

    /// True when the active run carries a backend ping url.
    pub(crate) fn backend_configured(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|run| run.request.backend_ping_url.is_some())
    }

    /// Moves the active run on to `next`. Status stays `Probing`.
    pub(crate) fn advance(&mut self, next: StrategyKind) -> Option<AttemptRequest> {
        let run = self.active.as_mut()?;
        run.strategy = next;
        self.attempts.push(next);
        self.dirty = true;
        Some(run.request.clone())
    }

    /// Ends the active run with a terminal status; returns the run's redirect url.
    pub(crate) fn finish(&mut self, status: ProbeStatus, step: &str) -> Option<String> {
        let run = self.active.take()?;
        self.set_status(status, step);
        Some(run.redirect_url)
    }

    fn set_status(&mut self, status: ProbeStatus, step: &str) {
        self.status = status;
        self.step = step.to_string();
        self.dirty = true;
    }
}
