//! Portal core: pure reachability status state machine and view-model helpers.
//!
//! Nothing in this crate performs I/O. The engine feeds [`Msg`] values into
//! [`update`] and executes the returned [`Effect`]s.
mod config;
mod effect;
mod msg;
mod state;
mod strategy;
mod update;
mod view_model;

pub use config::{ConfigError, ProbeConfig, DEFAULT_TIMEOUT_MS};
pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    ProbeState, ProbeStatus, RunId, STEP_CHECKING, STEP_CONNECTED, STEP_ERROR, STEP_IDLE,
    STEP_NOT_CONNECTED,
};
pub use strategy::{AttemptRequest, FailureReason, ProbeOutcome, StrategyKind};
pub use update::update;
pub use view_model::StatusView;
