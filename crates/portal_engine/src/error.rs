use portal_core::{ConfigError, StrategyKind};
use thiserror::Error;

/// A strategy broke its Success/Failure contract. Ends the run as `Error`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeFault {
    #[error("{strategy} panicked: {message}")]
    Panicked {
        strategy: StrategyKind,
        message: String,
    },
    #[error("http client misuse: {0}")]
    Client(String),
    #[error("no strategy registered for {0}")]
    Missing(StrategyKind),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("failed to start probe runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("orchestrator has shut down")]
    Closed,
}
