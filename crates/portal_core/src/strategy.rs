use std::fmt;
use std::time::Duration;

/// The three probing strategies, in fallback priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    ResourceLoad,
    OpaqueFetch,
    BackendOracle,
}

impl StrategyKind {
    pub const CHAIN: [StrategyKind; 3] = [
        StrategyKind::ResourceLoad,
        StrategyKind::OpaqueFetch,
        StrategyKind::BackendOracle,
    ];

    pub fn first() -> Self {
        Self::CHAIN[0]
    }

    /// The strategy to fall back to after this one fails, if any.
    pub fn next(self) -> Option<Self> {
        let idx = Self::CHAIN.iter().position(|kind| *kind == self)?;
        Self::CHAIN.get(idx + 1).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            StrategyKind::ResourceLoad => "resource-load",
            StrategyKind::OpaqueFetch => "opaque-fetch",
            StrategyKind::BackendOracle => "backend-oracle",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything a strategy needs for one attempt. Derived from the run's config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRequest {
    pub target: String,
    pub timeout: Duration,
    pub backend_ping_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success,
    Failure(FailureReason),
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success)
    }
}

/// Why a strategy failed. Informational only: every reason means "try the next one".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Timeout,
    Aborted,
    Transport(String),
    HttpStatus(u16),
    UnexpectedContentType(String),
    MalformedResponse(String),
    NotAlive,
    NotConfigured,
    InvalidTarget(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Timeout => write!(f, "timeout"),
            FailureReason::Aborted => write!(f, "aborted"),
            FailureReason::Transport(message) => write!(f, "transport error: {message}"),
            FailureReason::HttpStatus(code) => write!(f, "http status {code}"),
            FailureReason::UnexpectedContentType(content_type) => {
                write!(f, "unexpected content type {content_type}")
            }
            FailureReason::MalformedResponse(message) => {
                write!(f, "malformed response: {message}")
            }
            FailureReason::NotAlive => write!(f, "backend reported target not alive"),
            FailureReason::NotConfigured => write!(f, "not configured"),
            FailureReason::InvalidTarget(message) => write!(f, "invalid target: {message}"),
        }
    }
}
