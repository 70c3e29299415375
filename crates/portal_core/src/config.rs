use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::AttemptRequest;

/// Per-strategy timeout used when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,
    #[error("redirect_url {url:?} is not an absolute url: {message}")]
    InvalidRedirectUrl { url: String, message: String },
    #[error("backend_ping_url {url:?} is not an absolute url: {message}")]
    InvalidBackendPingUrl { url: String, message: String },
}

/// Inputs for one probing run. Immutable once a run has started.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProbeConfig {
    /// URL or bare hostname to test.
    pub target: String,
    /// Where to navigate once the target is found reachable.
    pub redirect_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Prefix for the backend oracle; the encoded target is appended to it.
    #[serde(default)]
    pub backend_ping_url: Option<String>,
    #[serde(default = "default_auto_start")]
    pub auto_start: bool,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_auto_start() -> bool {
    true
}

impl ProbeConfig {
    pub fn new(target: impl Into<String>, redirect_url: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            redirect_url: redirect_url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            backend_ping_url: None,
            auto_start: true,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_backend_ping_url(mut self, url: impl Into<String>) -> Self {
        self.backend_ping_url = Some(url.into());
        self
    }

    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// An empty target is valid; it simply never starts a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Url::parse(&self.redirect_url).map_err(|err| ConfigError::InvalidRedirectUrl {
            url: self.redirect_url.clone(),
            message: err.to_string(),
        })?;
        if let Some(backend) = self.backend_ping_url.as_deref() {
            Url::parse(backend).map_err(|err| ConfigError::InvalidBackendPingUrl {
                url: backend.to_string(),
                message: err.to_string(),
            })?;
        }
        Ok(())
    }

    pub fn should_run(&self) -> bool {
        self.auto_start && !self.target.trim().is_empty()
    }

    pub(crate) fn attempt_request(&self) -> AttemptRequest {
        AttemptRequest {
            target: self.target.trim().to_string(),
            timeout: self.timeout(),
            backend_ping_url: self.backend_ping_url.clone(),
        }
    }
}
