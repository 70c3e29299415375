use portal_core::{AttemptRequest, FailureReason, ProbeOutcome, StrategyKind};
use portal_logging::portal_debug;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::http::{classify_error, oversized, read_capped};
use crate::target::backend_url;
use crate::{ProbeFault, ProbeSettings, Strategy};

/// Asks a backend service whether it can reach the target.
///
/// Wire contract: `GET {backend_ping_url}{encoded target}` answering a JSON
/// object; only `"alive": true` is a success. The HTTP status is not consulted.
/// Without a configured backend the attempt fails at once.
#[derive(Debug, Clone)]
pub struct BackendOracleProbe {
    client: reqwest::Client,
    max_reply_bytes: u64,
}

impl BackendOracleProbe {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            max_reply_bytes: ProbeSettings::default().max_reply_bytes,
        }
    }

    pub fn with_max_reply_bytes(mut self, limit: u64) -> Self {
        self.max_reply_bytes = limit;
        self
    }

    async fn ask(&self, url: reqwest::Url) -> Result<ProbeOutcome, ProbeFault> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => return classify_error(err),
        };
        let body = match read_capped(response, self.max_reply_bytes).await {
            Ok(Some(body)) => body,
            Ok(None) => return Ok(oversized("backend reply", self.max_reply_bytes)),
            Err(err) => return classify_error(err),
        };
        Ok(interpret_reply(&body))
    }
}

fn interpret_reply(body: &[u8]) -> ProbeOutcome {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(err) => {
            return ProbeOutcome::Failure(FailureReason::MalformedResponse(err.to_string()))
        }
    };
    match value.get("alive") {
        Some(Value::Bool(true)) => ProbeOutcome::Success,
        _ => ProbeOutcome::Failure(FailureReason::NotAlive),
    }
}

#[async_trait::async_trait]
impl Strategy for BackendOracleProbe {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BackendOracle
    }

    async fn attempt(
        &self,
        request: &AttemptRequest,
        _abort: &CancellationToken,
    ) -> Result<ProbeOutcome, ProbeFault> {
        let Some(prefix) = request.backend_ping_url.as_deref() else {
            return Ok(ProbeOutcome::Failure(FailureReason::NotConfigured));
        };
        let url = match backend_url(prefix, &request.target) {
            Ok(url) => url,
            Err(reason) => return Ok(ProbeOutcome::Failure(reason)),
        };
        portal_debug!("Backend oracle {}", url);
        self.ask(url).await
    }
}
