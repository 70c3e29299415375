use portal_core::{AttemptRequest, FailureReason, ProbeOutcome, StrategyKind};
use portal_logging::portal_debug;
use tokio_util::sync::CancellationToken;

use crate::http::classify_error;
use crate::target::target_url;
use crate::{ProbeFault, Strategy};

/// Requests the target and ignores everything about the answer except that it came.
///
/// Any status code is a success. The in-flight request is dropped as soon as
/// `abort` fires, so a timed-out attempt leaves no connection behind.
#[derive(Debug, Clone)]
pub struct OpaqueFetchProbe {
    client: reqwest::Client,
}

impl OpaqueFetchProbe {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Strategy for OpaqueFetchProbe {
    fn kind(&self) -> StrategyKind {
        StrategyKind::OpaqueFetch
    }

    async fn attempt(
        &self,
        request: &AttemptRequest,
        abort: &CancellationToken,
    ) -> Result<ProbeOutcome, ProbeFault> {
        let url = match target_url(&request.target) {
            Ok(url) => url,
            Err(reason) => return Ok(ProbeOutcome::Failure(reason)),
        };
        portal_debug!("Opaque fetch {}", url);

        tokio::select! {
            _ = abort.cancelled() => Ok(ProbeOutcome::Failure(FailureReason::Aborted)),
            sent = self.client.get(url).send() => match sent {
                Ok(response) => {
                    portal_debug!("Opaque fetch answered with {}", response.status());
                    Ok(ProbeOutcome::Success)
                }
                Err(err) => classify_error(err),
            },
        }
    }
}
