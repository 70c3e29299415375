use portal_core::{AttemptRequest, FailureReason, ProbeOutcome, StrategyKind};
use portal_logging::portal_debug;
use reqwest::header::CONTENT_TYPE;
use tokio_util::sync::CancellationToken;

use crate::http::{classify_error, oversized, read_capped};
use crate::target::{resource_url, target_url};
use crate::{ProbeFault, ProbeSettings, Strategy};

/// Loads a small well-known resource (the favicon) from the target.
///
/// Only a complete, image-like 2xx load counts. A 404 fails even though the
/// host answered; that is how a browser image load behaves and it is kept.
#[derive(Debug, Clone)]
pub struct ResourceLoadProbe {
    client: reqwest::Client,
    settings: ProbeSettings,
}

impl ResourceLoadProbe {
    pub fn new(client: reqwest::Client, settings: ProbeSettings) -> Self {
        Self { client, settings }
    }

    async fn load(&self, url: reqwest::Url) -> Result<ProbeOutcome, ProbeFault> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => return classify_error(err),
        };

        let status = response.status();
        if !status.is_success() {
            return Ok(ProbeOutcome::Failure(FailureReason::HttpStatus(
                status.as_u16(),
            )));
        }

        if let Some(ct) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        {
            if !self.settings.is_resource_content_type(ct) {
                return Ok(ProbeOutcome::Failure(
                    FailureReason::UnexpectedContentType(ct.to_string()),
                ));
            }
        }

        let limit = self.settings.max_resource_bytes;
        let received = match read_capped(response, limit).await {
            Ok(Some(body)) => body.len(),
            Ok(None) => return Ok(oversized("resource", limit)),
            Err(err) => return classify_error(err),
        };
        portal_debug!("Resource load complete ({} bytes)", received);
        Ok(ProbeOutcome::Success)
    }
}

#[async_trait::async_trait]
impl Strategy for ResourceLoadProbe {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ResourceLoad
    }

    async fn attempt(
        &self,
        request: &AttemptRequest,
        _abort: &CancellationToken,
    ) -> Result<ProbeOutcome, ProbeFault> {
        let base = match target_url(&request.target) {
            Ok(url) => url,
            Err(reason) => return Ok(ProbeOutcome::Failure(reason)),
        };
        let url = resource_url(
            &base,
            &self.settings.resource_path,
            &self.settings.cache_bust_param,
            chrono::Utc::now().timestamp_millis(),
        );
        portal_debug!("Resource load {}", url);
        self.load(url).await
    }
}
