use futures_util::StreamExt;
use portal_core::{FailureReason, ProbeOutcome};

use crate::{ProbeFault, ProbeSettings};

pub(crate) fn build_client(settings: &ProbeSettings) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
        .user_agent(settings.user_agent.clone())
        .build()
}

/// Transport errors are ordinary failures; a request we could not even build is a fault.
pub(crate) fn classify_error(err: reqwest::Error) -> Result<ProbeOutcome, ProbeFault> {
    if err.is_builder() {
        return Err(ProbeFault::Client(err.to_string()));
    }
    if err.is_timeout() {
        return Ok(ProbeOutcome::Failure(FailureReason::Timeout));
    }
    Ok(ProbeOutcome::Failure(FailureReason::Transport(err.to_string())))
}

/// Streams the body, giving up as soon as it grows past `limit` bytes.
///
/// `Ok(None)` means the cap was exceeded.
pub(crate) async fn read_capped(
    response: reqwest::Response,
    limit: u64,
) -> Result<Option<Vec<u8>>, reqwest::Error> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if (body.len() + chunk.len()) as u64 > limit {
            return Ok(None);
        }
        body.extend_from_slice(&chunk);
    }
    Ok(Some(body))
}

pub(crate) fn oversized(what: &str, limit: u64) -> ProbeOutcome {
    ProbeOutcome::Failure(FailureReason::MalformedResponse(format!(
        "{what} exceeds {limit} bytes"
    )))
}
