use portal_core::FailureReason;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

/// Characters left as-is when a whole URL is embedded as one component.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Turns a configured target (URL or bare host) into an http(s) URL.
pub fn target_url(target: &str) -> Result<Url, FailureReason> {
    let trimmed = target.trim();
    if trimmed.is_empty() {
        return Err(FailureReason::InvalidTarget("empty target".to_string()));
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    let url = Url::parse(&candidate).map_err(|err| FailureReason::InvalidTarget(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FailureReason::InvalidTarget(format!(
            "unsupported scheme {other}"
        ))),
    }
}

/// `{target}{path}?{param}={stamp}`; the stamp defeats intermediate caches.
pub fn resource_url(target: &Url, path: &str, param: &str, stamp: i64) -> Url {
    let mut url = target.clone();
    let joined = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);
    url.set_fragment(None);
    url.query_pairs_mut()
        .append_pair(param, &stamp.to_string());
    url
}

/// `{prefix}{encoded target}`; the prefix ends in `?name=` or a path segment.
pub fn backend_url(prefix: &str, target: &str) -> Result<Url, FailureReason> {
    let encoded = utf8_percent_encode(target, COMPONENT);
    Url::parse(&format!("{prefix}{encoded}"))
        .map_err(|err| FailureReason::InvalidTarget(format!("backend ping url: {err}")))
}
