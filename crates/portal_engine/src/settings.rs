/// Engine-side knobs that are not part of the per-run configuration.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Small well-known resource appended to the target by the resource-load probe.
    pub resource_path: String,
    /// Query parameter carrying the cache-busting timestamp.
    pub cache_bust_param: String,
    /// Accepted content-type prefixes for the resource-load probe.
    pub resource_content_types: Vec<String>,
    pub max_resource_bytes: u64,
    /// Cap on the backend oracle's JSON reply.
    pub max_reply_bytes: u64,
    pub redirect_limit: usize,
    pub user_agent: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            resource_path: "/favicon.ico".to_string(),
            cache_bust_param: "_".to_string(),
            resource_content_types: vec![
                "image/".to_string(),
                "application/octet-stream".to_string(),
            ],
            max_resource_bytes: 1024 * 1024,
            max_reply_bytes: 64 * 1024,
            redirect_limit: 5,
            user_agent: concat!("portal-probe/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ProbeSettings {
    pub(crate) fn is_resource_content_type(&self, content_type: &str) -> bool {
        let ct = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim()
            .to_ascii_lowercase();
        self.resource_content_types
            .iter()
            .any(|allowed| ct.starts_with(&allowed.to_ascii_lowercase()))
    }
}
