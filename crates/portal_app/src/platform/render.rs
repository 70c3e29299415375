use portal_core::{ProbeStatus, StatusView};

pub const FALLBACK_MESSAGE: &str = "This is a private site that requires access to the private \
network. If you are seeing this message, you were not detected on that network. If you believe \
this is an error, contact the administrator.";

pub const ERROR_MESSAGE: &str = "There was an error during the ping process.";

pub fn render(view: &StatusView) -> Vec<String> {
    let mut lines = vec![format!("Status: {}", view.step)];
    match view.status {
        ProbeStatus::Idle => {}
        ProbeStatus::Probing => {
            if let Some(current) = view.attempts.last() {
                lines.push(format!(
                    "  trying {} ({}/{})",
                    current,
                    view.attempts.len(),
                    portal_core::StrategyKind::CHAIN.len()
                ));
            }
        }
        ProbeStatus::Alive => lines.push("Redirecting…".to_string()),
        ProbeStatus::Dead => lines.push(FALLBACK_MESSAGE.to_string()),
        ProbeStatus::Error => lines.push(ERROR_MESSAGE.to_string()),
    }
    lines
}
