use std::io::Write;

use portal_engine::Navigator;
use portal_logging::portal_warn;

/// Hands the redirect to whoever runs us: the URL is printed on stdout.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, url: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(err) = writeln!(out, "Navigate: {url}").and_then(|()| out.flush()) {
            portal_warn!("Failed to write redirect to stdout: {}", err);
        }
    }
}
