#![deny(missing_docs)]
//! Logging front-end for the portal probe crates.
//!
//! Probe code logs through the `portal_*` macros rather than `log::*` so the
//! sink can be swapped in one place. The binary installs the real logger;
//! tests call [`initialize_for_tests`].

/// Per-message detail such as every dispatched msg in the orchestrator loop.
#[macro_export]
macro_rules! portal_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Request URLs, discarded stale results and similar diagnostics.
#[macro_export]
macro_rules! portal_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Run lifecycle: started, strategy failed, superseded, settled.
#[macro_export]
macro_rules! portal_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Rejected configuration and strategy faults.
#[macro_export]
macro_rules! portal_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Failures of the engine itself, e.g. a probe thread that could not be joined.
#[macro_export]
macro_rules! portal_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Installs a terminal logger for tests, limited to the `portal_*` crates.
///
/// HTTP client and mock server records are filtered out. Calling it again
/// after a logger is installed does nothing.
pub fn initialize_for_tests() {
    use log::LevelFilter;
    use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .add_filter_allow_str("portal_")
        .build();

    let _ = TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto);
}
