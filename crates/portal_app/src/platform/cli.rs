use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use super::logging::LogDestination;

/// Checks whether a private network target is reachable and redirects to the
/// portal if it is.
#[derive(Debug, Parser)]
#[command(name = "portal_probe", version)]
pub struct Cli {
    /// RON file with probe configuration; flags override its values.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Target URL or hostname to probe.
    #[arg(long)]
    pub target: Option<String>,

    /// Absolute URL to navigate to when the target is reachable.
    #[arg(long)]
    pub redirect_url: Option<String>,

    /// Per-strategy timeout in milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Backend ping prefix, e.g. "https://api.example.com/ping?ip=".
    #[arg(long)]
    pub backend_ping_url: Option<String>,

    /// Load configuration but do not start probing.
    #[arg(long)]
    pub no_auto_start: bool,

    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    #[arg(long, default_value = "./portal_probe.log")]
    pub log_file: PathBuf,

    /// Log at debug level.
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}
