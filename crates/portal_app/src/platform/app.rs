use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use log::LevelFilter;
use portal_core::{ProbeStatus, StatusView, StrategyKind};
use portal_engine::{EngineHandle, ProbeSettings};
use portal_logging::{portal_info, portal_warn};

use super::cli::Cli;
use super::navigator::TerminalNavigator;
use super::{config_file, logging, render};

pub const EXIT_ALIVE: u8 = 0;
pub const EXIT_DEAD: u8 = 1;
pub const EXIT_ERROR: u8 = 2;
pub const EXIT_NOT_RUN: u8 = 3;

/// Slack on top of the summed strategy timeouts before we stop waiting.
const GRACE: Duration = Duration::from_secs(5);

pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(cli.log.into(), level, &cli.log_file);

    let config = config_file::resolve(&cli)?;
    config.validate().context("invalid probe configuration")?;

    if !config.should_run() {
        portal_info!("Probing disabled or target empty; nothing to do");
        print_view(&StatusView {
            step: portal_core::STEP_IDLE.to_string(),
            ..StatusView::default()
        });
        return Ok(ExitCode::from(EXIT_NOT_RUN));
    }

    let engine = EngineHandle::new(&ProbeSettings::default(), Arc::new(TerminalNavigator))
        .context("failed to start probe engine")?;
    let budget = config.timeout() * StrategyKind::CHAIN.len() as u32 + GRACE;
    engine.start(config)?;

    let deadline = Instant::now() + budget;
    let code = loop {
        match engine.recv_timeout(Duration::from_millis(100)) {
            Some(view) => {
                print_view(&view);
                if view.status.is_terminal() {
                    break exit_code(view.status);
                }
            }
            None if Instant::now() >= deadline => {
                portal_warn!("No verdict within {:?}; giving up", budget);
                break EXIT_ERROR;
            }
            None => {}
        }
    };

    engine.shutdown();
    Ok(ExitCode::from(code))
}

fn print_view(view: &StatusView) {
    for line in render::render(view) {
        println!("{line}");
    }
}

fn exit_code(status: ProbeStatus) -> u8 {
    match status {
        ProbeStatus::Alive => EXIT_ALIVE,
        ProbeStatus::Dead => EXIT_DEAD,
        ProbeStatus::Error => EXIT_ERROR,
        ProbeStatus::Idle | ProbeStatus::Probing => EXIT_NOT_RUN,
    }
}
