use portal_logging::{portal_debug, portal_info, portal_warn};

use crate::{
    Effect, Msg, ProbeOutcome, ProbeState, ProbeStatus, RunId, StrategyKind, STEP_CONNECTED,
    STEP_ERROR, STEP_NOT_CONNECTED,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Results carrying a run id other than the active one are discarded, so a
/// superseded or cancelled run can never touch status or navigate.
pub fn update(mut state: ProbeState, msg: Msg) -> (ProbeState, Vec<Effect>) {
    let effects = match msg {
        Msg::ConfigChanged(config) => {
            if let Err(err) = config.validate() {
                portal_warn!("Ignoring invalid probe config: {}", err);
                return (state, Vec::new());
            }
            if state.config() == Some(&config) {
                portal_debug!("Probe config unchanged; no new run");
                return (state, Vec::new());
            }
            state.set_config(config);
            start_run(&mut state)
        }
        Msg::RestartRequested => {
            if state.config().is_none() {
                return (state, Vec::new());
            }
            start_run(&mut state)
        }
        Msg::CancelRequested => match state.invalidate_active() {
            Some(run_id) => {
                portal_info!("Run {} cancelled", run_id);
                vec![Effect::AbortRun { run_id }]
            }
            None => Vec::new(),
        },
        Msg::StrategySettled {
            run_id,
            strategy,
            outcome,
        } => {
            if !state.is_current(run_id, strategy) {
                portal_debug!(
                    "Discarding stale {} result for run {}: {:?}",
                    strategy,
                    run_id,
                    outcome
                );
                return (state, Vec::new());
            }
            match outcome {
                ProbeOutcome::Success => {
                    portal_info!("Run {} reached target via {}", run_id, strategy);
                    match state.finish(ProbeStatus::Alive, STEP_CONNECTED) {
                        Some(url) => vec![Effect::Navigate { run_id, url }],
                        None => Vec::new(),
                    }
                }
                ProbeOutcome::Failure(reason) => {
                    portal_info!("Run {} {} failed: {}", run_id, strategy, reason);
                    fall_back(&mut state, run_id, strategy)
                }
            }
        }
        Msg::StrategyFaulted {
            run_id,
            strategy,
            message,
        } => {
            if !state.is_current(run_id, strategy) {
                portal_debug!("Discarding stale {} fault for run {}", strategy, run_id);
                return (state, Vec::new());
            }
            portal_warn!("Run {} halted by {} fault: {}", run_id, strategy, message);
            state.finish(ProbeStatus::Error, STEP_ERROR);
            Vec::new()
        }
    };

    (state, effects)
}

fn start_run(state: &mut ProbeState) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(2);
    if let Some(previous) = state.invalidate_active() {
        portal_info!("Run {} superseded", previous);
        effects.push(Effect::AbortRun { run_id: previous });
    }

    let Some(config) = state.config().cloned() else {
        return effects;
    };
    if !config.should_run() {
        portal_info!(
            "Not probing (auto_start={}, target={:?}); status stays {}",
            config.auto_start,
            config.target,
            state.status()
        );
        return effects;
    }

    let (run_id, request) = state.begin_run(&config);
    let strategy = StrategyKind::first();
    portal_info!(
        "Run {} started for {} (timeout {:?})",
        run_id,
        request.target,
        request.timeout
    );
    effects.push(Effect::RunStrategy {
        run_id,
        strategy,
        request,
    });
    effects
}

fn fall_back(state: &mut ProbeState, run_id: RunId, failed: StrategyKind) -> Vec<Effect> {
    // The backend oracle is only part of the chain when a ping url is configured.
    let next = failed
        .next()
        .filter(|next| *next != StrategyKind::BackendOracle || state.backend_configured());
    match next {
        Some(next) => match state.advance(next) {
            Some(request) => vec![Effect::RunStrategy {
                run_id,
                strategy: next,
                request,
            }],
            None => Vec::new(),
        },
        None => {
            portal_info!("Run {} exhausted all strategies", run_id);
            state.finish(ProbeStatus::Dead, STEP_NOT_CONNECTED);
            Vec::new()
        }
    }
}
