use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use portal_core::{ProbeConfig, StatusView};
use portal_logging::portal_error;

use crate::{
    ChannelStatusSink, EngineError, Navigator, Orchestrator, OrchestratorHandle, ProbeSettings,
};

/// Blocking facade for callers without an async runtime.
///
/// The orchestrator runs on a dedicated thread inside a current-thread Tokio
/// runtime, so all probing is cooperative on a single thread. Status views
/// arrive over a channel in transition order.
pub struct EngineHandle {
    handle: OrchestratorHandle,
    event_rx: mpsc::Receiver<StatusView>,
    thread: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(
        settings: &ProbeSettings,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, EngineError> {
        let (event_tx, event_rx) = mpsc::channel();
        let sink = Arc::new(ChannelStatusSink::new(event_tx));
        let orchestrator = Orchestrator::with_settings(settings, navigator, sink)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (handle, driver) = orchestrator.into_parts();

        let thread = thread::Builder::new()
            .name("portal-probe".to_string())
            .spawn(move || runtime.block_on(driver.run()))?;

        Ok(Self {
            handle,
            event_rx,
            thread: Some(thread),
        })
    }

    pub fn start(&self, config: ProbeConfig) -> Result<(), EngineError> {
        self.handle.start(config)
    }

    pub fn restart(&self) -> Result<(), EngineError> {
        self.handle.restart()
    }

    pub fn cancel(&self) -> Result<(), EngineError> {
        self.handle.cancel()
    }

    pub fn status(&self) -> StatusView {
        self.handle.status()
    }

    pub fn try_recv(&self) -> Option<StatusView> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<StatusView> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Stops the orchestrator thread, aborting any run in flight.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.handle.shutdown();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                portal_error!("Probe thread panicked during shutdown");
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
