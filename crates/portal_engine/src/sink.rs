use std::sync::mpsc;

use portal_core::StatusView;

/// Receives the status surface after every visible transition.
pub trait StatusSink: Send + Sync {
    fn emit(&self, view: StatusView);
}

/// Performs the redirect once a run finds the target reachable.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str);
}

pub struct ChannelStatusSink {
    tx: mpsc::Sender<StatusView>,
}

impl ChannelStatusSink {
    pub fn new(tx: mpsc::Sender<StatusView>) -> Self {
        Self { tx }
    }
}

impl StatusSink for ChannelStatusSink {
    fn emit(&self, view: StatusView) {
        let _ = self.tx.send(view);
    }
}
