//! Store adapter for the command-line front end.
//!
//! Bridges the store's side-effects to the presenter, which runs outside
//! the dispatcher task.

use catalog_engine::{SideEffect, SideEffectSink};
use tokio::sync::mpsc;
use tracing::debug;

/// A side-effect sink that logs each effect and forwards it to the presenter.
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<SideEffect>,
}

impl ChannelSink {
    /// Creates the sink and the receiving end the presenter drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SideEffect>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl std::fmt::Debug for ChannelSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelSink").finish_non_exhaustive()
    }
}

impl SideEffectSink for ChannelSink {
    fn emit(&self, effect: SideEffect) {
        match &effect {
            SideEffect::RecordAdded { record_id, changes } => {
                debug!(record_id = %record_id, ops = changes.len(), "record added");
            }
            SideEffect::RecordReplaced { record_id, changes } => {
                debug!(record_id = %record_id, ops = changes.len(), "record replaced");
            }
            SideEffect::RecordDeleted { record_id, changes } => {
                debug!(record_id = %record_id, ops = changes.len(), "record deleted");
            }
            SideEffect::LayoutChanged { transition } => {
                debug!(from = %transition.from, to = %transition.to, "layout changed");
            }
        }

        if self.sender.send(effect).is_err() {
            debug!("presenter is gone, side-effect dropped");
        }
    }
}
