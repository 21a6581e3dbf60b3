use crossbeam_channel::{Receiver, Sender};

/// A progress or status change emitted by a running workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusUpdate {
    /// Fraction complete in `0.0..=1.0`.
    Progress(f32),
    Message(String),
}

/// Decouples workflows from how progress reaches the user.
///
/// Workflows run on worker threads, so reporters take `&self` and must be
/// shareable across threads.
pub trait StatusReporter: Send + Sync {
    fn progress(&self, fraction: f32);

    fn status(&self, message: &str);
}

/// Reporter that discards all updates.
pub struct NullStatusReporter;

impl StatusReporter for NullStatusReporter {
    fn progress(&self, _fraction: f32) {}
    fn status(&self, _message: &str) {}
}

/// Forwards updates to the control thread over a channel.
///
/// A disconnected receiver is ignored: the control thread may have shut
/// down while a detached worker keeps running.
pub struct ChannelStatusReporter {
    tx: Sender<StatusUpdate>,
}

impl ChannelStatusReporter {
    pub fn new() -> (Self, Receiver<StatusUpdate>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl StatusReporter for ChannelStatusReporter {
    fn progress(&self, fraction: f32) {
        let _ = self.tx.send(StatusUpdate::Progress(fraction.clamp(0.0, 1.0)));
    }

    fn status(&self, message: &str) {
        log::info!("{message}");
        let _ = self.tx.send(StatusUpdate::Message(message.to_string()));
    }
}
