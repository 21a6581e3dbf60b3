use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::task::{TaskFailure, TaskId, WorkResult};

/// Class of work, used for the caller-side "one active at a time" convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Scan,
    Process,
}

/// Flags owned by the orchestrator and handed explicitly to work and callbacks.
///
/// Cancellation is per generation: every task captures the token current
/// at submission, and a shutdown pass sets that token and installs a fresh
/// one. Abandoned tasks therefore stay cancelled while later submissions
/// start clean. The busy flags are not enforced by the queue; callers claim
/// them with [`try_begin`] before submitting and release them from their
/// callbacks.
///
/// [`try_begin`]: OrchestratorState::try_begin
#[derive(Debug, Default)]
pub struct OrchestratorState {
    scanning: AtomicBool,
    processing: AtomicBool,
    cancel_token: Mutex<Arc<AtomicBool>>,
}

impl OrchestratorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the busy flag for `kind`. Returns false if it was already held.
    pub fn try_begin(&self, kind: TaskKind) -> bool {
        self.flag(kind)
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn finish(&self, kind: TaskKind) {
        self.flag(kind).store(false, Ordering::Release);
    }

    pub fn is_busy(&self, kind: TaskKind) -> bool {
        self.flag(kind).load(Ordering::Acquire)
    }

    /// Whether the current generation has been cancelled.
    pub fn cancel_requested(&self) -> bool {
        self.cancel_token().load(Ordering::Acquire)
    }

    /// Token for work submitted now.
    pub(crate) fn cancel_token(&self) -> Arc<AtomicBool> {
        self.cancel_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn request_cancel(&self) {
        self.cancel_token().store(true, Ordering::Release);
    }

    /// Clears busy flags and starts a new cancellation generation after a
    /// shutdown pass. Tokens already handed out keep their cancelled state.
    pub(crate) fn reset(&self) {
        self.scanning.store(false, Ordering::Release);
        self.processing.store(false, Ordering::Release);
        *self
            .cancel_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(AtomicBool::new(false));
    }

    fn flag(&self, kind: TaskKind) -> &AtomicBool {
        match kind {
            TaskKind::Scan => &self.scanning,
            TaskKind::Process => &self.processing,
        }
    }
}

/// Anything a long-running stage can ask "should I stop?".
pub trait CancellationProbe {
    fn is_cancelled(&self) -> bool;
}

/// Probe for callers running outside the orchestrator.
pub struct NeverCancelled;

impl CancellationProbe for NeverCancelled {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Handle given to a task's work closure on its worker thread.
#[derive(Clone)]
pub struct TaskContext {
    id: TaskId,
    description: Arc<str>,
    cancelled: Arc<AtomicBool>,
}

impl TaskContext {
    pub(crate) fn new(id: TaskId, description: Arc<str>, cancelled: Arc<AtomicBool>) -> Self {
        Self {
            id,
            description,
            cancelled,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Stage boundary: fails with [`TaskFailure::Cancelled`] once shutdown began.
    pub fn checkpoint(&self, stage: &str) -> WorkResult<()> {
        if self.is_cancelled() {
            log::info!("Task '{}' cancelled before {stage}", self.description);
            return Err(TaskFailure::Cancelled);
        }
        Ok(())
    }
}

impl CancellationProbe for TaskContext {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
