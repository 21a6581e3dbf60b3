use std::sync::{Condvar, Mutex, PoisonError, TryLockError};
use std::time::{Duration, Instant};

use super::task::{TaskState, WorkResult};

/// Mutex-guarded exchange point between one worker and the control thread.
///
/// The worker marks itself running and later stores exactly one outcome.
/// The control thread either takes that outcome without waiting (`try_take`)
/// or, during shutdown, waits on the condvar for a bounded time.
pub(crate) struct ResultSlot<T> {
    inner: Mutex<SlotInner<T>>,
    ready: Condvar,
}

struct SlotInner<T> {
    state: TaskState,
    outcome: Option<WorkResult<T>>,
}

/// Result of a zero-wait readiness check.
pub(crate) enum Readiness<T> {
    Ready(WorkResult<T>),
    NotReady,
}

impl<T> ResultSlot<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(SlotInner {
                state: TaskState::Pending,
                outcome: None,
            }),
            ready: Condvar::new(),
        }
    }

    pub(crate) fn mark_running(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.state == TaskState::Pending {
            inner.state = TaskState::Running;
        }
    }

    /// Stores the outcome. The terminal state is set once; later calls are ignored.
    pub(crate) fn fill(&self, outcome: WorkResult<T>) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.state.is_terminal() {
            return;
        }
        inner.state = match &outcome {
            Ok(_) => TaskState::Completed,
            Err(failure) => failure.terminal_state(),
        };
        inner.outcome = Some(outcome);
        drop(inner);
        self.ready.notify_all();
    }

    /// Zero-wait check: a worker holding the lock counts as "not ready yet".
    pub(crate) fn try_take(&self) -> Readiness<T> {
        let mut inner = match self.inner.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Readiness::NotReady,
        };
        match inner.outcome.take() {
            Some(outcome) => Readiness::Ready(outcome),
            None => Readiness::NotReady,
        }
    }

    /// Blocks up to `timeout` for a terminal state. Returns true if one was reached.
    pub(crate) fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if inner.state.is_terminal() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .ready
                .wait_timeout(inner, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            inner = guard;
        }
    }

    pub(crate) fn state(&self) -> TaskState {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .state
    }
}
