use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::result_slot::{Readiness, ResultSlot};
use super::task::{TaskFailure, TaskId, TaskState, WorkResult};
use super::task_context::{OrchestratorState, TaskContext};

type CompleteFn<T> = Box<dyn FnOnce(T, &OrchestratorState)>;
type ErrorFn = Box<dyn FnOnce(&TaskFailure, &OrchestratorState)>;

/// Outcome of a shutdown pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CancelReport {
    /// Tasks that reached a terminal state within the timeout.
    pub finished: usize,
    /// Descriptions of tasks left running on their detached threads.
    pub abandoned: Vec<String>,
}

/// Type-erased queue entry so tasks with different result types share one queue.
trait QueuedTask {
    fn id(&self) -> TaskId;
    fn description(&self) -> &str;
    fn state(&self) -> TaskState;
    /// Delivers the outcome if ready. Returns false, without side effects, if not.
    fn try_deliver(&mut self, state: &OrchestratorState) -> bool;
    fn wait(&self, timeout: Duration) -> bool;
}

struct TaskEntry<T> {
    id: TaskId,
    description: Arc<str>,
    slot: Arc<ResultSlot<T>>,
    on_complete: Option<CompleteFn<T>>,
    on_error: Option<ErrorFn>,
}

impl<T> QueuedTask for TaskEntry<T> {
    fn id(&self) -> TaskId {
        self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn state(&self) -> TaskState {
        self.slot.state()
    }

    fn try_deliver(&mut self, state: &OrchestratorState) -> bool {
        let outcome = match self.slot.try_take() {
            Readiness::Ready(outcome) => outcome,
            Readiness::NotReady => return false,
        };

        match outcome {
            Ok(value) => {
                log::info!("Task completed: {}", self.description);
                if let Some(callback) = self.on_complete.take() {
                    callback(value, state);
                }
            }
            Err(failure) => {
                if failure.is_cancelled() {
                    log::info!("Task cancelled: {}", self.description);
                } else {
                    log::error!("Task '{}' failed: {failure}", self.description);
                }
                if let Some(callback) = self.on_error.take() {
                    callback(&failure, state);
                }
            }
        }
        true
    }

    fn wait(&self, timeout: Duration) -> bool {
        self.slot.wait_timeout(timeout)
    }
}

/// Runs each submitted unit of work on its own thread and delivers the
/// callbacks on the thread that calls [`poll`](Self::poll), strictly in
/// submission order.
///
/// The orchestrator is meant to be owned by a single control thread. Work
/// closures must be `Send`; callbacks need not be, since they never leave
/// the control thread.
pub struct TaskOrchestrator {
    queue: VecDeque<Box<dyn QueuedTask>>,
    next_id: u64,
    state: Arc<OrchestratorState>,
}

impl TaskOrchestrator {
    pub fn new() -> Self {
        Self::with_state(Arc::new(OrchestratorState::new()))
    }

    pub fn with_state(state: Arc<OrchestratorState>) -> Self {
        Self {
            queue: VecDeque::new(),
            next_id: 1,
            state,
        }
    }

    pub fn state(&self) -> &Arc<OrchestratorState> {
        &self.state
    }

    /// Queues a task and starts `work` immediately on a fresh worker thread.
    ///
    /// Failures returned by `work`, and panics inside it, are routed to
    /// `on_error` with a normalized message during a later `poll`.
    pub fn submit<T, W, C, E>(
        &mut self,
        description: impl Into<String>,
        work: W,
        on_complete: C,
        on_error: E,
    ) -> TaskId
    where
        T: Send + 'static,
        W: FnOnce(&TaskContext) -> WorkResult<T> + Send + 'static,
        C: FnOnce(T, &OrchestratorState) + 'static,
        E: FnOnce(&TaskFailure, &OrchestratorState) + 'static,
    {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        let description: Arc<str> = Arc::from(description.into());
        let slot = Arc::new(ResultSlot::new());
        let ctx = TaskContext::new(id, description.clone(), self.state.cancel_token());
        let worker_slot = slot.clone();

        let spawned = thread::Builder::new()
            .name(format!("task-{}", id.0))
            .spawn(move || {
                worker_slot.mark_running();
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| work(&ctx)))
                    .unwrap_or_else(|payload| Err(TaskFailure::failed(panic_message(&*payload))));
                worker_slot.fill(outcome);
            });

        match spawned {
            Ok(_detached) => log::debug!("Task {id} started: {description}"),
            Err(e) => {
                log::error!("Could not start worker for '{description}': {e}");
                slot.fill(Err(TaskFailure::failed(format!(
                    "Could not start background work: {e}"
                ))));
            }
        }

        self.queue.push_back(Box::new(TaskEntry {
            id,
            description,
            slot,
            on_complete: Some(Box::new(on_complete)),
            on_error: Some(Box::new(on_error)),
        }));

        id
    }

    /// Delivers callbacks for finished tasks at the head of the queue.
    ///
    /// Stops at the first task that is not ready, even if later tasks are.
    /// Never blocks. Returns the number of callbacks delivered.
    pub fn poll(&mut self) -> usize {
        let mut delivered = 0;
        while let Some(head) = self.queue.front_mut() {
            if !head.try_deliver(&self.state) {
                break;
            }
            self.queue.pop_front();
            delivered += 1;
        }
        delivered
    }

    /// Requests cooperative cancellation and drains the queue.
    ///
    /// Each task gets up to `per_task_timeout` to reach a terminal state;
    /// tasks that do not are abandoned on their detached thread. No callbacks
    /// are delivered. Busy flags are cleared afterwards and later tasks get a
    /// fresh cancellation token; abandoned tasks keep observing the old one.
    pub fn cancel_all(&mut self, per_task_timeout: Duration) -> CancelReport {
        log::info!("Cancelling {} queued task(s)...", self.queue.len());
        self.state.request_cancel();

        let mut report = CancelReport::default();
        while let Some(task) = self.queue.pop_front() {
            log::debug!("Waiting for task {}: {}", task.id(), task.description());
            if task.wait(per_task_timeout) {
                report.finished += 1;
            } else {
                log::warn!(
                    "Task '{}' did not complete within {:?}, abandoning it",
                    task.description(),
                    per_task_timeout
                );
                report.abandoned.push(task.description().to_string());
            }
        }

        self.state.reset();
        log::info!("All tasks cancelled/completed.");
        report
    }

    /// Current state of a queued task; `None` once its callback was delivered.
    pub fn task_state(&self, id: TaskId) -> Option<TaskState> {
        self.queue
            .iter()
            .find(|task| task.id() == id)
            .map(|task| task.state())
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for TaskOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unknown error".to_string()
    }
}
