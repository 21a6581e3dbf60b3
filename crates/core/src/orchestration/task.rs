use std::fmt;

use thiserror::Error;

use crate::shared::provider_error::ProviderError;

/// Identifier assigned to a task at submission, increasing in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Cancelled
        )
    }
}

/// Why a unit of work did not produce a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskFailure {
    #[error("Cancelled")]
    Cancelled,
    #[error("{0}")]
    Failed(String),
}

impl TaskFailure {
    /// Builds a failure with a short, single-line, human-readable message.
    pub fn failed(message: impl fmt::Display) -> Self {
        Self::Failed(normalize_message(&message.to_string()))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TaskFailure::Cancelled)
    }

    pub(crate) fn terminal_state(&self) -> TaskState {
        match self {
            TaskFailure::Cancelled => TaskState::Cancelled,
            TaskFailure::Failed(_) => TaskState::Failed,
        }
    }
}

impl From<ProviderError> for TaskFailure {
    fn from(err: ProviderError) -> Self {
        Self::failed(err)
    }
}

impl From<String> for TaskFailure {
    fn from(message: String) -> Self {
        Self::failed(message)
    }
}

impl From<&str> for TaskFailure {
    fn from(message: &str) -> Self {
        Self::failed(message)
    }
}

pub type WorkResult<T> = Result<T, TaskFailure>;

/// Keeps the first non-empty line, trimmed; blank input becomes "Unknown error".
pub(crate) fn normalize_message(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "Unknown error".to_string())
}
