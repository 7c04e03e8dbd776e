//! Task handles for status queries and cancellation.
//!
//! [`TaskHandle`] is the owning side: the pool's registry holds one for every
//! live task. [`WeakTaskHandle`] is what a slot keeps for its current request.
//! It can ask for cancellation while the task is alive but never keeps it
//! alive; once the task finishes and leaves the registry, cancelling through a
//! weak handle is a no-op.
//!
//! # Example
//!
//! ```ignore
//! let handle = pool.submit("load", |ctx| async move { /* ... */ });
//! let weak = handle.downgrade();
//! drop(handle);
//!
//! // Still cancellable while the pool is running it
//! weak.cancel(true);
//! ```

use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tokio_util::sync::CancellationToken;

/// Unique identifier for a submitted task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Task execution status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TaskStatus {
    /// Waiting for a pool permit.
    #[default]
    Queued,

    /// Work is executing.
    Running,

    /// Work ran to the end.
    Completed,

    /// Cancelled before it started, or interrupted while running.
    Cancelled,
}

impl TaskStatus {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "Queued"),
            Self::Running => write!(f, "Running"),
            Self::Completed => write!(f, "Completed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Shared state behind a task's handles.
pub(crate) struct TaskCell {
    id: TaskId,
    name: String,
    status: Mutex<TaskStatus>,
    /// Advisory: visible to the work through its context
    cancellation: CancellationToken,
    /// Drops the running future at its next await point
    interrupt: CancellationToken,
}

impl TaskCell {
    pub(crate) fn new(id: TaskId, name: String) -> Self {
        Self {
            id,
            name,
            status: Mutex::new(TaskStatus::Queued),
            cancellation: CancellationToken::new(),
            interrupt: CancellationToken::new(),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub(crate) fn interrupt(&self) -> &CancellationToken {
        &self.interrupt
    }

    pub(crate) fn set_status(&self, status: TaskStatus) {
        let mut current = self.status.lock();
        if !current.is_terminal() {
            *current = status;
        }
    }
}

/// Owning handle to a submitted task.
#[derive(Clone)]
pub struct TaskHandle {
    cell: Arc<TaskCell>,
}

impl TaskHandle {
    pub(crate) fn new(cell: Arc<TaskCell>) -> Self {
        Self { cell }
    }

    /// Returns the task's unique identifier.
    pub fn id(&self) -> TaskId {
        self.cell.id
    }

    /// Returns the name given at submission.
    pub fn name(&self) -> &str {
        &self.cell.name
    }

    /// Returns the current task status.
    pub fn status(&self) -> TaskStatus {
        *self.cell.status.lock()
    }

    /// Returns true once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cell.cancellation.is_cancelled()
    }

    /// Request cancellation.
    ///
    /// A queued task will not start. A running task sees the request through
    /// [`TaskContext::is_cancelled`](super::TaskContext::is_cancelled); with
    /// `may_interrupt` it is also dropped at its next suspension point.
    /// Returns false if the task had already finished.
    pub fn cancel(&self, may_interrupt: bool) -> bool {
        if self.status().is_terminal() {
            return false;
        }
        self.cell.cancellation.cancel();
        if may_interrupt {
            self.cell.interrupt.cancel();
        }
        true
    }

    /// Create a non-owning handle to the same task.
    pub fn downgrade(&self) -> WeakTaskHandle {
        WeakTaskHandle {
            id: self.cell.id,
            cell: Arc::downgrade(&self.cell),
        }
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("status", &self.status())
            .finish()
    }
}

/// Non-owning handle to a submitted task.
#[derive(Clone, Debug)]
pub struct WeakTaskHandle {
    id: TaskId,
    cell: Weak<TaskCell>,
}

impl WeakTaskHandle {
    /// Identifier of the task this handle pointed at.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Resolve to an owning handle if the task is still alive somewhere.
    pub fn upgrade(&self) -> Option<TaskHandle> {
        self.cell.upgrade().map(TaskHandle::new)
    }

    /// Returns true if the task is still held by its pool.
    pub fn is_alive(&self) -> bool {
        self.cell.strong_count() > 0
    }

    /// Request cancellation if the task is still alive.
    ///
    /// Returns false when the task is gone or already finished.
    pub fn cancel(&self, may_interrupt: bool) -> bool {
        self.upgrade()
            .map(|handle| handle.cancel(may_interrupt))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> TaskHandle {
        TaskHandle::new(Arc::new(TaskCell::new(TaskId(7), "test".to_string())))
    }

    #[test]
    fn test_task_status_is_terminal() {
        assert!(!TaskStatus::Queued.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_task_status_default_and_display() {
        assert_eq!(TaskStatus::default(), TaskStatus::Queued);
        assert_eq!(format!("{}", TaskStatus::Running), "Running");
        assert_eq!(format!("{}", TaskId(3)), "task-3");
    }

    #[test]
    fn test_cancel_sets_tokens() {
        let handle = handle();
        assert!(handle.cancel(false));
        assert!(handle.is_cancelled());
        assert!(!handle.cell.interrupt().is_cancelled());

        assert!(handle.cancel(true));
        assert!(handle.cell.interrupt().is_cancelled());
    }

    #[test]
    fn test_cancel_after_completion_is_noop() {
        let handle = handle();
        handle.cell.set_status(TaskStatus::Completed);

        assert!(!handle.cancel(true));
        assert!(!handle.is_cancelled());
    }

    #[test]
    fn test_terminal_status_is_sticky() {
        let handle = handle();
        handle.cell.set_status(TaskStatus::Cancelled);
        handle.cell.set_status(TaskStatus::Completed);
        assert_eq!(handle.status(), TaskStatus::Cancelled);
    }

    #[test]
    fn test_weak_handle_does_not_keep_task_alive() {
        let handle = handle();
        let weak = handle.downgrade();

        assert!(weak.is_alive());
        assert_eq!(weak.id(), TaskId(7));

        drop(handle);

        assert!(!weak.is_alive());
        assert!(weak.upgrade().is_none());
        assert!(!weak.cancel(true));
    }

    #[test]
    fn test_weak_handle_cancels_live_task() {
        let handle = handle();
        let weak = handle.downgrade();

        assert!(weak.cancel(true));
        assert!(handle.is_cancelled());
    }
}
