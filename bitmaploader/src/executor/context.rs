//! Execution context handed to task bodies.

use super::handle::TaskId;
use tokio_util::sync::CancellationToken;

/// Context passed to every task submitted to an [`ExecutionPool`](super::ExecutionPool).
///
/// Cancellation is cooperative: long-running work should check
/// [`is_cancelled`](Self::is_cancelled) between phases and stop early.
#[derive(Clone, Debug)]
pub struct TaskContext {
    id: TaskId,
    cancellation: CancellationToken,
}

impl TaskContext {
    pub(crate) fn new(id: TaskId, cancellation: CancellationToken) -> Self {
        Self { id, cancellation }
    }

    /// Identifier of the running task.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Returns true if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Resolves once cancellation is requested.
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await
    }
}
