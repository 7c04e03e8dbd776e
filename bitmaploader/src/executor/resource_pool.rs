//! Execution pools for network and disk work.
//!
//! Each pool is a semaphore-bounded set of tokio tasks. Slots never block on
//! I/O themselves; they submit work to the pool matching the tier they chose
//! and keep only a weak handle to it.
//!
//! # Resource Types
//!
//! - [`ResourceType::Network`]: HTTP fetches
//! - [`ResourceType::DiskIO`]: reads from the disk cache
//!
//! # Example
//!
//! ```ignore
//! use bitmaploader::executor::{ExecutionPool, ResourceType};
//!
//! let pool = ExecutionPool::new(ResourceType::Network, 8);
//! let handle = pool.submit("fetch", |ctx| async move {
//!     if ctx.is_cancelled() {
//!         return;
//!     }
//!     // ... network work ...
//! });
//! ```

use super::context::TaskContext;
use super::handle::{TaskCell, TaskHandle, TaskId, TaskStatus};
use dashmap::DashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::trace;

/// Default network pool capacity (concurrent HTTP fetches).
pub const DEFAULT_NETWORK_CAPACITY: usize = 8;

/// Default disk pool capacity (concurrent cache reads).
pub const DEFAULT_DISK_IO_CAPACITY: usize = 4;

/// Kind of work a pool executes.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ResourceType {
    /// Network I/O (HTTP connections).
    Network,

    /// Disk I/O (file reads).
    DiskIO,
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "Network"),
            Self::DiskIO => write!(f, "DiskIO"),
        }
    }
}

struct PoolInner {
    resource_type: ResourceType,
    capacity: usize,
    semaphore: Arc<Semaphore>,
    /// Owning side of every live task's handle
    registry: DashMap<TaskId, Arc<TaskCell>>,
    next_id: AtomicU64,
    submitted: AtomicU64,
}

impl PoolInner {
    fn set_status(&self, id: TaskId, status: TaskStatus) {
        if let Some(cell) = self.registry.get(&id) {
            cell.set_status(status);
        }
    }

    fn finish(&self, id: TaskId, status: TaskStatus) {
        if let Some((_, cell)) = self.registry.remove(&id) {
            cell.set_status(status);
        }
        trace!(pool = %self.resource_type, task = %id, %status, "Task finished");
    }
}

/// A bounded pool of asynchronous workers.
///
/// Cloning is cheap; clones share the same capacity and registry. Submitting
/// requires a running tokio runtime.
#[derive(Clone)]
pub struct ExecutionPool {
    inner: Arc<PoolInner>,
}

impl ExecutionPool {
    /// Creates a pool running at most `capacity` tasks at once.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(resource_type: ResourceType, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(PoolInner {
                resource_type,
                capacity,
                semaphore: Arc::new(Semaphore::new(capacity)),
                registry: DashMap::new(),
                next_id: AtomicU64::new(0),
                submitted: AtomicU64::new(0),
            }),
        }
    }

    /// Submit work to the pool.
    ///
    /// The work starts once a permit is free. The returned handle is owning;
    /// the pool keeps its own reference until the work ends, so callers may
    /// drop it or keep only a [`WeakTaskHandle`](super::WeakTaskHandle).
    pub fn submit<F, Fut>(&self, name: impl Into<String>, work: F) -> TaskHandle
    where
        F: FnOnce(TaskContext) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let id = TaskId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let cell = Arc::new(TaskCell::new(id, name.into()));
        self.inner.registry.insert(id, Arc::clone(&cell));
        self.inner.submitted.fetch_add(1, Ordering::Relaxed);

        let ctx = TaskContext::new(id, cell.cancellation().clone());
        let cancellation = cell.cancellation().clone();
        let interrupt = cell.interrupt().clone();
        let inner = Arc::clone(&self.inner);

        trace!(pool = %inner.resource_type, task = %id, name = cell.name(), "Task submitted");

        tokio::spawn(async move {
            let permit = tokio::select! {
                biased;
                _ = cancellation.cancelled() => None,
                permit = Arc::clone(&inner.semaphore).acquire_owned() => permit.ok(),
            };

            let status = match permit {
                None => TaskStatus::Cancelled,
                Some(_permit) => {
                    inner.set_status(id, TaskStatus::Running);
                    let work = work(ctx);
                    tokio::select! {
                        biased;
                        _ = interrupt.cancelled() => TaskStatus::Cancelled,
                        _ = work => TaskStatus::Completed,
                    }
                }
            };

            inner.finish(id, status);
        });

        TaskHandle::new(cell)
    }

    /// Kind of work this pool runs.
    pub fn resource_type(&self) -> ResourceType {
        self.inner.resource_type
    }

    /// Maximum number of tasks running at once.
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Total tasks submitted since creation.
    pub fn submitted(&self) -> u64 {
        self.inner.submitted.load(Ordering::Relaxed)
    }

    /// Tasks queued or running.
    pub fn in_flight(&self) -> usize {
        self.inner.registry.len()
    }

    /// Tasks currently holding a permit.
    pub fn running(&self) -> usize {
        self.inner.capacity - self.inner.semaphore.available_permits()
    }

    /// Look up a live task by id.
    pub fn task(&self, id: TaskId) -> Option<TaskHandle> {
        self.inner
            .registry
            .get(&id)
            .map(|cell| TaskHandle::new(Arc::clone(cell.value())))
    }

    /// Request cancellation of every live task. Returns how many were signalled.
    pub fn cancel_all(&self, may_interrupt: bool) -> usize {
        let live: Vec<Arc<TaskCell>> = self
            .inner
            .registry
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        live.into_iter()
            .filter(|cell| TaskHandle::new(Arc::clone(cell)).cancel(may_interrupt))
            .count()
    }
}

impl std::fmt::Debug for ExecutionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionPool")
            .field("resource_type", &self.inner.resource_type)
            .field("capacity", &self.inner.capacity)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}
