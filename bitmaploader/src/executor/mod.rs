//! Execution pools for fetch and read work.
//!
//! ```text
//! ┌────────────┐  submit   ┌──────────────────────────────────────┐
//! │ ImageSlot  │ ────────► │ ExecutionPool (Network | DiskIO)     │
//! │            │           │  semaphore ─► tokio task ─► registry │
//! │ WeakTask-  │ ◄──────── │  TaskHandle (owning, kept by pool)   │
//! │ Handle     │ downgrade └──────────────────────────────────────┘
//! └────────────┘
//! ```
//!
//! # Cancellation
//!
//! Cancellation is advisory. A queued task that is cancelled never starts; a
//! running task observes the request through its [`TaskContext`], and with
//! `may_interrupt` its future is dropped at the next suspension point. Work
//! that is already past its last await point runs to completion.

mod context;
mod handle;
mod resource_pool;

pub use context::TaskContext;
pub use handle::{TaskHandle, TaskId, TaskStatus, WeakTaskHandle};
pub use resource_pool::{
    ExecutionPool, ResourceType, DEFAULT_DISK_IO_CAPACITY, DEFAULT_NETWORK_CAPACITY,
};
