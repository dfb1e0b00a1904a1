//! Task pool subsystem.
//!
//! # Data Flow
//! ```text
//! submit(task)
//!     → FIFO queue (single short critical section)
//!     → worker loop (fixed set of workers racing for the head)
//!     → task executes, counters settle
//!     → wait_idle observers woken once pending == 0 && in_flight == 0
//!
//! shutdown()
//!     → flag set, all waiting workers woken
//!     → every worker joined
//!     → queued-but-unstarted tasks dropped unexecuted
//! ```
//!
//! # Design Decisions
//! - Two counters, not one: "queue empty" does not prove completion, a
//!   task can be dequeued yet still running
//! - The queue lock covers O(1) pointer work only, never task execution
//! - Execution order across workers is unspecified; enqueue order only
//!   establishes eligibility order

pub mod task_pool;

pub use task_pool::{PoolError, Task, TaskPool};
