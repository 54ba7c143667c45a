//! Domain models for shape-priority
//!
//! Contains the task model, the dependency graph and adjustment records,
//! without any I/O concerns.

mod id;
mod task;
mod graph;
mod adjustment;

pub use id::{TaskId, IdError};
pub use task::{Task, TaskStatus, DEFAULT_PRIORITY};
pub use graph::DependencyGraph;
pub use adjustment::{AdjustmentKind, PriorityAdjustment};
