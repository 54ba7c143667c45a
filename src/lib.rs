//! shape-priority - Dependency-aware task priority recalculation
//!
//! Tasks carry an integer priority and a list of tasks they depend on. The
//! [`PriorityEngine`] runs a fixed pipeline of stages over a task set,
//! raising the priority of work that unblocks other work, aging stale tasks
//! and finally making every priority distinct.

pub mod cli;
pub mod domain;
pub mod priority;
pub mod storage;

pub use domain::{PriorityAdjustment, Task, TaskId, TaskStatus};
pub use priority::{
    analyze_dependencies, priority_statistics, DependencyAnalysis, PriorityConfig, PriorityEngine,
    PriorityStatistics,
};
