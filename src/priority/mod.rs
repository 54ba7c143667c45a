//! # Priority Recalculation
//!
//! Computes task priorities from dependency structure, age and heuristics.
//!
//! ## Pipeline
//!
//! | Stage | Module | Default |
//! |-------|--------|---------|
//! | Dependency boost | [`dependency`] | on |
//! | Priority inheritance | [`inheritance`] | on |
//! | Blocking task boost | [`blocking`] | on |
//! | Critical path boost | [`critical_path`] | on |
//! | Cascade | [`cascade`] | on |
//! | Time decay | [`decay`] | off |
//! | Effort weighting | [`effort`] | off |
//! | Uniqueness | [`uniqueness`] | on |
//! | Distribution | [`distribution`] | on |
//!
//! Each stage is a function from a [`StageContext`] to a list of
//! [`PriorityAdjustment`]s. It never touches the tasks itself; the
//! [`PriorityEngine`] applies each stage's adjustments before running the
//! next one, so later stages see earlier results.
//!
//! Nothing here does I/O. Cycles and dangling dependencies are tolerated.
//!
//! [`analysis`] and [`stats`] report on a task set without changing it.

pub mod analysis;
pub mod blocking;
pub mod cascade;
pub mod config;
pub mod critical_path;
pub mod decay;
pub mod dependency;
pub mod distribution;
pub mod effort;
mod engine;
pub mod inheritance;
pub mod stats;
pub mod uniqueness;

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::{DependencyGraph, PriorityAdjustment, Task, TaskId};

pub use analysis::{analyze_dependencies, BlockingTask, DependencyAnalysis};
pub use config::{DecayModel, PriorityBounds, PriorityConfig};
pub use engine::{PriorityEngine, Recalculation};
pub use stats::{priority_statistics, PriorityStatistics};

#[derive(Debug, Error, PartialEq)]
pub enum PriorityError {
    #[error("{tasks} tasks do not fit in {slots} distinct priority values")]
    CapacityExceeded { tasks: usize, slots: usize },
}

/// Checks that every task can receive a distinct priority
///
/// The uniqueness stage cannot succeed beyond this limit, so callers should
/// check before running a pass.
pub fn check_capacity(task_count: usize, config: &PriorityConfig) -> Result<(), PriorityError> {
    let slots = config.bounds.space_size();
    if task_count > slots {
        return Err(PriorityError::CapacityExceeded {
            tasks: task_count,
            slots,
        });
    }
    Ok(())
}

/// Read-only inputs shared by every stage
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    pub tasks: &'a [Task],
    pub graph: &'a DependencyGraph,
    pub config: &'a PriorityConfig,
    pub now: DateTime<Utc>,
}

impl<'a> StageContext<'a> {
    pub fn new(
        tasks: &'a [Task],
        graph: &'a DependencyGraph,
        config: &'a PriorityConfig,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            tasks,
            graph,
            config,
            now,
        }
    }

    /// Looks up a task through the graph's index
    pub fn task(&self, id: &TaskId) -> Option<&'a Task> {
        self.graph.position(id).and_then(|idx| self.tasks.get(idx))
    }

    /// Snapshot of current priorities, used as a stage's working copy
    pub fn priorities(&self) -> BTreeMap<TaskId, u32> {
        self.tasks.iter().map(|t| (t.id, t.priority)).collect()
    }

    /// Returns true if the task exists and is done
    pub fn is_done(&self, id: &TaskId) -> bool {
        self.task(id).map(Task::is_complete).unwrap_or(false)
    }
}

/// Writes each adjustment's `new_priority` onto its task, in order
pub fn apply_adjustments(tasks: &mut [Task], adjustments: &[PriorityAdjustment]) {
    let index: BTreeMap<TaskId, usize> = tasks
        .iter()
        .enumerate()
        .map(|(idx, t)| (t.id, idx))
        .collect();

    for adj in adjustments {
        if let Some(task) = index.get(&adj.task_id).and_then(|idx| tasks.get_mut(*idx)) {
            task.priority = adj.new_priority;
        }
    }
}

/// Ordering used wherever ties must be broken: priority descending, then
/// oldest first, then lowest ID
///
/// A task without a creation time counts as created at the Unix epoch, so
/// it sorts before every dated task.
pub(crate) fn rank_order(a: &Task, b: &Task) -> Ordering {
    let created = |t: &Task| t.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    b.priority
        .cmp(&a.priority)
        .then_with(|| created(a).cmp(&created(b)))
        .then_with(|| a.id.cmp(&b.id))
}
