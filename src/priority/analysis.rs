//! Dependency analysis
//!
//! Read-only summary of a task set's dependency structure, for diagnostics
//! and reports. Uses the same graph, path enumeration and blocking rules as
//! the recalculation stages but never changes a task.
//!
//! `critical_path_count` is the number of root-to-leaf paths, whatever their
//! score. Blocking tasks are reported whether or not they are done.

use chrono::Utc;
use serde::Serialize;

use crate::domain::{DependencyGraph, Task, TaskId};

use super::blocking::blocked_tasks;
use super::config::PriorityConfig;
use super::critical_path::enumerate_paths;
use super::StageContext;

/// A task holding up many incomplete tasks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockingTask {
    pub task_id: TaskId,
    pub title: String,
    pub blocked_count: usize,
}

/// Summary of the dependency structure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyAnalysis {
    pub total_tasks: usize,
    pub tasks_with_dependencies: usize,
    pub root_tasks: usize,
    pub leaf_tasks: usize,
    pub critical_path_count: usize,
    pub longest_path_length: usize,
    pub blocking_tasks: Vec<BlockingTask>,
    pub circular_dependencies: Vec<Vec<TaskId>>,
}

/// Analyzes the dependency structure of a task set
pub fn analyze_dependencies(tasks: &[Task], config: &PriorityConfig) -> DependencyAnalysis {
    let graph = DependencyGraph::from_tasks(tasks);
    let ctx = StageContext::new(tasks, &graph, config, Utc::now());

    let paths = enumerate_paths(&ctx);
    let longest_path_length = paths.iter().map(Vec::len).max().unwrap_or(0);

    let threshold = config.blocking.threshold;
    let mut blocking_tasks: Vec<BlockingTask> = tasks
        .iter()
        .filter_map(|task| {
            let blocked_count = blocked_tasks(&ctx, &task.id).len();
            (blocked_count >= threshold && blocked_count > 0).then(|| BlockingTask {
                task_id: task.id,
                title: task.title.clone(),
                blocked_count,
            })
        })
        .collect();
    blocking_tasks.sort_by(|a, b| {
        b.blocked_count
            .cmp(&a.blocked_count)
            .then_with(|| a.task_id.cmp(&b.task_id))
    });

    DependencyAnalysis {
        total_tasks: tasks.len(),
        tasks_with_dependencies: tasks.iter().filter(|t| !t.depends_on.is_empty()).count(),
        root_tasks: graph.roots().len(),
        leaf_tasks: graph.leaves().len(),
        critical_path_count: paths.len(),
        longest_path_length,
        blocking_tasks,
        circular_dependencies: graph.cycles(),
    }
}
