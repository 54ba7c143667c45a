//! Critical path analysis
//!
//! Enumerates every root-to-leaf chain through dependents and scores it:
//!
//! ```text
//! score = (avg_priority / max_priority) * incomplete_fraction * min(1, len / 10)
//! ```
//!
//! Non-done tasks on a path scoring at least the threshold are boosted by
//! `round(boost * score)`. A task on several critical paths is boosted once
//! per path.
//!
//! Paths are enumerated per root with no sharing between roots, so wide
//! diamond-shaped graphs produce many paths. Enumeration stops at
//! `max_paths` with a warning.

use std::collections::BTreeMap;
use tracing::warn;

use crate::domain::{AdjustmentKind, PriorityAdjustment, TaskId};

use super::StageContext;

/// Path length at which the length factor saturates
const FULL_LENGTH: f64 = 10.0;

/// A root-to-leaf chain and its score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPath {
    pub tasks: Vec<TaskId>,
    pub score: f64,
}

/// All root-to-leaf paths along dependent edges, up to `max_paths`
///
/// A path ends at a task with no dependents. A branch whose only way on is
/// back into a task already on the path is a cycle and yields no path.
pub fn enumerate_paths(ctx: &StageContext) -> Vec<Vec<TaskId>> {
    let max_paths = ctx.config.critical_path.max_paths;
    let mut paths = Vec::new();

    for root in ctx.graph.roots() {
        let mut stack: Vec<Vec<TaskId>> = vec![vec![root]];

        while let Some(path) = stack.pop() {
            if paths.len() >= max_paths {
                warn!(max_paths, "Critical path enumeration hit the path limit, stopping early");
                return paths;
            }

            let Some(last) = path.last() else {
                continue;
            };
            let next: Vec<TaskId> = ctx
                .graph
                .dependents(last)
                .filter(|d| !path.contains(d))
                .collect();

            if next.is_empty() {
                if ctx.graph.dependent_count(last) == 0 {
                    paths.push(path);
                }
                continue;
            }

            // Reverse so the lowest ID is explored first
            for dependent in next.into_iter().rev() {
                let mut extended = path.clone();
                extended.push(dependent);
                stack.push(extended);
            }
        }
    }

    paths
}

/// Scores a path using the given priorities
pub fn score_path(ctx: &StageContext, path: &[TaskId], priorities: &BTreeMap<TaskId, u32>) -> f64 {
    if path.is_empty() {
        return 0.0;
    }

    let len = path.len() as f64;
    let total: f64 = path
        .iter()
        .map(|id| f64::from(priorities.get(id).copied().unwrap_or(0)))
        .sum();
    let incomplete = path.iter().filter(|id| !ctx.is_done(id)).count() as f64;

    let max_priority = f64::from(ctx.config.bounds.max_priority.max(1));
    let avg_factor = (total / len) / max_priority;
    let incomplete_fraction = incomplete / len;
    let length_factor = (len / FULL_LENGTH).min(1.0);

    avg_factor * incomplete_fraction * length_factor
}

/// Paths whose score reaches the configured threshold
pub fn critical_paths(ctx: &StageContext) -> Vec<ScoredPath> {
    let threshold = ctx.config.critical_path.threshold;
    let priorities = ctx.priorities();

    enumerate_paths(ctx)
        .into_iter()
        .map(|tasks| {
            let score = score_path(ctx, &tasks, &priorities);
            ScoredPath { tasks, score }
        })
        .filter(|path| path.score >= threshold)
        .collect()
}

/// Boosts incomplete tasks on critical paths
pub fn boost_critical_paths(ctx: &StageContext) -> Vec<PriorityAdjustment> {
    let cfg = &ctx.config.critical_path;
    let bounds = &ctx.config.bounds;
    let mut working = ctx.priorities();
    let mut adjustments = Vec::new();

    for path in critical_paths(ctx) {
        let boost = (cfg.boost * path.score).round() as i64;
        if boost <= 0 {
            continue;
        }

        for id in &path.tasks {
            if ctx.is_done(id) {
                continue;
            }

            let current = working.get(id).copied().unwrap_or(bounds.min_priority);
            let new_priority = bounds.clamp(i64::from(current) + boost);
            if new_priority == current {
                continue;
            }

            working.insert(*id, new_priority);
            adjustments.push(PriorityAdjustment::new(
                *id,
                AdjustmentKind::CriticalPathBoost {
                    path_score: path.score,
                    path_length: path.tasks.len(),
                },
                current,
                new_priority,
                format!(
                    "On critical path of {} task(s) (score {:.2})",
                    path.tasks.len(),
                    path.score
                ),
            ));
        }
    }

    adjustments
}
