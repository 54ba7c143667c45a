//! Priority inheritance
//!
//! A prerequisite of an urgent task inherits part of that urgency. The
//! inherited value is the highest priority reachable through dependents,
//! decayed by `decay_factor` per hop:
//!
//! ```text
//! inherited(t) = max over dependents d of max(p(d), inherited(d)) * decay_factor
//! ```
//!
//! Tasks are visited in topological order. Raises made earlier in the pass
//! are visible to later evaluations. Done tasks are raised like any other,
//! so their priority keeps reflecting what waits on them.

use std::collections::{BTreeMap, HashSet};

use crate::domain::{AdjustmentKind, PriorityAdjustment, TaskId};

use super::StageContext;

/// Raises tasks toward the priority of the tasks waiting on them
pub fn propagate_inheritance(ctx: &StageContext) -> Vec<PriorityAdjustment> {
    let bounds = &ctx.config.bounds;
    let mut working = ctx.priorities();
    let mut visited: HashSet<TaskId> = HashSet::new();
    let mut adjustments = Vec::new();

    for id in ctx.graph.topological_order() {
        if !visited.insert(id) {
            continue;
        }

        let mut path = vec![id];
        let Some(inherited) = inherited_priority(ctx, &working, &id, 0, &mut path) else {
            continue;
        };

        let current = working.get(&id).copied().unwrap_or(bounds.min_priority);
        let inherited = inherited.round();
        if inherited <= f64::from(current) {
            continue;
        }

        let new_priority = bounds.clamp_f64(inherited);
        if new_priority == current {
            continue;
        }

        working.insert(id, new_priority);
        adjustments.push(PriorityAdjustment::new(
            id,
            AdjustmentKind::PriorityInheritance {
                inherited_priority: inherited as u32,
            },
            current,
            new_priority,
            format!("Inherits urgency ({:.0}) from dependent tasks", inherited),
        ));
    }

    adjustments
}

/// Highest decayed priority reachable from `id` through dependents
///
/// Returns `None` when nothing within `max_depth` hops contributes.
/// `path` holds the tasks on the current branch and prevents cycling.
fn inherited_priority(
    ctx: &StageContext,
    working: &BTreeMap<TaskId, u32>,
    id: &TaskId,
    depth: usize,
    path: &mut Vec<TaskId>,
) -> Option<f64> {
    let cfg = &ctx.config.inheritance;
    if depth >= cfg.max_depth {
        return None;
    }

    let mut best: Option<f64> = None;
    for dependent in ctx.graph.dependents(id) {
        if path.contains(&dependent) {
            continue;
        }

        path.push(dependent);
        let downstream = inherited_priority(ctx, working, &dependent, depth + 1, path);
        path.pop();

        let own = f64::from(working.get(&dependent).copied().unwrap_or(0));
        let candidate = own.max(downstream.unwrap_or(0.0)) * cfg.decay_factor;
        best = Some(best.map_or(candidate, |b| b.max(candidate)));
    }

    best.map(|value| value.max(f64::from(cfg.min_inherited_priority)))
}
