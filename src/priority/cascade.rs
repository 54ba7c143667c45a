//! Cascade propagation
//!
//! High-priority tasks push urgency downstream to their dependents. At depth
//! `d` (0 for a direct dependent) the proposed value is
//! `round(source * decay_rate^(d+1))`, where `source` is the priority of the
//! task the cascade just came from. A proposal is applied only if it beats
//! the dependent's current priority, and the cascade continues from that
//! dependent with its new priority.
//!
//! Any task at or above the threshold seeds a cascade, done or not. Done
//! dependents are never raised.

use std::collections::HashSet;

use crate::domain::{AdjustmentKind, PriorityAdjustment, TaskId};

use super::StageContext;

/// Value proposed for a dependent `depth` hops below a task at `source`
pub fn cascaded_priority(source: u32, decay_rate: f64, depth: usize) -> u32 {
    let exponent = i32::try_from(depth + 1).unwrap_or(i32::MAX);
    (f64::from(source) * decay_rate.powi(exponent)).round().max(0.0) as u32
}

/// Propagates high priorities from seed tasks to their dependents
pub fn propagate_cascade(ctx: &StageContext) -> Vec<PriorityAdjustment> {
    let cfg = &ctx.config.cascade;
    let bounds = &ctx.config.bounds;
    let mut working = ctx.priorities();
    let mut adjustments = Vec::new();

    // Seeds are judged once, before any cascading
    let mut seeds: Vec<(TaskId, u32)> = ctx
        .tasks
        .iter()
        .filter(|t| t.priority >= cfg.high_priority_threshold)
        .map(|t| (t.id, t.priority))
        .collect();
    seeds.sort_by_key(|(id, _)| *id);

    for (seed, seed_priority) in seeds {
        let mut visited: HashSet<TaskId> = HashSet::from([seed]);
        // (task, its priority as a source, depth of its dependents)
        let mut stack: Vec<(TaskId, u32, usize)> = vec![(seed, seed_priority, 0)];

        while let Some((source, source_priority, depth)) = stack.pop() {
            if depth >= cfg.max_depth {
                continue;
            }

            let dependents: Vec<TaskId> = ctx.graph.dependents(&source).collect();
            for dependent in dependents.into_iter().rev() {
                if !visited.insert(dependent) || ctx.is_done(&dependent) {
                    continue;
                }

                let proposed = bounds.clamp(i64::from(cascaded_priority(
                    source_priority,
                    cfg.decay_rate,
                    depth,
                )));
                let current = working.get(&dependent).copied().unwrap_or(bounds.min_priority);
                if proposed <= current {
                    continue;
                }

                working.insert(dependent, proposed);
                adjustments.push(PriorityAdjustment::new(
                    dependent,
                    AdjustmentKind::CascadeEffect {
                        source_task_id: seed,
                        depth,
                    },
                    current,
                    proposed,
                    format!("Cascade from {} at depth {}", seed, depth),
                ));
                stack.push((dependent, proposed, depth + 1));
            }
        }
    }

    adjustments
}
