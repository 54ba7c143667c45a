//! Simple dependency boost
//!
//! Tasks that others depend on get a boost proportional to their own
//! priority and the number of direct dependents. Runs before the graph-wide
//! stages and sees only direct edges.

use crate::domain::{AdjustmentKind, PriorityAdjustment};

use super::StageContext;

/// Boosts every incomplete task that has direct dependents
pub fn dependency_boost(ctx: &StageContext) -> Vec<PriorityAdjustment> {
    let cfg = &ctx.config.dependency;
    let bounds = &ctx.config.bounds;
    let mut adjustments = Vec::new();

    for task in ctx.tasks {
        if task.is_complete() {
            continue;
        }

        let dependents = ctx.graph.dependent_count(&task.id);
        if dependents == 0 {
            continue;
        }

        let raw = dependents as f64 * cfg.boost_factor * f64::from(task.priority);
        let boost = raw.min(f64::from(cfg.max_boost)).round() as i64;
        if boost <= 0 {
            continue;
        }

        let new_priority = bounds.clamp(i64::from(task.priority) + boost);
        if new_priority == task.priority {
            continue;
        }

        adjustments.push(PriorityAdjustment::new(
            task.id,
            AdjustmentKind::DependencyBoost {
                dependent_count: dependents,
            },
            task.priority,
            new_priority,
            format!("{} task(s) depend on this one", dependents),
        ));
    }

    adjustments
}
