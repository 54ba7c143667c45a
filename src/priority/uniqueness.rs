//! Uniqueness enforcement
//!
//! Gives every task, done ones included, a distinct priority. Tasks are
//! walked from highest to lowest (oldest first on ties); a task whose value
//! is taken moves to the nearest free slot, searching `+spacing`,
//! `-spacing`, `+2*spacing`, ... and finally scanning down from the top.
//!
//! Only possible while the task count fits in the priority range; see
//! [`super::check_capacity`].

use std::collections::HashSet;
use tracing::warn;

use crate::domain::{AdjustmentKind, PriorityAdjustment, Task};

use super::config::PriorityBounds;
use super::{rank_order, StageContext};

/// Nearest free value to `desired`, or `None` when the range is full
pub fn find_free_slot(desired: u32, spacing: u32, bounds: &PriorityBounds, used: &HashSet<u32>) -> Option<u32> {
    let min = i64::from(bounds.min_priority);
    let max = i64::from(bounds.max_priority);
    let desired = i64::from(bounds.clamp(i64::from(desired)));
    let is_free = |v: i64| v >= min && v <= max && !used.contains(&(v as u32));

    if is_free(desired) {
        return Some(desired as u32);
    }

    let step = i64::from(spacing.max(1));
    let mut offset = step;
    while desired + offset <= max || desired - offset >= min {
        if is_free(desired + offset) {
            return Some((desired + offset) as u32);
        }
        if is_free(desired - offset) {
            return Some((desired - offset) as u32);
        }
        offset += step;
    }

    (min..=max).rev().find(|v| is_free(*v)).map(|v| v as u32)
}

/// Moves colliding tasks to free priority values
pub fn enforce_uniqueness(ctx: &StageContext) -> Vec<PriorityAdjustment> {
    let bounds = &ctx.config.bounds;
    let spacing = ctx.config.uniqueness.spacing;

    let mut ranked: Vec<&Task> = ctx.tasks.iter().collect();
    ranked.sort_by(|a, b| rank_order(a, b));

    let mut used: HashSet<u32> = HashSet::with_capacity(ranked.len());
    let mut adjustments = Vec::new();

    for task in ranked {
        let Some(slot) = find_free_slot(task.priority, spacing, bounds, &used) else {
            warn!(task = %task.id, priority = task.priority, "No free priority value left, keeping duplicate");
            continue;
        };
        used.insert(slot);

        if slot != task.priority {
            adjustments.push(PriorityAdjustment::new(
                task.id,
                AdjustmentKind::UniquenessEnforcement,
                task.priority,
                slot,
                format!("Priority {} already taken", task.priority),
            ));
        }
    }

    adjustments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DependencyGraph;
    use crate::priority::test_support::*;
    use crate::priority::{apply_adjustments, PriorityConfig};
    use chrono::Duration;
    use proptest::prelude::*;

    fn run(tasks: &[Task], config: &PriorityConfig) -> Vec<PriorityAdjustment> {
        let graph = DependencyGraph::from_tasks(tasks);
        enforce_uniqueness(&StageContext::new(tasks, &graph, config, now()))
    }

    #[test]
    fn older_task_keeps_its_value() {
        let a = task(1, 700, &[]);
        let mut b = task(2, 700, &[]);
        b.created_at = Some(now() + Duration::minutes(5));

        // Input order must not matter
        let tasks = vec![b, a];
        let adjustments = run(&tasks, &PriorityConfig::default());

        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].task_id, id(2));
        assert_eq!(adjustments[0].old_priority, 700);
        assert_eq!(adjustments[0].new_priority, 701);
    }

    #[test]
    fn searches_downward_when_upward_is_taken() {
        let tasks = vec![task(1, 701, &[]), task(2, 700, &[]), task(3, 700, &[])];
        let adjustments = run(&tasks, &PriorityConfig::default());

        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].task_id, id(3));
        assert_eq!(adjustments[0].new_priority, 699);
    }

    #[test]
    fn done_tasks_are_included() {
        let tasks = vec![done(task(1, 500, &[])), task(2, 500, &[])];
        let adjustments = run(&tasks, &PriorityConfig::default());
        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].task_id, id(2));
    }

    #[test]
    fn collision_at_the_top_moves_down() {
        let tasks = vec![task(1, 1000, &[]), task(2, 1000, &[])];
        let adjustments = run(&tasks, &PriorityConfig::default());
        assert_eq!(adjustments[0].new_priority, 999);
    }

    #[test]
    fn spacing_controls_search_step() {
        let mut config = PriorityConfig::default();
        config.uniqueness.spacing = 10;
        let tasks = vec![task(1, 500, &[]), task(2, 500, &[])];
        let adjustments = run(&tasks, &config);
        assert_eq!(adjustments[0].new_priority, 510);
    }

    #[test]
    fn falls_back_to_scan_when_step_misses() {
        let bounds = PriorityBounds {
            min_priority: 1,
            max_priority: 10,
        };
        let used: HashSet<u32> = [1, 4, 5, 6, 7, 8, 9, 10].into_iter().collect();
        // Steps of 5 from 5 reach only 10 and 0
        assert_eq!(find_free_slot(5, 5, &bounds, &used), Some(3));
    }

    #[test]
    fn full_range_has_no_slot() {
        let bounds = PriorityBounds {
            min_priority: 1,
            max_priority: 3,
        };
        let used: HashSet<u32> = [1, 2, 3].into_iter().collect();
        assert_eq!(find_free_slot(2, 1, &bounds, &used), None);
    }

    proptest! {
        #[test]
        fn priorities_end_up_distinct(priorities in proptest::collection::vec(1u32..=1000, 1..300)) {
            let mut tasks: Vec<Task> = priorities
                .iter()
                .enumerate()
                .map(|(i, p)| task(i as u32 + 1, *p, &[]))
                .collect();

            let adjustments = run(&tasks, &PriorityConfig::default());
            apply_adjustments(&mut tasks, &adjustments);

            let distinct: HashSet<u32> = tasks.iter().map(|t| t.priority).collect();
            prop_assert_eq!(distinct.len(), tasks.len());
            prop_assert!(tasks.iter().all(|t| (1..=1000).contains(&t.priority)));
        }
    }
}
