//! Distribution optimization
//!
//! When most of the priority range is in use, uniqueness leaves priorities
//! packed together and new work has nowhere to go. Past
//! `compression_threshold` utilization, every task is reassigned an evenly
//! spaced value from the top down, keeping the current rank order.

use crate::domain::{AdjustmentKind, PriorityAdjustment, Task};

use super::{rank_order, StageContext};

/// Share of the priority range in use
pub fn utilization(task_count: usize, space_size: usize) -> f64 {
    if space_size == 0 {
        return f64::INFINITY;
    }
    task_count as f64 / space_size as f64
}

/// Spreads priorities evenly when the range is nearly full
pub fn optimize_distribution(ctx: &StageContext) -> Vec<PriorityAdjustment> {
    let bounds = &ctx.config.bounds;
    let task_count = ctx.tasks.len();
    let space = bounds.space_size();

    let ratio = utilization(task_count, space);
    if task_count == 0 || ratio < ctx.config.distribution.compression_threshold {
        return Vec::new();
    }

    let spacing = (space / task_count).max(1) as i64;

    let mut ranked: Vec<&Task> = ctx.tasks.iter().collect();
    ranked.sort_by(|a, b| rank_order(a, b));

    ranked
        .into_iter()
        .enumerate()
        .filter_map(|(index, task)| {
            let target = bounds.clamp(i64::from(bounds.max_priority) - index as i64 * spacing);
            (target != task.priority).then(|| {
                PriorityAdjustment::new(
                    task.id,
                    AdjustmentKind::DistributionOptimization,
                    task.priority,
                    target,
                    format!("Rank {} at {:.0}% utilization", index + 1, ratio * 100.0),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DependencyGraph;
    use crate::priority::test_support::*;
    use crate::priority::{apply_adjustments, PriorityBounds, PriorityConfig};

    fn small_range(max: u32) -> PriorityConfig {
        let mut config = PriorityConfig::default();
        config.bounds = PriorityBounds {
            min_priority: 1,
            max_priority: max,
        };
        config
    }

    fn run(tasks: &[Task], config: &PriorityConfig) -> Vec<PriorityAdjustment> {
        let graph = DependencyGraph::from_tasks(tasks);
        optimize_distribution(&StageContext::new(tasks, &graph, config, now()))
    }

    #[test]
    fn below_threshold_is_a_no_op() {
        let tasks = vec![task(1, 10, &[]), task(2, 9, &[])];
        assert!(run(&tasks, &PriorityConfig::default()).is_empty());
    }

    #[test]
    fn spreads_when_saturated() {
        // 9 tasks in 10 slots: 90% utilization, spacing 1
        let mut tasks: Vec<_> = (1..=9).map(|n| task(n, n, &[])).collect();
        let config = small_range(10);

        let adjustments = run(&tasks, &config);
        apply_adjustments(&mut tasks, &adjustments);

        let priorities: Vec<_> = tasks.iter().map(|t| t.priority).collect();
        assert_eq!(priorities, vec![2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(adjustments.len(), 9);
    }

    #[test]
    fn preserves_rank_order() {
        let mut config = small_range(20);
        config.distribution.compression_threshold = 0.1;

        let mut tasks = vec![task(1, 3, &[]), task(2, 15, &[]), task(3, 7, &[])];
        let adjustments = run(&tasks, &config);
        apply_adjustments(&mut tasks, &adjustments);

        // spacing = 20 / 3 = 6
        assert_eq!(tasks[1].priority, 20);
        assert_eq!(tasks[2].priority, 14);
        assert_eq!(tasks[0].priority, 8);
    }

    #[test]
    fn unchanged_tasks_are_not_recorded() {
        let mut config = small_range(4);
        config.distribution.compression_threshold = 0.5;
        let tasks = vec![task(1, 4, &[]), task(2, 1, &[])];

        // spacing 2: targets 4 and 2
        let adjustments = run(&tasks, &config);
        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].task_id, id(2));
        assert_eq!(adjustments[0].new_priority, 2);
    }

    #[test]
    fn utilization_ratio() {
        assert!((utilization(800, 1000) - 0.8).abs() < 1e-12);
        assert!(utilization(1, 0).is_infinite());
    }
}
