//! Blocking task detection
//!
//! A task that transitively blocks many incomplete tasks gets a flat boost
//! per blocked task, up to a cap.
//!
//! Blocked tasks are found breadth-first along dependent edges. A done
//! dependent is neither counted nor walked through.

use std::collections::{HashSet, VecDeque};

use crate::domain::{AdjustmentKind, PriorityAdjustment, Task, TaskId};

use super::StageContext;

/// Incomplete tasks transitively waiting on `id`, in breadth-first order
pub fn blocked_tasks(ctx: &StageContext, id: &TaskId) -> Vec<TaskId> {
    let mut seen: HashSet<TaskId> = HashSet::from([*id]);
    let mut queue: VecDeque<TaskId> = VecDeque::from([*id]);
    let mut blocked = Vec::new();

    while let Some(current) = queue.pop_front() {
        for dependent in ctx.graph.dependents(&current) {
            if ctx.is_done(&dependent) {
                continue;
            }
            if seen.insert(dependent) {
                blocked.push(dependent);
                queue.push_back(dependent);
            }
        }
    }

    blocked
}

/// Incomplete tasks that block at least `threshold` others, with their counts
pub fn find_blocking_tasks<'a>(ctx: &StageContext<'a>) -> Vec<(&'a Task, usize)> {
    let threshold = ctx.config.blocking.threshold;

    ctx.tasks
        .iter()
        .filter(|task| !task.is_complete())
        .filter_map(|task| {
            let count = blocked_tasks(ctx, &task.id).len();
            (count >= threshold && count > 0).then_some((task, count))
        })
        .collect()
}

/// Boosts tasks that hold up many incomplete tasks
pub fn boost_blocking_tasks(ctx: &StageContext) -> Vec<PriorityAdjustment> {
    let cfg = &ctx.config.blocking;
    let bounds = &ctx.config.bounds;

    find_blocking_tasks(ctx)
        .into_iter()
        .filter_map(|(task, count)| {
            let boost = (count as u64 * u64::from(cfg.points_per_blocked)).min(u64::from(cfg.boost_cap));
            let new_priority = bounds.clamp(i64::from(task.priority) + boost as i64);
            (new_priority != task.priority).then(|| {
                PriorityAdjustment::new(
                    task.id,
                    AdjustmentKind::BlockingTaskBoost {
                        blocked_count: count,
                    },
                    task.priority,
                    new_priority,
                    format!("Blocks {} incomplete task(s)", count),
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
    use crate::priority::PriorityConfig;

    fn run(tasks: &[Task], config: &PriorityConfig) -> Vec<PriorityAdjustment> {
        let graph = DependencyGraph::from_tasks(tasks);
        boost_blocking_tasks(&StageContext::new(tasks, &graph, config, now()))
    }

    fn fan_out(root_priority: u32) -> Vec<Task> {
        // 1 blocks 2 and 3 directly, 4 and 5 through 2
        vec![
            task(1, root_priority, &[]),
            task(2, 300, &[1]),
            task(3, 300, &[1]),
            task(4, 300, &[2]),
            task(5, 300, &[2]),
        ]
    }

    #[test]
    fn transitive_blocker_is_boosted() {
        let adjustments = run(&fan_out(500), &PriorityConfig::default());

        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].task_id, id(1));
        assert_eq!(adjustments[0].new_priority, 600);
        assert_eq!(
            adjustments[0].kind,
            AdjustmentKind::BlockingTaskBoost { blocked_count: 4 }
        );
    }

    #[test]
    fn boost_is_capped_and_clamped() {
        let mut config = PriorityConfig::default();
        config.blocking.points_per_blocked = 100;
        let adjustments = run(&fan_out(500), &config);
        assert_eq!(adjustments[0].new_priority, 650);

        let adjustments = run(&fan_out(950), &PriorityConfig::default());
        assert_eq!(adjustments[0].new_priority, 1000);
    }

    #[test]
    fn done_tasks_are_not_counted() {
        let mut tasks = fan_out(500);
        tasks[3] = done(tasks[3].clone());
        tasks[4] = done(tasks[4].clone());

        // Only 2 and 3 remain blocked: below the threshold of 3
        assert!(run(&tasks, &PriorityConfig::default()).is_empty());
    }

    #[test]
    fn done_dependents_stop_the_walk() {
        // 1 <- 2 (done) <- 3 <- 4 <- 5
        let tasks = vec![
            task(1, 500, &[]),
            done(task(2, 500, &[1])),
            task(3, 500, &[2]),
            task(4, 500, &[3]),
            task(5, 500, &[4]),
        ];
        let graph = DependencyGraph::from_tasks(&tasks);
        let config = PriorityConfig::default();
        let ctx = StageContext::new(&tasks, &graph, &config, now());

        assert!(blocked_tasks(&ctx, &id(1)).is_empty());
        assert_eq!(blocked_tasks(&ctx, &id(3)), vec![id(4), id(5)]);
        assert!(run(&tasks, &config).is_empty());
    }

    #[test]
    fn done_blockers_are_skipped() {
        let mut tasks = fan_out(500);
        tasks[0] = done(tasks[0].clone());
        assert!(run(&tasks, &PriorityConfig::default()).is_empty());
    }

    #[test]
    fn cycle_members_do_not_count_themselves() {
        let tasks = vec![task(1, 500, &[3]), task(2, 500, &[1]), task(3, 500, &[2])];
        let graph = DependencyGraph::from_tasks(&tasks);
        let config = PriorityConfig::default();
        let ctx = StageContext::new(&tasks, &graph, &config, now());

        let mut blocked = blocked_tasks(&ctx, &id(1));
        blocked.sort();
        assert_eq!(blocked, vec![id(2), id(3)]);
    }
}
