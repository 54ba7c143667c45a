//! Dependency graph for tasks
//!
//! Stores forward (dependents) and reverse (dependencies) adjacency keyed by
//! task ID. Unlike a store-level graph, this one never rejects input: cycles
//! are tolerated and reported, and dependencies on unknown tasks are dropped.
//! Uses petgraph for strongly connected component detection.

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::warn;

use super::id::TaskId;
use super::task::Task;

/// A dependency graph built from a task slice
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    /// task -> tasks that depend on it
    forward: BTreeMap<TaskId, BTreeSet<TaskId>>,

    /// task -> tasks it depends on
    reverse: BTreeMap<TaskId, BTreeSet<TaskId>>,

    /// task -> index into the slice the graph was built from
    task_map: BTreeMap<TaskId, usize>,

    /// Task IDs in input order
    order: Vec<TaskId>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a task slice
    ///
    /// Dependencies on IDs outside the slice, and self-dependencies, are
    /// silently dropped.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut graph = Self::new();

        // First pass: add all nodes
        for (idx, task) in tasks.iter().enumerate() {
            if graph.task_map.insert(task.id, idx).is_none() {
                graph.order.push(task.id);
            }
            graph.forward.entry(task.id).or_default();
            graph.reverse.entry(task.id).or_default();
        }

        // Second pass: add all edges
        for task in tasks {
            for dep_id in &task.depends_on {
                if *dep_id == task.id || !graph.task_map.contains_key(dep_id) {
                    continue;
                }
                graph.forward.entry(*dep_id).or_default().insert(task.id);
                graph.reverse.entry(task.id).or_default().insert(*dep_id);
            }
        }

        graph
    }

    /// Returns the direct dependents of a task (tasks that depend on it)
    pub fn dependents(&self, task_id: &TaskId) -> impl Iterator<Item = TaskId> + '_ {
        self.forward.get(task_id).into_iter().flatten().copied()
    }

    /// Returns the direct dependencies of a task
    pub fn dependencies(&self, task_id: &TaskId) -> impl Iterator<Item = TaskId> + '_ {
        self.reverse.get(task_id).into_iter().flatten().copied()
    }

    /// Number of direct dependents
    pub fn dependent_count(&self, task_id: &TaskId) -> usize {
        self.forward.get(task_id).map(BTreeSet::len).unwrap_or(0)
    }

    /// Number of resolved direct dependencies
    pub fn dependency_count(&self, task_id: &TaskId) -> usize {
        self.reverse.get(task_id).map(BTreeSet::len).unwrap_or(0)
    }

    /// Index of the task in the slice the graph was built from
    pub fn position(&self, task_id: &TaskId) -> Option<usize> {
        self.task_map.get(task_id).copied()
    }

    /// Returns true if the graph contains the task
    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.task_map.contains_key(task_id)
    }

    /// Tasks with no resolved dependencies, in input order
    pub fn roots(&self) -> Vec<TaskId> {
        self.order
            .iter()
            .filter(|id| self.dependency_count(id) == 0)
            .copied()
            .collect()
    }

    /// Tasks nothing depends on, in input order
    pub fn leaves(&self) -> Vec<TaskId> {
        self.order
            .iter()
            .filter(|id| self.dependent_count(id) == 0)
            .copied()
            .collect()
    }

    /// Returns all tasks with dependencies before dependents
    ///
    /// Never fails: when a cycle is found the offending edge is logged and
    /// skipped, so every task appears exactly once.
    pub fn topological_order(&self) -> Vec<TaskId> {
        let mut order = Vec::with_capacity(self.order.len());
        let mut visited: HashSet<TaskId> = HashSet::new();
        let mut visiting: HashSet<TaskId> = HashSet::new();

        for &start in &self.order {
            if visited.contains(&start) {
                continue;
            }

            visiting.insert(start);
            let mut stack = vec![(start, self.dependencies(&start).collect::<Vec<_>>(), 0usize)];

            while let Some(frame) = stack.last_mut() {
                let next = if frame.2 < frame.1.len() {
                    frame.2 += 1;
                    Some((frame.0, frame.1[frame.2 - 1]))
                } else {
                    None
                };

                match next {
                    Some((task, dep)) => {
                        if visited.contains(&dep) {
                            continue;
                        }
                        if visiting.contains(&dep) {
                            warn!(task = %task, dependency = %dep, "Circular dependency detected, skipping branch");
                            continue;
                        }
                        visiting.insert(dep);
                        stack.push((dep, self.dependencies(&dep).collect(), 0));
                    }
                    None => {
                        if let Some((task, _, _)) = stack.pop() {
                            visiting.remove(&task);
                            visited.insert(task);
                            order.push(task);
                        }
                    }
                }
            }
        }

        order
    }

    /// Groups of tasks that depend on each other in a cycle
    ///
    /// Each group is sorted ascending; groups are sorted by their first ID.
    pub fn cycles(&self) -> Vec<Vec<TaskId>> {
        let mut graph: DiGraphMap<TaskId, ()> = DiGraphMap::new();
        for id in &self.order {
            graph.add_node(*id);
        }
        for (from, targets) in &self.forward {
            for to in targets {
                graph.add_edge(*from, *to, ());
            }
        }

        let mut cycles: Vec<Vec<TaskId>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|mut component| {
                component.sort();
                component
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Returns the number of tasks in the graph
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns all task IDs in input order
    pub fn task_ids(&self) -> impl Iterator<Item = &TaskId> {
        self.order.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(n: u32) -> TaskId {
        TaskId::new(n).unwrap()
    }

    fn make_task(n: u32, deps: &[u32]) -> Task {
        let mut task = Task::new(id(n), format!("Task {}", n));
        for dep in deps {
            task.add_dependency(id(*dep));
        }
        task
    }

    #[test]
    fn empty_graph() {
        let graph = DependencyGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
        assert!(graph.topological_order().is_empty());
    }

    #[test]
    fn from_tasks_builds_both_directions() {
        let tasks = vec![make_task(1, &[]), make_task(2, &[1]), make_task(3, &[1, 2])];
        let graph = DependencyGraph::from_tasks(&tasks);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.dependents(&id(1)).collect::<Vec<_>>(), vec![id(2), id(3)]);
        assert_eq!(graph.dependencies(&id(3)).collect::<Vec<_>>(), vec![id(1), id(2)]);
        assert_eq!(graph.dependent_count(&id(1)), 2);
        assert_eq!(graph.dependency_count(&id(1)), 0);
        assert_eq!(graph.position(&id(3)), Some(2));
    }

    #[test]
    fn dangling_dependencies_are_dropped() {
        let tasks = vec![make_task(1, &[99]), make_task(2, &[1, 42])];
        let graph = DependencyGraph::from_tasks(&tasks);

        assert!(!graph.contains(&id(99)));
        assert_eq!(graph.dependency_count(&id(1)), 0);
        assert_eq!(graph.dependencies(&id(2)).collect::<Vec<_>>(), vec![id(1)]);
        assert_eq!(graph.roots(), vec![id(1)]);
    }

    #[test]
    fn roots_and_leaves() {
        let tasks = vec![
            make_task(1, &[]),
            make_task(2, &[1]),
            make_task(3, &[2]),
            make_task(4, &[]),
        ];
        let graph = DependencyGraph::from_tasks(&tasks);

        assert_eq!(graph.roots(), vec![id(1), id(4)]);
        assert_eq!(graph.leaves(), vec![id(3), id(4)]);
    }

    #[test]
    fn topological_order() {
        // 1 depends on 2, 2 depends on 3
        let tasks = vec![make_task(1, &[2]), make_task(2, &[3]), make_task(3, &[])];
        let graph = DependencyGraph::from_tasks(&tasks);

        let order = graph.topological_order();
        assert_eq!(order, vec![id(3), id(2), id(1)]);
    }

    #[test]
    fn two_task_cycle_terminates() {
        let tasks = vec![make_task(1, &[2]), make_task(2, &[1])];
        let graph = DependencyGraph::from_tasks(&tasks);

        let order = graph.topological_order();
        assert_eq!(order, vec![id(2), id(1)]);
        // Same input, same answer
        assert_eq!(graph.topological_order(), order);
    }

    #[test]
    fn cycles_are_reported() {
        let tasks = vec![
            make_task(1, &[3]),
            make_task(2, &[1]),
            make_task(3, &[2]),
            make_task(4, &[5]),
            make_task(5, &[4]),
            make_task(6, &[1]),
        ];
        let graph = DependencyGraph::from_tasks(&tasks);

        assert_eq!(
            graph.cycles(),
            vec![vec![id(1), id(2), id(3)], vec![id(4), id(5)]]
        );
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let tasks = vec![make_task(1, &[]), make_task(2, &[1]), make_task(3, &[1])];
        let graph = DependencyGraph::from_tasks(&tasks);
        assert!(graph.cycles().is_empty());
    }

    #[test]
    fn performance_500_tasks() {
        use std::time::Instant;

        let tasks: Vec<_> = (1..=500u32)
            .map(|i| if i == 1 { make_task(i, &[]) } else { make_task(i, &[i - 1]) })
            .collect();

        let start = Instant::now();
        let graph = DependencyGraph::from_tasks(&tasks);
        let order = graph.topological_order();
        let duration = start.elapsed();

        assert_eq!(order.len(), 500);
        assert_eq!(order.first(), Some(&id(1)));
        assert!(duration.as_millis() < 100, "Topological sort took {:?}", duration);
    }

    proptest! {
        #[test]
        fn topological_order_visits_every_task_once(
            edges in proptest::collection::vec((1u32..=20, 1u32..=20), 0..60)
        ) {
            let mut tasks: Vec<Task> = (1..=20).map(|n| make_task(n, &[])).collect();
            for (from, to) in edges {
                tasks[(from - 1) as usize].add_dependency(id(to));
            }

            let graph = DependencyGraph::from_tasks(&tasks);
            let mut order = graph.topological_order();
            order.sort();
            let expected: Vec<_> = (1..=20).map(id).collect();
            prop_assert_eq!(order, expected);
        }
    }
}
