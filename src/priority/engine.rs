//! Recalculation pipeline
//!
//! [`PriorityEngine`] runs the stages in a fixed order over a task slice,
//! applying each stage's adjustments before the next one runs.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::domain::{DependencyGraph, PriorityAdjustment, Task, TaskId};

use super::config::PriorityConfig;
use super::{
    apply_adjustments, blocking, cascade, critical_path, decay, dependency, distribution, effort,
    inheritance, uniqueness, StageContext,
};

type Stage = fn(&StageContext) -> Vec<PriorityAdjustment>;

/// Result of one recalculation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recalculation {
    /// Every change made, in the order it was made
    pub adjustments: Vec<PriorityAdjustment>,
}

impl Recalculation {
    /// Number of adjustments per type label
    pub fn counts_by_type(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for adj in &self.adjustments {
            *counts.entry(adj.kind.label()).or_insert(0) += 1;
        }
        counts
    }

    /// Tasks touched by at least one adjustment
    pub fn touched_tasks(&self) -> BTreeSet<TaskId> {
        self.adjustments.iter().map(|a| a.task_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.adjustments.is_empty()
    }
}

/// Recalculates task priorities with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct PriorityEngine {
    config: PriorityConfig,
}

impl PriorityEngine {
    pub fn new(config: PriorityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PriorityConfig {
        &self.config
    }

    /// Recalculates priorities as of now
    pub fn recalculate(&self, tasks: &mut [Task]) -> Recalculation {
        self.recalculate_at(tasks, Utc::now())
    }

    /// Recalculates priorities as of `now`, mutating the tasks in place
    pub fn recalculate_at(&self, tasks: &mut [Task], now: DateTime<Utc>) -> Recalculation {
        let cfg = &self.config;
        let bounds = &cfg.bounds;

        for task in tasks.iter_mut() {
            let clamped = bounds.clamp(i64::from(task.priority));
            if clamped != task.priority {
                debug!(task = %task.id, from = task.priority, to = clamped, "Clamped out-of-range priority");
                task.priority = clamped;
            }
        }

        // Structure never changes during a pass
        let graph = DependencyGraph::from_tasks(tasks);

        let stages: [(&str, bool, Stage); 9] = [
            ("dependency_boost", cfg.dependency.enabled, dependency::dependency_boost as Stage),
            ("priority_inheritance", cfg.inheritance.enabled, inheritance::propagate_inheritance as Stage),
            ("blocking_task_boost", cfg.blocking.enabled, blocking::boost_blocking_tasks as Stage),
            ("critical_path_boost", cfg.critical_path.enabled, critical_path::boost_critical_paths as Stage),
            ("cascade_effect", cfg.cascade.enabled, cascade::propagate_cascade as Stage),
            ("time_decay", cfg.time_decay.enabled, decay::apply_time_decay as Stage),
            ("effort_weighting", cfg.effort.enabled, effort::apply_effort_weighting as Stage),
            ("uniqueness_enforcement", cfg.uniqueness.enabled, uniqueness::enforce_uniqueness as Stage),
            ("distribution_optimization", cfg.distribution.enabled, distribution::optimize_distribution as Stage),
        ];

        let mut result = Recalculation::default();
        for (name, enabled, stage) in stages {
            if !enabled {
                continue;
            }

            let adjustments = {
                let ctx = StageContext::new(tasks, &graph, cfg, now);
                stage(&ctx)
            };
            debug!(stage = name, adjustments = adjustments.len(), "Stage complete");

            apply_adjustments(tasks, &adjustments);
            result.adjustments.extend(adjustments);
        }

        result
    }
}
