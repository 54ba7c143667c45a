//! Priority adjustment records
//!
//! Every change the engine makes to a task's priority is recorded as a
//! [`PriorityAdjustment`]. The list is append-only and ordered by when the
//! change was made, so replaying `new_priority` values in order reproduces
//! the final state.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::id::TaskId;

/// What caused an adjustment, with the stage-specific detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdjustmentKind {
    DependencyBoost {
        dependent_count: usize,
    },
    PriorityInheritance {
        inherited_priority: u32,
    },
    BlockingTaskBoost {
        blocked_count: usize,
    },
    CriticalPathBoost {
        path_score: f64,
        path_length: usize,
    },
    CascadeEffect {
        source_task_id: TaskId,
        depth: usize,
    },
    TimeDecay {
        model: String,
        days: i64,
    },
    AgingBoost {
        model: String,
        days: i64,
    },
    EffortWeighting {
        effort_score: f64,
    },
    UniquenessEnforcement,
    DistributionOptimization,
}

impl AdjustmentKind {
    /// Returns the serialized type name
    pub fn label(&self) -> &'static str {
        match self {
            AdjustmentKind::DependencyBoost { .. } => "dependency_boost",
            AdjustmentKind::PriorityInheritance { .. } => "priority_inheritance",
            AdjustmentKind::BlockingTaskBoost { .. } => "blocking_task_boost",
            AdjustmentKind::CriticalPathBoost { .. } => "critical_path_boost",
            AdjustmentKind::CascadeEffect { .. } => "cascade_effect",
            AdjustmentKind::TimeDecay { .. } => "time_decay",
            AdjustmentKind::AgingBoost { .. } => "aging_boost",
            AdjustmentKind::EffortWeighting { .. } => "effort_weighting",
            AdjustmentKind::UniquenessEnforcement => "uniqueness_enforcement",
            AdjustmentKind::DistributionOptimization => "distribution_optimization",
        }
    }
}

/// A single recorded priority change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityAdjustment {
    pub task_id: TaskId,

    #[serde(flatten)]
    pub kind: AdjustmentKind,

    pub old_priority: u32,
    pub new_priority: u32,

    /// Human-readable explanation
    pub reason: String,
}

impl PriorityAdjustment {
    pub fn new(
        task_id: TaskId,
        kind: AdjustmentKind,
        old_priority: u32,
        new_priority: u32,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            task_id,
            kind,
            old_priority,
            new_priority,
            reason: reason.into(),
        }
    }

    /// Signed change in priority
    pub fn delta(&self) -> i64 {
        i64::from(self.new_priority) - i64::from(self.old_priority)
    }
}

impl fmt::Display for PriorityAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} -> {} ({})",
            self.task_id,
            self.kind.label(),
            self.old_priority,
            self.new_priority,
            self.reason
        )
    }
}
