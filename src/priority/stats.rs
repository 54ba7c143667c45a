//! Priority statistics
//!
//! Summary numbers for a task set, independent of the pipeline. Bands use
//! fixed edges on the default 1..=1000 scale:
//!
//! | Band | Priorities |
//! |------|------------|
//! | critical | 800 and up |
//! | high | 600..800 |
//! | medium | 400..600 |
//! | low | below 400 |

use serde::Serialize;

use crate::domain::Task;

use super::config::PriorityConfig;
use super::distribution::utilization;

pub const CRITICAL_FROM: u32 = 800;
pub const HIGH_FROM: u32 = 600;
pub const MEDIUM_FROM: u32 = 400;

/// Task counts per priority band
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BandCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl BandCounts {
    fn record(&mut self, priority: u32) {
        match priority {
            p if p >= CRITICAL_FROM => self.critical += 1,
            p if p >= HIGH_FROM => self.high += 1,
            p if p >= MEDIUM_FROM => self.medium += 1,
            _ => self.low += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityStatistics {
    pub count: usize,
    pub min: u32,
    pub max: u32,
    /// Mean priority, rounded
    pub average: u32,
    pub distribution: BandCounts,
    /// Tasks per distinct priority value
    pub utilization_ratio: f64,
}

/// Computes statistics over the tasks' current priorities
///
/// An empty set reports zeros throughout.
pub fn priority_statistics(tasks: &[Task], config: &PriorityConfig) -> PriorityStatistics {
    let mut distribution = BandCounts::default();
    let mut min = u32::MAX;
    let mut max = 0;
    let mut total: u64 = 0;

    for task in tasks {
        min = min.min(task.priority);
        max = max.max(task.priority);
        total += u64::from(task.priority);
        distribution.record(task.priority);
    }

    let (min, average) = if tasks.is_empty() {
        (0, 0)
    } else {
        (min, (total as f64 / tasks.len() as f64).round() as u32)
    };

    PriorityStatistics {
        count: tasks.len(),
        min,
        max,
        average,
        distribution,
        utilization_ratio: utilization(tasks.len(), config.bounds.space_size()),
    }
}
