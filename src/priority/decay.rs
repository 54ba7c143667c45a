//! Time decay
//!
//! Ages task priorities. Only incomplete tasks with a creation time are
//! considered, and only once they have been idle longer than
//! `threshold_days`:
//!
//! ```text
//! effective_days = min(days since created, days since updated)
//! days           = effective_days - threshold_days
//! rate           = base_rate * (2 - p / max_priority)   (priority_weight on)
//! ```
//!
//! | Model | Delta |
//! |-------|-------|
//! | linear | `-floor(p * rate * days)` |
//! | exponential | `-floor(p * (1 - (1 - rate)^days))` |
//! | logarithmic | `-floor(p * rate * log2(1 + days))` |
//! | sigmoid | `-floor(p * rate * days * sigmoid(0.1 * (days - 30)))` |
//! | adaptive | exponential with a rate tuned by status, dependencies and band; tasks at 900+ gain an aging boost instead |

use crate::domain::{AdjustmentKind, PriorityAdjustment, Task, TaskStatus};

use super::config::{DecayModel, PriorityBounds, TimeDecayConfig};
use super::StageContext;

/// Priorities at or above this age upward instead of decaying (adaptive)
pub const CRITICAL_BAND: u32 = 900;

/// Lower edge of the high band, which decays slower (adaptive)
pub const HIGH_BAND: u32 = 700;

/// Priorities below this decay faster (adaptive)
pub const LOW_BAND: u32 = 400;

/// Absorbs float noise such as `74.99999999` before flooring
const FLOOR_EPSILON: f64 = 1e-9;

fn floor(value: f64) -> i64 {
    (value + FLOOR_EPSILON).floor() as i64
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Base rate scaled by `2 - p / max_priority` when `priority_weight` is on
///
/// A task at the maximum decays at the base rate, a task near zero at twice
/// that.
pub fn weighted_rate(cfg: &TimeDecayConfig, bounds: &PriorityBounds, priority: u32) -> f64 {
    if !cfg.priority_weight {
        return cfg.rate;
    }
    let share = f64::from(priority) / f64::from(bounds.max_priority.max(1));
    cfg.rate * (2.0 - share.min(1.0))
}

/// Signed change for the non-adaptive models
pub fn model_delta(model: DecayModel, priority: u32, rate: f64, days: f64) -> i64 {
    let p = f64::from(priority);
    let loss = match model {
        DecayModel::Linear => p * rate * days,
        DecayModel::Exponential | DecayModel::Adaptive => p * (1.0 - (1.0 - rate).powf(days)),
        DecayModel::Logarithmic => p * rate * (1.0 + days).log2(),
        DecayModel::Sigmoid => p * rate * days * sigmoid(0.1 * (days - 30.0)),
    };
    -floor(loss.max(0.0))
}

/// Signed change for the adaptive model
///
/// Critical tasks get `floor(max_aging_boost * days / 30)` added instead of
/// losing priority. Everyone else decays exponentially at a rate scaled by
/// status (in progress x0.5, blocked x1.5), by having any dependency (x0.7)
/// and by band (high x0.8, low x1.2).
pub fn adaptive_delta(cfg: &TimeDecayConfig, task: &Task, rate: f64, days: f64) -> i64 {
    let priority = task.priority;

    let mut rate = rate;
    match task.status {
        TaskStatus::InProgress => rate *= 0.5,
        TaskStatus::Blocked => rate *= 1.5,
        _ => {}
    }
    if !task.depends_on.is_empty() {
        rate *= 0.7;
    }

    if priority >= CRITICAL_BAND {
        return floor(f64::from(cfg.max_aging_boost) * days / 30.0);
    } else if priority >= HIGH_BAND {
        rate *= 0.8;
    } else if priority < LOW_BAND {
        rate *= 1.2;
    }

    model_delta(DecayModel::Exponential, priority, rate, days)
}

/// Applies the configured decay model to idle tasks
pub fn apply_time_decay(ctx: &StageContext) -> Vec<PriorityAdjustment> {
    let cfg = &ctx.config.time_decay;
    let bounds = &ctx.config.bounds;
    let mut adjustments = Vec::new();

    for task in ctx.tasks {
        if task.is_complete() {
            continue;
        }

        let (Some(created), Some(updated)) = (
            task.days_since_created(ctx.now),
            task.days_since_updated(ctx.now),
        ) else {
            continue;
        };

        let effective = created.min(updated);
        if effective <= cfg.threshold_days {
            continue;
        }
        let days = effective - cfg.threshold_days;

        let rate = weighted_rate(cfg, bounds, task.priority);
        let delta = match cfg.model {
            DecayModel::Adaptive => adaptive_delta(cfg, task, rate, days as f64),
            model => model_delta(model, task.priority, rate, days as f64),
        };

        let new_priority = bounds.clamp(i64::from(task.priority) + delta);
        if new_priority == task.priority {
            continue;
        }

        let model = cfg.model.to_string();
        let (kind, reason) = if new_priority < task.priority {
            (
                AdjustmentKind::TimeDecay { model, days },
                format!("Idle {} day(s) past threshold ({} decay)", days, cfg.model),
            )
        } else {
            (
                AdjustmentKind::AgingBoost { model, days },
                format!("Critical task aging for {} day(s)", days),
            )
        };

        adjustments.push(PriorityAdjustment::new(
            task.id,
            kind,
            task.priority,
            new_priority,
            reason,
        ));
    }

    adjustments
}
