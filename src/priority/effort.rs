//! Effort-weighted scoring
//!
//! Derives a heuristic effort score in `[0, 1]` from four signals and nudges
//! priority toward it:
//!
//! - **complexity**: keywords, dependency/subtask/file counts
//! - **impact**: current priority plus impact and user-facing keywords
//! - **urgency**: age, status, urgency keywords
//! - **workload**: description length, counts, heavy/light verbs
//!
//! Keywords match as lowercase substrings of the title and description, and
//! every hit counts. The weighted score is multiplied by
//! `(1 - decay_rate)^age_days` (floored at 0.1). Scores above 0.5 raise
//! priority, scores below lower it, by up to `score_weight` of the range.

use chrono::{DateTime, Utc};

use crate::domain::{AdjustmentKind, PriorityAdjustment, Task, TaskStatus};

use super::config::{EffortConfig, PriorityBounds};
use super::StageContext;

const COMPLEX_KEYWORDS: &[&str] = &[
    "refactor",
    "architecture",
    "migration",
    "integration",
    "algorithm",
    "optimization",
    "security",
    "performance",
    "scalability",
    "infrastructure",
];

const SIMPLE_KEYWORDS: &[&str] = &[
    "typo",
    "text",
    "copy",
    "documentation",
    "readme",
    "comment",
    "style",
    "color",
    "spacing",
    "alignment",
];

const IMPACT_KEYWORDS: &[&str] = &[
    "critical",
    "urgent",
    "blocking",
    "production",
    "security",
    "data loss",
    "outage",
    "crash",
    "failure",
    "bug",
    "fix",
    "emergency",
];

const USER_KEYWORDS: &[&str] = &[
    "user",
    "customer",
    "ui",
    "ux",
    "interface",
    "experience",
    "frontend",
    "mobile",
    "web",
    "accessibility",
];

const URGENCY_KEYWORDS: &[&str] = &[
    "urgent",
    "asap",
    "immediate",
    "now",
    "today",
    "deadline",
    "due",
    "release",
    "launch",
    "deploy",
];

const HEAVY_VERBS: &[&str] = &[
    "implement",
    "develop",
    "create",
    "build",
    "design",
    "research",
    "analyze",
    "test",
    "migrate",
    "refactor",
];

const LIGHT_VERBS: &[&str] = &[
    "update", "fix", "change", "modify", "adjust", "tweak", "correct", "edit", "review",
];

/// Lowest value of the age multiplier
const MIN_DECAY_FACTOR: f64 = 0.1;

/// Neutral score: no adjustment
const NEUTRAL: f64 = 0.5;

fn keyword_hits(text: &str, keywords: &[&str]) -> f64 {
    keywords.iter().filter(|k| text.contains(*k)).count() as f64
}

/// The four sub-scores, each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffortBreakdown {
    pub complexity: f64,
    pub impact: f64,
    pub urgency: f64,
    pub workload: f64,
}

impl EffortBreakdown {
    /// Computes all sub-scores for a task
    pub fn for_task(task: &Task, bounds: &PriorityBounds, now: DateTime<Utc>) -> Self {
        let text = task.search_text();
        Self {
            complexity: complexity_score(task, &text),
            impact: impact_score(task, &text, bounds),
            urgency: urgency_score(task, &text, now),
            workload: workload_score(task, &text),
        }
    }

    /// Weighted mean, or neutral when every weight is zero
    pub fn weighted(&self, cfg: &EffortConfig) -> f64 {
        let w = &cfg.weights;
        let total = w.total();
        if total <= 0.0 {
            return NEUTRAL;
        }
        (self.complexity * w.complexity
            + self.impact * w.impact
            + self.urgency * w.urgency
            + self.workload * w.workload)
            / total
    }
}

fn complexity_score(task: &Task, text: &str) -> f64 {
    let mut score = NEUTRAL;
    score += 0.1 * keyword_hits(text, COMPLEX_KEYWORDS);
    score -= 0.1 * keyword_hits(text, SIMPLE_KEYWORDS);
    score += 0.05 * task.depends_on.len() as f64;
    score += 0.03 * f64::from(task.subtask_count);
    score += 0.02 * f64::from(task.related_file_count);
    score.clamp(0.0, 1.0)
}

fn impact_score(task: &Task, text: &str, bounds: &PriorityBounds) -> f64 {
    let mut score = f64::from(task.priority) / f64::from(bounds.max_priority.max(1));
    score += 0.1 * keyword_hits(text, IMPACT_KEYWORDS);
    score += 0.05 * keyword_hits(text, USER_KEYWORDS);
    score.clamp(0.0, 1.0)
}

fn urgency_score(task: &Task, text: &str, now: DateTime<Utc>) -> f64 {
    let mut score = NEUTRAL;

    let age = task.days_since_created(now).unwrap_or(0);
    score += match age {
        a if a > 30 => 0.3,
        a if a > 14 => 0.2,
        a if a > 7 => 0.1,
        _ => 0.0,
    };

    score += match task.status {
        TaskStatus::Blocked => 0.2,
        TaskStatus::InProgress => 0.1,
        _ => 0.0,
    };

    score += 0.15 * keyword_hits(text, URGENCY_KEYWORDS);
    score.clamp(0.0, 1.0)
}

fn workload_score(task: &Task, text: &str) -> f64 {
    let mut score = NEUTRAL;

    let length = task.description.chars().count();
    if length > 500 {
        score += 0.2;
    } else if length < 50 {
        score -= 0.1;
    }

    score += 0.1 * f64::from(task.subtask_count);
    score += 0.05 * f64::from(task.related_file_count);
    score += 0.1 * keyword_hits(text, HEAVY_VERBS);
    score -= 0.05 * keyword_hits(text, LIGHT_VERBS);
    score.clamp(0.0, 1.0)
}

/// Final effort score for a task, including age decay
pub fn effort_score(
    task: &Task,
    cfg: &EffortConfig,
    bounds: &PriorityBounds,
    now: DateTime<Utc>,
) -> f64 {
    let breakdown = EffortBreakdown::for_task(task, bounds, now);
    let age = task.days_since_created(now).unwrap_or(0);
    let exponent = i32::try_from(age).unwrap_or(i32::MAX);
    let decay = (1.0 - cfg.decay_rate).powi(exponent).max(MIN_DECAY_FACTOR);

    (breakdown.weighted(cfg) * decay).clamp(0.0, 1.0)
}

/// Priority change implied by a score
///
/// The largest possible move is `range * score_weight`. Scores above
/// `boost_threshold` move up by at least `min_boost_share` of that.
pub fn score_adjustment(score: f64, cfg: &EffortConfig, bounds: &PriorityBounds) -> i64 {
    let max_adjustment = bounds.range() * cfg.score_weight;
    let mut adjustment = (score - NEUTRAL) * max_adjustment;
    if score > cfg.boost_threshold {
        adjustment = adjustment.max(max_adjustment * cfg.min_boost_share);
    }
    adjustment.round() as i64
}

/// Nudges incomplete tasks by their effort score
pub fn apply_effort_weighting(ctx: &StageContext) -> Vec<PriorityAdjustment> {
    let cfg = &ctx.config.effort;
    let bounds = &ctx.config.bounds;
    let mut adjustments = Vec::new();

    for task in ctx.tasks {
        if task.is_complete() {
            continue;
        }

        let score = effort_score(task, cfg, bounds, ctx.now);
        let adjustment = score_adjustment(score, cfg, bounds);
        if adjustment.abs() < 1 {
            continue;
        }

        let new_priority = bounds.clamp(i64::from(task.priority) + adjustment);
        if new_priority == task.priority {
            continue;
        }

        adjustments.push(PriorityAdjustment::new(
            task.id,
            AdjustmentKind::EffortWeighting {
                effort_score: score,
            },
            task.priority,
            new_priority,
            format!("Effort score {:.2}", score),
        ));
    }

    adjustments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DependencyGraph;
    use crate::priority::test_support::*;
    use crate::priority::PriorityConfig;
    use chrono::Duration;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn plain(n: u32, priority: u32, title: &str) -> Task {
        let mut t = task(n, priority, &[]);
        t.title = title.to_string();
        // 50..=200 characters: neutral description length
        t.set_description("x".repeat(100));
        t
    }

    #[test]
    fn complexity_keywords_and_counts() {
        let mut t = plain(1, 500, "Security architecture review");
        t.add_dependency(id(9));
        t.subtask_count = 3;
        t.related_file_count = 2;

        let b = EffortBreakdown::for_task(&t, &PriorityBounds::default(), now());
        // 0.5 + 0.2 keywords + 0.05 dep + 0.09 subtasks + 0.04 files
        assert!(approx(b.complexity, 0.88));

        let t = plain(2, 500, "Fix typo and style");
        let b = EffortBreakdown::for_task(&t, &PriorityBounds::default(), now());
        assert!(approx(b.complexity, 0.3));
    }

    #[test]
    fn impact_starts_from_priority() {
        let t = plain(1, 600, "Production outage");
        let b = EffortBreakdown::for_task(&t, &PriorityBounds::default(), now());
        assert!(approx(b.impact, 0.8));

        let t = plain(2, 500, "Mobile checkout flow");
        let b = EffortBreakdown::for_task(&t, &PriorityBounds::default(), now());
        assert!(approx(b.impact, 0.55));

        let t = plain(3, 950, "Critical production customer outage");
        let b = EffortBreakdown::for_task(&t, &PriorityBounds::default(), now());
        assert!(approx(b.impact, 1.0));
    }

    #[test]
    fn urgency_tracks_age_and_status() {
        let mut t = plain(1, 500, "Something");
        t.created_at = Some(now() - Duration::days(20));
        t.status = TaskStatus::Blocked;

        let b = EffortBreakdown::for_task(&t, &PriorityBounds::default(), now());
        assert!(approx(b.urgency, 0.9));

        let fresh = plain(2, 500, "Urgent hotfix");
        let b = EffortBreakdown::for_task(&fresh, &PriorityBounds::default(), now());
        assert!(approx(b.urgency, 0.65));
    }

    #[test]
    fn workload_tracks_description_and_verbs() {
        let mut t = plain(1, 500, "Implement and design the importer");
        t.set_description("y".repeat(600));
        let b = EffortBreakdown::for_task(&t, &PriorityBounds::default(), now());
        assert!(approx(b.workload, 0.9));

        let mut t = plain(2, 500, "Update version");
        t.description.clear();
        let b = EffortBreakdown::for_task(&t, &PriorityBounds::default(), now());
        assert!(approx(b.workload, 0.35));
    }

    #[test]
    fn weighted_score_by_hand() {
        let mut t = plain(1, 600, "Refactor payment integration");
        t.add_dependency(id(9));
        t.subtask_count = 2;

        let b = EffortBreakdown::for_task(&t, &PriorityBounds::default(), now());
        assert!(approx(b.complexity, 0.81));
        assert!(approx(b.impact, 0.6));
        assert!(approx(b.urgency, 0.5));
        assert!(approx(b.workload, 0.8));

        // (0.81 * 0.4 + 0.6 * 0.6 + 0.5 * 0.5 + 0.8 * 0.3) / 1.8
        let cfg = EffortConfig::default();
        let bounds = PriorityBounds::default();
        let score = effort_score(&t, &cfg, &bounds, now());
        assert!(approx(score, 1.174 / 1.8));

        // (0.6522 - 0.5) * 999 * 0.3 = 45.6
        assert_eq!(score_adjustment(score, &cfg, &bounds), 46);
    }

    #[test]
    fn zero_weights_are_neutral() {
        let mut cfg = EffortConfig::default();
        cfg.weights.complexity = 0.0;
        cfg.weights.impact = 0.0;
        cfg.weights.urgency = 0.0;
        cfg.weights.workload = 0.0;

        let b = EffortBreakdown {
            complexity: 1.0,
            impact: 1.0,
            urgency: 1.0,
            workload: 1.0,
        };
        assert!(approx(b.weighted(&cfg), 0.5));
    }

    #[test]
    fn old_tasks_score_lower() {
        let cfg = EffortConfig::default();
        let bounds = PriorityBounds::default();
        let fresh = plain(1, 800, "Critical production security migration");
        let mut old = fresh.clone();
        old.created_at = Some(now() - Duration::days(400));

        let fresh_score = effort_score(&fresh, &cfg, &bounds, now());
        let old_score = effort_score(&old, &cfg, &bounds, now());
        assert!(old_score < fresh_score);
        assert!(old_score >= 0.0);
    }

    #[test]
    fn adjustment_scales_with_range_and_weight() {
        let cfg = EffortConfig::default();
        let bounds = PriorityBounds::default();

        assert_eq!(score_adjustment(0.5, &cfg, &bounds), 0);
        // (0.6 - 0.5) * 999 * 0.3 = 29.97
        assert_eq!(score_adjustment(0.6, &cfg, &bounds), 30);
        assert_eq!(score_adjustment(0.4, &cfg, &bounds), -30);
        assert_eq!(score_adjustment(0.85, &cfg, &bounds), 105);
    }

    #[test]
    fn high_scores_get_a_minimum_boost() {
        let cfg = EffortConfig {
            boost_threshold: 0.5,
            ..EffortConfig::default()
        };
        let bounds = PriorityBounds::default();

        // 0.05 * 299.7 = 15, raised to 10% of 299.7
        assert_eq!(score_adjustment(0.55, &cfg, &bounds), 30);
        assert_eq!(score_adjustment(0.45, &cfg, &bounds), -15);
    }

    #[test]
    fn stage_records_score() {
        let mut config = PriorityConfig::default();
        config.effort.enabled = true;

        let tasks = vec![
            plain(1, 900, "Critical production security migration, urgent"),
            plain(2, 100, "Fix typo"),
            done(plain(3, 900, "Critical production outage")),
        ];
        let graph = DependencyGraph::from_tasks(&tasks);
        let adjustments = apply_effort_weighting(&StageContext::new(&tasks, &graph, &config, now()));

        let up = adjustments.iter().find(|a| a.task_id == id(1)).unwrap();
        assert!(up.new_priority > 900);
        assert!(matches!(up.kind, AdjustmentKind::EffortWeighting { effort_score } if effort_score > 0.5));

        let down = adjustments.iter().find(|a| a.task_id == id(2)).unwrap();
        assert!(down.new_priority < 100);

        assert!(adjustments.iter().all(|a| a.task_id != id(3)));
    }
}
