//! Tunables for the recalculation pipeline
//!
//! Every section deserializes with `#[serde(default)]`, so a TOML file only
//! needs to name the values it changes:
//!
//! ```toml
//! [cascade]
//! high_priority_threshold = 850
//!
//! [time_decay]
//! enabled = true
//! model = "adaptive"
//! ```
//!
//! Values are not range-checked here; see `storage::Config::validate`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive priority range
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityBounds {
    pub min_priority: u32,
    pub max_priority: u32,
}

impl Default for PriorityBounds {
    fn default() -> Self {
        Self {
            min_priority: 1,
            max_priority: 1000,
        }
    }
}

impl PriorityBounds {
    /// Clamps a raw value into the range
    pub fn clamp(&self, value: i64) -> u32 {
        value
            .max(i64::from(self.min_priority))
            .min(i64::from(self.max_priority)) as u32
    }

    /// Clamps a fractional value, rounding to the nearest integer first
    pub fn clamp_f64(&self, value: f64) -> u32 {
        if value.is_nan() {
            return self.min_priority;
        }
        self.clamp(value.round() as i64)
    }

    /// Number of distinct priority values
    pub fn space_size(&self) -> usize {
        (self.max_priority.saturating_sub(self.min_priority) as usize) + 1
    }

    /// Width of the range (`max - min`)
    pub fn range(&self) -> f64 {
        f64::from(self.max_priority.saturating_sub(self.min_priority))
    }
}

/// Simple boost for tasks that other tasks depend on
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyBoostConfig {
    pub enabled: bool,

    /// Fraction of the task's priority added per dependent
    pub boost_factor: f64,

    /// Upper bound on the boost
    pub max_boost: u32,
}

impl Default for DependencyBoostConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            boost_factor: 0.1,
            max_boost: 200,
        }
    }
}

/// Prerequisites inherit urgency from the tasks waiting on them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InheritanceConfig {
    pub enabled: bool,

    /// Multiplier applied per hop
    pub decay_factor: f64,

    /// Hops followed along dependents
    pub max_depth: usize,

    /// Lowest value an inherited priority is reported as
    pub min_inherited_priority: u32,
}

impl Default for InheritanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            decay_factor: 0.8,
            max_depth: 5,
            min_inherited_priority: 50,
        }
    }
}

/// Boost for tasks that transitively block many incomplete tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockingConfig {
    pub enabled: bool,

    /// Minimum number of blocked tasks before a boost applies
    pub threshold: usize,

    /// Points per blocked task
    pub points_per_blocked: u32,

    /// Upper bound on the boost
    pub boost_cap: u32,
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 3,
            points_per_blocked: 25,
            boost_cap: 150,
        }
    }
}

/// Boost for tasks on critical root-to-leaf chains
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalPathConfig {
    pub enabled: bool,

    /// Minimum path score (0..=1) for a path to count as critical
    pub threshold: f64,

    /// Boost at a path score of 1.0
    pub boost: f64,

    /// Enumeration stops after this many paths
    pub max_paths: usize,
}

impl Default for CriticalPathConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.8,
            boost: 100.0,
            max_paths: 10_000,
        }
    }
}

/// Downstream propagation of high priorities
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    pub enabled: bool,

    /// Tasks at or above this priority seed a cascade
    pub high_priority_threshold: u32,

    /// Per-hop decay rate
    pub decay_rate: f64,

    /// Hops followed from each seed
    pub max_depth: usize,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            high_priority_threshold: 800,
            decay_rate: 0.7,
            max_depth: 3,
        }
    }
}

/// Mathematical model used by time decay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecayModel {
    Linear,
    #[default]
    Exponential,
    Logarithmic,
    Sigmoid,
    Adaptive,
}

impl DecayModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecayModel::Linear => "linear",
            DecayModel::Exponential => "exponential",
            DecayModel::Logarithmic => "logarithmic",
            DecayModel::Sigmoid => "sigmoid",
            DecayModel::Adaptive => "adaptive",
        }
    }
}

impl DecayModel {
    /// Every model, in the order they are listed to users
    pub fn all() -> [DecayModel; 5] {
        [
            DecayModel::Linear,
            DecayModel::Exponential,
            DecayModel::Logarithmic,
            DecayModel::Sigmoid,
            DecayModel::Adaptive,
        ]
    }

    pub fn description(&self) -> &'static str {
        match self {
            DecayModel::Linear => "Loses the same share of priority every day",
            DecayModel::Exponential => "Compounds daily, so losses accelerate with age",
            DecayModel::Logarithmic => "Fast at first, then levels off",
            DecayModel::Sigmoid => "Slow start, steep around 30 days, then slow again",
            DecayModel::Adaptive => {
                "Exponential with a rate tuned per task; critical tasks gain priority instead"
            }
        }
    }

    pub fn use_case(&self) -> &'static str {
        match self {
            DecayModel::Linear => "Predictable backlogs with steady throughput",
            DecayModel::Exponential => "Keeping stale work from crowding the top",
            DecayModel::Logarithmic => "Gentle aging for long-lived roadmaps",
            DecayModel::Sigmoid => "Grace period before old tasks drop",
            DecayModel::Adaptive => "Mixed backlogs where status and urgency vary",
        }
    }
}

impl fmt::Display for DecayModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age-based priority drift
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeDecayConfig {
    pub enabled: bool,

    pub model: DecayModel,

    /// Base decay rate per day
    pub rate: f64,

    /// Days of inactivity before decay starts
    pub threshold_days: i64,

    /// Scale the rate by `2 - priority / max_priority`, so high priorities
    /// decay slower
    pub priority_weight: bool,

    /// Aging boost per 30 days for critical tasks (adaptive model)
    pub max_aging_boost: u32,
}

impl Default for TimeDecayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: DecayModel::Exponential,
            rate: 0.05,
            threshold_days: 7,
            priority_weight: true,
            max_aging_boost: 100,
        }
    }
}

/// Relative weights of the effort sub-scores
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffortWeights {
    pub complexity: f64,
    pub impact: f64,
    pub urgency: f64,
    pub workload: f64,
}

impl Default for EffortWeights {
    fn default() -> Self {
        Self {
            complexity: 0.4,
            impact: 0.6,
            urgency: 0.5,
            workload: 0.3,
        }
    }
}

impl EffortWeights {
    pub fn total(&self) -> f64 {
        self.complexity + self.impact + self.urgency + self.workload
    }
}

/// Heuristic effort-based adjustment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffortConfig {
    pub enabled: bool,

    /// Share of the priority range an effort score can move a task
    pub score_weight: f64,

    /// Scores above this always get at least `min_boost_share` of the
    /// largest possible adjustment
    pub boost_threshold: f64,

    pub min_boost_share: f64,

    /// Daily decay of the effort score
    pub decay_rate: f64,

    pub weights: EffortWeights,
}

impl Default for EffortConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            score_weight: 0.3,
            boost_threshold: 0.7,
            min_boost_share: 0.1,
            decay_rate: 0.02,
            weights: EffortWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UniquenessConfig {
    pub enabled: bool,

    /// Step used when searching for a free value
    pub spacing: u32,
}

impl Default for UniquenessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spacing: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    pub enabled: bool,

    /// Utilization ratio at which priorities are spread out again
    pub compression_threshold: f64,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            compression_threshold: 0.8,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PriorityConfig {
    pub bounds: PriorityBounds,
    pub dependency: DependencyBoostConfig,
    pub inheritance: InheritanceConfig,
    pub blocking: BlockingConfig,
    pub critical_path: CriticalPathConfig,
    pub cascade: CascadeConfig,
    pub time_decay: TimeDecayConfig,
    pub effort: EffortConfig,
    pub uniqueness: UniquenessConfig,
    pub distribution: DistributionConfig,
}
