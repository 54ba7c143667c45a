//! Configuration handling for shape-priority
//!
//! The recalculation settings live in a single TOML file. An explicit path
//! wins; otherwise `priority.toml` in the user config directory
//! (`~/.config/shape-priority/` on Linux) is used when it exists.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use thiserror::Error;

use crate::priority::PriorityConfig;

/// File name looked up in the global config directory
pub const CONFIG_FILE_NAME: &str = "priority.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Effective configuration and where it came from
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub priority: PriorityConfig,

    /// File the settings were read from, `None` for built-in defaults
    pub source: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from `explicit` or the default location
    ///
    /// A missing explicit file is an error; a missing default file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::global_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME)) {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "shape", "shape-priority")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Reads and validates a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let priority: PriorityConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        let config = Self {
            priority,
            source: Some(path.to_path_buf()),
        };
        config
            .validate()
            .with_context(|| format!("Rejected config: {}", path.display()))?;

        Ok(config)
    }

    /// Checks value ranges the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.priority;

        if p.bounds.min_priority == 0 {
            return Err(ConfigError::Invalid(
                "bounds.min_priority must be at least 1".to_string(),
            ));
        }
        if p.bounds.min_priority > p.bounds.max_priority {
            return Err(ConfigError::Invalid(format!(
                "bounds.min_priority ({}) exceeds bounds.max_priority ({})",
                p.bounds.min_priority, p.bounds.max_priority
            )));
        }
        if p.uniqueness.spacing == 0 {
            return Err(ConfigError::Invalid(
                "uniqueness.spacing must be at least 1".to_string(),
            ));
        }

        let rates = [
            ("dependency.boost_factor", p.dependency.boost_factor),
            ("inheritance.decay_factor", p.inheritance.decay_factor),
            ("critical_path.threshold", p.critical_path.threshold),
            ("critical_path.boost", p.critical_path.boost),
            ("cascade.decay_rate", p.cascade.decay_rate),
            ("time_decay.rate", p.time_decay.rate),
            ("effort.score_weight", p.effort.score_weight),
            ("effort.boost_threshold", p.effort.boost_threshold),
            ("effort.min_boost_share", p.effort.min_boost_share),
            ("effort.decay_rate", p.effort.decay_rate),
            ("effort.weights.complexity", p.effort.weights.complexity),
            ("effort.weights.impact", p.effort.weights.impact),
            ("effort.weights.urgency", p.effort.weights.urgency),
            ("effort.weights.workload", p.effort.weights.workload),
            (
                "distribution.compression_threshold",
                p.distribution.compression_threshold,
            ),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    /// Serializes the priority settings as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(&self.priority).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::DecayModel;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("priority.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn default_config() {
        let config = Config::default();

        assert!(config.source.is_none());
        assert_eq!(config.priority.bounds.max_priority, 1000);
        assert_eq!(config.priority.cascade.high_priority_threshold, 800);
        assert!(!config.priority.time_decay.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[time_decay]
enabled = true
model = "adaptive"

[blocking]
threshold = 5
"#,
        );

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.source.as_deref(), Some(path.as_path()));
        assert!(config.priority.time_decay.enabled);
        assert_eq!(config.priority.time_decay.model, DecayModel::Adaptive);
        assert_eq!(config.priority.blocking.threshold, 5);
        assert_eq!(config.priority.blocking.points_per_blocked, 25);
        assert!((config.priority.inheritance.decay_factor - 0.8).abs() < 1e-12);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn parse_error_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[bounds\nmin_priority = ");

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[bounds]\nmin_priority = 50\nmax_priority = 10\n");

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("exceeds"));
    }

    #[test]
    fn zero_minimum_is_rejected() {
        let mut config = Config::default();
        config.priority.bounds.min_priority = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn negative_rate_is_rejected() {
        let mut config = Config::default();
        config.priority.cascade.decay_rate = -0.2;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cascade.decay_rate"));
    }

    #[test]
    fn zero_spacing_is_rejected() {
        let mut config = Config::default();
        config.priority.uniqueness.spacing = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_output_parses_back() {
        let config = Config::default();
        let text = config.to_toml().unwrap();

        assert!(text.contains("[cascade]"));
        let parsed: PriorityConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.uniqueness.spacing, 1);
    }
}
