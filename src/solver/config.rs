//! Solver configuration.
//!
//! Can be built in code with `with_*` setters or loaded from TOML:
//!
//! ```
//! use u_timetable::solver::SolverConfig;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     time_limit_ms = 5000
//!     node_limit = 1000000
//!     prefer_even_distribution = false
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit_ms, Some(5000));
//! assert!(!config.prefer_even_distribution);
//! assert!(config.forward_checking);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Search budget and heuristic switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    /// Wall-clock budget in milliseconds. `None` = unbounded; `Some(0)`
    /// fails immediately with a timeout.
    pub time_limit_ms: Option<u64>,

    /// Maximum number of placement attempts. `None` = unbounded.
    pub node_limit: Option<u64>,

    /// Spread each class's lectures across the week (soft preference).
    pub prefer_even_distribution: bool,

    /// Prune placements that leave a remaining demand without enough slots.
    pub forward_checking: bool,

    /// Search independent components concurrently (needs the `parallel` feature).
    pub parallel_components: bool,

    /// The clock is sampled every `clock_check_interval` search steps.
    /// Must be a power of two.
    pub clock_check_interval: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: Some(30_000),
            node_limit: None,
            prefer_even_distribution: true,
            forward_checking: true,
            parallel_components: true,
            clock_check_interval: 256,
        }
    }
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn without_time_limit(mut self) -> Self {
        self.time_limit_ms = None;
        self
    }

    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    pub fn with_even_distribution(mut self, enabled: bool) -> Self {
        self.prefer_even_distribution = enabled;
        self
    }

    pub fn with_forward_checking(mut self, enabled: bool) -> Self {
        self.forward_checking = enabled;
        self
    }

    pub fn with_parallel_components(mut self, enabled: bool) -> Self {
        self.parallel_components = enabled;
        self
    }

    pub fn with_clock_check_interval(mut self, interval: u64) -> Self {
        self.clock_check_interval = interval;
        self
    }

    /// The same budget with soft preferences switched off.
    ///
    /// Intended for retrying after a timeout.
    pub fn relaxed(&self) -> Self {
        Self {
            prefer_even_distribution: false,
            ..self.clone()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.clock_check_interval.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "clock_check_interval must be a power of two, got {}",
                self.clock_check_interval
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.time_limit_ms, Some(30_000));
        assert_eq!(config.node_limit, None);
        assert!(config.prefer_even_distribution);
        assert!(config.forward_checking);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SolverConfig::new()
            .without_time_limit()
            .with_node_limit(10)
            .with_forward_checking(false)
            .with_parallel_components(false);
        assert_eq!(config.time_limit_ms, None);
        assert_eq!(config.node_limit, Some(10));
        assert!(!config.forward_checking);
        assert!(!config.parallel_components);
    }

    #[test]
    fn test_relaxed() {
        let config = SolverConfig::default().with_time_limit_ms(5).relaxed();
        assert!(!config.prefer_even_distribution);
        assert_eq!(config.time_limit_ms, Some(5));
    }

    #[test]
    fn test_validate_bad_interval() {
        let config = SolverConfig::default().with_clock_check_interval(100);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_toml_partial() {
        let config = SolverConfig::from_toml_str("node_limit = 42").unwrap();
        assert_eq!(config.node_limit, Some(42));
        assert_eq!(config.time_limit_ms, Some(30_000));
    }

    #[test]
    fn test_toml_invalid() {
        assert!(matches!(
            SolverConfig::from_toml_str("clock_check_interval = 3"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SolverConfig::from_toml_str("time_limit_ms = \"soon\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            SolverConfig::load("/nonexistent/u-timetable.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
