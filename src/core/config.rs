//! Planner configuration with documented constants
//!
//! All tuning knobs for objective generation and scheduling are collected
//! here with explanations of their purpose and how they interact.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for the turn planner
///
/// These values reproduce the classic coarse-priority scheme: every objective
/// kind shares the same base value and the scheduler differentiates only
/// among nearly-tied options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Base priority assigned to every generated objective
    ///
    /// Priorities are intentionally coarse: visiting a treasure chest and
    /// starting a building both begin at this value. Differentiation comes
    /// from jitter, not from a utility model.
    #[serde(default = "default_base_value")]
    pub objective_base_value: f32,

    /// Width of the random jitter added on top of the base value
    ///
    /// Each objective draws from `[0, objective_jitter)`. Jitter breaks ties
    /// between equally-valued objectives so several actors don't resolve
    /// them in the same order every turn.
    #[serde(default = "default_jitter")]
    pub objective_jitter: f32,

    /// Minimum priority an objective must reach to be worth fulfilling
    ///
    /// The turn ends once the best remaining candidate falls below this.
    /// With the default base value of 100.0 every generated objective
    /// passes; the threshold exists so a zero- or negative-value objective
    /// kind is skipped rather than executed.
    #[serde(default = "default_viability")]
    pub viability_threshold: f32,
}

fn default_base_value() -> f32 {
    100.0
}

fn default_jitter() -> f32 {
    30.0
}

fn default_viability() -> f32 {
    1.0
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            objective_base_value: default_base_value(),
            objective_jitter: default_jitter(),
            viability_threshold: default_viability(),
        }
    }
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.objective_base_value <= 0.0 {
            return Err("objective_base_value must be positive".into());
        }

        if self.objective_jitter < 0.0 {
            return Err("objective_jitter must not be negative".into());
        }

        // Jitter should not dominate the base value, or priorities stop
        // being coarse and start being random.
        if self.objective_jitter >= self.objective_base_value {
            return Err(format!(
                "objective_jitter ({}) should be < objective_base_value ({})",
                self.objective_jitter, self.objective_base_value
            ));
        }

        if self.viability_threshold <= 0.0 {
            return Err("viability_threshold must be positive".into());
        }

        Ok(())
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let config: PlannerConfig =
            toml::from_str(contents).map_err(|e| format!("Failed to parse planner TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read planner config {:?}: {}", path, e))?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PlannerConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let config = PlannerConfig::default();
        assert_eq!(config.objective_base_value, 100.0);
        assert_eq!(config.objective_jitter, 30.0);
        assert_eq!(config.viability_threshold, 1.0);
    }

    #[test]
    fn test_jitter_must_stay_below_base() {
        let config = PlannerConfig {
            objective_base_value: 10.0,
            objective_jitter: 20.0,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_viability_must_be_positive() {
        let config = PlannerConfig {
            viability_threshold: 0.0,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_str() {
        let config = PlannerConfig::from_toml_str(
            r#"
            objective_base_value = 80.0
            objective_jitter = 15.0
            "#,
        )
        .expect("should parse");
        assert_eq!(config.objective_base_value, 80.0);
        assert_eq!(config.objective_jitter, 15.0);
        // Unset fields fall back to defaults
        assert_eq!(config.viability_threshold, 1.0);
    }

    #[test]
    fn test_from_toml_str_rejects_invalid() {
        let result = PlannerConfig::from_toml_str("objective_base_value = -5.0");
        assert!(result.is_err());
    }
}
