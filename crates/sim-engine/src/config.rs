//! Per-level market parameter defaults and YAML-loadable overrides.
//!
//! Every default constant here is load-bearing: stored results were
//! computed under these values, so they must not drift.

use serde::{Deserialize, Serialize};
use sim_core::{CobbDouglasTech, Level, MarketParams};
use std::path::Path;
use thiserror::Error;

/// Errors from loading a market configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read market config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse market config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Market parameters for all five levels.
///
/// A YAML file may override any subset of levels; absent levels keep
/// their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    #[serde(default = "level1_defaults")]
    pub level1: MarketParams,
    #[serde(default = "level2_defaults")]
    pub level2: MarketParams,
    #[serde(default = "level3_defaults")]
    pub level3: MarketParams,
    #[serde(default = "level4_defaults")]
    pub level4: MarketParams,
    #[serde(default = "level5_defaults")]
    pub level5: MarketParams,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            level1: level1_defaults(),
            level2: level2_defaults(),
            level3: level3_defaults(),
            level4: level4_defaults(),
            level5: level5_defaults(),
        }
    }
}

impl MarketConfig {
    /// Parameters for one level.
    pub fn params(&self, level: Level) -> &MarketParams {
        match level {
            Level::SingleInput => &self.level1,
            Level::InputMix => &self.level2,
            Level::ReturnsToScale => &self.level3,
            Level::Shutdown => &self.level4,
            Level::PlantChoice => &self.level5,
        }
    }

    /// Parse a YAML document; absent levels keep their defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Load from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_yaml_str(&std::fs::read_to_string(path)?)
    }
}

fn symmetric_tech() -> CobbDouglasTech {
    CobbDouglasTech {
        a: 5.0,
        alpha: 0.5,
        beta: 0.5,
    }
}

fn level1_defaults() -> MarketParams {
    MarketParams {
        output_price: 20_000.0,
        wage_rate: 50_000.0,
        rental_rate: None,
        fixed_capital: Some(10.0),
        technology: None,
    }
}

fn level2_defaults() -> MarketParams {
    MarketParams {
        output_price: 20_000.0,
        wage_rate: 50_000.0,
        rental_rate: Some(100_000.0),
        fixed_capital: None,
        technology: Some(symmetric_tech()),
    }
}

fn level3_defaults() -> MarketParams {
    MarketParams {
        output_price: 18_000.0,
        wage_rate: 45_000.0,
        rental_rate: Some(90_000.0),
        fixed_capital: None,
        technology: Some(CobbDouglasTech {
            a: 5.0,
            alpha: 0.6,
            beta: 0.6,
        }),
    }
}

fn level4_defaults() -> MarketParams {
    MarketParams {
        output_price: 25_000.0,
        wage_rate: 60_000.0,
        rental_rate: Some(120_000.0),
        fixed_capital: Some(20.0),
        technology: Some(symmetric_tech()),
    }
}

fn level5_defaults() -> MarketParams {
    MarketParams {
        output_price: 30_000.0,
        wage_rate: 50_000.0,
        rental_rate: Some(100_000.0),
        fixed_capital: None,
        technology: Some(symmetric_tech()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_the_expected_constants() {
        let config = MarketConfig::default();
        assert_eq!(config.level1.output_price, 20_000.0);
        assert_eq!(config.level1.fixed_capital, Some(10.0));
        assert_eq!(config.level2.rental_rate, Some(100_000.0));
        assert_eq!(config.level3.wage_rate, 45_000.0);
        let tech3 = config.level3.technology.unwrap();
        assert_eq!((tech3.alpha, tech3.beta), (0.6, 0.6));
        assert_eq!(config.level4.fixed_capital, Some(20.0));
        assert_eq!(config.level4.output_price, 25_000.0);
        assert_eq!(config.level5.output_price, 30_000.0);
    }

    #[test]
    fn every_level_resolves_to_its_params() {
        let config = MarketConfig::default();
        for level in Level::ALL {
            assert!(sim_core::validate_params(level, config.params(level)).is_ok());
        }
    }

    #[test]
    fn partial_yaml_overrides_one_level() {
        let yaml = r#"
level1:
  output_price: 22000
  wage_rate: 40000
  fixed_capital: 12
"#;
        let config = MarketConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.level1.output_price, 22_000.0);
        assert_eq!(config.level1.wage_rate, 40_000.0);
        assert_eq!(config.level1.fixed_capital, Some(12.0));
        // Untouched levels keep their defaults.
        assert_eq!(config.level4, MarketConfig::default().level4);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(MarketConfig::from_yaml_str("level1: [not, a, map]").is_err());
    }
}
