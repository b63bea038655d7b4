//! # Runtime Configuration
//!
//! Defaults with environment overrides.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `WORLD_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `WORLD_JSON_LOGS` | `false` | JSON log output |
//! | `WORLD_PLAY_TIME_INTERVAL_SECS` | `60` | Play-time accrual period |
//! | `WORLD_COMMAND_PREFIX` | `/` | Chat command prefix |
//! | `WORLD_MAX_HEALTH` | `200` | Health ceiling |
//! | `WORLD_MAX_ARMOUR` | `100` | Armour ceiling |

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::lifecycle::Limits;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Log filter directive (trace, debug, info, warn, error, or a full
    /// `EnvFilter` expression).
    pub log_level: String,
    /// Emit JSON-formatted logs.
    pub json_logs: bool,
    /// Seconds between play-time accruals.
    pub play_time_interval_secs: u64,
    /// Prefix that marks a chat message as a command.
    pub command_prefix: String,
    pub max_health: f32,
    pub max_armour: f32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            play_time_interval_secs: 60,
            command_prefix: "/".to_string(),
            max_health: 200.0,
            max_armour: 100.0,
        }
    }
}

fn parse<T: FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}

fn parse_bool(var: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::to_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes") => Ok(true),
        Some("0" | "false" | "no") => Ok(false),
        Some(_) => Err(ConfigError::InvalidValue {
            var,
            value: raw.unwrap_or_default(),
        }),
    }
}

impl RuntimeConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using `lookup` to resolve variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            log_level: lookup("WORLD_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            json_logs: parse_bool("WORLD_JSON_LOGS", lookup("WORLD_JSON_LOGS"), defaults.json_logs)?,
            play_time_interval_secs: parse(
                "WORLD_PLAY_TIME_INTERVAL_SECS",
                lookup("WORLD_PLAY_TIME_INTERVAL_SECS"),
                defaults.play_time_interval_secs,
            )?,
            command_prefix: lookup("WORLD_COMMAND_PREFIX").unwrap_or(defaults.command_prefix),
            max_health: parse("WORLD_MAX_HEALTH", lookup("WORLD_MAX_HEALTH"), defaults.max_health)?,
            max_armour: parse("WORLD_MAX_ARMOUR", lookup("WORLD_MAX_ARMOUR"), defaults.max_armour)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.play_time_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                var: "WORLD_PLAY_TIME_INTERVAL_SECS",
                value: "0".to_string(),
            });
        }
        if self.command_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "WORLD_COMMAND_PREFIX",
                value: String::new(),
            });
        }
        for (var, value) in [
            ("WORLD_MAX_HEALTH", self.max_health),
            ("WORLD_MAX_ARMOUR", self.max_armour),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    var,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn play_time_interval(&self) -> Duration {
        Duration::from_secs(self.play_time_interval_secs)
    }

    #[must_use]
    pub fn limits(&self) -> Limits {
        Limits {
            max_health: self.max_health,
            max_armour: self.max_armour,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.play_time_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_overrides() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("RUST_LOG", "debug"),
            ("WORLD_JSON_LOGS", "TRUE"),
            ("WORLD_PLAY_TIME_INTERVAL_SECS", "5"),
            ("WORLD_COMMAND_PREFIX", "!"),
            ("WORLD_MAX_HEALTH", "150"),
        ]))
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert!(config.json_logs);
        assert_eq!(config.play_time_interval_secs, 5);
        assert_eq!(config.command_prefix, "!");
        assert_eq!(config.limits().max_health, 150.0);
        assert_eq!(config.limits().max_armour, 100.0);
    }

    #[test]
    fn test_world_log_level_wins_over_rust_log() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("RUST_LOG", "debug"),
            ("WORLD_LOG_LEVEL", "warn"),
        ]))
        .unwrap();
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_invalid_values() {
        let err = RuntimeConfig::from_lookup(lookup(&[("WORLD_MAX_HEALTH", "lots")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                var: "WORLD_MAX_HEALTH",
                value: "lots".to_string()
            }
        );

        assert!(RuntimeConfig::from_lookup(lookup(&[("WORLD_JSON_LOGS", "maybe")])).is_err());
        assert!(
            RuntimeConfig::from_lookup(lookup(&[("WORLD_PLAY_TIME_INTERVAL_SECS", "0")])).is_err()
        );
        assert!(RuntimeConfig::from_lookup(lookup(&[("WORLD_MAX_ARMOUR", "-1")])).is_err());
    }
}
