use serde::Serialize;
use std::env;

use crate::progression::{ProgressionPolicy, DEFAULT_PROGRESSION_PERCENTAGE};
use crate::stagnation::StagnationThresholds;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_DATABASE_URL: &str = "sqlite://lift-log.db?mode=rwc";
const DEFAULT_LOG_FILTER: &str = "info";
const MAX_PROGRESSION_PERCENTAGE: f64 = 0.2;

pub const ENV_DATABASE_URL: &str = "LIFT_LOG_DATABASE_URL";
pub const ENV_LOG_FILTER: &str = "LIFT_LOG_LOG";
pub const ENV_STAGNATION_WARNING_WEEKS: &str = "LIFT_LOG_STAGNATION_WARNING_WEEKS";
pub const ENV_STAGNATION_CRITICAL_WEEKS: &str = "LIFT_LOG_STAGNATION_CRITICAL_WEEKS";
pub const ENV_PROGRESSION_PERCENT: &str = "LIFT_LOG_PROGRESSION_PERCENT";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {key}: {reason}")]
  Invalid { key: &'static str, reason: String },
}

impl Serialize for ConfigError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// App Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub database_url: String,
  /// `tracing_subscriber::EnvFilter` directive
  pub log_filter: String,
  pub stagnation: StagnationThresholds,
  pub progression: ProgressionPolicy,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      log_filter: DEFAULT_LOG_FILTER.to_string(),
      stagnation: StagnationThresholds::default(),
      progression: ProgressionPolicy::default(),
    }
  }
}

impl AppConfig {
  /// Read configuration from the environment, falling back to defaults for
  /// anything unset. Call `dotenvy::dotenv()` first to pick up a `.env` file.
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();

    let stagnation = StagnationThresholds {
      warning_weeks: parse_var(ENV_STAGNATION_WARNING_WEEKS)?
        .unwrap_or(defaults.stagnation.warning_weeks),
      critical_weeks: parse_var(ENV_STAGNATION_CRITICAL_WEEKS)?
        .unwrap_or(defaults.stagnation.critical_weeks),
    };
    if stagnation.warning_weeks == 0 {
      return Err(ConfigError::Invalid {
        key: ENV_STAGNATION_WARNING_WEEKS,
        reason: "must be at least 1".into(),
      });
    }
    if stagnation.critical_weeks <= stagnation.warning_weeks {
      return Err(ConfigError::Invalid {
        key: ENV_STAGNATION_CRITICAL_WEEKS,
        reason: format!("must exceed the warning threshold ({})", stagnation.warning_weeks),
      });
    }

    let percentage: f64 =
      parse_var(ENV_PROGRESSION_PERCENT)?.unwrap_or(DEFAULT_PROGRESSION_PERCENTAGE);
    if !(percentage > 0.0 && percentage <= MAX_PROGRESSION_PERCENTAGE) {
      return Err(ConfigError::Invalid {
        key: ENV_PROGRESSION_PERCENT,
        reason: format!("must be in (0, {}]", MAX_PROGRESSION_PERCENTAGE),
      });
    }

    Ok(Self {
      database_url: env::var(ENV_DATABASE_URL).unwrap_or(defaults.database_url),
      log_filter: env::var(ENV_LOG_FILTER).unwrap_or(defaults.log_filter),
      stagnation,
      progression: ProgressionPolicy {
        heavy_load_ratio: percentage,
        ..defaults.progression
      },
    })
  }
}

/// Parse an optional variable; unset or blank is `None`
fn parse_var<T>(key: &'static str) -> Result<Option<T>, ConfigError>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  match env::var(key) {
    Ok(raw) if raw.trim().is_empty() => Ok(None),
    Ok(raw) => raw
      .trim()
      .parse()
      .map(Some)
      .map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
      }),
    Err(_) => Ok(None),
  }
}
