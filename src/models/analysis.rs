use serde::{Deserialize, Serialize};

/// Trailing load trend of one exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum StagnationLevel {
  /// Not enough data, or too early to flag
  #[default]
  None,
  /// Latest loaded week beat the one before it
  Progress,
  Warning,
  Critical,
}

impl StagnationLevel {
  pub fn is_stagnant(&self) -> bool {
    matches!(self, Self::Warning | Self::Critical)
  }
}

impl std::fmt::Display for StagnationLevel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::None => write!(f, "none"),
      Self::Progress => write!(f, "progress"),
      Self::Warning => write!(f, "warning"),
      Self::Critical => write!(f, "critical"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagnationStatus {
  pub exercise_id: String,
  pub level: StagnationLevel,
  /// Consecutive trailing loaded weeks without a load increase
  pub weeks_stagnant: u32,
}

/// Recommended load for a target week, never applied automatically
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionSuggestion {
  pub exercise_id: String,
  pub week: u8,
  pub suggested_load: f64,
  pub base_load: f64,
}
