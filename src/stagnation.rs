//! Stagnation Classifier
//!
//! Looks at the loads an exercise was logged with, week by week, and
//! classifies the trailing trend:
//! - a strict increase in the latest loaded week is progress
//! - one or two flat/lower weeks in a row is noise
//! - `warning_weeks` in a row is a warning
//! - `critical_weeks` or more is a critical plateau
//!
//! Weeks without a load are ignored; they neither break nor extend a streak.

use serde::{Deserialize, Serialize};

use crate::models::{Exercise, StagnationLevel, StagnationStatus, WeekEntry};

/// Trailing non-increasing steps that raise a warning
pub const STAGNATION_WARNING_WEEKS: u32 = 3;

/// Trailing non-increasing steps that mark a critical plateau
pub const STAGNATION_CRITICAL_WEEKS: u32 = 4;

/// Fewer loaded weeks than this cannot form a trend
const MIN_LOADED_WEEKS: usize = 2;

// ---------------------------------------------------------------------------
/// Thresholds: where warning and critical start
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagnationThresholds {
    pub warning_weeks: u32,
    pub critical_weeks: u32,
}

impl Default for StagnationThresholds {
    fn default() -> Self {
        Self {
            warning_weeks: STAGNATION_WARNING_WEEKS,
            critical_weeks: STAGNATION_CRITICAL_WEEKS,
        }
    }
}

impl StagnationThresholds {
    /// Map a count of trailing non-increasing steps to a level
    pub fn level_for(&self, stagnant_steps: u32) -> StagnationLevel {
        if stagnant_steps == 0 {
            StagnationLevel::Progress
        } else if stagnant_steps >= self.critical_weeks {
            StagnationLevel::Critical
        } else if stagnant_steps >= self.warning_weeks {
            StagnationLevel::Warning
        } else {
            StagnationLevel::None
        }
    }

    /// Classify a week series, `None` when fewer than two weeks carry a load
    pub fn classify(&self, weeks: &[WeekEntry]) -> StagnationLevel {
        match trailing_stagnant_weeks(weeks) {
            Some(steps) => self.level_for(steps),
            None => StagnationLevel::None,
        }
    }
}

/// Loaded weeks in week order, regardless of input order
fn loaded_series(weeks: &[WeekEntry]) -> Vec<(u8, f64)> {
    let mut loaded: Vec<(u8, f64)> = weeks
        .iter()
        .filter_map(|w| w.load.map(|load| (w.week, load)))
        .collect();
    loaded.sort_by_key(|(week, _)| *week);
    loaded
}

/// Count trailing steps where the load did not go up.
///
/// Returns `None` when there are fewer than two loaded weeks.
pub fn trailing_stagnant_weeks(weeks: &[WeekEntry]) -> Option<u32> {
    let loaded = loaded_series(weeks);
    if loaded.len() < MIN_LOADED_WEEKS {
        return None;
    }

    let steps = loaded
        .windows(2)
        .rev()
        .take_while(|pair| pair[1].1 <= pair[0].1)
        .count();

    Some(steps as u32)
}

/// Classify with the default thresholds
pub fn classify_stagnation(weeks: &[WeekEntry]) -> StagnationLevel {
    StagnationThresholds::default().classify(weeks)
}

/// Full status for one exercise, including the streak length
pub fn assess_stagnation(exercise: &Exercise, thresholds: &StagnationThresholds) -> StagnationStatus {
    let steps = trailing_stagnant_weeks(&exercise.weeks);
    StagnationStatus {
        exercise_id: exercise.id.clone(),
        level: steps.map_or(StagnationLevel::None, |s| thresholds.level_for(s)),
        weeks_stagnant: steps.unwrap_or(0),
    }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
