//! Load Progression Advisor
//!
//! Suggests the load for a target week from the load logged two weeks
//! earlier (biweekly cadence inside the 8-week cycle):
//! - light loads (<= 20) go up by a fixed step of 1
//! - heavier loads go up by a percentage of the base (2.5% by default)
//! - the result is rounded to the nearest 0.5, matching plate increments
//!
//! A suggestion is advice only. Nothing here writes to stored data; applying
//! it is a separate, explicit edit.

use serde::{Deserialize, Serialize};

use crate::models::{Exercise, ProgressionSuggestion, WeekEntry};

/// Weeks between the baseline and the target week
pub const PROGRESSION_CADENCE_WEEKS: u8 = 2;

/// Loads at or below this get the fixed step
pub const LIGHT_LOAD_CEILING: f64 = 20.0;

pub const LIGHT_LOAD_STEP: f64 = 1.0;

pub const DEFAULT_PROGRESSION_PERCENTAGE: f64 = 0.025;

/// Suggested loads snap to this granularity
pub const LOAD_ROUNDING_STEP: f64 = 0.5;

// ---------------------------------------------------------------------------
/// Progression Policy: how big the next step is
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressionPolicy {
    pub light_load_ceiling: f64,
    pub light_load_step: f64,
    /// Fraction of the base load added above the ceiling
    pub heavy_load_ratio: f64,
    pub rounding_step: f64,
}

impl Default for ProgressionPolicy {
    fn default() -> Self {
        Self {
            light_load_ceiling: LIGHT_LOAD_CEILING,
            light_load_step: LIGHT_LOAD_STEP,
            heavy_load_ratio: DEFAULT_PROGRESSION_PERCENTAGE,
            rounding_step: LOAD_ROUNDING_STEP,
        }
    }
}

impl ProgressionPolicy {
    /// Increment applied on top of `base_load`
    pub fn increment(&self, base_load: f64) -> f64 {
        if base_load <= self.light_load_ceiling {
            self.light_load_step
        } else {
            base_load * self.heavy_load_ratio
        }
    }

    /// Next load after `base_load`, rounded to the policy's granularity
    pub fn next_load(&self, base_load: f64) -> f64 {
        round_to_step(base_load + self.increment(base_load), self.rounding_step)
    }

    /// Suggest a load for `target_week` from the week `PROGRESSION_CADENCE_WEEKS` earlier.
    ///
    /// Returns `None` when the baseline week is before the cycle, missing,
    /// or has no (or a zero) load.
    pub fn suggest(&self, weeks: &[WeekEntry], target_week: u8) -> Option<ProgressionSuggestion> {
        let base_week = target_week.checked_sub(PROGRESSION_CADENCE_WEEKS)?;
        let base_load = weeks
            .iter()
            .find(|w| w.week == base_week)
            .and_then(|w| w.load)
            .filter(|load| *load > 0.0)?;

        Some(ProgressionSuggestion {
            exercise_id: String::new(),
            week: target_week,
            suggested_load: self.next_load(base_load),
            base_load,
        })
    }
}

fn round_to_step(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}

/// Suggest with the default policy
pub fn suggest_progression(weeks: &[WeekEntry], target_week: u8) -> Option<ProgressionSuggestion> {
    ProgressionPolicy::default().suggest(weeks, target_week)
}

/// Suggest for a whole exercise, tagging the result with its id
pub fn suggest_for_exercise(
    exercise: &Exercise,
    target_week: u8,
    policy: &ProgressionPolicy,
) -> Option<ProgressionSuggestion> {
    policy
        .suggest(&exercise.weeks, target_week)
        .map(|suggestion| ProgressionSuggestion {
            exercise_id: exercise.id.clone(),
            ..suggestion
        })
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn weeks_with_load(week: u8, load: Option<f64>) -> Vec<WeekEntry> {
        let mut weeks: Vec<WeekEntry> = (1..=8).map(WeekEntry::empty).collect();
        weeks[(week - 1) as usize].load = load;
        weeks
    }

    #[test]
    fn test_light_load_fixed_step() {
        let weeks = weeks_with_load(1, Some(20.0));
        let suggestion = suggest_progression(&weeks, 3).expect("baseline present");
        assert_eq!(suggestion.week, 3);
        assert_eq!(suggestion.base_load, 20.0);
        assert_eq!(suggestion.suggested_load, 21.0);
    }

    #[test]
    fn test_heavy_load_percentage_step() {
        let weeks = weeks_with_load(4, Some(100.0));
        let suggestion = suggest_progression(&weeks, 6).expect("baseline present");
        assert_eq!(suggestion.suggested_load, 102.5);
        assert_eq!(suggestion.base_load, 100.0);
    }

    #[test]
    fn test_rounds_to_half_unit() {
        // 47.5 * 1.025 = 48.6875
        let weeks = weeks_with_load(2, Some(47.5));
        assert_eq!(suggest_progression(&weeks, 4).unwrap().suggested_load, 48.5);

        // 30 * 1.025 = 30.75, halfway rounds up
        let weeks = weeks_with_load(2, Some(30.0));
        assert_eq!(suggest_progression(&weeks, 4).unwrap().suggested_load, 31.0);

        // Fractional light load
        let weeks = weeks_with_load(2, Some(12.5));
        assert_eq!(suggest_progression(&weeks, 4).unwrap().suggested_load, 13.5);
    }

    #[test]
    fn test_missing_baseline_load_gives_none() {
        let weeks = weeks_with_load(1, None);
        assert!(suggest_progression(&weeks, 3).is_none());

        // Load logged, but not two weeks before the target
        let weeks = weeks_with_load(2, Some(50.0));
        assert!(suggest_progression(&weeks, 3).is_none());
    }

    #[test]
    fn test_zero_baseline_gives_none() {
        let weeks = weeks_with_load(1, Some(0.0));
        assert!(suggest_progression(&weeks, 3).is_none());
    }

    #[test]
    fn test_target_before_cycle_gives_none() {
        let weeks = weeks_with_load(1, Some(50.0));
        assert!(suggest_progression(&weeks, 0).is_none());
        assert!(suggest_progression(&weeks, 1).is_none());
        assert!(suggest_progression(&weeks, 2).is_none());
    }

    #[test]
    fn test_target_past_cycle_uses_baseline() {
        // Week 10 looks at week 8; still a valid lookup
        let weeks = weeks_with_load(8, Some(60.0));
        assert_eq!(suggest_progression(&weeks, 10).unwrap().suggested_load, 61.5);
    }

    #[test]
    fn test_custom_percentage() {
        let policy = ProgressionPolicy {
            heavy_load_ratio: 0.05,
            ..Default::default()
        };
        let weeks = weeks_with_load(1, Some(100.0));
        assert_eq!(policy.suggest(&weeks, 3).unwrap().suggested_load, 105.0);
        assert_eq!(policy.increment(10.0), 1.0);
    }

    #[test]
    fn test_suggest_for_exercise_tags_id() {
        let mut exercise = Exercise::empty(0);
        exercise.weeks[2].load = Some(80.0);
        let suggestion = suggest_for_exercise(&exercise, 5, &ProgressionPolicy::default())
            .expect("baseline present");
        assert_eq!(suggestion.exercise_id, exercise.id);
        assert_eq!(suggestion.suggested_load, 82.0);
    }

    #[test]
    fn test_suggestion_does_not_touch_weeks() {
        let weeks = weeks_with_load(1, Some(40.0));
        let before = weeks.clone();
        let _ = suggest_progression(&weeks, 3);
        assert_eq!(weeks, before);
    }
}
