//! Deterministic analysis layer for logged training data
//!
//! Volume math for weeks, exercises and workouts, plus the weekly dashboard
//! summary built on top of it. Everything here is pure: callers hand in a
//! snapshot and get a value back.

use serde::{Deserialize, Serialize};

use crate::models::{Exercise, MuscleGroup, StagnationLevel, WeekEntry, Workout};
use crate::stagnation::{assess_stagnation, StagnationThresholds};

/// How many muscle groups the dashboard ranks
pub const TOP_MUSCLE_GROUPS: usize = 5;

/// ---------------------------------------------------------------------------
/// Volume Calculator
/// ---------------------------------------------------------------------------

/// Volume of one logged week: sets x reps x load
pub fn week_volume(sets: u32, reps: u32, load: f64) -> f64 {
  sets as f64 * reps as f64 * load
}

/// Sum of the present week volumes; blank weeks contribute nothing
pub fn exercise_volume(weeks: &[WeekEntry]) -> f64 {
  weeks.iter().filter_map(|w| w.volume).sum()
}

/// Sum of the exercise totals of a workout
pub fn workout_volume(exercises: &[Exercise]) -> f64 {
  exercises.iter().map(|e| e.total_volume).sum()
}

/// ---------------------------------------------------------------------------
/// Weekly Summary (dashboard)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuscleVolume {
  pub muscle_group: MuscleGroup,
  pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
  pub week: u8,
  /// Volume logged in `week` across every workout
  pub total_volume: f64,
  /// Volume logged in the week before, 0 for week 1
  pub previous_volume: f64,
  pub volume_trend: StagnationLevel,
  /// Exercises whose latest loaded week beat the previous one
  pub progressing_count: u32,
  /// Exercises at warning or critical
  pub stagnant_count: u32,
  /// Whole-cycle volume per muscle group, highest first
  pub top_muscles: Vec<MuscleVolume>,
}

/// Compare a week's volume with the previous week's
pub fn volume_trend(current: f64, previous: f64) -> StagnationLevel {
  if previous == 0.0 && current > 0.0 {
    StagnationLevel::Progress
  } else if current > previous {
    StagnationLevel::Progress
  } else if current == previous && current > 0.0 {
    StagnationLevel::Warning
  } else if current < previous {
    StagnationLevel::Critical
  } else {
    StagnationLevel::None
  }
}

/// Build the dashboard summary for one week of the cycle
pub fn weekly_summary<'a, I>(workouts: I, week: u8, thresholds: &StagnationThresholds) -> WeeklySummary
where
  I: IntoIterator<Item = &'a Workout>,
{
  let previous_week = week.checked_sub(1);

  let mut total_volume = 0.0;
  let mut previous_volume = 0.0;
  let mut progressing_count = 0;
  let mut stagnant_count = 0;
  let mut per_muscle: Vec<MuscleVolume> = Vec::new();

  for workout in workouts {
    for exercise in &workout.exercises {
      for entry in &exercise.weeks {
        let Some(volume) = entry.volume else {
          continue;
        };
        if entry.week == week {
          total_volume += volume;
        }
        if Some(entry.week) == previous_week {
          previous_volume += volume;
        }
      }

      let status = assess_stagnation(exercise, thresholds);
      if status.level == StagnationLevel::Progress {
        progressing_count += 1;
      }
      if status.level.is_stagnant() {
        stagnant_count += 1;
      }

      if let Some(group) = exercise.muscle_group {
        let cycle_volume = exercise_volume(&exercise.weeks);
        match per_muscle.iter_mut().find(|m| m.muscle_group == group) {
          Some(entry) => entry.volume += cycle_volume,
          None => per_muscle.push(MuscleVolume {
            muscle_group: group,
            volume: cycle_volume,
          }),
        }
      }
    }
  }

  // Stable sort keeps first-seen order among ties
  per_muscle.sort_by(|a, b| b.volume.total_cmp(&a.volume));
  per_muscle.truncate(TOP_MUSCLE_GROUPS);

  WeeklySummary {
    week,
    total_volume,
    previous_volume,
    volume_trend: volume_trend(total_volume, previous_volume),
    progressing_count,
    stagnant_count,
    top_muscles: per_muscle,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
