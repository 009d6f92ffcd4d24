//! Boundary validation for user input and persisted snapshots
//!
//! The analytics engine trusts its inputs; this is where they earn that trust.

use serde::Serialize;

use crate::models::{
  Exercise, ExercisePatch, WeekEntry, WeekPatch, Workout, MAX_EXERCISES, TOTAL_WEEKS,
};

/// ---------------------------------------------------------------------------
/// Field Limits
/// ---------------------------------------------------------------------------

pub const MIN_SETS: u32 = 1;
pub const MAX_SETS: u32 = 20;
pub const MIN_REPS: u32 = 1;
pub const MAX_REPS: u32 = 100;
pub const MAX_LOAD: f64 = 1000.0;
pub const MAX_NAME_CHARS: usize = 100;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
  #[error("Week {0} is outside the 1-{max} cycle", max = TOTAL_WEEKS)]
  WeekOutOfRange(u8),

  #[error("{field} must be between {min} and {max}, got {value}")]
  OutOfRange {
    field: &'static str,
    min: f64,
    max: f64,
    value: f64,
  },

  #[error("Exercise name must be 1-{max} characters", max = MAX_NAME_CHARS)]
  InvalidName,

  #[error("Not a number: {0:?}")]
  NotANumber(String),

  #[error("Negative values are not allowed: {0}")]
  Negative(f64),

  #[error("Expected a whole number, got {0}")]
  NotWhole(f64),

  #[error("Exercise {index} has an invalid week layout")]
  WeekLayout { index: u8 },

  #[error("Workout holds {0} exercises (max {max})", max = MAX_EXERCISES)]
  TooManyExercises(usize),

  #[error("Workout has no exercises")]
  NoExercises,

  #[error("Exercise at position {position} is numbered {index}")]
  IndexMismatch { position: usize, index: u8 },
}

impl Serialize for ValidationError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
  if !value.is_finite() || value < min || value > max {
    return Err(ValidationError::OutOfRange {
      field,
      min,
      max,
      value,
    });
  }
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Field Validation
/// ---------------------------------------------------------------------------

pub fn validate_week_number(week: u8) -> Result<(), ValidationError> {
  if (1..=TOTAL_WEEKS).contains(&week) {
    Ok(())
  } else {
    Err(ValidationError::WeekOutOfRange(week))
  }
}

pub fn validate_sets(sets: u32) -> Result<(), ValidationError> {
  check_range("sets", sets as f64, MIN_SETS as f64, MAX_SETS as f64)
}

pub fn validate_reps(reps: u32) -> Result<(), ValidationError> {
  check_range("reps", reps as f64, MIN_REPS as f64, MAX_REPS as f64)
}

pub fn validate_load(load: f64) -> Result<(), ValidationError> {
  check_range("load", load, 0.0, MAX_LOAD)
}

pub fn validate_exercise_name(name: &str) -> Result<(), ValidationError> {
  let chars = name.trim().chars().count();
  if chars == 0 || chars > MAX_NAME_CHARS {
    return Err(ValidationError::InvalidName);
  }
  Ok(())
}

/// Values being set must be in range; clearing a field is always allowed
pub fn validate_week_patch(patch: &WeekPatch) -> Result<(), ValidationError> {
  if let Some(Some(sets)) = patch.sets {
    validate_sets(sets)?;
  }
  if let Some(Some(reps)) = patch.reps {
    validate_reps(reps)?;
  }
  if let Some(Some(load)) = patch.load {
    validate_load(load)?;
  }
  Ok(())
}

pub fn validate_exercise_patch(patch: &ExercisePatch) -> Result<(), ValidationError> {
  if let Some(name) = &patch.name {
    validate_exercise_name(name)?;
  }
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Snapshot Validation
/// ---------------------------------------------------------------------------

pub fn validate_week_entry(entry: &WeekEntry) -> Result<(), ValidationError> {
  validate_week_number(entry.week)?;
  if let Some(sets) = entry.sets {
    validate_sets(sets)?;
  }
  if let Some(reps) = entry.reps {
    validate_reps(reps)?;
  }
  if let Some(load) = entry.load {
    validate_load(load)?;
  }
  if let Some(volume) = entry.volume {
    check_range("volume", volume, 0.0, f64::MAX)?;
  }
  Ok(())
}

/// Exactly one entry per week, numbered 1..=8 in order
pub fn validate_exercise(exercise: &Exercise) -> Result<(), ValidationError> {
  validate_exercise_name(&exercise.name)?;

  let layout_ok = exercise.weeks.len() == TOTAL_WEEKS as usize
    && exercise
      .weeks
      .iter()
      .zip(1..=TOTAL_WEEKS)
      .all(|(entry, expected)| entry.week == expected);
  if !layout_ok {
    return Err(ValidationError::WeekLayout {
      index: exercise.index,
    });
  }

  exercise.weeks.iter().try_for_each(validate_week_entry)
}

/// 1..=10 exercises, each numbered by its position
pub fn validate_workout(workout: &Workout) -> Result<(), ValidationError> {
  if workout.exercises.is_empty() {
    return Err(ValidationError::NoExercises);
  }
  if workout.exercises.len() > MAX_EXERCISES {
    return Err(ValidationError::TooManyExercises(workout.exercises.len()));
  }

  for (position, exercise) in workout.exercises.iter().enumerate() {
    if exercise.index as usize != position {
      return Err(ValidationError::IndexMismatch {
        position,
        index: exercise.index,
      });
    }
    validate_exercise(exercise)?;
  }
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Text Input Parsing
/// ---------------------------------------------------------------------------

/// Parse a numeric text field.
///
/// Blank input means "clear the field" (`Ok(None)`). A comma is accepted as
/// the decimal separator. Non-numeric and negative input is rejected.
pub fn parse_numeric_input(text: &str) -> Result<Option<f64>, ValidationError> {
  let trimmed = text.trim();
  if trimmed.is_empty() {
    return Ok(None);
  }

  let value: f64 = trimmed
    .replacen(',', ".", 1)
    .parse()
    .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))?;

  if !value.is_finite() {
    return Err(ValidationError::NotANumber(trimmed.to_string()));
  }
  if value < 0.0 {
    return Err(ValidationError::Negative(value));
  }
  Ok(Some(value))
}

/// Parse a count field (sets, reps)
pub fn parse_count_input(text: &str) -> Result<Option<u32>, ValidationError> {
  match parse_numeric_input(text)? {
    None => Ok(None),
    Some(value) if value.fract() == 0.0 && value <= u32::MAX as f64 => Ok(Some(value as u32)),
    Some(value) => Err(ValidationError::NotWhole(value)),
  }
}
