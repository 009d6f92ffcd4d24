//! Commands that edit logged workout data

use serde::{Deserialize, Serialize};

use super::{mutate_workout, parse_workout_id};
use crate::db::AppState;
use crate::models::{ExercisePatch, WeekPatch, Workout, FIRST_WEEK};
use crate::validation::{
  parse_count_input, parse_numeric_input, validate_exercise_patch, validate_week_number,
  validate_week_patch,
};

/// Text fields of a week row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekField {
  Sets,
  Reps,
  Load,
  Rest,
}

/// Add a blank exercise to a workout
pub async fn add_exercise(state: &AppState, workout_id: String) -> Result<Workout, String> {
  let id = parse_workout_id(&workout_id)?;
  mutate_workout(state, id, |store| store.add_exercise(id).map(|_| ())).await
}

/// Apply a partial update to one week.
///
/// Writing week 1 also seeds the later empty weeks with its structure.
pub async fn update_week_data(
  state: &AppState,
  workout_id: String,
  exercise_index: usize,
  week: u8,
  patch: WeekPatch,
) -> Result<Workout, String> {
  let id = parse_workout_id(&workout_id)?;
  validate_week_number(week).map_err(|e| e.to_string())?;
  validate_week_patch(&patch).map_err(|e| e.to_string())?;

  mutate_workout(state, id, |store| {
    store.update_week(id, exercise_index, week, &patch)?;
    if week == FIRST_WEEK {
      store.auto_fill_weeks(id, exercise_index, FIRST_WEEK)?;
    }
    Ok(())
  })
  .await
}

/// Update one week field from raw text input.
///
/// Blank text clears the field. Text that is not a valid non-negative number
/// is rejected and nothing changes.
pub async fn update_week_input(
  state: &AppState,
  workout_id: String,
  exercise_index: usize,
  week: u8,
  field: WeekField,
  text: String,
) -> Result<Workout, String> {
  let mut patch = WeekPatch::default();
  match field {
    WeekField::Sets => patch.sets = Some(parse_count_input(&text).map_err(|e| e.to_string())?),
    WeekField::Reps => patch.reps = Some(parse_count_input(&text).map_err(|e| e.to_string())?),
    WeekField::Load => patch.load = Some(parse_numeric_input(&text).map_err(|e| e.to_string())?),
    WeekField::Rest => patch.rest = Some(Some(text)),
  }

  update_week_data(state, workout_id, exercise_index, week, patch).await
}

/// Rename an exercise or change its muscle group
pub async fn update_exercise(
  state: &AppState,
  workout_id: String,
  exercise_index: usize,
  patch: ExercisePatch,
) -> Result<Workout, String> {
  let id = parse_workout_id(&workout_id)?;
  validate_exercise_patch(&patch).map_err(|e| e.to_string())?;
  mutate_workout(state, id, |store| {
    store.update_exercise(id, exercise_index, &patch).map(|_| ())
  })
  .await
}

/// Copy `from_week`'s structure into the later empty weeks
pub async fn auto_fill_weeks(
  state: &AppState,
  workout_id: String,
  exercise_index: usize,
  from_week: u8,
) -> Result<Workout, String> {
  let id = parse_workout_id(&workout_id)?;
  validate_week_number(from_week).map_err(|e| e.to_string())?;
  mutate_workout(state, id, |store| {
    store.auto_fill_weeks(id, exercise_index, from_week).map(|_| ())
  })
  .await
}

/// Clear an exercise back to its blank state
pub async fn reset_exercise(
  state: &AppState,
  workout_id: String,
  exercise_index: usize,
) -> Result<Workout, String> {
  let id = parse_workout_id(&workout_id)?;
  tracing::info!(workout = %id, exercise_index, "Resetting exercise");
  mutate_workout(state, id, |store| store.reset_exercise(id, exercise_index).map(|_| ())).await
}
