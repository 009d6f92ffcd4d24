//! Application commands
//!
//! The public API over the shared `AppState`. Each command returns a
//! snapshot and reports failures as display strings a caller can show as-is.

pub mod analysis;
pub mod progression;
pub mod workout;

use crate::db::{save_workout, AppState};
use crate::models::{Workout, WorkoutId};
use crate::store::{StoreError, WorkoutStore};

pub use analysis::{
  get_exercise_insights, get_stagnation_statuses, get_weekly_summary, ExerciseInsights,
};
pub use progression::{apply_suggested_load, suggest_next_load};
pub use workout::{
  add_exercise, auto_fill_weeks, reset_exercise, update_exercise, update_week_data,
  update_week_input, WeekField,
};

pub async fn get_workouts(state: &AppState) -> Result<Vec<Workout>, String> {
  let store = state.store.lock().await;
  Ok(store.workouts().cloned().collect())
}

pub async fn get_workout(state: &AppState, workout_id: String) -> Result<Workout, String> {
  let id = parse_workout_id(&workout_id)?;
  let store = state.store.lock().await;
  store.workout(id).cloned().map_err(|e| e.to_string())
}

pub(crate) fn parse_workout_id(raw: &str) -> Result<WorkoutId, String> {
  raw.parse::<WorkoutId>()
}

/// Run one mutation against a draft of the store, persist the touched
/// workout, then commit the draft.
///
/// The store lock is held for the whole sequence, so concurrent edits are
/// applied one after another and a failed save leaves memory unchanged.
pub(crate) async fn mutate_workout<F>(
  state: &AppState,
  id: WorkoutId,
  mutate: F,
) -> Result<Workout, String>
where
  F: FnOnce(&mut WorkoutStore) -> Result<(), StoreError>,
{
  let mut store = state.store.lock().await;
  let mut draft = store.clone();
  mutate(&mut draft).map_err(|e| e.to_string())?;

  let workout = draft.workout(id).map_err(|e| e.to_string())?.clone();
  save_workout(&state.db, &workout)
    .await
    .map_err(|e| format!("Failed to save workout: {}", e))?;

  *store = draft;
  Ok(workout)
}
