//! Commands for load progression suggestions

use super::{mutate_workout, parse_workout_id};
use crate::db::AppState;
use crate::models::{ProgressionSuggestion, Workout};
use crate::progression::suggest_for_exercise;
use crate::validation::validate_week_number;

/// Suggest the load for `target_week`, `None` without a baseline two weeks back
pub async fn suggest_next_load(
  state: &AppState,
  workout_id: String,
  exercise_index: usize,
  target_week: u8,
) -> Result<Option<ProgressionSuggestion>, String> {
  let id = parse_workout_id(&workout_id)?;
  validate_week_number(target_week).map_err(|e| e.to_string())?;

  let store = state.store.lock().await;
  let exercise = store
    .exercise(id, exercise_index)
    .map_err(|e| e.to_string())?;
  Ok(suggest_for_exercise(exercise, target_week, &state.config.progression))
}

/// Write the suggested load into the target week.
///
/// This is the explicit user action that turns advice into logged data. The
/// suggestion is computed and written under one store lock.
pub async fn apply_suggested_load(
  state: &AppState,
  workout_id: String,
  exercise_index: usize,
  target_week: u8,
) -> Result<Workout, String> {
  let id = parse_workout_id(&workout_id)?;
  validate_week_number(target_week).map_err(|e| e.to_string())?;
  let policy = state.config.progression;

  mutate_workout(state, id, |store| {
    let suggestion = store.apply_suggested_load(id, exercise_index, target_week, &policy)?;
    tracing::info!(
      workout = %id,
      exercise_index,
      week = suggestion.week,
      base_load = suggestion.base_load,
      suggested_load = suggestion.suggested_load,
      "Applied suggested load"
    );
    Ok(())
  })
  .await
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::commands::{get_workout, update_week_data};
  use crate::models::WeekPatch;
  use crate::test_utils::*;
  use serial_test::serial;

  #[tokio::test]
  #[serial]
  async fn test_suggest_next_load() {
    let state = setup_test_state().await;
    update_week_data(&state, "A".to_string(), 0, 1, WeekPatch::logged(3, 12, 18.0))
      .await
      .unwrap();

    let suggestion = suggest_next_load(&state, "A".to_string(), 0, 3)
      .await
      .unwrap()
      .expect("week 1 is the baseline");
    assert_eq!(suggestion.suggested_load, 19.0);

    assert_eq!(suggest_next_load(&state, "A".to_string(), 0, 2).await.unwrap(), None);
    assert!(suggest_next_load(&state, "A".to_string(), 0, 9).await.is_err());
  }

  #[tokio::test]
  #[serial]
  async fn test_apply_suggested_load() {
    let state = setup_test_state().await;
    update_week_data(&state, "B".to_string(), 0, 1, WeekPatch::logged(5, 5, 120.0))
      .await
      .unwrap();

    // Week 3 was auto-filled with 5x5 and no load
    let workout = apply_suggested_load(&state, "B".to_string(), 0, 3).await.unwrap();
    let week = &workout.exercises[0].weeks[2];
    assert_eq!(week.load, Some(123.0));
    assert_eq!(week.volume, Some(25.0 * 123.0));

    let err = apply_suggested_load(&state, "B".to_string(), 0, 4).await.unwrap_err();
    assert!(err.contains("No baseline"));
    assert!(apply_suggested_load(&state, "B".to_string(), 0, 10).await.is_err());
  }

  #[tokio::test]
  #[serial]
  async fn test_apply_suggested_load_reads_latest_baseline() {
    let state = setup_test_state().await;
    update_week_data(&state, "C".to_string(), 0, 2, WeekPatch::logged(3, 10, 40.0))
      .await
      .unwrap();

    // The baseline edit and the apply race; whichever lands first, the
    // written load matches the baseline it was computed from
    let state_ref = &state;
    let edit = async move {
      update_week_data(state_ref, "C".to_string(), 0, 2, WeekPatch::logged(3, 10, 80.0)).await
    };
    let apply = async move { apply_suggested_load(state_ref, "C".to_string(), 0, 4).await };
    let (edited, applied) = tokio::join!(edit, apply);
    edited.unwrap();
    let applied = applied.unwrap();
    let written = applied.exercises[0].weeks[3].load;
    let baseline = applied.exercises[0].weeks[1].load;
    assert!(
      (baseline == Some(40.0) && written == Some(41.0))
        || (baseline == Some(80.0) && written == Some(82.0))
    );

    let workout = get_workout(&state, "C".to_string()).await.unwrap();
    assert_eq!(workout.exercises[0].weeks[1].load, Some(80.0));
  }
}
