use serde::{Deserialize, Serialize};

use super::parse_workout_id;
use crate::analysis::{weekly_summary, WeeklySummary};
use crate::db::AppState;
use crate::models::{ProgressionSuggestion, StagnationStatus};
use crate::progression::suggest_for_exercise;
use crate::stagnation::assess_stagnation;
use crate::validation::validate_week_number;

/// Everything the exercise card shows next to the logged weeks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseInsights {
  pub stagnation: StagnationStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub suggestion: Option<ProgressionSuggestion>,
}

/// ---------------------------------------------------------------------------
/// Exercise Commands
/// ---------------------------------------------------------------------------

pub async fn get_exercise_insights(
  state: &AppState,
  workout_id: String,
  exercise_index: usize,
  target_week: u8,
) -> Result<ExerciseInsights, String> {
  let id = parse_workout_id(&workout_id)?;
  validate_week_number(target_week).map_err(|e| e.to_string())?;

  let store = state.store.lock().await;
  let exercise = store
    .exercise(id, exercise_index)
    .map_err(|e| e.to_string())?;

  Ok(ExerciseInsights {
    stagnation: assess_stagnation(exercise, &state.config.stagnation),
    suggestion: suggest_for_exercise(exercise, target_week, &state.config.progression),
  })
}

/// Stagnation status of every exercise in a workout, in exercise order
pub async fn get_stagnation_statuses(
  state: &AppState,
  workout_id: String,
) -> Result<Vec<StagnationStatus>, String> {
  let id = parse_workout_id(&workout_id)?;
  let store = state.store.lock().await;
  let workout = store.workout(id).map_err(|e| e.to_string())?;

  Ok(
    workout
      .exercises
      .iter()
      .map(|e| assess_stagnation(e, &state.config.stagnation))
      .collect(),
  )
}

/// ---------------------------------------------------------------------------
/// Dashboard Commands
/// ---------------------------------------------------------------------------

pub async fn get_weekly_summary(state: &AppState, week: u8) -> Result<WeeklySummary, String> {
  validate_week_number(week).map_err(|e| e.to_string())?;
  let store = state.store.lock().await;
  Ok(weekly_summary(store.workouts(), week, &state.config.stagnation))
}
