//! In-memory workout state
//!
//! `WorkoutStore` owns the canonical workouts. Its write API is the only way
//! to change logged data: every mutation is applied to a draft copy of the
//! workout, derived volumes are recomputed, the timestamp is refreshed and
//! the draft replaces the stored workout in one step.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::autofill::propagate_week_one;
use crate::models::{
  Exercise, ExercisePatch, ProgressionSuggestion, WeekPatch, Workout, WorkoutId, MAX_EXERCISES,
};
use crate::progression::{suggest_for_exercise, ProgressionPolicy};
use crate::validation::{validate_load, ValidationError};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
  #[error("Unknown workout: {0}")]
  UnknownWorkout(WorkoutId),

  #[error("Workout {workout} has no exercise at index {index}")]
  ExerciseNotFound { workout: WorkoutId, index: usize },

  #[error("Exercise has no week {0}")]
  WeekNotFound(u8),

  #[error("Workout {0} already has the maximum of {max} exercises", max = MAX_EXERCISES)]
  ExerciseLimitReached(WorkoutId),

  #[error("No baseline load to progress from for week {0}")]
  NoBaseline(u8),

  #[error(transparent)]
  Invalid(#[from] ValidationError),
}

impl Serialize for StoreError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Store
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct WorkoutStore {
  workouts: BTreeMap<WorkoutId, Workout>,
}

impl Default for WorkoutStore {
  fn default() -> Self {
    Self::new()
  }
}

impl WorkoutStore {
  /// One empty workout per slot
  pub fn new() -> Self {
    Self {
      workouts: WorkoutId::ALL
        .iter()
        .map(|id| (*id, Workout::empty(*id)))
        .collect(),
    }
  }

  /// Build from loaded workouts; missing slots start empty
  pub fn from_workouts(workouts: impl IntoIterator<Item = Workout>) -> Self {
    let mut store = Self::new();
    for workout in workouts {
      store.replace_workout(workout);
    }
    store
  }

  /// All workouts in slot order
  pub fn workouts(&self) -> impl Iterator<Item = &Workout> {
    self.workouts.values()
  }

  pub fn workout(&self, id: WorkoutId) -> Result<&Workout, StoreError> {
    self.workouts.get(&id).ok_or(StoreError::UnknownWorkout(id))
  }

  pub fn exercise(&self, id: WorkoutId, index: usize) -> Result<&Exercise, StoreError> {
    self
      .workout(id)?
      .exercise(index)
      .ok_or(StoreError::ExerciseNotFound { workout: id, index })
  }

  /// Install a workout as is (apart from recomputing its derived totals)
  pub fn replace_workout(&mut self, mut workout: Workout) -> &Workout {
    workout.refresh_totals();
    let id = workout.id;
    self.install(id, workout)
  }

  pub fn add_exercise(&mut self, id: WorkoutId) -> Result<&Workout, StoreError> {
    self.commit(id, |workout| {
      if workout.exercises.len() >= MAX_EXERCISES {
        return Err(StoreError::ExerciseLimitReached(id));
      }
      let index = workout.exercises.len() as u8;
      workout.exercises.push(Exercise::empty(index));
      Ok(())
    })
  }

  /// Apply a partial week update; the week's volume follows its inputs
  pub fn update_week(
    &mut self,
    id: WorkoutId,
    exercise_index: usize,
    week: u8,
    patch: &WeekPatch,
  ) -> Result<&Workout, StoreError> {
    self.commit(id, |workout| {
      let entry = exercise_in(workout, exercise_index)?
        .week_mut(week)
        .ok_or(StoreError::WeekNotFound(week))?;
      entry.apply(patch);
      Ok(())
    })
  }

  pub fn update_exercise(
    &mut self,
    id: WorkoutId,
    exercise_index: usize,
    patch: &ExercisePatch,
  ) -> Result<&Workout, StoreError> {
    self.commit(id, |workout| {
      let exercise = exercise_in(workout, exercise_index)?;
      if let Some(name) = &patch.name {
        exercise.name = name.clone();
      }
      if let Some(group) = patch.muscle_group {
        exercise.muscle_group = group;
      }
      Ok(())
    })
  }

  /// Propagate `from_week`'s structure into the exercise's later empty weeks
  pub fn auto_fill_weeks(
    &mut self,
    id: WorkoutId,
    exercise_index: usize,
    from_week: u8,
  ) -> Result<&Workout, StoreError> {
    self.commit(id, |workout| {
      let exercise = exercise_in(workout, exercise_index)?;
      if exercise.week(from_week).is_none() {
        return Err(StoreError::WeekNotFound(from_week));
      }
      exercise.weeks = propagate_week_one(&exercise.weeks, from_week);
      Ok(())
    })
  }

  /// Return an exercise to its blank state, keeping its position
  pub fn reset_exercise(&mut self, id: WorkoutId, exercise_index: usize) -> Result<&Workout, StoreError> {
    self.commit(id, |workout| {
      let exercise = exercise_in(workout, exercise_index)?;
      *exercise = Exercise::empty(exercise_index as u8);
      Ok(())
    })
  }

  /// Write the suggested load into `target_week`.
  ///
  /// The baseline is read from the same state the write lands in.
  pub fn apply_suggested_load(
    &mut self,
    id: WorkoutId,
    exercise_index: usize,
    target_week: u8,
    policy: &ProgressionPolicy,
  ) -> Result<ProgressionSuggestion, StoreError> {
    let suggestion = suggest_for_exercise(self.exercise(id, exercise_index)?, target_week, policy)
      .ok_or(StoreError::NoBaseline(target_week))?;
    validate_load(suggestion.suggested_load)?;

    let patch = WeekPatch {
      load: Some(Some(suggestion.suggested_load)),
      ..Default::default()
    };
    self.update_week(id, exercise_index, suggestion.week, &patch)?;
    Ok(suggestion)
  }

  /// Apply `mutate` to a draft, refresh derived fields, then swap it in.
  /// On error the stored workout is left untouched.
  fn commit<F>(&mut self, id: WorkoutId, mutate: F) -> Result<&Workout, StoreError>
  where
    F: FnOnce(&mut Workout) -> Result<(), StoreError>,
  {
    let mut draft = self.workout(id)?.clone();
    mutate(&mut draft)?;
    draft.refresh_totals();
    draft.touch();

    tracing::debug!(
      workout = %id,
      total_volume = draft.total_volume,
      exercises = draft.exercises.len(),
      "Workout updated"
    );

    Ok(self.install(id, draft))
  }

  fn install(&mut self, id: WorkoutId, workout: Workout) -> &Workout {
    match self.workouts.entry(id) {
      Entry::Occupied(mut slot) => {
        slot.insert(workout);
        slot.into_mut()
      }
      Entry::Vacant(slot) => slot.insert(workout),
    }
  }
}

fn exercise_in(workout: &mut Workout, index: usize) -> Result<&mut Exercise, StoreError> {
  let id = workout.id;
  workout
    .exercise_mut(index)
    .ok_or(StoreError::ExerciseNotFound { workout: id, index })
}
