use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::analysis::{exercise_volume, week_volume, workout_volume};

/// Number of weeks in one training cycle
pub const TOTAL_WEEKS: u8 = 8;

/// Upper bound on exercises per workout
pub const MAX_EXERCISES: usize = 10;

/// The week whose structure seeds the rest of the cycle
pub const FIRST_WEEK: u8 = 1;

/// ---------------------------------------------------------------------------
/// Workout slots and muscle groups
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkoutId {
  A,
  B,
  C,
  D,
  E,
  F,
}

impl WorkoutId {
  pub const ALL: [WorkoutId; 6] = [
    WorkoutId::A,
    WorkoutId::B,
    WorkoutId::C,
    WorkoutId::D,
    WorkoutId::E,
    WorkoutId::F,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      WorkoutId::A => "A",
      WorkoutId::B => "B",
      WorkoutId::C => "C",
      WorkoutId::D => "D",
      WorkoutId::E => "E",
      WorkoutId::F => "F",
    }
  }

  pub fn label(&self) -> String {
    format!("Workout {}", self.as_str())
  }
}

impl std::fmt::Display for WorkoutId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for WorkoutId {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    WorkoutId::ALL
      .iter()
      .copied()
      .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| format!("Unknown workout id: {}", s))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
  Chest,
  Shoulders,
  Triceps,
  Biceps,
  Lats,
  Traps,
  Quadriceps,
  Hamstrings,
  Calves,
  Forearms,
  Core,
}

impl MuscleGroup {
  pub const ALL: [MuscleGroup; 11] = [
    MuscleGroup::Chest,
    MuscleGroup::Shoulders,
    MuscleGroup::Triceps,
    MuscleGroup::Biceps,
    MuscleGroup::Lats,
    MuscleGroup::Traps,
    MuscleGroup::Quadriceps,
    MuscleGroup::Hamstrings,
    MuscleGroup::Calves,
    MuscleGroup::Forearms,
    MuscleGroup::Core,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      MuscleGroup::Chest => "chest",
      MuscleGroup::Shoulders => "shoulders",
      MuscleGroup::Triceps => "triceps",
      MuscleGroup::Biceps => "biceps",
      MuscleGroup::Lats => "lats",
      MuscleGroup::Traps => "traps",
      MuscleGroup::Quadriceps => "quadriceps",
      MuscleGroup::Hamstrings => "hamstrings",
      MuscleGroup::Calves => "calves",
      MuscleGroup::Forearms => "forearms",
      MuscleGroup::Core => "core",
    }
  }
}

impl std::fmt::Display for MuscleGroup {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for MuscleGroup {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    MuscleGroup::ALL
      .iter()
      .copied()
      .find(|m| m.as_str() == s.trim().to_lowercase())
      .ok_or_else(|| format!("Unknown muscle group: {}", s))
  }
}

/// ---------------------------------------------------------------------------
/// Week entries
/// ---------------------------------------------------------------------------

/// One week's logged data for one exercise.
///
/// `volume` is derived: it is only ever written by `recompute_volume`, which
/// every mutation path goes through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekEntry {
  pub week: u8,
  pub sets: Option<u32>,
  pub reps: Option<u32>,
  pub rest: Option<String>,
  pub load: Option<f64>,
  pub volume: Option<f64>,
}

impl WeekEntry {
  pub fn empty(week: u8) -> Self {
    Self {
      week,
      sets: None,
      reps: None,
      rest: None,
      load: None,
      volume: None,
    }
  }

  /// A week with neither sets nor reps logged
  pub fn is_empty(&self) -> bool {
    self.sets.is_none() && self.reps.is_none()
  }

  /// Recompute `volume` from the sets/reps/load triple, clearing it when
  /// the triple is incomplete
  pub fn recompute_volume(&mut self) {
    self.volume = match (self.sets, self.reps, self.load) {
      (Some(sets), Some(reps), Some(load)) => Some(week_volume(sets, reps, load).max(0.0)),
      _ => None,
    };
  }

  /// Apply a partial update and recompute the derived volume
  pub fn apply(&mut self, patch: &WeekPatch) {
    if let Some(sets) = patch.sets {
      self.sets = sets;
    }
    if let Some(reps) = patch.reps {
      self.reps = reps;
    }
    if let Some(load) = patch.load {
      self.load = load;
    }
    if let Some(rest) = &patch.rest {
      self.rest = rest.clone();
    }
    self.recompute_volume();
  }
}

/// Partial update of a week entry.
///
/// Outer `None` leaves the field untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WeekPatch {
  #[serde(default, deserialize_with = "double_option")]
  pub sets: Option<Option<u32>>,
  #[serde(default, deserialize_with = "double_option")]
  pub reps: Option<Option<u32>>,
  #[serde(default, deserialize_with = "double_option")]
  pub load: Option<Option<f64>>,
  #[serde(default, deserialize_with = "double_option")]
  pub rest: Option<Option<String>>,
}

impl WeekPatch {
  /// Patch setting the full sets/reps/load triple
  pub fn logged(sets: u32, reps: u32, load: f64) -> Self {
    Self {
      sets: Some(Some(sets)),
      reps: Some(Some(reps)),
      load: Some(Some(load)),
      rest: None,
    }
  }

  pub fn touches_volume(&self) -> bool {
    self.sets.is_some() || self.reps.is_some() || self.load.is_some()
  }
}

/// Distinguish a missing field from an explicit `null`
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

/// ---------------------------------------------------------------------------
/// Exercises
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
  pub id: String,
  pub index: u8,
  pub muscle_group: Option<MuscleGroup>,
  pub name: String,
  pub weeks: Vec<WeekEntry>,
  pub total_volume: f64,
}

impl Exercise {
  /// A blank exercise at `index` with one empty entry per week of the cycle
  pub fn empty(index: u8) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      index,
      muscle_group: None,
      name: Self::default_name(index),
      weeks: (1..=TOTAL_WEEKS).map(WeekEntry::empty).collect(),
      total_volume: 0.0,
    }
  }

  pub fn default_name(index: u8) -> String {
    format!("Exercise {}", index as u32 + 1)
  }

  pub fn week(&self, week: u8) -> Option<&WeekEntry> {
    self.weeks.iter().find(|w| w.week == week)
  }

  pub fn week_mut(&mut self, week: u8) -> Option<&mut WeekEntry> {
    self.weeks.iter_mut().find(|w| w.week == week)
  }

  /// Recompute every week's volume and the exercise total
  pub fn refresh_totals(&mut self) {
    for week in &mut self.weeks {
      week.recompute_volume();
    }
    self.total_volume = exercise_volume(&self.weeks);
  }
}

/// Partial update of an exercise's descriptive fields
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExercisePatch {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub muscle_group: Option<Option<MuscleGroup>>,
}

/// ---------------------------------------------------------------------------
/// Workouts
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
  pub id: WorkoutId,
  pub label: String,
  pub exercises: Vec<Exercise>,
  pub total_volume: f64,
  pub last_updated: DateTime<Utc>,
}

impl Workout {
  /// A fresh workout holding a single blank exercise
  pub fn empty(id: WorkoutId) -> Self {
    Self {
      id,
      label: id.label(),
      exercises: vec![Exercise::empty(0)],
      total_volume: 0.0,
      last_updated: Utc::now(),
    }
  }

  pub fn exercise(&self, index: usize) -> Option<&Exercise> {
    self.exercises.get(index)
  }

  pub fn exercise_mut(&mut self, index: usize) -> Option<&mut Exercise> {
    self.exercises.get_mut(index)
  }

  /// Recompute all derived volumes, bottom-up
  pub fn refresh_totals(&mut self) {
    for exercise in &mut self.exercises {
      exercise.refresh_totals();
    }
    self.total_volume = workout_volume(&self.exercises);
  }

  pub fn touch(&mut self) {
    self.last_updated = Utc::now();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_workout_id_parse_and_display() {
    assert_eq!("c".parse::<WorkoutId>().unwrap(), WorkoutId::C);
    assert_eq!(WorkoutId::F.to_string(), "F");
    assert_eq!(WorkoutId::B.label(), "Workout B");
    assert!("G".parse::<WorkoutId>().is_err());
  }

  #[test]
  fn test_muscle_group_roundtrip() {
    for group in MuscleGroup::ALL {
      assert_eq!(group.to_string().parse::<MuscleGroup>().unwrap(), group);
    }
    let json = serde_json::to_string(&MuscleGroup::Quadriceps).unwrap();
    assert_eq!(json, "\"quadriceps\"");
  }

  #[test]
  fn test_empty_exercise_has_eight_blank_weeks() {
    let exercise = Exercise::empty(2);
    assert_eq!(exercise.name, "Exercise 3");
    assert_eq!(exercise.weeks.len(), TOTAL_WEEKS as usize);
    for (i, week) in exercise.weeks.iter().enumerate() {
      assert_eq!(week.week as usize, i + 1);
      assert!(week.is_empty());
      assert!(week.volume.is_none());
    }
  }

  #[test]
  fn test_apply_patch_recomputes_volume() {
    let mut week = WeekEntry::empty(1);
    week.apply(&WeekPatch::logged(3, 10, 50.0));
    assert_eq!(week.volume, Some(1500.0));

    // Clearing load drops the volume
    week.apply(&WeekPatch {
      load: Some(None),
      ..Default::default()
    });
    assert_eq!(week.sets, Some(3));
    assert!(week.load.is_none());
    assert!(week.volume.is_none());
  }

  #[test]
  fn test_patch_rest_only_leaves_numbers() {
    let mut week = WeekEntry::empty(2);
    week.apply(&WeekPatch::logged(4, 8, 60.0));
    week.apply(&WeekPatch {
      rest: Some(Some("90s".to_string())),
      ..Default::default()
    });
    assert_eq!(week.rest.as_deref(), Some("90s"));
    assert_eq!(week.volume, Some(1920.0));
  }

  #[test]
  fn test_negative_volume_is_clamped() {
    let mut week = WeekEntry::empty(1);
    week.sets = Some(3);
    week.reps = Some(10);
    week.load = Some(-5.0);
    week.recompute_volume();
    assert_eq!(week.volume, Some(0.0));
  }

  #[test]
  fn test_week_patch_distinguishes_missing_and_null() {
    let patch: WeekPatch = serde_json::from_str(r#"{"sets": 4, "load": null}"#).unwrap();
    assert_eq!(patch.sets, Some(Some(4)));
    assert_eq!(patch.load, Some(None));
    assert_eq!(patch.reps, None);
    assert!(patch.touches_volume());
  }

  #[test]
  fn test_workout_refresh_totals() {
    let mut workout = Workout::empty(WorkoutId::A);
    workout.exercises.push(Exercise::empty(1));
    workout.exercises[0].weeks[0].apply(&WeekPatch::logged(3, 10, 20.0));
    workout.exercises[1].weeks[3].apply(&WeekPatch::logged(2, 5, 10.0));

    workout.refresh_totals();
    assert_eq!(workout.exercises[0].total_volume, 600.0);
    assert_eq!(workout.exercises[1].total_volume, 100.0);
    assert_eq!(workout.total_volume, 700.0);
  }
}
