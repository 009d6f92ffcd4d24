pub mod workout;
pub mod analysis;

pub use workout::{
  Exercise, ExercisePatch, MuscleGroup, WeekEntry, WeekPatch, Workout, WorkoutId, FIRST_WEEK,
  MAX_EXERCISES, TOTAL_WEEKS,
};
pub use analysis::{ProgressionSuggestion, StagnationLevel, StagnationStatus};
