//! Auto-fill Propagator
//!
//! Copies the structure of a reference week (sets, reps, rest) into the
//! later weeks that are still blank. Load and volume are left empty on
//! purpose: the load is what the user progresses week to week.
//!
//! The propagator never decides when it runs. Callers invoke it explicitly,
//! typically right after week 1 has been written.

use crate::models::WeekEntry;

/// Propagate `source_week`'s sets/reps/rest into every later empty week.
///
/// A week counts as empty when both sets and reps are absent; anything else
/// is user data and is returned untouched. Propagated weeks get no load and
/// no volume. If `source_week` is not in the series, the series is returned
/// as is. Running it twice gives the same result as running it once.
pub fn propagate_week_one(weeks: &[WeekEntry], source_week: u8) -> Vec<WeekEntry> {
    let Some(source) = weeks.iter().find(|w| w.week == source_week) else {
        return weeks.to_vec();
    };

    weeks
        .iter()
        .map(|week| {
            if week.week <= source_week || !week.is_empty() {
                return week.clone();
            }
            WeekEntry {
                week: week.week,
                sets: source.sets,
                reps: source.reps,
                rest: source.rest.clone(),
                load: None,
                volume: None,
            }
        })
        .collect()
}
