use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::collections::HashSet;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::models::{Exercise, Workout, WorkoutId};
use crate::store::WorkoutStore;
use crate::validation::{validate_workout, ValidationError};

pub type DbPool = SqlitePool;

/// Application state shared by every command.
///
/// The store mutex serializes every mutation: lock, change, persist, unlock.
pub struct AppState {
  pub db: DbPool,
  pub store: Mutex<WorkoutStore>,
  pub config: AppConfig,
}

impl AppState {
  pub fn new(db: DbPool, store: WorkoutStore, config: AppConfig) -> Self {
    Self {
      db,
      store: Mutex::new(store),
      config,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DbError {
  #[error("Database error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration failed: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  #[error("Corrupt exercise payload: {0}")]
  Payload(#[from] serde_json::Error),

  #[error("Invalid workout row: {0}")]
  InvalidRow(String),

  #[error("Stored workout failed validation: {0}")]
  Validation(#[from] ValidationError),
}

impl Serialize for DbError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Connection
/// ---------------------------------------------------------------------------

/// Open the connection pool and run migrations
pub async fn initialize_db(database_url: &str) -> Result<DbPool, DbError> {
  tracing::info!(database_url, "Initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("Database initialized successfully");
  Ok(pool)
}

/// ---------------------------------------------------------------------------
/// Workout Persistence
/// ---------------------------------------------------------------------------

/// Load every stored workout.
///
/// Derived totals are recomputed rather than read back.
pub async fn load_workouts(pool: &DbPool) -> Result<Vec<Workout>, DbError> {
  let rows = sqlx::query(
    r#"
    SELECT id, label, exercises_json, last_updated
    FROM workouts
    ORDER BY id
    "#,
  )
  .fetch_all(pool)
  .await?;

  let mut workouts = Vec::with_capacity(rows.len());
  for row in rows {
    let id_str: String = row.get("id");
    let id: WorkoutId = id_str.parse().map_err(DbError::InvalidRow)?;
    let exercises_json: String = row.get("exercises_json");
    let exercises: Vec<Exercise> = serde_json::from_str(&exercises_json)?;
    let last_updated: String = row.get("last_updated");
    let last_updated = DateTime::parse_from_rfc3339(&last_updated)
      .map(|dt| dt.with_timezone(&Utc))
      .map_err(|e| {
        DbError::InvalidRow(format!(
          "workout {} has a bad timestamp {:?}: {}",
          id, last_updated, e
        ))
      })?;

    let mut workout = Workout {
      id,
      label: row.get("label"),
      exercises,
      total_volume: 0.0,
      last_updated,
    };
    workout.refresh_totals();
    validate_workout(&workout)?;
    workouts.push(workout);
  }

  Ok(workouts)
}

/// Insert or replace one workout row
pub async fn save_workout(pool: &DbPool, workout: &Workout) -> Result<(), DbError> {
  let exercises_json = serde_json::to_string(&workout.exercises)?;

  sqlx::query(
    r#"
    INSERT INTO workouts (id, label, exercises_json, total_volume, last_updated)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(id) DO UPDATE SET
      label = excluded.label,
      exercises_json = excluded.exercises_json,
      total_volume = excluded.total_volume,
      last_updated = excluded.last_updated
    "#,
  )
  .bind(workout.id.as_str())
  .bind(&workout.label)
  .bind(&exercises_json)
  .bind(workout.total_volume)
  .bind(workout.last_updated.to_rfc3339())
  .execute(pool)
  .await?;

  Ok(())
}

/// Build the store from the database, persisting empty workouts for any
/// slot that has never been saved
pub async fn load_store(pool: &DbPool) -> Result<WorkoutStore, DbError> {
  let workouts = load_workouts(pool).await?;
  let stored: HashSet<WorkoutId> = workouts.iter().map(|w| w.id).collect();
  let store = WorkoutStore::from_workouts(workouts);

  for workout in store.workouts().filter(|w| !stored.contains(&w.id)) {
    tracing::debug!(workout = %workout.id, "Seeding empty workout");
    save_workout(pool, workout).await?;
  }

  Ok(store)
}
