pub mod analysis;
pub mod autofill;
pub mod commands;
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod progression;
pub mod stagnation;
pub mod store;
pub mod validation;

#[cfg(test)]
mod test_utils;

pub use analysis::{exercise_volume, week_volume, workout_volume};
pub use autofill::propagate_week_one;
pub use progression::suggest_progression;
pub use stagnation::classify_stagnation;

use config::{AppConfig, ConfigError};
use db::{AppState, DbError};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
  #[error("Configuration error: {0}")]
  Config(#[from] ConfigError),

  #[error("Failed to initialize database: {0}")]
  Database(#[from] DbError),
}

/// Library entry point: load `.env`, read configuration, then bring up
/// logging, the database and the workout store
pub async fn start() -> Result<Arc<AppState>, StartupError> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let config = AppConfig::from_env()?;
  start_with_config(config).await
}

pub async fn start_with_config(config: AppConfig) -> Result<Arc<AppState>, StartupError> {
  logging::init_logging(&config.log_filter);

  let pool = db::initialize_db(&config.database_url).await?;
  let store = db::load_store(&pool).await?;
  tracing::info!(
    workouts = store.workouts().count(),
    "Workout store ready"
  );

  Ok(Arc::new(AppState::new(pool, store, config)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{WeekPatch, WorkoutId};

  fn temp_database_url(name: &str) -> (String, std::path::PathBuf) {
    let path = std::env::temp_dir().join(format!("{}-{}.db", name, uuid::Uuid::new_v4()));
    (format!("sqlite://{}?mode=rwc", path.display()), path)
  }

  #[tokio::test]
  async fn test_start_and_restart_keeps_data() {
    let (url, path) = temp_database_url("lift-log-start");
    let config = AppConfig {
      database_url: url,
      ..AppConfig::default()
    };

    let state = start_with_config(config.clone()).await.expect("Should start");
    commands::update_week_data(&state, "A".to_string(), 0, 1, WeekPatch::logged(3, 10, 40.0))
      .await
      .unwrap();
    state.db.close().await;

    let restarted = start_with_config(config).await.expect("Should restart");
    let workout = commands::get_workout(&restarted, "A".to_string()).await.unwrap();
    assert_eq!(workout.id, WorkoutId::A);
    assert_eq!(workout.total_volume, 1200.0);
    assert_eq!(workout.exercises[0].weeks[7].sets, Some(3));
    restarted.db.close().await;

    let _ = std::fs::remove_file(path);
  }

  #[tokio::test]
  async fn test_start_reports_bad_database_url() {
    let config = AppConfig {
      database_url: "postgres://nowhere".to_string(),
      ..AppConfig::default()
    };
    assert!(matches!(
      start_with_config(config).await,
      Err(StartupError::Database(_))
    ));
  }
}
