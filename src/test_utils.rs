//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Shared application state backed by an in-memory database
//! - Factories for logged exercises

use crate::config::AppConfig;
use crate::db::{load_store, AppState};
use crate::models::{Exercise, WeekPatch};
use sqlx::SqlitePool;
use std::sync::Arc;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Application state over a fresh database with every workout seeded
pub async fn setup_test_state() -> Arc<AppState> {
  let pool = setup_test_db().await;
  let store = load_store(&pool).await.expect("Failed to load store");
  Arc::new(AppState::new(pool, store, AppConfig::default()))
}

/// ---------------------------------------------------------------------------
/// Data Factories
/// ---------------------------------------------------------------------------

/// An exercise with 3x10 logged at the given load for each listed week
pub fn make_logged_exercise(index: u8, loads: &[(u8, f64)]) -> Exercise {
  let mut exercise = Exercise::empty(index);
  for (week, load) in loads {
    if let Some(entry) = exercise.week_mut(*week) {
      entry.apply(&WeekPatch::logged(3, 10, *load));
    }
  }
  exercise.refresh_totals();
  exercise
}
