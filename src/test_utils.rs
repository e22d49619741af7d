//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::catalog::ExerciseCatalog;
use crate::db::MemoryRepository;
use crate::models::{
  ActualPerformance, PerformedBlock, PerformedExercise, PlannedExercise, Player, RmProfile, WorkoutBlock,
  WorkoutPlan,
};
use crate::prescription::PrescriptionSettings;
use crate::store::TeamStore;

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

/// Store over an in-memory repository with the standard catalog
pub fn memory_store() -> TeamStore<MemoryRepository> {
  TeamStore::new(
    MemoryRepository::new(),
    ExerciseCatalog::standard(),
    PrescriptionSettings::default(),
  )
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// bench 150, squat 200, deadlift 220
pub fn mock_rm_profile() -> RmProfile {
  RmProfile::new(Some(150.0), Some(200.0), Some(220.0))
}

pub fn mock_player(name: &str) -> Player {
  let mut player = Player::new(name);
  player.position = Some("Guard".to_string());
  player.jersey_number = Some(23);
  player.rm_profile = mock_rm_profile();
  player
}

/// Performance whose total volume is exactly `volume` (one set of one rep)
pub fn mock_performance(date: NaiveDate, volume: f64) -> ActualPerformance {
  ActualPerformance {
    date,
    rpe: 7.0,
    duration_minutes: 60.0,
    blocks: vec![PerformedBlock {
      block_id: "main".to_string(),
      exercises: vec![PerformedExercise {
        exercise_id: "back-squat".to_string(),
        actual_sets: 1,
        actual_reps: 1,
        actual_weight: volume,
      }],
    }],
  }
}

/// Plan with one block: 3 x 5 @ 100 back squat and 3 x 8 @ 40 romanian deadlift
pub fn mock_plan(name: &str) -> WorkoutPlan {
  let mut plan = WorkoutPlan::new(name, 5);
  let mut block = WorkoutBlock::new("Main Lifts");
  block.exercises = vec![
    PlannedExercise {
      exercise_id: "back-squat".to_string(),
      sets: 3,
      reps: 5,
      weight: 100.0,
    },
    PlannedExercise {
      exercise_id: "romanian-deadlift".to_string(),
      sets: 3,
      reps: 8,
      weight: 40.0,
    },
  ];
  plan.blocks.push(block);
  plan
}
