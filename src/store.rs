//! Team store
//!
//! Owns players and workout plans on top of a `KvRepository`. Each
//! collection lives under one key as a JSON array. The store is passed
//! explicitly to whoever needs it; the engine modules never see it.

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::catalog::ExerciseCatalog;
use crate::db::{KvRepository, RepositoryError};
use crate::load::{weekly_rollup, WeeklyRollup, WorkloadSnapshot};
use crate::models::{
  ActualPerformance, BaseLift, PhysicalData, PlannedExercise, Player, RmProfile, ValidationError, WorkoutPlan,
};
use crate::prescription::{PrescriptionSettings, WeightPrescriber};

pub const PLAYERS_KEY: &str = "players";
pub const WORKOUT_PLANS_KEY: &str = "workout_plans";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("{kind} not found: {id}")]
  NotFound { kind: &'static str, id: String },

  #[error("Workout plan {0} already has a recorded performance")]
  PerformanceExists(String),

  #[error("Invalid physical data: {0}")]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Repository(#[from] RepositoryError),

  #[error("Failed to encode stored data: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl StoreError {
  fn not_found(kind: &'static str, id: &str) -> Self {
    StoreError::NotFound {
      kind,
      id: id.to_string(),
    }
  }
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

/// Players and plans over a key-value repository.
///
/// Every write loads the whole collection, changes it and puts it back, so
/// the store assumes a single writer. Two concurrent writes on the same
/// collection can lose one of the updates.
pub struct TeamStore<R: KvRepository> {
  repo: R,
  catalog: ExerciseCatalog,
  settings: PrescriptionSettings,
}

impl<R: KvRepository> TeamStore<R> {
  pub fn new(repo: R, catalog: ExerciseCatalog, settings: PrescriptionSettings) -> Self {
    Self {
      repo,
      catalog,
      settings,
    }
  }

  pub fn catalog(&self) -> &ExerciseCatalog {
    &self.catalog
  }

  pub fn prescriber(&self) -> WeightPrescriber<'_> {
    WeightPrescriber::new(&self.catalog, self.settings)
  }

  async fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
    match self.repo.get(key).await? {
      Some(value) => Ok(serde_json::from_value(value)?),
      None => Ok(Vec::new()),
    }
  }

  async fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
    let value = serde_json::to_value(items)?;
    self.repo.put(key, &value).await?;
    Ok(())
  }

  // ---------------------------------------------------------------------------
  // Players
  // ---------------------------------------------------------------------------

  pub async fn list_players(&self) -> Result<Vec<Player>, StoreError> {
    self.load_collection(PLAYERS_KEY).await
  }

  pub async fn get_player(&self, id: &str) -> Result<Player, StoreError> {
    self
      .list_players()
      .await?
      .into_iter()
      .find(|p| p.id == id)
      .ok_or_else(|| StoreError::not_found("Player", id))
  }

  /// Insert or replace a player by id
  pub async fn save_player(&self, mut player: Player) -> Result<Player, StoreError> {
    if let Some(physical) = &player.physical {
      physical.validate()?;
    }
    player.updated_at = Utc::now();

    let mut players = self.list_players().await?;
    match players.iter_mut().find(|p| p.id == player.id) {
      Some(existing) => *existing = player.clone(),
      None => players.push(player.clone()),
    }
    self.save_collection(PLAYERS_KEY, &players).await?;

    tracing::info!(player_id = %player.id, name = %player.name, "saved player");
    Ok(player)
  }

  pub async fn delete_player(&self, id: &str) -> Result<(), StoreError> {
    let mut players = self.list_players().await?;
    let before = players.len();
    players.retain(|p| p.id != id);
    if players.len() == before {
      return Err(StoreError::not_found("Player", id));
    }
    self.save_collection(PLAYERS_KEY, &players).await?;

    tracing::info!(player_id = %id, "deleted player");
    Ok(())
  }

  /// Record a new strength test, replacing the previous value for that lift
  pub async fn record_one_rep_max(&self, player_id: &str, lift: BaseLift, value: f64) -> Result<Player, StoreError> {
    let mut player = self.get_player(player_id).await?;
    player.rm_profile.record(lift, value);
    tracing::info!(player_id, %lift, value, "recorded one-rep max");
    self.save_player(player).await
  }

  pub async fn update_physical(&self, player_id: &str, data: PhysicalData) -> Result<Player, StoreError> {
    data.validate()?;
    let mut player = self.get_player(player_id).await?;
    player.physical = Some(data);
    self.save_player(player).await
  }

  // ---------------------------------------------------------------------------
  // Workout Plans
  // ---------------------------------------------------------------------------

  pub async fn list_plans(&self) -> Result<Vec<WorkoutPlan>, StoreError> {
    self.load_collection(WORKOUT_PLANS_KEY).await
  }

  pub async fn get_plan(&self, id: &str) -> Result<WorkoutPlan, StoreError> {
    self
      .list_plans()
      .await?
      .into_iter()
      .find(|p| p.id == id)
      .ok_or_else(|| StoreError::not_found("Workout plan", id))
  }

  /// Insert or replace a plan by id. Negative or non-finite numbers are
  /// stored as zero.
  pub async fn save_plan(&self, mut plan: WorkoutPlan) -> Result<WorkoutPlan, StoreError> {
    plan.sanitize();
    plan.updated_at = Utc::now();

    let mut plans = self.list_plans().await?;
    match plans.iter_mut().find(|p| p.id == plan.id) {
      Some(existing) => *existing = plan.clone(),
      None => plans.push(plan.clone()),
    }
    self.save_collection(WORKOUT_PLANS_KEY, &plans).await?;

    tracing::info!(plan_id = %plan.id, name = %plan.name, "saved workout plan");
    Ok(plan)
  }

  pub async fn duplicate_plan(&self, id: &str) -> Result<WorkoutPlan, StoreError> {
    let original = self.get_plan(id).await?;
    self.save_plan(original.duplicate()).await
  }

  pub async fn delete_plan(&self, id: &str) -> Result<(), StoreError> {
    let mut plans = self.list_plans().await?;
    let before = plans.len();
    plans.retain(|p| p.id != id);
    if plans.len() == before {
      return Err(StoreError::not_found("Workout plan", id));
    }
    self.save_collection(WORKOUT_PLANS_KEY, &plans).await?;

    tracing::info!(plan_id = %id, "deleted workout plan");
    Ok(())
  }

  /// Append an exercise to a block with sets, reps and weight from the
  /// engine, using the plan's intensity and its player's RM profile
  pub async fn add_planned_exercise(
    &self,
    plan_id: &str,
    block_id: &str,
    exercise_id: &str,
  ) -> Result<PlannedExercise, StoreError> {
    let mut plan = self.get_plan(plan_id).await?;

    let rm = match &plan.player_id {
      Some(player_id) => match self.get_player(player_id).await {
        Ok(player) => player.rm_profile,
        Err(StoreError::NotFound { .. }) => {
          tracing::debug!(plan_id, player_id = %player_id, "plan player missing, using empty RM profile");
          RmProfile::default()
        }
        Err(e) => return Err(e),
      },
      None => RmProfile::default(),
    };

    let planned = self.prescriber().plan_exercise(exercise_id, plan.intensity, &rm);
    let block = plan
      .block_mut(block_id)
      .ok_or_else(|| StoreError::not_found("Workout block", block_id))?;
    block.exercises.push(planned.clone());

    self.save_plan(plan).await?;
    Ok(planned)
  }

  /// Attach what was actually performed to a plan. An existing record is
  /// only replaced when `overwrite` is set, and the old one is discarded.
  pub async fn record_performance(
    &self,
    plan_id: &str,
    performance: ActualPerformance,
    overwrite: bool,
  ) -> Result<WorkoutPlan, StoreError> {
    let mut plan = self.get_plan(plan_id).await?;

    if plan.actual.is_some() {
      if !overwrite {
        return Err(StoreError::PerformanceExists(plan_id.to_string()));
      }
      tracing::warn!(plan_id, "overwriting recorded performance");
    }

    plan.actual = Some(performance);
    self.save_plan(plan).await
  }

  /// Recorded performances, optionally limited to one player's plans
  pub async fn performance_history(&self, player_id: Option<&str>) -> Result<Vec<ActualPerformance>, StoreError> {
    let plans = self.list_plans().await?;
    Ok(
      plans
        .into_iter()
        .filter(|p| player_id.map_or(true, |id| p.player_id.as_deref() == Some(id)))
        .filter_map(|p| p.actual)
        .collect(),
    )
  }

  pub async fn workload_snapshot(
    &self,
    player_id: Option<&str>,
    as_of: NaiveDate,
  ) -> Result<WorkloadSnapshot, StoreError> {
    let history = self.performance_history(player_id).await?;
    Ok(WorkloadSnapshot::compute(&history, as_of))
  }

  pub async fn weekly_rollup(
    &self,
    player_id: Option<&str>,
    week_count: usize,
    as_of: NaiveDate,
  ) -> Result<Vec<WeeklyRollup>, StoreError> {
    let history = self.performance_history(player_id).await?;
    Ok(weekly_rollup(&history, week_count, as_of))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::SqliteRepository;
  use crate::load::AcwrBand;
  use crate::models::WorkoutBlock;
  use crate::test_utils::{memory_store, mock_performance, mock_plan, mock_player};

  fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
  }

  #[test]
  fn test_prescriber_uses_store_settings() {
    let store = memory_store();
    assert_eq!(*store.prescriber().settings(), PrescriptionSettings::default());
    assert!(store.catalog().get("leg-press").is_some());
  }

  #[tokio::test]
  async fn test_player_crud() {
    let store = memory_store();

    let player = store.save_player(mock_player("Jordan")).await.unwrap();
    assert_eq!(store.list_players().await.unwrap().len(), 1);

    let mut renamed = player.clone();
    renamed.name = "Jordan B.".to_string();
    store.save_player(renamed).await.unwrap();

    let loaded = store.get_player(&player.id).await.unwrap();
    assert_eq!(loaded.name, "Jordan B.");
    assert_eq!(store.list_players().await.unwrap().len(), 1);

    store.delete_player(&player.id).await.unwrap();
    assert!(matches!(
      store.get_player(&player.id).await,
      Err(StoreError::NotFound { kind: "Player", .. })
    ));
    assert!(store.delete_player(&player.id).await.is_err());
  }

  #[tokio::test]
  async fn test_save_player_validates_physical_data() {
    let store = memory_store();
    let mut player = mock_player("Sam");
    player.physical = Some(PhysicalData {
      height_cm: 95.0,
      weight_kg: 80.0,
      body_fat_pct: None,
    });

    let result = store.save_player(player).await;
    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert!(store.list_players().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_record_one_rep_max_overwrites() {
    let store = memory_store();
    let player = store.save_player(Player::new("Rookie")).await.unwrap();
    assert!(player.rm_profile.is_empty());

    store.record_one_rep_max(&player.id, BaseLift::Squat, 140.0).await.unwrap();
    let updated = store.record_one_rep_max(&player.id, BaseLift::Squat, 150.0).await.unwrap();
    assert_eq!(updated.rm_profile.get(BaseLift::Squat), Some(150.0));
    assert_eq!(updated.rm_profile.get(BaseLift::BenchPress), None);
  }

  #[tokio::test]
  async fn test_update_physical() {
    let store = memory_store();
    let player = store.save_player(mock_player("Alex")).await.unwrap();
    let data = PhysicalData {
      height_cm: 201.0,
      weight_kg: 102.0,
      body_fat_pct: Some(11.0),
    };

    let updated = store.update_physical(&player.id, data).await.unwrap();
    assert_eq!(updated.physical, Some(data));

    let bad = PhysicalData { weight_kg: 400.0, ..data };
    assert!(store.update_physical(&player.id, bad).await.is_err());
  }

  #[tokio::test]
  async fn test_add_planned_exercise_uses_player_rm() {
    let store = memory_store();
    let player = store.save_player(mock_player("Chris")).await.unwrap();

    let mut plan = WorkoutPlan::new("Lower Body", 5);
    plan.player_id = Some(player.id.clone());
    let block = WorkoutBlock::new("Main Lifts");
    let block_id = block.id.clone();
    plan.blocks.push(block);
    let plan = store.save_plan(plan).await.unwrap();

    let planned = store
      .add_planned_exercise(&plan.id, &block_id, "back-squat")
      .await
      .unwrap();
    assert_eq!(planned.weight, 120.0);
    assert_eq!(planned.sets, 3);
    assert_eq!(planned.reps, 5);

    let reloaded = store.get_plan(&plan.id).await.unwrap();
    assert_eq!(reloaded.blocks[0].exercises, vec![planned]);
  }

  #[tokio::test]
  async fn test_add_planned_exercise_without_player_is_unloaded() {
    let store = memory_store();
    let mut plan = WorkoutPlan::new("Team Session", 8);
    let block = WorkoutBlock::new("Strength");
    let block_id = block.id.clone();
    plan.blocks.push(block);
    let plan = store.save_plan(plan).await.unwrap();

    let planned = store.add_planned_exercise(&plan.id, &block_id, "deadlift").await.unwrap();
    assert_eq!(planned.weight, 0.0);
    assert_eq!(planned.sets, 4);

    let missing_block = store.add_planned_exercise(&plan.id, "nope", "deadlift").await;
    assert!(matches!(
      missing_block,
      Err(StoreError::NotFound { kind: "Workout block", .. })
    ));
  }

  #[tokio::test]
  async fn test_record_performance_overwrite_protection() {
    let store = memory_store();
    let plan = store.save_plan(WorkoutPlan::new("Shootaround", 3)).await.unwrap();

    store
      .record_performance(&plan.id, mock_performance(day(10), 1000.0), false)
      .await
      .unwrap();

    let second = store
      .record_performance(&plan.id, mock_performance(day(11), 2000.0), false)
      .await;
    assert!(matches!(second, Err(StoreError::PerformanceExists(_))));
    assert_eq!(
      store.get_plan(&plan.id).await.unwrap().actual.unwrap().volume(),
      1000.0
    );

    let replaced = store
      .record_performance(&plan.id, mock_performance(day(11), 2000.0), true)
      .await
      .unwrap();
    assert_eq!(replaced.actual.unwrap().date, day(11));
  }

  #[tokio::test]
  async fn test_non_finite_performance_keeps_plans_readable() {
    let store = memory_store();
    let good = store.save_plan(WorkoutPlan::new("Good", 5)).await.unwrap();
    let bad = store.save_plan(WorkoutPlan::new("Bad", 5)).await.unwrap();

    let mut perf = mock_performance(day(12), f64::NAN);
    perf.rpe = f64::NAN;
    perf.duration_minutes = f64::INFINITY;
    store.record_performance(&bad.id, perf, false).await.unwrap();

    assert_eq!(store.get_plan(&good.id).await.unwrap().name, "Good");
    assert_eq!(store.list_plans().await.unwrap().len(), 2);

    let actual = store.get_plan(&bad.id).await.unwrap().actual.unwrap();
    assert_eq!(actual.rpe, 0.0);
    assert_eq!(actual.duration_minutes, 0.0);
    assert_eq!(actual.volume(), 0.0);
  }

  #[tokio::test]
  async fn test_overridden_planned_weight_is_sanitized() {
    let store = memory_store();
    let mut plan = mock_plan("Override");
    plan.blocks[0].exercises[0].weight = f64::NEG_INFINITY;
    let plan = store.save_plan(plan).await.unwrap();

    let reloaded = store.get_plan(&plan.id).await.unwrap();
    assert_eq!(reloaded.blocks[0].exercises[0].weight, 0.0);
    assert_eq!(reloaded.blocks[0].exercises[1].weight, 40.0);
  }

  #[tokio::test]
  async fn test_duplicate_and_delete_plan() {
    let store = memory_store();
    let mut plan = WorkoutPlan::new("Game Prep", 6);
    plan.actual = Some(mock_performance(day(10), 500.0));
    let plan = store.save_plan(plan).await.unwrap();

    let copy = store.duplicate_plan(&plan.id).await.unwrap();
    assert_eq!(copy.name, "Game Prep (Copy)");
    assert!(copy.actual.is_none());
    assert_eq!(store.list_plans().await.unwrap().len(), 2);

    store.delete_plan(&plan.id).await.unwrap();
    let remaining = store.list_plans().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, copy.id);

    assert!(matches!(
      store.delete_plan(&plan.id).await,
      Err(StoreError::NotFound { .. })
    ));
  }

  #[tokio::test]
  async fn test_history_and_workload_per_player() {
    let store = memory_store();

    let mut a = WorkoutPlan::new("A", 5);
    a.player_id = Some("p1".to_string());
    a.actual = Some(mock_performance(day(12), 2800.0));
    let mut b = WorkoutPlan::new("B", 5);
    b.player_id = Some("p2".to_string());
    b.actual = Some(mock_performance(day(13), 700.0));
    let unperformed = WorkoutPlan::new("C", 5);

    for plan in [a, b, unperformed] {
      store.save_plan(plan).await.unwrap();
    }

    assert_eq!(store.performance_history(None).await.unwrap().len(), 2);
    assert_eq!(store.performance_history(Some("p1")).await.unwrap().len(), 1);

    let snapshot = store.workload_snapshot(Some("p1"), day(14)).await.unwrap();
    assert_eq!(snapshot.acute, 400.0);
    assert_eq!(snapshot.band, AcwrBand::HighRisk);

    let weeks = store.weekly_rollup(None, 2, day(14)).await.unwrap();
    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[1].workout_count, 2);

    let empty = store.workload_snapshot(Some("nobody"), day(14)).await.unwrap();
    assert_eq!(empty.acwr, 0.0);
    assert_eq!(empty.band, AcwrBand::NoData);
  }

  #[tokio::test]
  async fn test_store_on_sqlite() {
    let pool = crate::test_utils::setup_test_db().await;
    let store = TeamStore::new(
      SqliteRepository::new(pool.clone()),
      ExerciseCatalog::standard(),
      PrescriptionSettings::default(),
    );

    let player = store.save_player(mock_player("Taylor")).await.unwrap();
    let reloaded = store.get_player(&player.id).await.unwrap();
    assert_eq!(reloaded.rm_profile, player.rm_profile);
    assert_eq!(reloaded.name, "Taylor");

    crate::test_utils::teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_store_error_serializes_as_message() {
    let err = StoreError::PerformanceExists("plan-1".to_string());
    let json = serde_json::to_string(&err).unwrap();
    assert_eq!(json, "\"Workout plan plan-1 already has a recorded performance\"");
  }
}
