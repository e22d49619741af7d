use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Non-negative finite factor, anything else counts as zero
pub(crate) fn volume_factor(value: f64) -> f64 {
  if value.is_finite() && value > 0.0 {
    value
  } else {
    0.0
  }
}

/// ---------------------------------------------------------------------------
/// Planned Work
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedExercise {
  pub exercise_id: String,
  pub sets: u32,
  pub reps: u32,
  /// Engine-computed at creation, coach may override afterwards
  pub weight: f64,
}

impl PlannedExercise {
  pub fn volume(&self) -> f64 {
    self.sets as f64 * self.reps as f64 * volume_factor(self.weight)
  }

  fn sanitize(&mut self) {
    self.weight = volume_factor(self.weight);
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutBlock {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub exercises: Vec<PlannedExercise>,
}

impl WorkoutBlock {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      id: uuid::Uuid::new_v4().to_string(),
      name: name.into(),
      exercises: Vec::new(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Actual Performance
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformedExercise {
  pub exercise_id: String,
  pub actual_sets: u32,
  pub actual_reps: u32,
  pub actual_weight: f64,
}

impl PerformedExercise {
  pub fn volume(&self) -> f64 {
    self.actual_sets as f64 * self.actual_reps as f64 * volume_factor(self.actual_weight)
  }

  fn sanitize(&mut self) {
    self.actual_weight = volume_factor(self.actual_weight);
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformedBlock {
  pub block_id: String,
  #[serde(default)]
  pub exercises: Vec<PerformedExercise>,
}

/// What the player actually did for a plan. At most one per plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualPerformance {
  pub date: NaiveDate,
  /// Session RPE, 1-10
  pub rpe: f64,
  pub duration_minutes: f64,
  #[serde(default)]
  pub blocks: Vec<PerformedBlock>,
}

impl ActualPerformance {
  /// Sum of sets x reps x weight across every block
  pub fn volume(&self) -> f64 {
    self
      .blocks
      .iter()
      .flat_map(|b| b.exercises.iter())
      .map(PerformedExercise::volume)
      .sum()
  }

  /// Session load: RPE x duration (minutes)
  pub fn session_load(&self) -> f64 {
    volume_factor(self.rpe) * volume_factor(self.duration_minutes)
  }

  /// Replace negative or non-finite numbers with zero. JSON has no NaN or
  /// infinity, so these must not reach storage.
  pub fn sanitize(&mut self) {
    self.rpe = volume_factor(self.rpe);
    self.duration_minutes = volume_factor(self.duration_minutes);
    for exercise in self.blocks.iter_mut().flat_map(|b| b.exercises.iter_mut()) {
      exercise.sanitize();
    }
  }
}

/// ---------------------------------------------------------------------------
/// Workout Plan
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
  pub id: String,
  pub name: String,
  pub player_id: Option<String>,
  /// Intensity level used when prescribing weights (1-10)
  pub intensity: i32,
  pub scheduled_for: Option<NaiveDate>,
  #[serde(default)]
  pub blocks: Vec<WorkoutBlock>,
  pub actual: Option<ActualPerformance>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl WorkoutPlan {
  /// New unsaved plan with no blocks
  pub fn new(name: impl Into<String>, intensity: i32) -> Self {
    let now = Utc::now();
    Self {
      id: uuid::Uuid::new_v4().to_string(),
      name: name.into(),
      player_id: None,
      intensity,
      scheduled_for: None,
      blocks: Vec::new(),
      actual: None,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn block_mut(&mut self, block_id: &str) -> Option<&mut WorkoutBlock> {
    self.blocks.iter_mut().find(|b| b.id == block_id)
  }

  /// Zero out negative or non-finite weights, including the recorded performance
  pub fn sanitize(&mut self) {
    for exercise in self.blocks.iter_mut().flat_map(|b| b.exercises.iter_mut()) {
      exercise.sanitize();
    }
    if let Some(actual) = self.actual.as_mut() {
      actual.sanitize();
    }
  }

  pub fn planned_volume(&self) -> f64 {
    self
      .blocks
      .iter()
      .flat_map(|b| b.exercises.iter())
      .map(PlannedExercise::volume)
      .sum()
  }

  /// Copy with a fresh identity and no recorded performance
  pub fn duplicate(&self) -> Self {
    let now = Utc::now();
    Self {
      id: uuid::Uuid::new_v4().to_string(),
      name: format!("{} (Copy)", self.name),
      actual: None,
      created_at: now,
      updated_at: now,
      ..self.clone()
    }
  }
}
