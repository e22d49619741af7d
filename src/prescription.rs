//! Weight prescription
//!
//! Resolves how an exercise relates to one of the three tested lifts and
//! turns a player's recorded 1RM into a prescribed load for a given
//! intensity level. Missing data is a normal state (new players have no RM
//! profile), so every path degrades to zero instead of failing.

use serde::{Deserialize, Serialize};

use crate::catalog::{accessory_lift, ExerciseCatalog};
use crate::intensity::map_intensity;
use crate::models::{BaseLift, PlannedExercise, RmProfile};

pub const DEFAULT_WEIGHT_INCREMENT: f64 = 2.5;
pub const DEFAULT_HEURISTIC_COEFFICIENT: f64 = 0.7;

/// ---------------------------------------------------------------------------
/// Load Specs
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
  /// The exercise is a base lift
  Direct,
  /// Listed in the accessory relationship table
  Accessory,
  /// Classified from the catalog's muscle group
  Heuristic,
  /// No relationship, prescribed load is zero
  Unmapped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSpec {
  pub exercise_id: String,
  pub base_lift: Option<BaseLift>,
  pub transfer_coefficient: f64,
  pub source: LoadSource,
}

impl LoadSpec {
  fn new(exercise_id: &str, base_lift: Option<BaseLift>, transfer_coefficient: f64, source: LoadSource) -> Self {
    Self {
      exercise_id: exercise_id.to_string(),
      base_lift,
      transfer_coefficient,
      source,
    }
  }

  fn unmapped(exercise_id: &str) -> Self {
    Self::new(exercise_id, None, 0.0, LoadSource::Unmapped)
  }
}

/// ---------------------------------------------------------------------------
/// Settings
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionSettings {
  /// Smallest plate jump available, prescribed loads are rounded to it
  pub increment: f64,
  /// Coefficient for exercises resolved by muscle group
  pub heuristic_coefficient: f64,
}

impl Default for PrescriptionSettings {
  fn default() -> Self {
    Self {
      increment: DEFAULT_WEIGHT_INCREMENT,
      heuristic_coefficient: DEFAULT_HEURISTIC_COEFFICIENT,
    }
  }
}

impl PrescriptionSettings {
  fn effective_increment(&self) -> f64 {
    if self.increment.is_finite() && self.increment > 0.0 {
      self.increment
    } else {
      DEFAULT_WEIGHT_INCREMENT
    }
  }

  fn effective_heuristic_coefficient(&self) -> f64 {
    if self.heuristic_coefficient.is_finite()
      && self.heuristic_coefficient > 0.0
      && self.heuristic_coefficient <= 1.0
    {
      self.heuristic_coefficient
    } else {
      DEFAULT_HEURISTIC_COEFFICIENT
    }
  }
}

/// Absorbs binary error so decimal ties like 61.25 / 2.5 still round up
const ROUNDING_EPSILON: f64 = 1e-9;

/// Round half-up to the nearest multiple of `increment`
pub fn round_to_increment(value: f64, increment: f64) -> f64 {
  if !value.is_finite() || increment <= 0.0 || !increment.is_finite() {
    return 0.0;
  }
  (value / increment + 0.5 + ROUNDING_EPSILON).floor() * increment
}

/// ---------------------------------------------------------------------------
/// Prescriber
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct WeightPrescriber<'a> {
  catalog: &'a ExerciseCatalog,
  settings: PrescriptionSettings,
}

impl<'a> WeightPrescriber<'a> {
  pub fn new(catalog: &'a ExerciseCatalog, settings: PrescriptionSettings) -> Self {
    Self { catalog, settings }
  }

  pub fn settings(&self) -> &PrescriptionSettings {
    &self.settings
  }

  /// Resolve the lift and coefficient behind an exercise.
  ///
  /// Order: base lift, accessory table, catalog muscle group, unmapped.
  pub fn resolve(&self, exercise_id: &str) -> LoadSpec {
    if let Some(lift) = BaseLift::from_exercise_id(exercise_id) {
      return LoadSpec::new(exercise_id, Some(lift), 1.0, LoadSource::Direct);
    }

    if let Some((lift, coefficient)) = accessory_lift(exercise_id) {
      return LoadSpec::new(exercise_id, Some(lift), coefficient, LoadSource::Accessory);
    }

    let heuristic = self
      .catalog
      .get(exercise_id)
      .filter(|e| e.category.is_loaded())
      .and_then(|e| e.target_muscle_group.base_lift());

    match heuristic {
      Some(lift) => LoadSpec::new(
        exercise_id,
        Some(lift),
        self.settings.effective_heuristic_coefficient(),
        LoadSource::Heuristic,
      ),
      None => {
        tracing::debug!(exercise_id, "no load relationship for exercise");
        LoadSpec::unmapped(exercise_id)
      }
    }
  }

  /// Prescribed external load in kg, zero when no RM or relationship exists
  pub fn prescribe_weight(&self, exercise_id: &str, intensity_level: i32, rm: &RmProfile) -> f64 {
    let spec = self.resolve(exercise_id);
    let Some(one_rep_max) = spec.base_lift.and_then(|lift| rm.get(lift)) else {
      return 0.0;
    };

    let percent = map_intensity(intensity_level).percent_of_1rm;
    round_to_increment(
      one_rep_max * spec.transfer_coefficient * percent,
      self.settings.effective_increment(),
    )
  }

  /// Planned line item with sets and reps from the intensity table and the
  /// prescribed weight
  pub fn plan_exercise(&self, exercise_id: &str, intensity_level: i32, rm: &RmProfile) -> PlannedExercise {
    let prescription = map_intensity(intensity_level);
    PlannedExercise {
      exercise_id: exercise_id.to_string(),
      sets: prescription.sets,
      reps: prescription.reps_low,
      weight: self.prescribe_weight(exercise_id, intensity_level, rm),
    }
  }
}
